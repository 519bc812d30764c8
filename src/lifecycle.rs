//! Report lifecycle state machine
//!
//! A report starts `InProgress` and may move to `Finalized` exactly once.
//! `Finalized` is terminal: there is no transition back, and checklist items
//! of a finalized report are read-only.

use crate::error::{InspectionError, Result};
use crate::types::ReportId;
use serde::{Deserialize, Serialize};

/// Report status as stored by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReportStatus {
    #[default]
    #[serde(rename = "em_andamento")]
    InProgress,
    #[serde(rename = "concluido")]
    Finalized,
}

impl ReportStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ReportStatus::Finalized)
    }

    /// Whether checklist answers and notes may still change
    pub fn allows_edits(self) -> bool {
        matches!(self, ReportStatus::InProgress)
    }

    /// The single legal transition
    pub fn finalize(self, report: ReportId) -> Result<ReportStatus> {
        match self {
            ReportStatus::InProgress => Ok(ReportStatus::Finalized),
            ReportStatus::Finalized => Err(InspectionError::AlreadyFinalized(report)),
        }
    }

    /// Guard applied before any checklist mutation
    pub fn ensure_editable(self, report: ReportId) -> Result<()> {
        if self.allows_edits() {
            Ok(())
        } else {
            Err(InspectionError::FinalizedReport(report))
        }
    }

    /// Value used in the `status` field and the `status_filter` query parameter
    pub fn wire_value(self) -> &'static str {
        match self {
            ReportStatus::InProgress => "em_andamento",
            ReportStatus::Finalized => "concluido",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReportStatus::InProgress => "in progress",
            ReportStatus::Finalized => "finalized",
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
