//! Error types for inspection reports

use crate::types::ReportId;
use thiserror::Error;

/// Failure while talking to the report backend
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server returned an error
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Inspection client error
#[derive(Debug, Error)]
pub enum InspectionError {
    /// A required field is missing or malformed; nothing was sent upstream
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Report or checklist item could not be resolved
    #[error("Not found: {0}")]
    NotFound(String),

    /// Mutation attempted on a report that has been finalized
    #[error("Report {0} is finalized and can no longer be edited")]
    FinalizedReport(ReportId),

    /// Finalize called on a report that is already finalized
    #[error("Report {0} is already finalized")]
    AlreadyFinalized(ReportId),

    /// Persistence or network failure
    #[error("Upstream service error: {0}")]
    Upstream(#[from] ApiError),
}

impl InspectionError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        InspectionError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Whether the error originated upstream rather than in a local check
    pub fn is_upstream(&self) -> bool {
        matches!(self, InspectionError::Upstream(_))
    }
}

impl From<reqwest::Error> for InspectionError {
    fn from(err: reqwest::Error) -> Self {
        InspectionError::Upstream(ApiError::Http(err))
    }
}

impl From<serde_json::Error> for InspectionError {
    fn from(err: serde_json::Error) -> Self {
        InspectionError::Upstream(ApiError::Json(err))
    }
}

/// Result type for inspection operations
pub type Result<T> = std::result::Result<T, InspectionError>;
