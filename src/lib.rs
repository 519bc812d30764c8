//! Inspection Checklist - food-safety inspection client core
//!
//! Creates inspection reports seeded from a fixed checklist template, records
//! per-item compliance answers and notes, locks reports once finalized, and
//! projects scheduled reports onto a month calendar.
//!
//! # Architecture
//!
//! - **Template**: the static checklist every new report is seeded from
//! - **Report**: the aggregate (categories, items, status) and its payloads
//! - **Lifecycle**: `in_progress` → `finalized`, terminal
//! - **Service**: checklist mutations guarded by the finalization lock
//! - **Agenda**: month grid arithmetic and per-day report buckets
//! - **Backend**: REST and in-memory implementations of the persistence traits
//!
//! # Example
//!
//! ```rust,ignore
//! use inspection_checklist::{Answer, CreateReportInput, MemoryBackend, MemoryNotifier, ReportService, Session};
//!
//! let service = ReportService::new(MemoryBackend::new(), MemoryNotifier::new(), Session::new("memory://"));
//! let report = service.create_report(CreateReportInput::new("Routine visit", client, inspector)).await?;
//!
//! for item in report.items() {
//!     service.set_answer(item.id, Answer::Compliant).await?;
//! }
//! service.finalize(report.id).await?;
//! ```

// Checklist template
pub mod template;

// Report aggregate and wire payloads
pub mod report;

// Report lifecycle state machine
pub mod lifecycle;

// Checklist service
pub mod service;

// Calendar projection
pub mod agenda;

// Answer statistics
pub mod summary;

// Persistence collaborators
pub mod backend;

// Shared identifiers and directory records
pub mod types;

pub mod config;
pub mod error;
pub mod notify;
pub mod session;
pub mod validation;

pub use agenda::{days_in_month, first_weekday_of_month, AgendaProjector, DateRange, DayBucket, MonthAgenda};
pub use backend::{ClientDirectory, HttpBackend, InspectorDirectory, MemoryBackend, ReportStore};
pub use config::ClientConfig;
pub use error::{ApiError, InspectionError, Result};
pub use lifecycle::ReportStatus;
pub use notify::{MemoryNotifier, Notification, Notifier, Severity, TracingNotifier};
pub use report::{
    Answer, ChecklistCategory, ChecklistItem, CreateReportInput, ItemUpdate, NewReport, Report, ReportQuery,
};
pub use service::ReportService;
pub use session::Session;
pub use summary::ComplianceSummary;
pub use types::{CategoryId, Client, ClientId, Inspector, InspectorId, ItemId, ReportId, Role, Schedule};
