//! Backend collaborators
//!
//! The service talks to persistence, the client registry and the user
//! directory only through these traits. Every call carries the caller's
//! [`Session`]; implementations never read credentials from anywhere else.
//!
//! - [`HttpBackend`]: the REST API
//! - [`MemoryBackend`]: in-process store with the same semantics, for tests

mod http;
mod memory;

pub use http::HttpBackend;
pub use memory::MemoryBackend;

use crate::error::Result;
use crate::report::{ChecklistItem, ItemUpdate, NewReport, Report, ReportQuery};
use crate::session::Session;
use crate::types::{Client, Inspector, ItemId, ReportId};
use async_trait::async_trait;
use bytes::Bytes;

/// Report and checklist persistence
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn get_report(&self, session: &Session, id: ReportId) -> Result<Report>;

    async fn create_report(&self, session: &Session, report: &NewReport) -> Result<Report>;

    async fn update_checklist_item(
        &self,
        session: &Session,
        item: ItemId,
        update: &ItemUpdate,
    ) -> Result<ChecklistItem>;

    async fn finalize_report(&self, session: &Session, id: ReportId) -> Result<Report>;

    async fn delete_report(&self, session: &Session, id: ReportId) -> Result<()>;

    /// One page of reports matching the query's client and status filters,
    /// without their checklists
    async fn list_reports(&self, session: &Session, query: &ReportQuery) -> Result<Vec<Report>>;

    /// Reports scheduled in `month`/`year`, ordered by scheduled time
    async fn list_reports_by_month(&self, session: &Session, month: u32, year: i32)
        -> Result<Vec<Report>>;

    async fn export_report_pdf(&self, session: &Session, id: ReportId) -> Result<Bytes>;
}

/// Client establishment registry
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    async fn list_clients(&self, session: &Session, search: Option<&str>) -> Result<Vec<Client>>;
}

/// Users that may be made responsible for an inspection
#[async_trait]
pub trait InspectorDirectory: Send + Sync {
    async fn list_assignable_inspectors(&self, session: &Session) -> Result<Vec<Inspector>>;
}
