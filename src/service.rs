//! Report service: the checklist lifecycle over a backend
//!
//! The service keeps a view of every report the user has opened. Checklist
//! mutations go through [`ReportService::set_answer`] and
//! [`ReportService::set_notes`], which enforce the finalization lock before
//! anything is sent upstream and touch the view only after the backend
//! accepted the change.
//!
//! Each report has a write gate. Item updates hold it shared for the whole
//! backend round trip and [`ReportService::finalize`] holds it exclusively, so
//! no update can land on a report after it was finalized.
//!
//! # Example
//!
//! ```rust,ignore
//! use inspection_checklist::{Answer, ClientConfig, CreateReportInput, HttpBackend, ReportService, TracingNotifier};
//!
//! let config = ClientConfig::default();
//! let service = ReportService::new(HttpBackend::from_config(&config)?, TracingNotifier, config.session());
//!
//! let report = service.create_report(CreateReportInput::new("Routine visit", client, inspector)).await?;
//! let first = report.items().next().unwrap().id;
//! service.set_answer(first, Answer::Compliant).await?;
//! service.finalize(report.id).await?;
//! ```

use crate::backend::{ClientDirectory, InspectorDirectory, ReportStore};
use crate::error::{ApiError, InspectionError, Result};
use crate::lifecycle::ReportStatus;
use crate::notify::Notifier;
use crate::report::{
    Answer, ChecklistItem, CreateReportInput, ItemUpdate, NewReport, Report, ReportQuery, MAX_PAGE_SIZE,
};
use crate::session::Session;
use crate::template::{self, ChecklistCategoryTemplate};
use crate::types::{Client, Inspector, ItemId, ReportId};
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// Years accepted by the agenda endpoint
pub const AGENDA_YEARS: std::ops::RangeInclusive<i32> = 2000..=2100;

/// An opened report; `generation` changes every time the view is replaced
#[derive(Debug)]
struct OpenReport {
    report: Report,
    generation: u64,
}

#[derive(Debug, Default)]
struct Views {
    open: HashMap<ReportId, OpenReport>,
    next_generation: u64,
    /// Per-report write gate: item updates share it, finalize takes it exclusively.
    /// Outlives close/reopen so in-flight updates stay visible to finalize.
    gates: HashMap<ReportId, Arc<RwLock<()>>>,
}

impl Views {
    fn insert(&mut self, report: Report) {
        self.next_generation += 1;
        let generation = self.next_generation;
        self.open.insert(report.id, OpenReport { report, generation });
    }

    fn owner_of(&self, item: ItemId) -> Option<ReportId> {
        self.open
            .iter()
            .find(|(_, view)| view.report.find_item(item).is_some())
            .map(|(id, _)| *id)
    }

    fn gate(&mut self, id: ReportId) -> Arc<RwLock<()>> {
        self.gates.entry(id).or_default().clone()
    }

    /// Generation of the open view owning `item`, if it may still be edited
    fn editable(&self, report_id: ReportId, item: ItemId) -> Result<u64> {
        match self.open.get(&report_id) {
            Some(view) if view.report.find_item(item).is_some() => view
                .report
                .status
                .ensure_editable(report_id)
                .map(|()| view.generation),
            _ => Err(InspectionError::NotFound(format!("checklist item {}", item))),
        }
    }
}

/// Checklist lifecycle over a report backend
pub struct ReportService<S, N> {
    store: S,
    notifier: N,
    session: Session,
    template: &'static [ChecklistCategoryTemplate],
    views: Mutex<Views>,
}

impl<S, N> ReportService<S, N>
where
    S: ReportStore,
    N: Notifier,
{
    pub fn new(store: S, notifier: N, session: Session) -> Self {
        Self {
            store,
            notifier,
            session,
            template: template::template(),
            views: Mutex::new(Views::default()),
        }
    }

    /// Seed new reports from a different checklist
    pub fn with_template(mut self, template: &'static [ChecklistCategoryTemplate]) -> Self {
        self.template = template;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn template(&self) -> &'static [ChecklistCategoryTemplate] {
        self.template
    }

    /// Notify the failure and hand it back
    fn fail<T>(&self, err: InspectionError) -> Result<T> {
        self.notifier.error(&err.to_string());
        Err(err)
    }

    // ==================== Report aggregate ====================

    /// Create a report seeded from the template and open it.
    ///
    /// Validation failures are reported before the backend is contacted.
    pub async fn create_report(&self, input: CreateReportInput) -> Result<Report> {
        let payload = match NewReport::from_template(&input, self.template) {
            Ok(payload) => payload,
            Err(err) => return self.fail(err),
        };

        let report = match self.store.create_report(&self.session, &payload).await {
            Ok(report) => report,
            Err(err) => return self.fail(err),
        };

        if !report.matches_template(self.template) {
            warn!(
                report_id = %report.id,
                expected_items = payload.item_count(),
                stored_items = report.item_count(),
                "Stored checklist differs from the template"
            );
        }

        info!(report_id = %report.id, items = report.item_count(), "Report created");
        self.notifier.success("Report created");
        self.views.lock().await.insert(report.clone());
        Ok(report)
    }

    /// Load a report from the backend and (re)open its view
    pub async fn open_report(&self, id: ReportId) -> Result<Report> {
        let report = match self.store.get_report(&self.session, id).await {
            Ok(report) => report,
            Err(err) => return self.fail(err),
        };
        self.views.lock().await.insert(report.clone());
        Ok(report)
    }

    /// Current view of an opened report
    pub async fn report(&self, id: ReportId) -> Option<Report> {
        self.views.lock().await.open.get(&id).map(|v| v.report.clone())
    }

    /// Discard a view. Mutations still in flight for it complete upstream
    /// but are not applied anywhere.
    pub async fn close_report(&self, id: ReportId) -> bool {
        self.views.lock().await.open.remove(&id).is_some()
    }

    pub async fn delete_report(&self, id: ReportId) -> Result<()> {
        if let Err(err) = self.store.delete_report(&self.session, id).await {
            return self.fail(err);
        }
        {
            let mut views = self.views.lock().await;
            views.open.remove(&id);
            views.gates.remove(&id);
        }
        info!(report_id = %id, "Report deleted");
        self.notifier.success("Report deleted");
        Ok(())
    }

    pub async fn export_pdf(&self, id: ReportId) -> Result<Bytes> {
        match self.store.export_report_pdf(&self.session, id).await {
            Ok(pdf) => Ok(pdf),
            Err(err) => self.fail(err),
        }
    }

    // ==================== Checklist item mutator ====================

    /// Record a compliance answer. Notes are left untouched.
    pub async fn set_answer(&self, item: ItemId, answer: Answer) -> Result<ChecklistItem> {
        if !answer.is_set() {
            return self.fail(InspectionError::validation(
                "resposta",
                "An answer must be compliant, non-compliant or n/a",
            ));
        }
        self.update_item(item, ItemUpdate::answer(answer)).await
    }

    /// Replace an item's notes. The answer is left untouched.
    pub async fn set_notes(&self, item: ItemId, notes: impl Into<String>) -> Result<ChecklistItem> {
        self.update_item(item, ItemUpdate::notes(notes)).await
    }

    async fn update_item(&self, item: ItemId, update: ItemUpdate) -> Result<ChecklistItem> {
        let owner = {
            let mut views = self.views.lock().await;
            let owner = views.owner_of(item);
            owner.map(|report_id| (report_id, views.gate(report_id)))
        };
        let Some((report_id, gate)) = owner else {
            return self.fail(InspectionError::NotFound(format!("checklist item {}", item)));
        };

        // Held until the result is applied; finalize waits for it
        let _writing = gate.read().await;

        let checked = self.views.lock().await.editable(report_id, item);
        let generation = match checked {
            Ok(generation) => generation,
            Err(err) => return self.fail(err),
        };

        let updated = match self.store.update_checklist_item(&self.session, item, &update).await {
            Ok(updated) => updated,
            Err(err) => return self.fail(err),
        };

        let mut views = self.views.lock().await;
        match views.open.get_mut(&report_id) {
            Some(view) if view.generation == generation && view.report.status.allows_edits() => {
                if let Some(local) = view.report.find_item_mut(item) {
                    update.apply_to(local);
                }
                debug!(report_id = %report_id, item_id = %item, "Checklist item updated");
            }
            _ => {
                debug!(
                    report_id = %report_id,
                    item_id = %item,
                    "View closed or replaced while updating; result not applied"
                );
            }
        }
        Ok(updated)
    }

    // ==================== Lifecycle ====================

    /// Move a report to its terminal `Finalized` state.
    ///
    /// Items may still be unanswered. Waits for item updates already in
    /// flight; updates issued afterwards fail with
    /// [`InspectionError::FinalizedReport`]. A second call fails with
    /// [`InspectionError::AlreadyFinalized`], including when the backend is
    /// the one reporting it.
    pub async fn finalize(&self, id: ReportId) -> Result<Report> {
        let gate = self.views.lock().await.gate(id);
        let _finalizing = gate.write().await;

        let known = self.views.lock().await.open.get(&id).map(|v| v.report.status);
        let status = match known {
            Some(status) => status,
            None => match self.store.get_report(&self.session, id).await {
                Ok(report) => report.status,
                Err(err) => return self.fail(err),
            },
        };
        if let Err(err) = status.finalize(id) {
            return self.fail(err);
        }

        let report = match self.store.finalize_report(&self.session, id).await {
            Ok(report) => report,
            Err(InspectionError::Upstream(ApiError::Server { status: 400, message })) => {
                debug!(report_id = %id, %message, "Backend reports the report as finalized");
                if let Some(view) = self.views.lock().await.open.get_mut(&id) {
                    view.report.status = ReportStatus::Finalized;
                }
                return self.fail(InspectionError::AlreadyFinalized(id));
            }
            Err(err) => return self.fail(err),
        };

        {
            let mut views = self.views.lock().await;
            if let Some(view) = views.open.get_mut(&id) {
                view.report = report.clone();
            }
        }

        let answered = report.items().filter(|i| i.answer.is_set()).count();
        info!(report_id = %id, answered, items = report.item_count(), "Report finalized");
        self.notifier.success("Report finalized");
        Ok(report)
    }

    // ==================== Listing ====================

    /// One page of reports, optionally filtered by client and status
    pub async fn list_reports(&self, query: &ReportQuery) -> Result<Vec<Report>> {
        if !(1..=MAX_PAGE_SIZE).contains(&query.limit) {
            return self.fail(InspectionError::validation(
                "limit",
                format!("Page size must be between 1 and {}", MAX_PAGE_SIZE),
            ));
        }
        match self.store.list_reports(&self.session, query).await {
            Ok(reports) => Ok(reports),
            Err(err) => self.fail(err),
        }
    }

    // ==================== Agenda ====================

    /// Reports scheduled in a month, as listed by the backend
    pub async fn month_reports(&self, month: u32, year: i32) -> Result<Vec<Report>> {
        if !(1..=12).contains(&month) {
            return self.fail(InspectionError::validation("mes", "Month must be between 1 and 12"));
        }
        if !AGENDA_YEARS.contains(&year) {
            return self.fail(InspectionError::validation("ano", "Year must be between 2000 and 2100"));
        }
        match self.store.list_reports_by_month(&self.session, month, year).await {
            Ok(reports) => Ok(reports),
            Err(err) => self.fail(err),
        }
    }
}

impl<S, N> ReportService<S, N>
where
    S: ReportStore + ClientDirectory,
    N: Notifier,
{
    pub async fn clients(&self, search: Option<&str>) -> Result<Vec<Client>> {
        match self.store.list_clients(&self.session, search).await {
            Ok(mut clients) => {
                clients.sort_by(|a, b| a.display_name.cmp(&b.display_name));
                Ok(clients)
            }
            Err(err) => self.fail(err),
        }
    }
}

impl<S, N> ReportService<S, N>
where
    S: ReportStore + InspectorDirectory,
    N: Notifier,
{
    pub async fn inspectors(&self) -> Result<Vec<Inspector>> {
        match self.store.list_assignable_inspectors(&self.session).await {
            Ok(inspectors) => Ok(inspectors),
            Err(err) => self.fail(err),
        }
    }
}
