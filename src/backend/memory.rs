//! In-process backend
//!
//! Behaves like the REST backend: sequential ids, 404 for unknown ids, a
//! 400 on a second finalize, month listings ordered by schedule. Item
//! updates are accepted regardless of report status, exactly as upstream
//! does; the finalization lock lives in the service.

use super::{ClientDirectory, InspectorDirectory, ReportStore};
use crate::error::{ApiError, InspectionError, Result};
use crate::lifecycle::ReportStatus;
use crate::report::{
    Answer, ChecklistCategory, ChecklistItem, ClientSummary, ItemUpdate, NewReport, Report,
    ReportQuery,
};
use crate::session::Session;
use crate::types::{CategoryId, Client, Inspector, ItemId, ReportId};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{Datelike, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

#[derive(Debug, Default)]
struct MemoryState {
    next_id: i64,
    reports: BTreeMap<ReportId, Report>,
    clients: Vec<Client>,
    inspectors: Vec<Inspector>,
    /// Number of upcoming store calls that fail with a 503
    pending_failures: usize,
    store_calls: usize,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Count the call and consume an injected failure if one is pending
    fn begin_call(&mut self) -> Result<()> {
        self.store_calls += 1;
        if self.pending_failures > 0 {
            self.pending_failures -= 1;
            return Err(ApiError::Server {
                status: 503,
                message: "Service unavailable".into(),
            }
            .into());
        }
        Ok(())
    }

    fn report(&self, id: ReportId) -> Result<&Report> {
        self.reports
            .get(&id)
            .ok_or_else(|| InspectionError::NotFound(format!("report {}", id)))
    }
}

/// Listings carry report metadata only
fn listed_report(report: &Report) -> Report {
    Report {
        responsible_inspector_id: None,
        categories: Vec::new(),
        ..report.clone()
    }
}

/// Shared in-memory store; clones see the same data
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
    paused: Arc<watch::Sender<bool>>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        let (paused, _) = watch::channel(false);
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            paused: Arc::new(paused),
        }
    }

    /// Register a client establishment
    pub async fn add_client(&self, client: Client) {
        self.state.lock().await.clients.push(client);
    }

    /// Register an assignable inspector
    pub async fn add_inspector(&self, inspector: Inspector) {
        self.state.lock().await.inspectors.push(inspector);
    }

    /// Make the next `count` store calls fail with a server error
    pub async fn fail_next(&self, count: usize) {
        self.state.lock().await.pending_failures = count;
    }

    /// Total store calls received so far
    pub async fn store_calls(&self) -> usize {
        self.state.lock().await.store_calls
    }

    /// Stored copy of a report, bypassing the call counter
    pub async fn stored_report(&self, id: ReportId) -> Option<Report> {
        self.state.lock().await.reports.get(&id).cloned()
    }

    /// Hold item updates until [`resume_item_updates`](Self::resume_item_updates)
    pub fn pause_item_updates(&self) {
        self.paused.send_replace(true);
    }

    pub fn resume_item_updates(&self) {
        self.paused.send_replace(false);
    }
}

#[async_trait]
impl ReportStore for MemoryBackend {
    async fn get_report(&self, _session: &Session, id: ReportId) -> Result<Report> {
        let mut state = self.state.lock().await;
        state.begin_call()?;
        state.report(id).cloned()
    }

    async fn create_report(&self, _session: &Session, new: &NewReport) -> Result<Report> {
        let mut state = self.state.lock().await;
        state.begin_call()?;

        let client = state
            .clients
            .iter()
            .find(|c| c.id == new.client_id)
            .map(|c| ClientSummary {
                trade_name: c.display_name.clone(),
            })
            .ok_or_else(|| InspectionError::NotFound(format!("client {}", new.client_id)))?;
        if !state.inspectors.iter().any(|i| i.id == new.responsible_inspector_id) {
            return Err(InspectionError::NotFound(format!(
                "inspector {}",
                new.responsible_inspector_id
            )));
        }

        let id = ReportId(state.next_id());
        let mut categories = Vec::with_capacity(new.categories.len());
        for category in &new.categories {
            let category_id = CategoryId(state.next_id());
            let items = category
                .items
                .iter()
                .map(|item| ChecklistItem {
                    id: ItemId(state.next_id()),
                    code: item.code.clone(),
                    description: item.description.clone(),
                    answer: Answer::Unset,
                    notes: String::new(),
                    order: item.order,
                })
                .collect();
            categories.push(ChecklistCategory {
                id: category_id,
                name: category.name.clone(),
                order: category.order,
                items,
            });
        }

        let report = Report {
            id,
            description: new.description.clone(),
            client_id: new.client_id,
            client: Some(client),
            responsible_inspector_id: Some(new.responsible_inspector_id),
            category_label: new.category_label.clone(),
            status: ReportStatus::InProgress,
            created_at: Utc::now(),
            finalized_at: None,
            scheduled_at: new.scheduled_at,
            categories,
        };
        state.reports.insert(id, report.clone());
        Ok(report)
    }

    async fn update_checklist_item(
        &self,
        _session: &Session,
        item: ItemId,
        update: &ItemUpdate,
    ) -> Result<ChecklistItem> {
        let mut paused = self.paused.subscribe();
        let _ = paused.wait_for(|held| !*held).await;

        let mut state = self.state.lock().await;
        state.begin_call()?;
        let stored = state
            .reports
            .values_mut()
            .find_map(|report| report.find_item_mut(item))
            .ok_or_else(|| InspectionError::NotFound(format!("checklist item {}", item)))?;
        update.apply_to(stored);
        Ok(stored.clone())
    }

    async fn finalize_report(&self, _session: &Session, id: ReportId) -> Result<Report> {
        let mut state = self.state.lock().await;
        state.begin_call()?;

        let report = state
            .reports
            .get_mut(&id)
            .ok_or_else(|| InspectionError::NotFound(format!("report {}", id)))?;
        if report.status == ReportStatus::Finalized {
            return Err(ApiError::Server {
                status: 400,
                message: "Report already finalized".into(),
            }
            .into());
        }
        report.status = ReportStatus::Finalized;
        report.finalized_at = Some(Utc::now());
        Ok(report.clone())
    }

    async fn delete_report(&self, _session: &Session, id: ReportId) -> Result<()> {
        let mut state = self.state.lock().await;
        state.begin_call()?;
        state
            .reports
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| InspectionError::NotFound(format!("report {}", id)))
    }

    async fn list_reports(&self, _session: &Session, query: &ReportQuery) -> Result<Vec<Report>> {
        let mut state = self.state.lock().await;
        state.begin_call()?;

        Ok(state
            .reports
            .values()
            .filter(|r| query.matches(r))
            .skip(query.skip as usize)
            .take(query.limit as usize)
            .map(listed_report)
            .collect())
    }

    async fn list_reports_by_month(
        &self,
        _session: &Session,
        month: u32,
        year: i32,
    ) -> Result<Vec<Report>> {
        let mut state = self.state.lock().await;
        state.begin_call()?;

        let mut listed: Vec<Report> = state
            .reports
            .values()
            .filter(|r| {
                r.scheduled_at.is_some_and(|at| {
                    let stored = at.stored();
                    stored.month() == month && stored.year() == year
                })
            })
            .map(listed_report)
            .collect();
        listed.sort_by_key(|r| r.scheduled_at.map(|at| at.stored()));
        Ok(listed)
    }

    async fn export_report_pdf(&self, _session: &Session, id: ReportId) -> Result<Bytes> {
        let mut state = self.state.lock().await;
        state.begin_call()?;
        let report = state.report(id)?;
        Ok(Bytes::from(format!(
            "%PDF-1.4\n% report {} ({} items)\n%%EOF\n",
            report.id,
            report.item_count()
        )))
    }
}

#[async_trait]
impl ClientDirectory for MemoryBackend {
    async fn list_clients(&self, _session: &Session, search: Option<&str>) -> Result<Vec<Client>> {
        let state = self.state.lock().await;
        let needle = search.map(|s| s.trim().to_lowercase()).unwrap_or_default();
        Ok(state
            .clients
            .iter()
            .filter(|c| needle.is_empty() || c.display_name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl InspectorDirectory for MemoryBackend {
    async fn list_assignable_inspectors(&self, _session: &Session) -> Result<Vec<Inspector>> {
        Ok(self.state.lock().await.inspectors.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CreateReportInput;
    use crate::template;
    use crate::types::{ClientId, InspectorId, Role};
    use chrono::TimeZone;

    async fn backend() -> MemoryBackend {
        let backend = MemoryBackend::new();
        backend
            .add_client(Client {
                id: ClientId(1),
                display_name: "Padaria Sol".into(),
            })
            .await;
        backend
            .add_inspector(Inspector {
                id: InspectorId(2),
                name: "Ana".into(),
                role: Role::Operator,
            })
            .await;
        backend
    }

    fn new_report(scheduled: Option<(u32, u32)>) -> NewReport {
        let input = CreateReportInput::new("Visit", ClientId(1), InspectorId(2));
        let input = match scheduled {
            Some((month, day)) => {
                input.with_scheduled_at(Utc.with_ymd_and_hms(2025, month, day, 9, 0, 0).unwrap())
            }
            None => input,
        };
        NewReport::from_template(&input, template::template()).unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_ids_in_order() {
        let backend = backend().await;
        let session = Session::new("memory://");
        let report = backend.create_report(&session, &new_report(None)).await.unwrap();

        assert_eq!(report.item_count(), template::item_count());
        assert!(report.matches_template(template::template()));
        assert_eq!(report.client.as_ref().unwrap().trade_name, "Padaria Sol");
        let ids: Vec<_> = report.items().map(|i| i.id.0).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_create_requires_known_client() {
        let backend = MemoryBackend::new();
        let session = Session::new("memory://");
        let err = backend.create_report(&session, &new_report(None)).await.unwrap_err();
        assert!(matches!(err, InspectionError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_second_finalize_is_rejected() {
        let backend = backend().await;
        let session = Session::new("memory://");
        let report = backend.create_report(&session, &new_report(None)).await.unwrap();

        let finalized = backend.finalize_report(&session, report.id).await.unwrap();
        assert!(finalized.is_finalized());
        assert!(finalized.finalized_at.is_some());

        match backend.finalize_report(&session, report.id).await {
            Err(InspectionError::Upstream(ApiError::Server { status, .. })) => assert_eq!(status, 400),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_month_listing_sorted_and_trimmed() {
        let backend = backend().await;
        let session = Session::new("memory://");
        let late = backend.create_report(&session, &new_report(Some((3, 20)))).await.unwrap();
        let early = backend.create_report(&session, &new_report(Some((3, 2)))).await.unwrap();
        backend.create_report(&session, &new_report(Some((4, 2)))).await.unwrap();
        backend.create_report(&session, &new_report(None)).await.unwrap();

        let listed = backend.list_reports_by_month(&session, 3, 2025).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|r| r.id).collect();
        assert_eq!(ids, [early.id, late.id]);
        assert!(listed.iter().all(|r| r.categories.is_empty()));
    }

    #[tokio::test]
    async fn test_report_listing_filters() {
        let backend = backend().await;
        backend
            .add_client(Client {
                id: ClientId(3),
                display_name: "Bar da Lua".into(),
            })
            .await;
        let session = Session::new("memory://");
        let first = backend.create_report(&session, &new_report(None)).await.unwrap();
        let second = backend.create_report(&session, &new_report(None)).await.unwrap();
        let other_input = CreateReportInput::new("Visit", ClientId(3), InspectorId(2));
        let other = backend
            .create_report(&session, &NewReport::from_template(&other_input, template::template()).unwrap())
            .await
            .unwrap();
        backend.finalize_report(&session, second.id).await.unwrap();

        let ids = |listed: Vec<Report>| listed.iter().map(|r| r.id).collect::<Vec<_>>();

        let all = backend.list_reports(&session, &ReportQuery::new()).await.unwrap();
        assert!(all.iter().all(|r| r.categories.is_empty() && r.responsible_inspector_id.is_none()));
        assert_eq!(ids(all), [first.id, second.id, other.id]);

        let query = ReportQuery::new().for_client(ClientId(1));
        assert_eq!(ids(backend.list_reports(&session, &query).await.unwrap()), [first.id, second.id]);

        let query = ReportQuery::new().with_status(ReportStatus::InProgress);
        assert_eq!(ids(backend.list_reports(&session, &query).await.unwrap()), [first.id, other.id]);

        let query = ReportQuery::new()
            .for_client(ClientId(1))
            .with_status(ReportStatus::Finalized);
        assert_eq!(ids(backend.list_reports(&session, &query).await.unwrap()), [second.id]);

        let query = ReportQuery::new().page(1, 1);
        assert_eq!(ids(backend.list_reports(&session, &query).await.unwrap()), [second.id]);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let backend = backend().await;
        let session = Session::new("memory://");
        backend.fail_next(1).await;
        assert!(backend.create_report(&session, &new_report(None)).await.unwrap_err().is_upstream());
        assert!(backend.create_report(&session, &new_report(None)).await.is_ok());
        assert_eq!(backend.store_calls().await, 2);
    }

    #[tokio::test]
    async fn test_client_search() {
        let backend = backend().await;
        let session = Session::new("memory://");
        assert_eq!(backend.list_clients(&session, Some("sol")).await.unwrap().len(), 1);
        assert!(backend.list_clients(&session, Some("lua")).await.unwrap().is_empty());
        assert_eq!(backend.list_clients(&session, None).await.unwrap().len(), 1);
    }
}
