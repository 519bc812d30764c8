//! HTTP client for the inspection REST API

use super::{ClientDirectory, InspectorDirectory, ReportStore};
use crate::config::ClientConfig;
use crate::error::{ApiError, InspectionError, Result};
use crate::report::{ChecklistItem, ItemUpdate, NewReport, Report, ReportQuery};
use crate::session::Session;
use crate::types::{Client, Inspector, ItemId, ReportId};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, RequestBuilder, StatusCode};
use std::time::Duration;
use tracing::debug;

/// REST binding of the backend traits
///
/// # Example
///
/// ```rust,no_run
/// use inspection_checklist::{HttpBackend, ReportStore, ReportId, Session};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = HttpBackend::new(Duration::from_secs(30))?;
/// let session = Session::new("http://localhost:8000").with_token("jwt");
///
/// let report = backend.get_report(&session, ReportId(12)).await?;
/// println!("{} items", report.item_count());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Http)?;
        Ok(Self { client })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(Duration::from_secs(config.timeout_secs))
    }

    fn authorized(&self, request: RequestBuilder, session: &Session) -> RequestBuilder {
        match session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, session: &Session) -> Result<reqwest::Response> {
        let response = self.authorized(request, session).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            let url = response.url().path().to_string();
            return Err(InspectionError::NotFound(url));
        }

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    debug!(status, error = %err, "Failed to read error body");
                    format!("unreadable response body: {}", err)
                }
            };
            return Err(ApiError::Server {
                status,
                message: body,
            }
            .into());
        }

        Ok(response)
    }

    async fn handle_json<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
        session: &Session,
    ) -> Result<T> {
        let response = self.send(request, session).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl ReportStore for HttpBackend {
    async fn get_report(&self, session: &Session, id: ReportId) -> Result<Report> {
        let url = session.endpoint(&format!("/reports/{}", id));
        self.handle_json(self.client.get(&url), session).await
    }

    async fn create_report(&self, session: &Session, report: &NewReport) -> Result<Report> {
        let url = session.endpoint("/reports/");
        let request = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(report);
        self.handle_json(request, session).await
    }

    async fn update_checklist_item(
        &self,
        session: &Session,
        item: ItemId,
        update: &ItemUpdate,
    ) -> Result<ChecklistItem> {
        let url = session.endpoint(&format!("/reports/items/{}", item));
        let request = self
            .client
            .put(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(update);
        self.handle_json(request, session).await
    }

    async fn finalize_report(&self, session: &Session, id: ReportId) -> Result<Report> {
        let url = session.endpoint(&format!("/reports/{}/finalizar", id));
        self.handle_json(self.client.post(&url), session).await
    }

    async fn delete_report(&self, session: &Session, id: ReportId) -> Result<()> {
        let url = session.endpoint(&format!("/reports/{}", id));
        self.send(self.client.delete(&url), session).await?;
        Ok(())
    }

    async fn list_reports(&self, session: &Session, query: &ReportQuery) -> Result<Vec<Report>> {
        let url = session.endpoint(&format!("/reports/?{}", query.to_query_string()));
        self.handle_json(self.client.get(&url), session).await
    }

    async fn list_reports_by_month(
        &self,
        session: &Session,
        month: u32,
        year: i32,
    ) -> Result<Vec<Report>> {
        let url = session.endpoint(&format!("/reports/agenda/calendario?mes={}&ano={}", month, year));
        self.handle_json(self.client.get(&url), session).await
    }

    async fn export_report_pdf(&self, session: &Session, id: ReportId) -> Result<Bytes> {
        let url = session.endpoint(&format!("/reports/{}/pdf", id));
        let response = self.send(self.client.get(&url), session).await?;

        let is_pdf = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map_or(true, |v| v.starts_with("application/pdf"));
        if !is_pdf {
            return Err(ApiError::InvalidResponse("expected application/pdf".into()).into());
        }

        Ok(response.bytes().await?)
    }
}

#[async_trait]
impl ClientDirectory for HttpBackend {
    async fn list_clients(&self, session: &Session, search: Option<&str>) -> Result<Vec<Client>> {
        let mut url = session.endpoint("/clients/");
        if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
            url.push_str("?search=");
            url.push_str(&urlencoding::encode(term));
        }
        self.handle_json(self.client.get(&url), session).await
    }
}

#[async_trait]
impl InspectorDirectory for HttpBackend {
    async fn list_assignable_inspectors(&self, session: &Session) -> Result<Vec<Inspector>> {
        let url = session.endpoint("/auth/users/subordinados");
        self.handle_json(self.client.get(&url), session).await
    }
}
