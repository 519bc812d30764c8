//! Report aggregate: metadata, status and the ordered checklist
//!
//! Field names follow the backend's JSON (`descricao`, `categorias`, ...)
//! through serde renames; Rust code only sees the English names.

use crate::error::{InspectionError, Result};
use crate::lifecycle::ReportStatus;
use crate::template::ChecklistCategoryTemplate;
use crate::types::{
    null_as_empty, timestamp, CategoryId, ClientId, InspectorId, ItemId, ReportId, Schedule,
};
use crate::validation::{self, max_chars, FieldRule, FieldValue};
use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Longest description the backend stores
pub const MAX_DESCRIPTION_CHARS: usize = 255;
/// Longest category label the backend stores
pub const MAX_CATEGORY_LABEL_CHARS: usize = 100;

/// Compliance answer for a checklist item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Answer {
    Compliant,
    NonCompliant,
    NotApplicable,
    /// Not answered yet; `null` on the wire
    #[default]
    Unset,
}

impl Answer {
    pub fn wire_value(self) -> Option<&'static str> {
        match self {
            Answer::Compliant => Some("conforme"),
            Answer::NonCompliant => Some("nao_conforme"),
            Answer::NotApplicable => Some("na"),
            Answer::Unset => None,
        }
    }

    pub fn from_wire(value: &str) -> Option<Answer> {
        match value {
            "conforme" => Some(Answer::Compliant),
            "nao_conforme" => Some(Answer::NonCompliant),
            "na" => Some(Answer::NotApplicable),
            _ => None,
        }
    }

    pub fn is_set(self) -> bool {
        self != Answer::Unset
    }

    pub fn label(self) -> &'static str {
        match self {
            Answer::Compliant => "compliant",
            Answer::NonCompliant => "non-compliant",
            Answer::NotApplicable => "n/a",
            Answer::Unset => "unanswered",
        }
    }
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Answer {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.wire_value() {
            Some(value) => serializer.serialize_str(value),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Answer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match Option::<String>::deserialize(deserializer)?.as_deref() {
            None | Some("") => Ok(Answer::Unset),
            Some(value) => Answer::from_wire(value).ok_or_else(|| {
                de::Error::unknown_variant(value, &["conforme", "nao_conforme", "na"])
            }),
        }
    }
}

/// A live checklist item belonging to one report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: ItemId,
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "resposta", default)]
    pub answer: Answer,
    #[serde(rename = "observacoes", default, deserialize_with = "null_as_empty")]
    pub notes: String,
    #[serde(rename = "ordem", default)]
    pub order: u32,
}

/// A live checklist category with its items in template order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistCategory {
    pub id: CategoryId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "ordem")]
    pub order: u32,
    #[serde(rename = "itens", default)]
    pub items: Vec<ChecklistItem>,
}

/// Client summary embedded in report responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSummary {
    #[serde(rename = "nome_fantasia")]
    pub trade_name: String,
}

/// Inspection report
///
/// Month listings omit the checklist and the responsible inspector, so both
/// default to empty when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "cliente_id")]
    pub client_id: ClientId,
    #[serde(rename = "cliente", default, skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientSummary>,
    #[serde(rename = "responsavel_inspecao_id", default)]
    pub responsible_inspector_id: Option<InspectorId>,
    #[serde(rename = "categoria", default)]
    pub category_label: Option<String>,
    #[serde(default)]
    pub status: ReportStatus,
    #[serde(rename = "criado_em", deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "finalizado_em", default, deserialize_with = "timestamp::deserialize_lenient")]
    pub finalized_at: Option<DateTime<Utc>>,
    #[serde(rename = "data_agendada", default, deserialize_with = "timestamp::deserialize_schedule")]
    pub scheduled_at: Option<Schedule>,
    #[serde(rename = "categorias", default)]
    pub categories: Vec<ChecklistCategory>,
}

impl Report {
    pub fn is_finalized(&self) -> bool {
        self.status.is_terminal()
    }

    /// All items in checklist order
    pub fn items(&self) -> impl Iterator<Item = &ChecklistItem> {
        self.categories.iter().flat_map(|c| c.items.iter())
    }

    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }

    pub fn find_item(&self, item: ItemId) -> Option<&ChecklistItem> {
        self.items().find(|i| i.id == item)
    }

    pub(crate) fn find_item_mut(&mut self, item: ItemId) -> Option<&mut ChecklistItem> {
        self.categories
            .iter_mut()
            .flat_map(|c| c.items.iter_mut())
            .find(|i| i.id == item)
    }

    /// Item codes in checklist order
    pub fn codes(&self) -> Vec<&str> {
        self.items().map(|i| i.code.as_str()).collect()
    }

    /// Whether every item carries an answer
    pub fn is_complete(&self) -> bool {
        self.items().all(|i| i.answer.is_set())
    }

    /// Whether the checklist has the template's categories and codes in order
    pub fn matches_template(&self, template: &[ChecklistCategoryTemplate]) -> bool {
        self.categories.len() == template.len()
            && self.categories.iter().zip(template).all(|(live, seed)| {
                live.name == seed.name
                    && live.items.len() == seed.items.len()
                    && live.items.iter().zip(seed.items).all(|(i, s)| i.code == s.code)
            })
    }
}

/// Fields supplied by the user when starting a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateReportInput {
    pub description: String,
    pub client_id: Option<ClientId>,
    pub responsible_inspector_id: Option<InspectorId>,
    pub category_label: Option<String>,
    pub scheduled_at: Option<Schedule>,
}

impl CreateReportInput {
    pub fn new(
        description: impl Into<String>,
        client_id: ClientId,
        responsible_inspector_id: InspectorId,
    ) -> Self {
        Self {
            description: description.into(),
            client_id: Some(client_id),
            responsible_inspector_id: Some(responsible_inspector_id),
            ..Default::default()
        }
    }

    pub fn with_category_label(mut self, label: impl Into<String>) -> Self {
        self.category_label = Some(label.into());
        self
    }

    pub fn with_scheduled_at(mut self, at: impl Into<Schedule>) -> Self {
        self.scheduled_at = Some(at.into());
        self
    }
}

fn description_value(input: &CreateReportInput) -> FieldValue<'_> {
    FieldValue::Text(&input.description)
}

fn client_value(input: &CreateReportInput) -> FieldValue<'_> {
    FieldValue::Reference(input.client_id.map(|c| c.0))
}

fn inspector_value(input: &CreateReportInput) -> FieldValue<'_> {
    FieldValue::Reference(input.responsible_inspector_id.map(|i| i.0))
}

fn category_label_value(input: &CreateReportInput) -> FieldValue<'_> {
    FieldValue::OptionalText(input.category_label.as_deref())
}

fn description_length(value: &FieldValue<'_>) -> Option<String> {
    max_chars(value, MAX_DESCRIPTION_CHARS, "description")
}

fn category_label_length(value: &FieldValue<'_>) -> Option<String> {
    max_chars(value, MAX_CATEGORY_LABEL_CHARS, "category")
}

/// Required-field schema for report creation
pub fn create_report_rules() -> Vec<FieldRule<CreateReportInput>> {
    vec![
        FieldRule::required("descricao", "description", description_value).check(description_length),
        FieldRule::required("cliente_id", "client", client_value),
        FieldRule::required("responsavel_inspecao_id", "responsible inspector", inspector_value),
        FieldRule::optional("categoria", "category", category_label_value).check(category_label_length),
    ]
}

/// Creation payload: report metadata plus the checklist seeded from a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReport {
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "cliente_id")]
    pub client_id: ClientId,
    #[serde(rename = "categoria", skip_serializing_if = "Option::is_none")]
    pub category_label: Option<String>,
    #[serde(rename = "responsavel_inspecao_id")]
    pub responsible_inspector_id: InspectorId,
    #[serde(rename = "data_agendada", skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<Schedule>,
    #[serde(rename = "categorias")]
    pub categories: Vec<NewCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "ordem")]
    pub order: u32,
    #[serde(rename = "itens")]
    pub items: Vec<NewItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "ordem")]
    pub order: u32,
}

impl NewReport {
    /// Validate the input and seed the checklist from `template`.
    ///
    /// Fails before anything is built when a required field is missing.
    pub fn from_template(
        input: &CreateReportInput,
        template: &[ChecklistCategoryTemplate],
    ) -> Result<Self> {
        validation::validate(input, &create_report_rules())?;

        let client_id = input
            .client_id
            .ok_or_else(|| InspectionError::validation("cliente_id", "The client field is required"))?;
        let responsible_inspector_id = input.responsible_inspector_id.ok_or_else(|| {
            InspectionError::validation(
                "responsavel_inspecao_id",
                "The responsible inspector field is required",
            )
        })?;

        let category_label = input
            .category_label
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_string);

        Ok(Self {
            description: input.description.trim().to_string(),
            client_id,
            category_label,
            responsible_inspector_id,
            scheduled_at: input.scheduled_at,
            categories: seed_categories(template),
        })
    }

    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }
}

/// Copy a template 1:1 into creation categories, preserving order
pub fn seed_categories(template: &[ChecklistCategoryTemplate]) -> Vec<NewCategory> {
    template
        .iter()
        .map(|category| NewCategory {
            name: category.name.to_string(),
            order: category.order,
            items: category
                .items
                .iter()
                .map(|item| NewItem {
                    code: item.code.to_string(),
                    description: item.description.to_string(),
                    order: item.order,
                })
                .collect(),
        })
        .collect()
}

/// Largest page the report listing returns
pub const MAX_PAGE_SIZE: u32 = 100;

/// Filters and paging for the report listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportQuery {
    pub client_id: Option<ClientId>,
    pub status: Option<ReportStatus>,
    pub skip: u32,
    pub limit: u32,
}

impl Default for ReportQuery {
    fn default() -> Self {
        Self {
            client_id: None,
            status: None,
            skip: 0,
            limit: MAX_PAGE_SIZE,
        }
    }
}

impl ReportQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_client(mut self, client: ClientId) -> Self {
        self.client_id = Some(client);
        self
    }

    pub fn with_status(mut self, status: ReportStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn page(mut self, skip: u32, limit: u32) -> Self {
        self.skip = skip;
        self.limit = limit;
        self
    }

    /// Whether a listed report passes the client and status filters
    pub fn matches(&self, report: &Report) -> bool {
        self.client_id.map_or(true, |client| report.client_id == client)
            && self.status.map_or(true, |status| report.status == status)
    }

    /// Query string for `GET /reports/`
    pub fn to_query_string(&self) -> String {
        let mut query = format!("skip={}&limit={}", self.skip, self.limit);
        if let Some(client) = self.client_id {
            query.push_str(&format!("&cliente_id={}", client));
        }
        if let Some(status) = self.status {
            query.push_str("&status_filter=");
            query.push_str(status.wire_value());
        }
        query
    }
}

/// Partial item update; absent fields are left untouched by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemUpdate {
    #[serde(rename = "resposta", default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<Answer>,
    #[serde(rename = "observacoes", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ItemUpdate {
    pub fn answer(answer: Answer) -> Self {
        Self {
            answer: Some(answer),
            notes: None,
        }
    }

    pub fn notes(notes: impl Into<String>) -> Self {
        Self {
            answer: None,
            notes: Some(notes.into()),
        }
    }

    /// Write the requested fields onto an item
    pub fn apply_to(&self, item: &mut ChecklistItem) {
        if let Some(answer) = self.answer {
            item.answer = answer;
        }
        if let Some(ref notes) = self.notes {
            item.notes = notes.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{self, ChecklistItemTemplate};
    use serde_json::json;

    static SMALL_TEMPLATE: &[ChecklistCategoryTemplate] = &[
        ChecklistCategoryTemplate {
            name: "1 - BUILDING",
            order: 1,
            items: &[
                ChecklistItemTemplate {
                    code: "1.1",
                    description: "Floors clean",
                    order: 1,
                },
                ChecklistItemTemplate {
                    code: "1.2",
                    description: "Walls intact",
                    order: 2,
                },
            ],
        },
        ChecklistCategoryTemplate {
            name: "2 - STAFF",
            order: 2,
            items: &[ChecklistItemTemplate {
                code: "2.1",
                description: "Uniforms worn",
                order: 1,
            }],
        },
    ];

    fn input() -> CreateReportInput {
        CreateReportInput::new("  Routine visit ", ClientId(3), InspectorId(9))
    }

    #[test]
    fn test_seeds_template_in_order() {
        let payload = NewReport::from_template(&input(), SMALL_TEMPLATE).unwrap();
        assert_eq!(payload.description, "Routine visit");
        assert_eq!(payload.categories.len(), 2);
        assert_eq!(payload.item_count(), 3);
        let codes: Vec<_> = payload
            .categories
            .iter()
            .flat_map(|c| c.items.iter().map(|i| i.code.as_str()))
            .collect();
        assert_eq!(codes, ["1.1", "1.2", "2.1"]);
    }

    #[test]
    fn test_full_template_round_trips_codes() {
        let payload = NewReport::from_template(&input(), template::template()).unwrap();
        assert_eq!(payload.item_count(), template::item_count());
        let seeded: Vec<_> = payload
            .categories
            .iter()
            .flat_map(|c| c.items.iter().map(|i| i.code.clone()))
            .collect();
        let expected: Vec<_> = template::template()
            .iter()
            .flat_map(|c| c.items.iter().map(|i| i.code.to_string()))
            .collect();
        assert_eq!(seeded, expected);
    }

    #[test]
    fn test_rejects_blank_description() {
        let bad = CreateReportInput {
            description: "   ".into(),
            ..input()
        };
        match NewReport::from_template(&bad, SMALL_TEMPLATE) {
            Err(InspectionError::Validation { field, .. }) => assert_eq!(field, "descricao"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_rejects_missing_references() {
        let no_client = CreateReportInput {
            client_id: None,
            ..input()
        };
        assert!(matches!(
            NewReport::from_template(&no_client, SMALL_TEMPLATE),
            Err(InspectionError::Validation { field: "cliente_id", .. })
        ));

        let no_inspector = CreateReportInput {
            responsible_inspector_id: None,
            ..input()
        };
        assert!(matches!(
            NewReport::from_template(&no_inspector, SMALL_TEMPLATE),
            Err(InspectionError::Validation { field: "responsavel_inspecao_id", .. })
        ));
    }

    #[test]
    fn test_rejects_long_description() {
        let bad = CreateReportInput {
            description: "x".repeat(MAX_DESCRIPTION_CHARS + 1),
            ..input()
        };
        assert!(NewReport::from_template(&bad, SMALL_TEMPLATE).is_err());
    }

    #[test]
    fn test_blank_category_label_is_dropped() {
        let payload =
            NewReport::from_template(&input().with_category_label("  "), SMALL_TEMPLATE).unwrap();
        assert_eq!(payload.category_label, None);

        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("categoria").is_none());
        assert!(value.get("data_agendada").is_none());
        assert_eq!(value["cliente_id"], 3);
        assert_eq!(value["categorias"][0]["itens"][1]["codigo"], "1.2");
    }

    #[test]
    fn test_report_from_backend_json() {
        let report: Report = serde_json::from_value(json!({
            "id": 12,
            "descricao": "Visit",
            "cliente_id": 3,
            "cliente": {"nome_fantasia": "Cafe Central"},
            "categoria": null,
            "responsavel_inspecao_id": 9,
            "status": "em_andamento",
            "criado_em": "2025-03-01T12:00:00.123456+00:00",
            "finalizado_em": null,
            "data_agendada": "2025-03-15T10:00:00",
            "categorias": [{
                "id": 1, "relatorio_id": 12, "nome": "1 - BUILDING", "ordem": 1,
                "itens": [
                    {"id": 100, "categoria_id": 1, "codigo": "1.1", "descricao": "Floors clean",
                     "resposta": null, "observacoes": null, "ordem": 1},
                    {"id": 101, "categoria_id": 1, "codigo": "1.2", "descricao": "Walls intact",
                     "resposta": "nao_conforme", "observacoes": "crack", "ordem": 2}
                ]
            }]
        }))
        .unwrap();

        assert_eq!(report.client.as_ref().unwrap().trade_name, "Cafe Central");
        assert_eq!(report.status, ReportStatus::InProgress);
        let expected = chrono::NaiveDate::from_ymd_opt(2025, 3, 15)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .unwrap();
        assert_eq!(report.scheduled_at, Some(Schedule::Local(expected)));
        assert_eq!(report.item_count(), 2);
        let first = report.find_item(ItemId(100)).unwrap();
        assert_eq!(first.answer, Answer::Unset);
        assert_eq!(first.notes, "");
        assert_eq!(report.find_item(ItemId(101)).unwrap().answer, Answer::NonCompliant);
        assert!(!report.is_complete());
    }

    #[test]
    fn test_listing_without_checklist() {
        let report: Report = serde_json::from_value(json!({
            "id": 5,
            "descricao": "Listed",
            "cliente_id": 2,
            "status": "concluido",
            "criado_em": "2025-03-01T12:00:00Z",
            "data_agendada": "not a date"
        }))
        .unwrap();
        assert!(report.is_finalized());
        assert!(report.categories.is_empty());
        assert_eq!(report.scheduled_at, None);
        assert_eq!(report.responsible_inspector_id, None);
    }

    #[test]
    fn test_report_query_string() {
        assert_eq!(ReportQuery::new().to_query_string(), "skip=0&limit=100");
        let query = ReportQuery::new()
            .for_client(ClientId(4))
            .with_status(ReportStatus::Finalized)
            .page(20, 10);
        assert_eq!(
            query.to_query_string(),
            "skip=20&limit=10&cliente_id=4&status_filter=concluido"
        );
    }

    #[test]
    fn test_item_update_wire_format() {
        let update = ItemUpdate::answer(Answer::Compliant);
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"resposta": "conforme"}));

        let update = ItemUpdate::notes("checked fridge");
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"observacoes": "checked fridge"})
        );
    }

    #[test]
    fn test_item_update_touches_only_requested_field() {
        let mut item = ChecklistItem {
            id: ItemId(1),
            code: "1.1".into(),
            description: "Floors clean".into(),
            answer: Answer::Unset,
            notes: "keep".into(),
            order: 1,
        };
        ItemUpdate::answer(Answer::NotApplicable).apply_to(&mut item);
        assert_eq!(item.answer, Answer::NotApplicable);
        assert_eq!(item.notes, "keep");

        ItemUpdate::notes("changed").apply_to(&mut item);
        assert_eq!(item.answer, Answer::NotApplicable);
        assert_eq!(item.notes, "changed");
    }
}
