//! Compliance totals for a report, as printed at the end of the PDF

use crate::report::{Answer, Report};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComplianceSummary {
    pub total: usize,
    pub compliant: usize,
    pub non_compliant: usize,
    pub not_applicable: usize,
    pub unanswered: usize,
}

impl ComplianceSummary {
    pub fn of(report: &Report) -> Self {
        report.items().fold(Self::default(), |mut acc, item| {
            acc.total += 1;
            match item.answer {
                Answer::Compliant => acc.compliant += 1,
                Answer::NonCompliant => acc.non_compliant += 1,
                Answer::NotApplicable => acc.not_applicable += 1,
                Answer::Unset => acc.unanswered += 1,
            }
            acc
        })
    }

    /// Integer percentage of the total, rounded down; 0 for an empty checklist
    pub fn percent(&self, count: usize) -> usize {
        if self.total == 0 {
            0
        } else {
            count * 100 / self.total
        }
    }

    pub fn compliant_percent(&self) -> usize {
        self.percent(self.compliant)
    }

    pub fn non_compliant_percent(&self) -> usize {
        self.percent(self.non_compliant)
    }

    pub fn not_applicable_percent(&self) -> usize {
        self.percent(self.not_applicable)
    }

    pub fn answered(&self) -> usize {
        self.total - self.unanswered
    }
}

impl std::fmt::Display for ComplianceSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Items evaluated:  {}", self.total)?;
        writeln!(f, "Compliant:        {} ({}%)", self.compliant, self.compliant_percent())?;
        writeln!(f, "Non-compliant:    {} ({}%)", self.non_compliant, self.non_compliant_percent())?;
        writeln!(f, "N/A:              {} ({}%)", self.not_applicable, self.not_applicable_percent())?;
        write!(f, "Unanswered:       {}", self.unanswered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report_with(answers: &[Option<&str>]) -> Report {
        let items: Vec<_> = answers
            .iter()
            .enumerate()
            .map(|(i, answer)| {
                json!({
                    "id": i + 1, "codigo": format!("1.{}", i + 1), "descricao": "item",
                    "resposta": answer, "observacoes": null, "ordem": i + 1
                })
            })
            .collect();
        serde_json::from_value(json!({
            "id": 1, "descricao": "r", "cliente_id": 1, "status": "em_andamento",
            "criado_em": "2025-01-01T00:00:00Z",
            "categorias": [{"id": 1, "nome": "1 - A", "ordem": 1, "itens": items}]
        }))
        .unwrap()
    }

    #[test]
    fn test_counts_and_percentages() {
        let report = report_with(&[Some("conforme"), Some("conforme"), Some("nao_conforme"), None]);
        let summary = ComplianceSummary::of(&report);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.compliant, 2);
        assert_eq!(summary.non_compliant, 1);
        assert_eq!(summary.unanswered, 1);
        assert_eq!(summary.answered(), 3);
        assert_eq!(summary.compliant_percent(), 50);
        assert_eq!(summary.non_compliant_percent(), 25);
    }

    #[test]
    fn test_percentages_round_down() {
        let report = report_with(&[Some("conforme"), Some("na"), Some("na")]);
        let summary = ComplianceSummary::of(&report);
        assert_eq!(summary.compliant_percent(), 33);
        assert_eq!(summary.not_applicable_percent(), 66);
    }

    #[test]
    fn test_empty_checklist() {
        let summary = ComplianceSummary::of(&report_with(&[]));
        assert_eq!(summary, ComplianceSummary::default());
        assert_eq!(summary.compliant_percent(), 0);
    }
}
