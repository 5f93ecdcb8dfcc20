//! FILENAME: report-engine/src/summary.rs
//! PURPOSE: Human-readable description of a FilterSpec.
//! CONTEXT: Used for the document header block and the wizard's preview step.

use activity_model::FilterSpec;
use serde::Serialize;

use crate::format::{format_date, ALL_TOKEN};
use crate::resolve::Resolver;

/// One "label: value" line of the filter summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSummaryLine {
    pub label: &'static str,
    pub value: String,
}

impl FilterSummaryLine {
    fn new(label: &'static str, value: Option<String>) -> Self {
        FilterSummaryLine {
            label,
            value: value.unwrap_or_else(|| ALL_TOKEN.to_string()),
        }
    }

    pub fn render(&self) -> String {
        format!("{}: {}", self.label, self.value)
    }
}

/// Describes the report period covered by the filter's date range.
pub fn report_period(spec: &FilterSpec) -> String {
    match (spec.date_from(), spec.date_to()) {
        (Some(from), Some(to)) => format!("{} - {}", format_date(from), format_date(to)),
        (Some(from), None) => format!("Desde {}", format_date(from)),
        (None, Some(to)) => format!("Hasta {}", format_date(to)),
        (None, None) => ALL_TOKEN.to_string(),
    }
}

/// One line per filter, in a fixed order, with codes resolved to names.
pub fn describe_filters(spec: &FilterSpec, resolver: &Resolver) -> Vec<FilterSummaryLine> {
    let dates = if spec.date_from().is_some() || spec.date_to().is_some() {
        Some(report_period(spec))
    } else {
        None
    };

    vec![
        FilterSummaryLine::new("Fechas", dates),
        FilterSummaryLine::new("Red", spec.network().map(|c| resolver.network(c).to_string())),
        FilterSummaryLine::new("Centro", spec.center().map(str::to_string)),
        FilterSummaryLine::new("Trimestre", spec.quarter().map(|q| resolver.quarter(q).to_string())),
        FilterSummaryLine::new("Departamento", spec.department().map(|c| resolver.department(c).to_string())),
        FilterSummaryLine::new("Familia profesional", spec.family().map(|c| resolver.family(c).to_string())),
        FilterSummaryLine::new("Búsqueda", spec.search().map(|s| format!("\"{}\"", s))),
        FilterSummaryLine::new(
            "Objetivos",
            spec.objectives()
                .map(|ids| ids.iter().map(|id| resolver.objective(id)).collect::<Vec<_>>().join(", ")),
        ),
        FilterSummaryLine::new(
            "ODS",
            spec.goals()
                .map(|ids| ids.iter().map(|id| resolver.goal(id)).collect::<Vec<_>>().join(", ")),
        ),
        FilterSummaryLine::new("Estado", spec.status().map(|s| s.label().to_string())),
    ]
}
