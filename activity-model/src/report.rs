//! FILENAME: activity-model/src/report.rs
//! PURPOSE: The report configuration produced by the wizard.
//! CONTEXT: Passed by value into the export pipeline; the pipeline never reads
//! filter selections from anywhere else.

use crate::filter_spec::FilterSpec;
use serde::{Deserialize, Serialize};

/// What the report contains besides the activity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    /// Activity listing only.
    Activities,
    /// Activity listing plus the chart page.
    Statistics,
    /// Activity listing, network summary page and chart page.
    Complete,
}

impl ReportType {
    pub fn includes_charts(self) -> bool {
        matches!(self, ReportType::Statistics | ReportType::Complete)
    }

    pub fn includes_summary(self) -> bool {
        matches!(self, ReportType::Complete)
    }

    /// Slug used in generated file names.
    pub fn slug(self) -> &'static str {
        match self {
            ReportType::Activities => "actividades",
            ReportType::Statistics => "estadisticas",
            ReportType::Complete => "completo",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportType::Activities => "Informe de actividades",
            ReportType::Statistics => "Informe estadístico de actividades",
            ReportType::Complete => "Informe completo de actividades",
        }
    }
}

impl Default for ReportType {
    fn default() -> Self {
        ReportType::Activities
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// XLSX workbook.
    Spreadsheet,
    /// Paginated PDF.
    Document,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Spreadsheet => "xlsx",
            OutputFormat::Document => "pdf",
        }
    }
}

/// Everything one report run needs to know about the user's choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportConfig {
    #[serde(rename = "type")]
    pub report_type: ReportType,
    #[serde(default)]
    pub filter_spec: FilterSpec,
    pub output_format: OutputFormat,
}

impl ReportConfig {
    pub fn new(report_type: ReportType, filter_spec: FilterSpec, output_format: OutputFormat) -> Self {
        ReportConfig {
            report_type,
            filter_spec,
            output_format,
        }
    }
}
