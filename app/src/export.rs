//! FILENAME: app/src/export.rs
// PURPOSE: Export pipeline - filter, capture, serialize, deliver.
// CONTEXT: Every run resolves codes through one Resolver built from the
// store's catalog, so the preview, spreadsheet and document agree on names.
// Records that fail validation are logged and left out of every output.
// Nothing reaches the sink unless serialization succeeded.

use activity_model::{Activity, Catalog, FilterSpec, OutputFormat, RecordStore, ReportConfig, ReportType};
use chrono::{Local, NaiveDateTime};
use persistence::{
    summary_lines, write_document, write_spreadsheet, ChartImage, ChartSlot, DocumentContent, DocumentHeader,
    PersistenceError,
};
use report_engine::{aggregate, build_rows, describe_filters, filter, report_period, to_series, ChartKind, Resolver};
use thiserror::Error;
use uuid::Uuid;

use crate::context::ReportContext;
use crate::logging::{CAT_CAPTURE, CAT_EXPORT};
use crate::settings::ExportSettings;
use crate::sink::DownloadSink;
use crate::surface::{capture_charts, CaptureError, VisualizationSurface};
use crate::{log_enter, log_enter_info, log_error, log_exit, log_exit_info, log_info, log_warn};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Serialization failed: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Delivery of '{filename}' failed: {source}")]
    Delivery {
        filename: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Async runtime error: {0}")]
    Runtime(std::io::Error),
}

// ============================================================================
// FILE NAMES
// ============================================================================

/// `informe_<type>.xlsx`
pub fn spreadsheet_filename(report_type: ReportType) -> String {
    format!("informe_{}.{}", report_type.slug(), OutputFormat::Spreadsheet.extension())
}

/// `informe_<type>_<YYYYMMDD_HHMMSS>.pdf`
pub fn document_filename(report_type: ReportType, at: NaiveDateTime) -> String {
    format!(
        "informe_{}_{}.{}",
        report_type.slug(),
        at.format("%Y%m%d_%H%M%S"),
        OutputFormat::Document.extension()
    )
}

/// Appends `.ext` unless `name` already ends with it (case-insensitive).
pub fn ensure_extension(name: &str, ext: &str) -> String {
    let suffix = format!(".{}", ext);
    if name.to_lowercase().ends_with(&suffix) {
        name.to_string()
    } else {
        format!("{}{}", name, suffix)
    }
}

/// Valid records that satisfy `filter_spec`, in input order. Invalid ones are
/// logged and skipped.
pub(crate) fn matching<'a>(records: &'a [Activity], filter_spec: &FilterSpec) -> Vec<&'a Activity> {
    let valid = records.iter().filter(|activity| match activity.validate() {
        Ok(()) => true,
        Err(e) => {
            log_warn!(CAT_EXPORT, "skipping record: {}", e);
            false
        }
    });
    filter(valid, filter_spec)
}

fn pick_filename(requested: Option<&str>, ext: &str, default: impl FnOnce() -> String) -> String {
    match requested.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => ensure_extension(name, ext),
        None => default(),
    }
}

// ============================================================================
// PIPELINE
// ============================================================================

/// One export run's wiring: where records come from, who is asking and where
/// the result goes.
pub struct ExportPipeline<S: RecordStore> {
    store: S,
    settings: ExportSettings,
    context: ReportContext,
    sink: Box<dyn DownloadSink>,
    surface: Option<Box<dyn VisualizationSurface>>,
}

impl<S: RecordStore> ExportPipeline<S> {
    pub fn new(store: S, settings: ExportSettings, context: ReportContext, sink: Box<dyn DownloadSink>) -> Self {
        ExportPipeline { store, settings, context, sink, surface: None }
    }

    pub fn with_surface(mut self, surface: Box<dyn VisualizationSurface>) -> Self {
        self.surface = Some(surface);
        self
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    pub fn context(&self) -> &ReportContext {
        &self.context
    }

    /// Runs a full report: load, filter, capture charts when the document
    /// needs them, serialize and deliver. Returns the delivered file name.
    pub async fn run(&self, config: ReportConfig) -> Result<String, ExportError> {
        let run_id = Uuid::new_v4();
        log_enter_info!(
            CAT_EXPORT,
            "run",
            "[{}] type={} format={}",
            run_id,
            config.report_type.slug(),
            config.output_format.extension()
        );

        let records = self.store.list_activities();
        let catalog = self.store.load_catalog();

        let result = match config.output_format {
            OutputFormat::Spreadsheet => {
                self.spreadsheet(&records, &catalog, &config.filter_spec, config.report_type, None)
            }
            OutputFormat::Document => {
                let images = if config.report_type.includes_charts() {
                    self.capture(&records, &catalog, &config.filter_spec, run_id).await
                } else {
                    Vec::new()
                };
                self.document(&records, &catalog, &config.filter_spec, config.report_type, images, None)
            }
        };

        match &result {
            Ok(filename) => log_exit_info!(CAT_EXPORT, "run", "[{}] delivered {}", run_id, filename),
            Err(e) => log_error!(CAT_EXPORT, "[{}] export failed: {}", run_id, e),
        }
        result
    }

    /// Blocking wrapper around `run` for callers without a runtime.
    pub fn run_blocking(&self, config: ReportConfig) -> Result<String, ExportError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ExportError::Runtime)?;
        runtime.block_on(self.run(config))
    }

    /// Writes the filtered listing as XLSX. Any failure is logged and
    /// reported as `false`; nothing is delivered in that case.
    pub fn export_spreadsheet(
        &self,
        records: &[Activity],
        filter_spec: &FilterSpec,
        report_type: ReportType,
        filename: Option<&str>,
    ) -> bool {
        let catalog = self.store.load_catalog();
        match self.spreadsheet(records, &catalog, filter_spec, report_type, filename) {
            Ok(name) => {
                log_info!(CAT_EXPORT, "spreadsheet delivered as {}", name);
                true
            }
            Err(e) => {
                log_error!(CAT_EXPORT, "spreadsheet export failed: {}", e);
                false
            }
        }
    }

    /// Writes the paginated document. `chart_images` holds one entry per
    /// grid slot (`ChartKind::GRID` order); `None` leaves that slot blank.
    pub fn export_document(
        &self,
        records: &[Activity],
        filter_spec: &FilterSpec,
        report_type: ReportType,
        chart_images: Vec<Option<ChartImage>>,
        filename: Option<&str>,
    ) -> Result<String, ExportError> {
        let catalog = self.store.load_catalog();
        self.document(records, &catalog, filter_spec, report_type, chart_images, filename)
    }

    // ------------------------------------------------------------------------

    fn spreadsheet(
        &self,
        records: &[Activity],
        catalog: &Catalog,
        filter_spec: &FilterSpec,
        report_type: ReportType,
        filename: Option<&str>,
    ) -> Result<String, ExportError> {
        log_enter!(CAT_EXPORT, "spreadsheet", "type={} records={}", report_type.slug(), records.len());
        let resolver = Resolver::new(catalog);
        let matched = matching(records, filter_spec);
        let rows = build_rows(&matched, &resolver);

        let bytes = write_spreadsheet(&rows, &self.settings.spreadsheet_options())?;
        let name = pick_filename(filename, OutputFormat::Spreadsheet.extension(), || {
            spreadsheet_filename(report_type)
        });
        log_info!(CAT_EXPORT, "spreadsheet: {} rows, {} bytes", rows.len(), bytes.len());
        self.deliver(&name, &bytes)?;
        log_exit!(CAT_EXPORT, "spreadsheet", "{}", name);
        Ok(name)
    }

    fn document(
        &self,
        records: &[Activity],
        catalog: &Catalog,
        filter_spec: &FilterSpec,
        report_type: ReportType,
        chart_images: Vec<Option<ChartImage>>,
        filename: Option<&str>,
    ) -> Result<String, ExportError> {
        log_enter!(CAT_EXPORT, "document", "type={} records={}", report_type.slug(), records.len());
        let resolver = Resolver::new(catalog);
        let matched = matching(records, filter_spec);

        let header = DocumentHeader {
            title: self.settings.title.clone(),
            subtitle: report_type.title().to_string(),
            period: report_period(filter_spec),
            course: self.context.active_course.clone(),
            generated_by: self.context.generated_by(),
            filters: describe_filters(filter_spec, &resolver).iter().map(|l| l.render()).collect(),
            logo: self.settings.load_logo(),
        };

        let summary = if report_type.includes_summary() && !matched.is_empty() {
            Some(summary_lines(&aggregate(&matched, &resolver)))
        } else {
            None
        };

        let charts = if report_type.includes_charts() {
            let mut images = chart_images.into_iter();
            ChartKind::GRID
                .iter()
                .map(|kind| ChartSlot { title: kind.title().to_string(), image: images.next().flatten() })
                .collect()
        } else {
            Vec::new()
        };

        let content = DocumentContent { header, rows: build_rows(&matched, &resolver), summary, charts };
        let bytes = write_document(&content)?;

        let name = pick_filename(filename, OutputFormat::Document.extension(), || {
            document_filename(report_type, Local::now().naive_local())
        });
        log_info!(CAT_EXPORT, "document: {} rows, {} bytes", content.rows.len(), bytes.len());
        self.deliver(&name, &bytes)?;
        log_exit!(CAT_EXPORT, "document", "{}", name);
        Ok(name)
    }

    async fn capture(
        &self,
        records: &[Activity],
        catalog: &Catalog,
        filter_spec: &FilterSpec,
        run_id: Uuid,
    ) -> Vec<Option<ChartImage>> {
        let Some(surface) = &self.surface else {
            log_warn!(CAT_CAPTURE, "[{}] {}; document goes without charts", run_id, CaptureError::SurfaceMissing);
            return Vec::new();
        };

        let matched = matching(records, filter_spec);
        if matched.is_empty() {
            log_info!(CAT_CAPTURE, "[{}] no matching records; nothing to chart", run_id);
            return Vec::new();
        }

        let resolver = Resolver::new(catalog);
        let series: Vec<_> = ChartKind::GRID
            .iter()
            .map(|kind| (*kind, to_series(&matched, kind.dimension(), &resolver)))
            .collect();

        // Empty series are never drawn; their slots stay None
        let drawable: Vec<_> = series.iter().filter(|(_, points)| !points.is_empty()).cloned().collect();
        let mut captured = capture_charts(surface.as_ref(), &drawable).await.into_iter();
        let images: Vec<Option<ChartImage>> = series
            .iter()
            .map(|(_, points)| if points.is_empty() { None } else { captured.next().flatten() })
            .collect();

        let count = images.iter().filter(|i| i.is_some()).count();
        log_info!(CAT_CAPTURE, "[{}] captured {} of {} charts", run_id, count, series.len());
        images
    }

    fn deliver(&self, filename: &str, bytes: &[u8]) -> Result<(), ExportError> {
        self.sink.deliver(filename, bytes).map_err(|source| ExportError::Delivery {
            filename: filename.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn default_names_follow_report_type() {
        assert_eq!(spreadsheet_filename(ReportType::Statistics), "informe_estadisticas.xlsx");

        let at = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(9, 7, 1).unwrap();
        assert_eq!(document_filename(ReportType::Complete, at), "informe_completo_20240305_090701.pdf");
    }

    #[test]
    fn requested_names_get_extension() {
        assert_eq!(ensure_extension("memoria", "xlsx"), "memoria.xlsx");
        assert_eq!(ensure_extension("memoria.XLSX", "xlsx"), "memoria.XLSX");
        assert_eq!(pick_filename(Some("  "), "pdf", || "x.pdf".to_string()), "x.pdf");
        assert_eq!(pick_filename(Some("final"), "pdf", || "x.pdf".to_string()), "final.pdf");
    }

    #[test]
    fn invalid_records_never_match() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap();
        let records = vec![
            Activity::new("ok", "Taller", day(2), day(3)),
            Activity::new("reversed", "Charla", day(9), day(1)),
            Activity::new("rated", "Visita", day(4), day(4)).with_rating(7),
        ];
        let ids: Vec<&str> = matching(&records, &FilterSpec::all()).iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["ok"]);
    }
}
