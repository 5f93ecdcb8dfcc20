//! FILENAME: app/src/lib.rs
// PURPOSE: Report export entry points.
// CONTEXT: Wires the record store, the chart surface and a download sink
// around the pure reporting stages in report_engine and persistence.

pub mod logging;
pub mod context;
pub mod settings;
pub mod sink;
pub mod surface;
pub mod export;
pub mod wizard;

pub use logging::{init_log_file, log_path, next_seq, write_log};
pub use context::{ReportContext, Role, UserIdentity};
pub use settings::{ConfigError, ExportSettings};
pub use sink::{DirectorySink, DownloadSink};
pub use surface::{capture_charts, CaptureError, VisualizationSurface};
pub use export::{document_filename, ensure_extension, spreadsheet_filename, ExportError, ExportPipeline};
pub use wizard::{set_fields, visible_filters, FilterField, ReportWizard, WizardError, WizardStep};
