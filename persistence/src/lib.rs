//! FILENAME: persistence/src/lib.rs
//! Report Persistence Module
//!
//! Serializes resolved activity rows into downloadable artifacts: an XLSX
//! listing and a paginated PDF report. Nothing here touches the filesystem
//! unless a `save_*` function is called; delivery belongs to the caller.

pub mod document;
mod error;
mod pdf_writer;
mod xlsx_writer;

pub use document::{
    looks_like_image, page_label, plan, summary_lines, ChartImage, ChartSlot, DocumentContent, DocumentHeader,
    DocumentLayout, PageContent, PageLayout, SummaryLine,
};
pub use error::PersistenceError;
pub use pdf_writer::{render, write_document};
pub use xlsx_writer::{
    column_width, save_spreadsheet, write_spreadsheet, SpreadsheetOptions, DEFAULT_MAX_COLUMN_WIDTH,
    SPREADSHEET_HEADERS,
};
