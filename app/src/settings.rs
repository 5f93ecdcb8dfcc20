//! FILENAME: app/src/settings.rs
// PURPOSE: Export settings loaded from a JSON file.

use std::path::{Path, PathBuf};

use persistence::{looks_like_image, SpreadsheetOptions, DEFAULT_MAX_COLUMN_WIDTH};
use report_engine::DEFAULT_DELIMITER;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging::{self, CAT_CONFIG};
use crate::{log_info, log_warn};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading settings {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Log file error: {0}")]
    Log(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportSettings {
    /// Where `DirectorySink` drops finished files.
    pub output_dir: PathBuf,
    /// Title printed at the top of the document.
    pub title: String,
    pub logo_path: Option<PathBuf>,
    /// Cap for auto-sized spreadsheet columns, in characters.
    pub max_column_width: usize,
    /// Joins multi-valued fields in spreadsheet cells.
    pub delimiter: String,
    pub log_path: Option<PathBuf>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        ExportSettings {
            output_dir: PathBuf::from("informes"),
            title: "Memoria de actividades".to_string(),
            logo_path: None,
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
            delimiter: DEFAULT_DELIMITER.to_string(),
            log_path: None,
        }
    }
}

impl ExportSettings {
    /// Reads settings from a JSON file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&text)?;
        log_info!(CAT_CONFIG, "settings loaded from {:?}", path);
        Ok(settings)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Opens the configured log file. No-op when none is set.
    pub fn init_logging(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.log_path {
            logging::init_log_file(path).map_err(ConfigError::Log)?;
            log_info!(CAT_CONFIG, "log file at {:?}", path);
        }
        Ok(())
    }

    pub fn spreadsheet_options(&self) -> SpreadsheetOptions {
        SpreadsheetOptions {
            delimiter: self.delimiter.clone(),
            max_column_width: self.max_column_width,
            ..SpreadsheetOptions::default()
        }
    }

    /// Logo bytes, or None when unset, unreadable or not a PNG/JPEG file.
    pub fn load_logo(&self) -> Option<Vec<u8>> {
        let path = self.logo_path.as_ref()?;
        match std::fs::read(path) {
            Ok(bytes) if looks_like_image(&bytes) => Some(bytes),
            Ok(bytes) => {
                log_warn!(
                    CAT_CONFIG,
                    "logo {:?} is not a PNG or JPEG ({} bytes), document goes without it",
                    path,
                    bytes.len()
                );
                None
            }
            Err(e) => {
                log_warn!(CAT_CONFIG, "logo {:?} not readable, document goes without it: {}", path, e);
                None
            }
        }
    }
}
