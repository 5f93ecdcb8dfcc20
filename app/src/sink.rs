//! FILENAME: app/src/sink.rs
// PURPOSE: Where finished export files go.

use std::path::{Path, PathBuf};

/// Receives a finished artifact. Called once per export, after serialization
/// succeeded.
pub trait DownloadSink: Send + Sync {
    fn deliver(&self, filename: &str, bytes: &[u8]) -> std::io::Result<()>;
}

/// Writes artifacts into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectorySink { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&self, filename: &str, bytes: &[u8]) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.dir.join(filename), bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_into_nested_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(tmp.path().join("out").join("informes"));
        sink.deliver("informe.xlsx", b"PK").unwrap();
        assert_eq!(std::fs::read(sink.dir().join("informe.xlsx")).unwrap(), b"PK");
    }
}
