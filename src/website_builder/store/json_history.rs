use super::atomic::write_atomic;
use super::history::HistoryBackend;
use crate::error::{BuilderError, Result};
use crate::model::VersionHistory;
use std::fs;
use std::path::{Path, PathBuf};

pub const HISTORY_FILENAME: &str = "version_history.json";

/// History kept as a single JSON document, rewritten in full on each save.
pub struct JsonHistoryFile {
    path: PathBuf,
    pretty: bool,
}

impl JsonHistoryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pretty: true,
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryBackend for JsonHistoryFile {
    fn load(&self) -> Result<VersionHistory> {
        if !self.path.exists() {
            return Ok(VersionHistory::new());
        }
        let content =
            fs::read_to_string(&self.path).map_err(|e| BuilderError::io(HISTORY_FILENAME, e))?;
        // An empty file is what a crash between create and first flush leaves
        if content.trim().is_empty() {
            return Ok(VersionHistory::new());
        }
        let history: VersionHistory = serde_json::from_str(&content)?;
        Ok(history)
    }

    fn save(&self, history: &VersionHistory) -> Result<()> {
        let content = if self.pretty {
            serde_json::to_string_pretty(history)?
        } else {
            serde_json::to_string(history)?
        };
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| BuilderError::io(HISTORY_FILENAME, e))?;
            }
        }
        write_atomic(&self.path, content.as_bytes())
            .map_err(|e| BuilderError::io(HISTORY_FILENAME, e))?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
