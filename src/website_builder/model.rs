use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One snapshot of a file's full content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    /// ISO-8601 local time, e.g. `2024-05-01T13:45:12.123456`
    pub timestamp: String,
    pub content: String,
}

impl VersionRecord {
    pub fn new(timestamp: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            content: content.into(),
        }
    }
}

/// Filename -> records in the order they were appended.
///
/// Serializes as a plain JSON object, which is the on-disk format of
/// `versions/version_history.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionHistory {
    entries: BTreeMap<String, Vec<VersionRecord>>,
}

impl VersionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn versions(&self, filename: &str) -> &[VersionRecord] {
        self.entries
            .get(filename)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.entries.contains_key(filename)
    }

    pub fn append(&mut self, filename: &str, record: VersionRecord) {
        self.entries
            .entry(filename.to_string())
            .or_default()
            .push(record);
    }

    /// Undo the most recent `append` for `filename`.
    ///
    /// Drops the key entirely when it was the first record, so a failed
    /// first write leaves no trace.
    pub(crate) fn pop(&mut self, filename: &str) -> Option<VersionRecord> {
        let records = self.entries.get_mut(filename)?;
        let popped = records.pop();
        if records.is_empty() {
            self.entries.remove(filename);
        }
        popped
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Html,
    Css,
    Js,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [ArtifactKind::Html, ArtifactKind::Css, ArtifactKind::Js];

    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = Path::new(filename).extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" => Some(ArtifactKind::Html),
            "css" => Some(ArtifactKind::Css),
            "js" | "mjs" => Some(ArtifactKind::Js),
            _ => None,
        }
    }

    /// Typed subfolder under the output root.
    pub fn subdir(&self) -> &'static str {
        match self {
            ArtifactKind::Html => "html",
            ArtifactKind::Css => "css",
            ArtifactKind::Js => "js",
        }
    }

    /// Filename the generation pipeline writes this artifact to.
    pub fn default_filename(&self) -> &'static str {
        match self {
            ArtifactKind::Html => "index.html",
            ArtifactKind::Css => "style.css",
            ArtifactKind::Js => "script.js",
        }
    }
}
