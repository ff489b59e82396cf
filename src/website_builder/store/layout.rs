use super::json_history::HISTORY_FILENAME;
use crate::error::{BuilderError, Result};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

pub const BACKUP_DIR: &str = "backups";
pub const VERSION_DIR: &str = "versions";

/// The directory tree owned by one store.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    /// Relative roots are anchored at the current directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let root = std::path::absolute(root)
            .map_err(|e| BuilderError::io(root.display().to_string(), e))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.root.join(BACKUP_DIR)
    }

    pub fn version_dir(&self) -> PathBuf {
        self.root.join(VERSION_DIR)
    }

    pub fn history_file(&self) -> PathBuf {
        self.version_dir().join(HISTORY_FILENAME)
    }

    /// Create root, backup, version and typed content folders. Idempotent.
    pub fn ensure(&self, typed_subdirs: &[String]) -> Result<()> {
        let mut dirs = vec![self.root.clone(), self.backup_dir(), self.version_dir()];
        for sub in typed_subdirs {
            dirs.push(self.root.join(normalize_filename(sub)?));
        }
        for dir in dirs {
            fs::create_dir_all(&dir).map_err(|e| BuilderError::io(dir.display().to_string(), e))?;
        }
        Ok(())
    }

    /// Path of `filename` under the root, without touching the filesystem.
    pub fn path_for(&self, filename: &str) -> Result<PathBuf> {
        Ok(self.root.join(normalize_filename(filename)?))
    }

    /// Path of backup `name` under the backup folder.
    pub fn backup_path(&self, name: &str) -> Result<PathBuf> {
        Ok(self.backup_dir().join(normalize_filename(name)?))
    }
}

/// Accept only plain relative paths that stay inside the root and return
/// the canonical `/`-joined form with `.` and empty segments dropped.
///
/// Every key the store derives from a filename (history entry, backup name,
/// backup prefix filter) uses this form, so `./a.txt` and `a.txt` are the
/// same file.
pub fn normalize_filename(filename: &str) -> Result<String> {
    let invalid = |reason: &str| {
        BuilderError::io(
            filename,
            io::Error::new(io::ErrorKind::InvalidInput, reason.to_string()),
        )
    };

    if filename.trim().is_empty() {
        return Err(invalid("empty filename"));
    }
    let path = Path::new(filename);
    if path.is_absolute() {
        return Err(invalid("absolute paths are not allowed"));
    }

    let mut segments = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(segment) => match segment.to_str() {
                Some(segment) => segments.push(segment),
                None => return Err(invalid("filename is not valid UTF-8")),
            },
            Component::CurDir => {}
            Component::ParentDir => return Err(invalid("path escapes the output root")),
            Component::RootDir | Component::Prefix(_) => {
                return Err(invalid("absolute paths are not allowed"))
            }
        }
    }
    if segments.is_empty() || path.file_name().is_none() {
        return Err(invalid("filename has no final component"));
    }
    Ok(segments.join("/"))
}
