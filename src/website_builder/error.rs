use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuilderError {
    #[error("IO error on {filename}: {source}")]
    Io {
        filename: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Backup file {0} not found")]
    BackupNotFound(String),

    #[error("No version history found for {0}")]
    NoHistory(String),

    #[error("Invalid version index {index} for {filename} ({len} versions recorded)")]
    VersionOutOfRange {
        filename: String,
        index: usize,
        len: usize,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl BuilderError {
    /// Wraps an I/O failure with the logical filename it happened on.
    pub fn io(filename: impl Into<String>, source: std::io::Error) -> Self {
        BuilderError::Io {
            filename: filename.into(),
            source,
        }
    }

    /// Filesystem-level failures, including a missing backup.
    pub fn is_io(&self) -> bool {
        matches!(self, BuilderError::Io { .. } | BuilderError::BackupNotFound(_))
    }

    /// Caller asked for a version that does not exist.
    pub fn is_range(&self) -> bool {
        matches!(
            self,
            BuilderError::NoHistory(_) | BuilderError::VersionOutOfRange { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, BuilderError>;
