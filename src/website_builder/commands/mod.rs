use crate::config::BuilderConfig;
use std::path::PathBuf;

pub mod backups;
pub mod build;
pub mod config;
pub mod init;
pub mod read;
pub mod versions;
pub mod write;

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A version record as shown to users, with its restore index.
#[derive(Debug, Clone)]
pub struct ListedVersion {
    pub index: usize,
    pub timestamp: String,
    pub content: String,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub paths: Vec<PathBuf>,
    pub backups: Vec<String>,
    pub versions: Vec<ListedVersion>,
    pub content: Option<String>,
    pub config: Option<BuilderConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = paths;
        self
    }

    pub fn with_backups(mut self, backups: Vec<String>) -> Self {
        self.backups = backups;
        self
    }

    pub fn with_versions(mut self, versions: Vec<ListedVersion>) -> Self {
        self.versions = versions;
        self
    }

    pub fn with_content(mut self, content: String) -> Self {
        self.content = Some(content);
        self
    }

    pub fn with_config(mut self, config: BuilderConfig) -> Self {
        self.config = Some(config);
        self
    }
}
