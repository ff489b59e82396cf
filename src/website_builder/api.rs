//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for UI clients. It dispatches to `commands/*`, and returns
//! `Result<CmdResult>`. It never prints and never formats.
//!
//! `BuilderApi<H, C>` is generic over the store's history backend and clock:
//! - Production: `BuilderApi<JsonHistoryFile, SystemClock>`
//! - Testing: `BuilderApi<MemHistory, ManualClock>`

use crate::clock::Clock;
use crate::commands;
use crate::error::Result;
use crate::pipeline::ArtifactGenerator;
use crate::store::history::HistoryBackend;
use crate::store::VersionedStore;

pub struct BuilderApi<H: HistoryBackend, C: Clock> {
    store: VersionedStore<H, C>,
}

impl<H: HistoryBackend, C: Clock> BuilderApi<H, C> {
    pub fn new(store: VersionedStore<H, C>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &VersionedStore<H, C> {
        &self.store
    }

    pub fn init(&self) -> Result<commands::CmdResult> {
        commands::init::run(&self.store)
    }

    pub fn write_file(
        &mut self,
        filename: &str,
        content: &str,
        backup: bool,
    ) -> Result<commands::CmdResult> {
        commands::write::run(&mut self.store, filename, content, backup)
    }

    pub fn read_file(&self, filename: &str) -> Result<commands::CmdResult> {
        commands::read::run(&self.store, filename)
    }

    pub fn file_exists(&self, filename: &str) -> Result<commands::CmdResult> {
        commands::read::exists(&self.store, filename)
    }

    pub fn create_backup(&self, filename: &str) -> Result<commands::CmdResult> {
        commands::backups::create(&self.store, filename)
    }

    pub fn list_backups(&self, filename: Option<&str>) -> Result<commands::CmdResult> {
        commands::backups::list(&self.store, filename)
    }

    pub fn restore_backup(&self, backup_name: &str) -> Result<commands::CmdResult> {
        commands::backups::restore(&self.store, backup_name)
    }

    pub fn list_versions(&self, filename: &str) -> Result<commands::CmdResult> {
        commands::versions::list(&self.store, filename)
    }

    pub fn restore_version(&mut self, filename: &str, index: usize) -> Result<commands::CmdResult> {
        commands::versions::restore(&mut self.store, filename, index)
    }

    pub fn build<G: ArtifactGenerator>(
        &mut self,
        topic: &str,
        generator: &mut G,
    ) -> Result<commands::CmdResult> {
        commands::build::run(&mut self.store, topic, generator)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(self.store.root(), action)
    }
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, ListedVersion, MessageLevel};
