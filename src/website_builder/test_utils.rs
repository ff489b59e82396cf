use crate::clock::ManualClock;
use crate::config::BuilderConfig;
use crate::store::mem_history::MemHistory;
use crate::store::VersionedStore;
use std::path::PathBuf;
use tempfile::TempDir;

pub type TestStore = VersionedStore<MemHistory, ManualClock>;

pub struct TestEnv {
    // We keep _temp_dir to ensure the directory is not dropped until the test is done
    pub _temp_dir: TempDir,
    pub store: TestStore,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_config(BuilderConfig::default())
    }

    pub fn with_config(config: BuilderConfig) -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let store =
            VersionedStore::with_backend(&root, &config, MemHistory::new(), ManualClock::default())
                .expect("failed to open test store");
        Self {
            _temp_dir: temp_dir,
            store,
            root,
        }
    }

    /// Move the store's clock forward so the next backup gets a fresh name.
    pub fn tick(&self) {
        self.store.clock().advance_secs(1);
    }
}
