use super::atomic::{copy_with_metadata, write_atomic};
use super::history::HistoryBackend;
use super::json_history::JsonHistoryFile;
use super::layout::{normalize_filename, OutputLayout};
use super::ArtifactSink;
use crate::clock::{Clock, SystemClock};
use crate::config::BuilderConfig;
use crate::error::{BuilderError, Result};
use crate::model::{VersionHistory, VersionRecord};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Output store with timestamped backups and per-file version history.
///
/// History is loaded once when the store is opened and flushed through the
/// backend after every recorded write.
pub struct VersionedStore<H: HistoryBackend, C: Clock = SystemClock> {
    layout: OutputLayout,
    backend: H,
    clock: C,
    history: VersionHistory,
    record_restored_versions: bool,
}

/// The production store: JSON history under `versions/`, wall-clock time.
pub type FileStore = VersionedStore<JsonHistoryFile, SystemClock>;

impl FileStore {
    pub fn open(root: impl AsRef<Path>, config: &BuilderConfig) -> Result<Self> {
        let layout = OutputLayout::new(root)?;
        let backend = JsonHistoryFile::new(layout.history_file()).with_pretty(config.pretty_history);
        Self::with_layout(layout, config, backend, SystemClock)
    }
}

impl<H: HistoryBackend, C: Clock> VersionedStore<H, C> {
    pub fn with_backend(
        root: impl AsRef<Path>,
        config: &BuilderConfig,
        backend: H,
        clock: C,
    ) -> Result<Self> {
        let layout = OutputLayout::new(root)?;
        Self::with_layout(layout, config, backend, clock)
    }

    fn with_layout(
        layout: OutputLayout,
        config: &BuilderConfig,
        backend: H,
        clock: C,
    ) -> Result<Self> {
        layout.ensure(&config.typed_subdirs)?;
        let history = backend.load()?;
        debug!(
            root = %layout.root().display(),
            history = %backend.describe(),
            files = history.len(),
            "opened output store"
        );
        Ok(Self {
            layout,
            backend,
            clock,
            history,
            record_restored_versions: config.record_restored_versions,
        })
    }

    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    pub fn backend(&self) -> &H {
        &self.backend
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn history(&self) -> &VersionHistory {
        &self.history
    }

    /// Absolute path for `filename`, creating its parent directories.
    pub fn resolve(&self, filename: &str) -> Result<PathBuf> {
        let path = self.layout.path_for(filename)?;
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| BuilderError::io(filename, e))?;
            }
        }
        debug!(filename, path = %path.display(), "resolved");
        Ok(path)
    }

    /// Replace `filename` with `content` and record the new version.
    ///
    /// With `backup` set, an existing file is copied to the backup area
    /// first; a failed backup aborts the write.
    pub fn write(&mut self, filename: &str, content: &str, backup: bool) -> Result<PathBuf> {
        let key = normalize_filename(filename)?;
        let path = self.write_content(&key, content, backup)?;
        self.record_version(&key, content)?;
        Ok(path)
    }

    /// Disk first, history second, so a failed write never reaches history.
    fn write_content(&self, filename: &str, content: &str, backup: bool) -> Result<PathBuf> {
        let path = self.resolve(filename)?;

        if backup && path.is_file() {
            self.backup(filename)?;
        }

        write_atomic(&path, content.as_bytes()).map_err(|e| BuilderError::io(filename, e))?;
        info!(filename, bytes = content.len(), "wrote file");
        Ok(path)
    }

    fn record_version(&mut self, filename: &str, content: &str) -> Result<()> {
        let record = VersionRecord::new(self.clock.iso_timestamp(), content);
        self.history.append(filename, record);

        if let Err(e) = self.backend.save(&self.history) {
            self.history.pop(filename);
            warn!(filename, error = %e, "version history flush failed, append rolled back");
            return Err(e);
        }
        debug!(
            filename,
            versions = self.history.versions(filename).len(),
            "recorded version"
        );
        Ok(())
    }

    pub fn read(&self, filename: &str) -> Result<String> {
        let path = self.layout.path_for(filename)?;
        debug!(filename, "reading file");
        fs::read_to_string(&path).map_err(|e| BuilderError::io(filename, e))
    }

    /// Whether `filename` is a regular file in the output tree.
    pub fn exists(&self, filename: &str) -> bool {
        self.layout
            .path_for(filename)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }

    /// Copy the current `filename` to `backups/<filename>.<stamp>.bak`.
    ///
    /// Returns `Ok(None)` when there is nothing to back up.
    /// A backup taken in the same second as an earlier one of the same file
    /// replaces it, since both map to the same name.
    pub fn backup(&self, filename: &str) -> Result<Option<PathBuf>> {
        let key = normalize_filename(filename)?;
        let source = self.layout.path_for(&key)?;
        if !source.is_file() {
            debug!(filename = %key, "nothing to back up");
            return Ok(None);
        }

        let backup_name = format!("{}.{}.bak", key, self.clock.backup_stamp());
        let target = self.layout.backup_path(&backup_name)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| BuilderError::io(filename, e))?;
        }
        if target.exists() {
            warn!(
                filename = %key,
                backup = %backup_name,
                "backup from the same second already exists, overwriting it"
            );
        }

        copy_with_metadata(&source, &target).map_err(|e| BuilderError::io(filename, e))?;
        info!(filename = %key, backup = %backup_name, "created backup");
        Ok(Some(target))
    }

    /// Backup names relative to the backup area, `/`-separated.
    ///
    /// With a filename, only that file's backups (`<filename>.` prefix).
    /// Order follows directory enumeration.
    pub fn list_backups(&self, filename: Option<&str>) -> Result<Vec<String>> {
        let backup_dir = self.layout.backup_dir();
        let mut names = Vec::new();
        collect_backup_names(&backup_dir, "", &mut names)
            .map_err(|e| BuilderError::io(super::layout::BACKUP_DIR, e))?;

        if let Some(filename) = filename {
            let prefix = format!("{}.", normalize_filename(filename)?);
            names.retain(|name| name.starts_with(&prefix));
        }
        Ok(names)
    }

    /// Copy a backup over the file it was taken from.
    ///
    /// The target is the part of `backup_name` before its first `.`.
    /// Version history is left untouched.
    pub fn restore_backup(&self, backup_name: &str) -> Result<PathBuf> {
        let backup_path = self.layout.backup_path(backup_name)?;
        if !backup_path.is_file() {
            return Err(BuilderError::BackupNotFound(backup_name.to_string()));
        }
        let backup_name = normalize_filename(backup_name)?;
        let backup_name = backup_name.as_str();

        let original = backup_name.split('.').next().unwrap_or_default();
        if original.is_empty() {
            return Err(BuilderError::io(
                backup_name,
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "cannot derive original filename from backup name",
                ),
            ));
        }

        let target = self.resolve(original)?;
        copy_with_metadata(&backup_path, &target).map_err(|e| BuilderError::io(backup_name, e))?;
        info!(backup = backup_name, filename = original, "restored backup");
        Ok(target)
    }

    /// Recorded versions of `filename`, oldest first. Empty if none.
    pub fn get_versions(&self, filename: &str) -> &[VersionRecord] {
        match normalize_filename(filename) {
            Ok(key) => self.history.versions(&key),
            Err(_) => &[],
        }
    }

    /// Make version `index` of `filename` the live file again.
    ///
    /// Never takes a backup. Whether the restore is itself recorded as a new
    /// version follows `record_restored_versions` (off by default).
    pub fn restore_version(&mut self, filename: &str, index: usize) -> Result<PathBuf> {
        let key = match normalize_filename(filename) {
            Ok(key) if self.history.contains(&key) => key,
            _ => return Err(BuilderError::NoHistory(filename.to_string())),
        };
        let versions = self.history.versions(&key);
        let content = versions
            .get(index)
            .map(|record| record.content.clone())
            .ok_or_else(|| BuilderError::VersionOutOfRange {
                filename: filename.to_string(),
                index,
                len: versions.len(),
            })?;

        let path = if self.record_restored_versions {
            self.write(&key, &content, false)?
        } else {
            self.write_content(&key, &content, false)?
        };
        info!(filename = %key, index, "restored version");
        Ok(path)
    }
}

impl<H: HistoryBackend, C: Clock> ArtifactSink for VersionedStore<H, C> {
    fn save_artifact(&mut self, filename: &str, content: &str) -> Result<PathBuf> {
        self.write(filename, content, true)
    }
}

fn collect_backup_names(dir: &Path, prefix: &str, names: &mut Vec<String>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        let relative = if prefix.is_empty() {
            name
        } else {
            format!("{}/{}", prefix, name)
        };
        if entry.file_type()?.is_dir() {
            collect_backup_names(&entry.path(), &relative, names)?;
        } else {
            names.push(relative);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::store::mem_history::MemHistory;
    use tempfile::TempDir;

    type TestStore = VersionedStore<MemHistory, ManualClock>;

    fn setup() -> (TempDir, TestStore) {
        setup_with(BuilderConfig::default())
    }

    fn setup_with(config: BuilderConfig) -> (TempDir, TestStore) {
        let temp = TempDir::new().unwrap();
        let store = VersionedStore::with_backend(
            temp.path(),
            &config,
            MemHistory::new(),
            ManualClock::default(),
        )
        .unwrap();
        (temp, store)
    }

    fn contents(store: &TestStore, filename: &str) -> Vec<String> {
        store
            .get_versions(filename)
            .iter()
            .map(|r| r.content.clone())
            .collect()
    }

    #[test]
    fn open_creates_layout() {
        let (temp, _store) = setup();
        for dir in ["backups", "versions", "html", "css", "js"] {
            assert!(temp.path().join(dir).is_dir());
        }
    }

    #[test]
    fn write_then_read_round_trips() {
        let (_temp, mut store) = setup();
        let path = store.write("test.txt", "Hello, World!", true).unwrap();
        assert!(path.is_file());
        assert_eq!(fs::read_to_string(&path).unwrap(), "Hello, World!");
        assert_eq!(store.read("test.txt").unwrap(), "Hello, World!");
    }

    #[test]
    fn write_creates_nested_dirs() {
        let (temp, mut store) = setup();
        store.write("output/index.html", "<h1>", true).unwrap();
        assert!(temp.path().join("output").join("index.html").is_file());
    }

    #[test]
    fn exists_reflects_writes() {
        let (_temp, mut store) = setup();
        assert!(!store.exists("test.txt"));
        store.write("test.txt", "x", true).unwrap();
        assert!(store.exists("test.txt"));
        assert!(!store.exists("/etc/passwd"));
        assert!(!store.exists("html"));
    }

    #[test]
    fn read_missing_file_is_io_error() {
        let (_temp, store) = setup();
        let err = store.read("nonexistent.txt").unwrap_err();
        assert!(err.is_io());
        assert!(err.to_string().contains("nonexistent.txt"));
    }

    #[test]
    fn write_to_absolute_path_fails_without_history() {
        let (_temp, mut store) = setup();
        let err = store.write("/invalid/path/test.txt", "test", true).unwrap_err();
        assert!(err.is_io());
        assert!(store.get_versions("/invalid/path/test.txt").is_empty());
        assert_eq!(store.backend().save_count(), 0);
    }

    #[test]
    fn failed_content_write_leaves_history_alone() {
        let (_temp, mut store) = setup();
        let err = store.write("html", "not a directory", true).unwrap_err();
        assert!(err.is_io());
        assert!(store.get_versions("html").is_empty());
        assert_eq!(store.backend().save_count(), 0);
    }

    #[test]
    fn failed_backup_aborts_write() {
        let (temp, mut store) = setup();
        store.write("a.txt", "v1", true).unwrap();
        fs::remove_dir(temp.path().join("backups")).unwrap();
        fs::write(temp.path().join("backups"), "in the way").unwrap();

        store.clock().advance_secs(1);
        let err = store.write("a.txt", "v2", true).unwrap_err();

        assert!(err.is_io());
        assert_eq!(store.read("a.txt").unwrap(), "v1");
        assert_eq!(contents(&store, "a.txt"), vec!["v1"]);
        assert_eq!(store.backend().save_count(), 1);
    }

    #[test]
    fn dotted_prefix_names_the_same_file() {
        let (_temp, mut store) = setup();
        store.write("./a.txt", "v1", true).unwrap();
        store.clock().advance_secs(1);
        store.write("./a.txt", "v2", true).unwrap();
        store.clock().advance_secs(1);
        store.write("a.txt", "v3", true).unwrap();

        assert_eq!(contents(&store, "a.txt"), vec!["v1", "v2", "v3"]);
        assert_eq!(contents(&store, "./a.txt"), vec!["v1", "v2", "v3"]);
        assert_eq!(store.history().len(), 1);

        let backups = store.list_backups(Some("./a.txt")).unwrap();
        assert_eq!(backups.len(), 2);
        assert_eq!(backups.len(), store.list_backups(Some("a.txt")).unwrap().len());

        store.restore_version("./a.txt", 0).unwrap();
        assert_eq!(store.read("a.txt").unwrap(), "v1");
    }

    #[test]
    fn same_second_backup_replaces_earlier_one() {
        let (_temp, mut store) = setup();
        store.write("a.txt", "v1", true).unwrap();
        store.write("a.txt", "v2", true).unwrap();
        store.write("a.txt", "v3", true).unwrap();

        let backups = store.list_backups(Some("a.txt")).unwrap();
        assert_eq!(backups, vec!["a.txt.20240101_120000.bak"]);
        let backup_path = store.layout().backup_path(&backups[0]).unwrap();
        assert_eq!(fs::read_to_string(backup_path).unwrap(), "v2");
        // History still has every write
        assert_eq!(contents(&store, "a.txt"), vec!["v1", "v2", "v3"]);
    }

    #[test]
    fn open_picks_up_persisted_history() {
        let mut persisted = VersionHistory::new();
        persisted.append("a.txt", VersionRecord::new("2023-12-31T09:00:00.000000", "old"));

        let temp = TempDir::new().unwrap();
        let mut store = VersionedStore::with_backend(
            temp.path(),
            &BuilderConfig::default(),
            MemHistory::with_history(persisted),
            ManualClock::default(),
        )
        .unwrap();

        assert_eq!(contents(&store, "a.txt"), vec!["old"]);
        store.restore_version("a.txt", 0).unwrap();
        assert_eq!(store.read("a.txt").unwrap(), "old");

        store.write("a.txt", "new", true).unwrap();
        assert_eq!(store.backend().saved().versions("a.txt").len(), 2);
    }

    #[test]
    fn n_writes_give_n_versions() {
        let (_temp, mut store) = setup();
        for i in 0..5 {
            store.clock().advance_secs(1);
            store.write("a.txt", &format!("v{}", i), true).unwrap();
        }
        let versions = store.get_versions("a.txt");
        assert_eq!(versions.len(), 5);
        assert_eq!(versions[4].content, store.read("a.txt").unwrap());
        assert_eq!(store.backend().saved(), *store.history());
    }

    #[test]
    fn scenario_two_writes_one_backup() {
        let (_temp, mut store) = setup();
        store.write("a.txt", "v1", true).unwrap();
        store.clock().advance_secs(1);
        store.write("a.txt", "v2", true).unwrap();

        assert_eq!(contents(&store, "a.txt"), vec!["v1", "v2"]);
        let backups = store.list_backups(Some("a.txt")).unwrap();
        assert_eq!(backups, vec!["a.txt.20240101_120001.bak"]);
        assert_eq!(store.read("a.txt").unwrap(), "v2");

        let backup_path = store.layout().backup_path(&backups[0]).unwrap();
        assert_eq!(fs::read_to_string(backup_path).unwrap(), "v1");
    }

    #[test]
    fn write_without_backup_creates_none() {
        let (_temp, mut store) = setup();
        store.write("a.txt", "v1", true).unwrap();
        store.clock().advance_secs(1);
        store.write("a.txt", "v2", false).unwrap();
        assert!(store.list_backups(Some("a.txt")).unwrap().is_empty());
    }

    #[test]
    fn first_write_takes_no_backup() {
        let (_temp, mut store) = setup();
        store.write("a.txt", "v1", true).unwrap();
        assert!(store.list_backups(None).unwrap().is_empty());
    }

    #[test]
    fn each_overwrite_adds_exactly_one_backup() {
        let (_temp, mut store) = setup();
        store.write("a.txt", "v1", true).unwrap();
        for i in 2..=4 {
            store.clock().advance_secs(1);
            let before = store.list_backups(Some("a.txt")).unwrap().len();
            store.write("a.txt", &format!("v{}", i), true).unwrap();
            let after = store.list_backups(Some("a.txt")).unwrap().len();
            assert_eq!(after, before + 1);
        }
    }

    #[test]
    fn backup_of_missing_file_is_none() {
        let (_temp, store) = setup();
        assert!(store.backup("ghost.txt").unwrap().is_none());
        assert!(store.list_backups(None).unwrap().is_empty());
    }

    #[test]
    fn backup_name_uses_second_stamp() {
        let (_temp, mut store) = setup();
        store.write("notes.txt", "draft", true).unwrap();
        let path = store.backup("notes.txt").unwrap().unwrap();
        assert!(path.ends_with("backups/notes.txt.20240101_120000.bak"));
    }

    #[test]
    fn list_backups_filters_by_prefix() {
        let (_temp, mut store) = setup();
        store.write("a.txt", "a", true).unwrap();
        store.write("ab.txt", "ab", true).unwrap();
        store.backup("a.txt").unwrap();
        store.backup("ab.txt").unwrap();

        assert_eq!(
            store.list_backups(Some("a.txt")).unwrap(),
            vec!["a.txt.20240101_120000.bak"]
        );
        assert_eq!(store.list_backups(None).unwrap().len(), 2);
    }

    #[test]
    fn list_backups_reports_nested_names() {
        let (_temp, mut store) = setup();
        store.write("output/index.html", "v1", true).unwrap();
        store.clock().advance_secs(1);
        store.write("output/index.html", "v2", true).unwrap();

        assert_eq!(
            store.list_backups(Some("output/index.html")).unwrap(),
            vec!["output/index.html.20240101_120001.bak"]
        );
    }

    #[test]
    fn restore_backup_targets_text_before_first_dot() {
        let (temp, mut store) = setup();
        store.write("notes", "first", true).unwrap();
        store.clock().advance_secs(1);
        store.write("notes", "second", true).unwrap();
        let backup = store.list_backups(Some("notes")).unwrap().remove(0);

        let restored = store.restore_backup(&backup).unwrap();

        assert_eq!(restored, temp.path().join("notes"));
        assert_eq!(store.read("notes").unwrap(), "first");
        // Restoring a backup is not a recorded write
        assert_eq!(contents(&store, "notes"), vec!["first", "second"]);
    }

    #[test]
    fn restore_backup_of_dotted_name_writes_stem() {
        let (temp, mut store) = setup();
        store.write("a.txt", "v1", true).unwrap();
        let backup = store.backup("a.txt").unwrap().unwrap();
        let name = backup.file_name().unwrap().to_str().unwrap().to_string();

        let restored = store.restore_backup(&name).unwrap();

        assert_eq!(restored, temp.path().join("a"));
        assert_eq!(store.read("a").unwrap(), "v1");
    }

    #[test]
    fn restore_missing_backup_fails() {
        let (_temp, store) = setup();
        let err = store.restore_backup("nope.txt.20240101_000000.bak").unwrap_err();
        assert!(matches!(err, BuilderError::BackupNotFound(_)));
        assert!(err.is_io());
    }

    #[test]
    fn restore_version_sets_historical_content() {
        let (_temp, mut store) = setup();
        store.write("a.txt", "v1", true).unwrap();
        store.clock().advance_secs(1);
        store.write("a.txt", "v2", true).unwrap();
        let backups_before = store.list_backups(None).unwrap().len();

        store.restore_version("a.txt", 0).unwrap();

        assert_eq!(store.read("a.txt").unwrap(), "v1");
        assert_eq!(contents(&store, "a.txt"), vec!["v1", "v2"]);
        assert_eq!(store.list_backups(None).unwrap().len(), backups_before);
    }

    #[test]
    fn restore_version_can_be_recorded() {
        let config = BuilderConfig {
            record_restored_versions: true,
            ..BuilderConfig::default()
        };
        let (_temp, mut store) = setup_with(config);
        store.write("a.txt", "v1", true).unwrap();
        store.write("a.txt", "v2", true).unwrap();

        store.restore_version("a.txt", 0).unwrap();

        assert_eq!(contents(&store, "a.txt"), vec!["v1", "v2", "v1"]);
        assert_eq!(store.read("a.txt").unwrap(), "v1");
    }

    #[test]
    fn restore_version_out_of_range_leaves_file() {
        let (_temp, mut store) = setup();
        store.write("a.txt", "v1", true).unwrap();

        let err = store.restore_version("a.txt", 1).unwrap_err();
        assert!(err.is_range());
        assert!(matches!(
            err,
            BuilderError::VersionOutOfRange { index: 1, len: 1, .. }
        ));
        assert_eq!(store.read("a.txt").unwrap(), "v1");
    }

    #[test]
    fn restore_version_without_history_is_range_error() {
        let (_temp, mut store) = setup();
        let err = store.restore_version("a.txt", 0).unwrap_err();
        assert!(matches!(err, BuilderError::NoHistory(_)));
        assert!(!store.exists("a.txt"));
    }

    #[test]
    fn failed_flush_rolls_back_append() {
        let (_temp, mut store) = setup();
        store.write("a.txt", "v1", true).unwrap();

        store.backend().set_simulate_write_error(true);
        assert!(store.write("a.txt", "v2", true).is_err());
        assert!(store.write("b.txt", "b1", true).is_err());

        assert_eq!(contents(&store, "a.txt"), vec!["v1"]);
        assert!(!store.history().contains("b.txt"));

        store.backend().set_simulate_write_error(false);
        store.write("a.txt", "v3", true).unwrap();
        assert_eq!(contents(&store, "a.txt"), vec!["v1", "v3"]);
    }

    #[test]
    fn history_survives_reopen() {
        let temp = TempDir::new().unwrap();
        let config = BuilderConfig::default();
        {
            let mut store = FileStore::open(temp.path(), &config).unwrap();
            store.write("index.html", "<p>one</p>", true).unwrap();
            store.write("index.html", "<p>two</p>", true).unwrap();
        }
        assert!(temp.path().join("versions/version_history.json").is_file());

        let store = FileStore::open(temp.path(), &config).unwrap();
        let versions = store.get_versions("index.html");
        assert_eq!(versions.len(), 2);
        assert_eq!(versions[1].content, "<p>two</p>");
    }

    #[test]
    fn timestamps_come_from_clock() {
        let (_temp, mut store) = setup();
        store.write("a.txt", "v1", true).unwrap();
        assert_eq!(
            store.get_versions("a.txt")[0].timestamp,
            "2024-01-01T12:00:00.000000"
        );
    }

    #[test]
    fn artifact_sink_writes_with_backup() {
        let (_temp, mut store) = setup();
        store.save_artifact("style.css", "a{}").unwrap();
        store.clock().advance_secs(1);
        store.save_artifact("style.css", "b{}").unwrap();
        assert_eq!(store.list_backups(Some("style.css")).unwrap().len(), 1);
    }
}
