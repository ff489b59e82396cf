use crate::clock::Clock;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::history::HistoryBackend;
use crate::store::VersionedStore;

pub fn create<H: HistoryBackend, C: Clock>(
    store: &VersionedStore<H, C>,
    filename: &str,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match store.backup(filename)? {
        Some(path) => {
            result.add_message(CmdMessage::success(format!(
                "Backed up {} to {}",
                filename,
                path.display()
            )));
            result.paths.push(path);
        }
        None => result.add_message(CmdMessage::info(format!(
            "{} does not exist, nothing to back up",
            filename
        ))),
    }
    Ok(result)
}

pub fn list<H: HistoryBackend, C: Clock>(
    store: &VersionedStore<H, C>,
    filename: Option<&str>,
) -> Result<CmdResult> {
    let mut names = store.list_backups(filename)?;
    // Stamps sort chronologically within a file; enumeration order does not
    names.sort();

    let mut result = CmdResult::default();
    if names.is_empty() {
        result.add_message(CmdMessage::info("No backups found."));
    }
    Ok(result.with_backups(names))
}

pub fn restore<H: HistoryBackend, C: Clock>(
    store: &VersionedStore<H, C>,
    backup_name: &str,
) -> Result<CmdResult> {
    let path = store.restore_backup(backup_name)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Restored {} to {}",
        backup_name,
        path.display()
    )));
    Ok(result.with_paths(vec![path]))
}
