use crate::clock::Clock;
use crate::commands::{CmdMessage, CmdResult, ListedVersion};
use crate::error::Result;
use crate::store::history::HistoryBackend;
use crate::store::VersionedStore;

pub fn list<H: HistoryBackend, C: Clock>(
    store: &VersionedStore<H, C>,
    filename: &str,
) -> Result<CmdResult> {
    let versions: Vec<ListedVersion> = store
        .get_versions(filename)
        .iter()
        .enumerate()
        .map(|(index, record)| ListedVersion {
            index,
            timestamp: record.timestamp.clone(),
            content: record.content.clone(),
        })
        .collect();

    let mut result = CmdResult::default();
    if versions.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "No versions recorded for {}",
            filename
        )));
    }
    Ok(result.with_versions(versions))
}

pub fn restore<H: HistoryBackend, C: Clock>(
    store: &mut VersionedStore<H, C>,
    filename: &str,
    index: usize,
) -> Result<CmdResult> {
    let path = store.restore_version(filename, index)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Restored {} to version {}",
        filename, index
    )));
    Ok(result.with_paths(vec![path]))
}
