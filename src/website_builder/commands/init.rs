use crate::clock::Clock;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::history::HistoryBackend;
use crate::store::VersionedStore;

/// Opening the store already created the tree; report what is there.
pub fn run<H: HistoryBackend, C: Clock>(store: &VersionedStore<H, C>) -> Result<CmdResult> {
    let mut result = CmdResult::default().with_paths(vec![store.root().to_path_buf()]);
    result.add_message(CmdMessage::success(format!(
        "Initialized output store at {}",
        store.root().display()
    )));
    result.add_message(CmdMessage::info(format!(
        "Version history: {}",
        store.backend().describe()
    )));
    Ok(result)
}
