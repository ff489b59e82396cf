use crate::clock::Clock;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::history::HistoryBackend;
use crate::store::VersionedStore;

pub fn run<H: HistoryBackend, C: Clock>(
    store: &mut VersionedStore<H, C>,
    filename: &str,
    content: &str,
    backup: bool,
) -> Result<CmdResult> {
    let backed_up = backup && store.exists(filename);
    let path = store.write(filename, content, backup)?;
    let version = store.get_versions(filename).len();

    let mut result = CmdResult::default().with_paths(vec![path]);
    if backed_up {
        result.add_message(CmdMessage::info(format!(
            "Backed up previous {}",
            filename
        )));
    }
    result.add_message(CmdMessage::success(format!(
        "Wrote {} (version {})",
        filename, version
    )));
    Ok(result)
}
