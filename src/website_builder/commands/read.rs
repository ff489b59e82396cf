use crate::clock::Clock;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::history::HistoryBackend;
use crate::store::VersionedStore;

pub fn run<H: HistoryBackend, C: Clock>(
    store: &VersionedStore<H, C>,
    filename: &str,
) -> Result<CmdResult> {
    let content = store.read(filename)?;
    Ok(CmdResult::default().with_content(content))
}

pub fn exists<H: HistoryBackend, C: Clock>(
    store: &VersionedStore<H, C>,
    filename: &str,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if store.exists(filename) {
        result.add_message(CmdMessage::success(format!("{} exists", filename)));
    } else {
        result.add_message(CmdMessage::warning(format!("{} does not exist", filename)));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::test_utils::TestEnv;

    #[test]
    fn returns_live_content() {
        let mut env = TestEnv::new();
        env.store.write("a.txt", "hello", true).unwrap();
        let res = run(&env.store, "a.txt").unwrap();
        assert_eq!(res.content.as_deref(), Some("hello"));
    }

    #[test]
    fn missing_file_errors() {
        let env = TestEnv::new();
        assert!(run(&env.store, "a.txt").unwrap_err().is_io());
    }

    #[test]
    fn exists_uses_message_level() {
        let mut env = TestEnv::new();
        let res = exists(&env.store, "a.txt").unwrap();
        assert!(matches!(res.messages[0].level, MessageLevel::Warning));

        env.store.write("a.txt", "hello", true).unwrap();
        let res = exists(&env.store, "a.txt").unwrap();
        assert!(matches!(res.messages[0].level, MessageLevel::Success));
    }
}
