use crate::error::Result;
use crate::model::VersionHistory;

/// Abstract interface for version history persistence.
///
/// The store keeps the whole history in memory and hands it back here after
/// every mutation. Backends decide how that is made durable; the store only
/// relies on `load` returning what the last successful `save` stored.
pub trait HistoryBackend {
    /// Load the full history. A backend with nothing stored yet returns an
    /// empty history, not an error.
    fn load(&self) -> Result<VersionHistory>;

    /// Persist the full history, replacing whatever was stored before.
    fn save(&self, history: &VersionHistory) -> Result<()>;

    /// Human-readable location, used in log events and `init` output.
    fn describe(&self) -> String;
}
