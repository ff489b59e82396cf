use super::history::HistoryBackend;
use crate::error::{BuilderError, Result};
use crate::model::VersionHistory;
use std::cell::{Cell, RefCell};
use std::io;

/// In-memory history backend for testing.
///
/// Uses `RefCell` for interior mutability since the store is single-threaded,
/// letting `HistoryBackend` keep `&self` methods.
#[derive(Default)]
pub struct MemHistory {
    saved: RefCell<VersionHistory>,
    saves: Cell<usize>,
    simulate_write_error: Cell<bool>,
}

impl MemHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already-persisted history.
    pub fn with_history(history: VersionHistory) -> Self {
        Self {
            saved: RefCell::new(history),
            ..Self::default()
        }
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// What the last successful save stored.
    pub fn saved(&self) -> VersionHistory {
        self.saved.borrow().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl HistoryBackend for MemHistory {
    fn load(&self) -> Result<VersionHistory> {
        Ok(self.saved.borrow().clone())
    }

    fn save(&self, history: &VersionHistory) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(BuilderError::io(
                "version_history.json",
                io::Error::other("simulated write error"),
            ));
        }
        *self.saved.borrow_mut() = history.clone();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
