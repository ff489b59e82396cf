//! # Storage Layer
//!
//! The versioned output store persists generated artifacts and keeps two
//! independent recovery paths for them:
//!
//! - **Backups**: raw timestamped copies taken right before a file is
//!   overwritten. Cheap, unindexed, never pruned.
//! - **Version history**: every successful write appends a
//!   [`VersionRecord`](crate::model::VersionRecord) for the file, so any
//!   earlier state can be restored by position.
//!
//! ## Storage Format
//!
//! ```text
//! output/
//! ├── config.json                 # Store configuration (optional)
//! ├── html/ css/ js/              # Typed content folders, created eagerly
//! ├── index.html ...              # Live artifacts
//! ├── backups/
//! │   └── index.html.20240101_120000.bak
//! └── versions/
//!     └── version_history.json    # { filename: [{timestamp, content}, ...] }
//! ```
//!
//! ## Implementations
//!
//! [`versioned::VersionedStore`] is generic over where history is kept
//! ([`history::HistoryBackend`]) and where time comes from
//! ([`Clock`](crate::clock::Clock)):
//!
//! - [`json_history::JsonHistoryFile`]: production, one JSON document
//!   rewritten on every mutation
//! - [`mem_history::MemHistory`]: in-memory, for tests, can simulate
//!   flush failures
//!
//! The store is single-writer. Nothing here locks; two processes writing
//! the same output root can interleave backups or clobber the history
//! document.

use crate::error::Result;
use std::path::PathBuf;

pub mod atomic;
pub mod history;
pub mod json_history;
pub mod layout;
pub mod mem_history;
pub mod versioned;

pub use versioned::{FileStore, VersionedStore};

/// Anything generated artifacts can be persisted into.
///
/// The pipeline only needs this much of the store, which keeps it usable
/// with other sinks in tests.
pub trait ArtifactSink {
    /// Persist `content` under `filename`, returning where it landed.
    fn save_artifact(&mut self, filename: &str, content: &str) -> Result<PathBuf>;
}
