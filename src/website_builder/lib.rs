//! # website-builder Architecture
//!
//! A static website (HTML, CSS, JS) is generated from a topic by a sequence
//! of tasks run by an external text-generation engine. This crate owns what
//! happens to the results: a **versioned output store** that writes each
//! artifact, keeps timestamped backups of what it overwrote, and records a
//! restorable history of every version.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Turns store results into `CmdResult` values              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)  +  Pipeline (pipeline.rs)          │
//! │  - VersionedStore over a HistoryBackend and a Clock         │
//! │  - Sequential tasks feeding an ArtifactSink                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! From `api.rs` inward nothing writes to stdout/stderr or exits the
//! process. Diagnostic events go through `tracing`; installing a subscriber
//! is left to the binary.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: One module per operation group
//! - [`store`]: The versioned store and its history backends
//! - [`pipeline`]: Task sequencing and the generator seam
//! - [`model`]: `VersionRecord`, `VersionHistory`, `ArtifactKind`
//! - [`clock`]: Timestamp source
//! - [`config`]: Store configuration
//! - [`error`]: Error types

pub mod api;
pub mod clock;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
