//! cloudsim-pilot-core: Synchronization core for cloudsim-pilot
//!
//! This crate keeps local snapshots of the simulated bucket and queue in
//! step with the services. It is intentionally kept independent of any
//! TUI framework to enable:
//!
//! - Unit testing without UI dependencies
//! - Deterministic timer tests under paused tokio time
//! - Clear separation between synchronization and presentation
//!
//! # Modules
//!
//! - [`snapshot`] - Snapshot of a remote resource (data, loading, error)
//! - [`polling`] - Periodic reads with stale-result discard
//! - [`mutation`] - Send/delete followed by an immediate refresh
//! - [`sources`] - Simulator clients wired in as sources and writers
//! - [`classify`] - Identifier-like key detection
//! - [`formatting`] - Byte sizes, timestamps, token previews
//! - [`selection`] - Cursor over lists that are replaced on every poll
//! - [`errors`] - Error formatting utilities for user-friendly messages
//! - [`config`] - YAML configuration
//! - [`constants`] - Shared constants (refresh intervals, messages)

pub mod classify;
pub mod config;
pub mod constants;
pub mod errors;
pub mod formatting;
pub mod mutation;
pub mod polling;
pub mod selection;
pub mod snapshot;
pub mod sources;

// Re-export commonly used items at crate root
pub use classify::*;
pub use config::{ConfigError, PilotConfig, ThemeKind};
pub use errors::*;
pub use formatting::*;
pub use mutation::{Composer, MutationGateway, MutationOutcome, QueueWriter};
pub use polling::{PollingController, ResourceSource};
pub use selection::ListCursor;
pub use snapshot::{Commit, ResourceSnapshot, SyncStatus};
pub use sources::{BucketPoller, QueuePoller};
