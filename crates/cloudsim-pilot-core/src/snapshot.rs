//! Resource snapshot state
//!
//! One [`ResourceSnapshot`] per synchronized resource holds the data the
//! view renders together with the loading and error flags, so the
//! "never clear data on error" rule lives in exactly one place.

use std::time::{Duration, Instant};

/// Result of handing a resolved read to the snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// The read was the newest resolved so far and was applied
    Applied,
    /// A newer read already committed; the result was dropped
    Stale,
}

/// Local view of a remote resource
///
/// `data` always holds either the initial empty value or the value of the
/// most recent successful read. Failed reads and failed mutations only
/// touch `last_error`.
///
/// # Examples
///
/// ```
/// use cloudsim_pilot_core::snapshot::{Commit, ResourceSnapshot};
///
/// let mut snapshot: ResourceSnapshot<Vec<&str>> = ResourceSnapshot::default();
///
/// snapshot.mark_issued(1);
/// assert!(snapshot.is_loading());
///
/// assert_eq!(snapshot.resolve(1, Ok(vec!["a.txt"])), Commit::Applied);
/// assert!(!snapshot.is_loading());
///
/// snapshot.mark_issued(2);
/// snapshot.resolve(2, Err("Failed to connect to server".to_string()));
/// assert_eq!(snapshot.data(), &vec!["a.txt"]);
/// assert_eq!(snapshot.last_error(), Some("Failed to connect to server"));
/// ```
#[derive(Debug, Clone)]
pub struct ResourceSnapshot<T> {
    /// Last successfully fetched value (or the initial empty value)
    data: T,
    /// Reads issued but not yet resolved
    outstanding: usize,
    /// Message of the last failed read or mutation
    last_error: Option<String>,
    /// Sequence number of the newest read that has committed
    committed_seq: u64,
    /// Whether any read has ever succeeded
    loaded: bool,
    /// When data was last replaced
    last_refresh: Option<Instant>,
    /// Consecutive failed reads
    failures: u32,
}

impl<T: Default> Default for ResourceSnapshot<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> ResourceSnapshot<T> {
    /// Create a snapshot holding `initial` with nothing outstanding
    pub fn new(initial: T) -> Self {
        Self {
            data: initial,
            outstanding: 0,
            last_error: None,
            committed_seq: 0,
            loaded: false,
            last_refresh: None,
            failures: 0,
        }
    }

    /// Current data
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Whether a read is currently outstanding
    ///
    /// Reads count from [`mark_issued`](Self::mark_issued); for timer reads
    /// that happens when the controller is pumped.
    pub fn is_loading(&self) -> bool {
        self.outstanding > 0
    }

    /// Number of outstanding reads
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn has_error(&self) -> bool {
        self.last_error.is_some()
    }

    /// Whether any read has succeeded since creation
    pub fn has_loaded(&self) -> bool {
        self.loaded
    }

    /// Sequence number of the newest committed read (0 if none)
    pub fn committed_seq(&self) -> u64 {
        self.committed_seq
    }

    pub fn last_refresh(&self) -> Option<Instant> {
        self.last_refresh
    }

    /// Time since data was last replaced
    pub fn elapsed_since_refresh(&self) -> Option<Duration> {
        self.last_refresh.map(|t| t.elapsed())
    }

    /// Number of consecutive failed reads
    pub fn consecutive_failures(&self) -> u32 {
        self.failures
    }

    /// Record that read `seq` has been issued
    pub fn mark_issued(&mut self, seq: u64) {
        self.outstanding += 1;
        tracing::trace!(seq, outstanding = self.outstanding, "read issued");
    }

    /// Hand a resolved read to the snapshot
    ///
    /// The result is applied only if `seq` is newer than every read that
    /// committed before it; an older read resolving late is dropped.
    pub fn resolve(&mut self, seq: u64, result: Result<T, String>) -> Commit {
        self.outstanding = self.outstanding.saturating_sub(1);

        if seq <= self.committed_seq {
            tracing::debug!(seq, committed = self.committed_seq, "discarding stale read");
            return Commit::Stale;
        }
        self.committed_seq = seq;

        match result {
            Ok(data) => {
                self.data = data;
                self.last_error = None;
                self.loaded = true;
                self.failures = 0;
                self.last_refresh = Some(Instant::now());
            }
            Err(message) => {
                self.last_error = Some(message);
                self.failures += 1;
            }
        }
        Commit::Applied
    }

    /// Surface an error without touching data (used for failed mutations)
    pub fn set_error(&mut self, error: impl ToString) {
        self.last_error = Some(error.to_string());
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Forget all outstanding reads
    ///
    /// Called when the owning controller stops; reads still in flight will
    /// never be resolved into this snapshot.
    pub fn abandon_outstanding(&mut self) {
        self.outstanding = 0;
    }
}

/// Coarse status of a snapshot for status bars
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// First read still outstanding
    Loading,
    /// A read is outstanding while older data is displayed
    Refreshing,
    /// The last read or mutation failed
    Error,
    /// Data is current as of the last read
    Ready,
    /// Nothing issued yet
    Idle,
}

impl SyncStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SyncStatus::Loading => "Loading...",
            SyncStatus::Refreshing => "Refreshing...",
            SyncStatus::Error => "Error",
            SyncStatus::Ready => "Ready",
            SyncStatus::Idle => "Idle",
        }
    }
}

impl<T> ResourceSnapshot<T> {
    /// Status to show alongside the data
    pub fn status(&self) -> SyncStatus {
        if self.is_loading() && !self.loaded {
            SyncStatus::Loading
        } else if self.is_loading() {
            SyncStatus::Refreshing
        } else if self.last_error.is_some() {
            SyncStatus::Error
        } else if self.loaded {
            SyncStatus::Ready
        } else {
            SyncStatus::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_snapshot() {
        let snapshot: ResourceSnapshot<Vec<u32>> = ResourceSnapshot::default();
        assert!(!snapshot.is_loading());
        assert!(!snapshot.has_error());
        assert!(!snapshot.has_loaded());
        assert!(snapshot.data().is_empty());
        assert_eq!(snapshot.status(), SyncStatus::Idle);
    }

    #[test]
    fn test_success_replaces_data_and_clears_error() {
        let mut snapshot = ResourceSnapshot::new(0);
        snapshot.set_error("old failure");

        snapshot.mark_issued(1);
        assert_eq!(snapshot.resolve(1, Ok(42)), Commit::Applied);

        assert_eq!(*snapshot.data(), 42);
        assert!(!snapshot.has_error());
        assert!(!snapshot.is_loading());
        assert!(snapshot.last_refresh().is_some());
        assert_eq!(snapshot.committed_seq(), 1);
    }

    #[test]
    fn test_failure_preserves_data() {
        let mut snapshot = ResourceSnapshot::new(0);
        snapshot.mark_issued(1);
        snapshot.resolve(1, Ok(42));

        snapshot.mark_issued(2);
        snapshot.resolve(2, Err("Failed to connect to server".to_string()));

        assert_eq!(*snapshot.data(), 42);
        assert_eq!(snapshot.last_error(), Some("Failed to connect to server"));
        assert_eq!(snapshot.consecutive_failures(), 1);
        assert!(!snapshot.is_loading());

        snapshot.mark_issued(3);
        snapshot.resolve(3, Err("still down".to_string()));
        assert_eq!(snapshot.consecutive_failures(), 2);
    }

    #[test]
    fn test_older_read_resolving_late_is_discarded() {
        let mut snapshot = ResourceSnapshot::new("initial");
        snapshot.mark_issued(1);
        snapshot.mark_issued(2);
        assert!(snapshot.is_loading());

        assert_eq!(snapshot.resolve(2, Ok("newer")), Commit::Applied);
        assert!(snapshot.is_loading());

        assert_eq!(snapshot.resolve(1, Ok("older")), Commit::Stale);
        assert_eq!(*snapshot.data(), "newer");
        assert!(!snapshot.is_loading());
    }

    #[test]
    fn test_stale_error_does_not_mask_newer_success() {
        let mut snapshot = ResourceSnapshot::new(0);
        snapshot.mark_issued(1);
        snapshot.mark_issued(2);
        snapshot.resolve(2, Ok(7));
        snapshot.resolve(1, Err("timeout".to_string()));

        assert_eq!(*snapshot.data(), 7);
        assert!(!snapshot.has_error());
    }

    #[test]
    fn test_mutation_error_keeps_data() {
        let mut snapshot = ResourceSnapshot::new(vec!["m-1"]);
        snapshot.set_error("Failed to delete message");
        assert_eq!(snapshot.data(), &vec!["m-1"]);
        assert_eq!(snapshot.status(), SyncStatus::Error);

        snapshot.clear_error();
        assert!(!snapshot.has_error());
    }

    #[test]
    fn test_status_text() {
        let mut snapshot = ResourceSnapshot::new(0);
        snapshot.mark_issued(1);
        assert_eq!(snapshot.status(), SyncStatus::Loading);
        assert_eq!(snapshot.status().label(), "Loading...");

        snapshot.resolve(1, Ok(1));
        assert_eq!(snapshot.status(), SyncStatus::Ready);

        snapshot.mark_issued(2);
        assert_eq!(snapshot.status(), SyncStatus::Refreshing);

        snapshot.resolve(2, Err("Failed".to_string()));
        assert_eq!(snapshot.status(), SyncStatus::Error);
    }

    #[test]
    fn test_abandon_outstanding() {
        let mut snapshot = ResourceSnapshot::new(0);
        snapshot.mark_issued(1);
        snapshot.mark_issued(2);
        snapshot.abandon_outstanding();
        assert!(!snapshot.is_loading());
    }
}
