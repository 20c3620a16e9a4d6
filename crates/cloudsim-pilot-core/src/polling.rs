//! Periodic polling of a remote resource
//!
//! A [`PollingController`] owns one [`ResourceSnapshot`] and keeps it in
//! step with a [`ResourceSource`]. Reads run on spawned tokio tasks and
//! report back over a channel; the owner applies them with
//! [`PollingController::pump`] (once per UI tick) or
//! [`PollingController::settle`], so the snapshot has a single writer.

use crate::errors::{categorize_error, format_sim_error};
use crate::snapshot::{Commit, ResourceSnapshot};
use async_trait::async_trait;
use cloudsim_rs::SimError;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Something that can be read periodically
#[async_trait]
pub trait ResourceSource: Send + Sync + 'static {
    /// Value stored in the snapshot
    type Output: Send + 'static;

    /// Short resource name for logs ("files", "messages")
    const RESOURCE: &'static str;

    /// Shown when a read fails without a server-provided message
    const FAILURE_MESSAGE: &'static str;

    async fn fetch(&self) -> Result<Self::Output, SimError>;
}

#[derive(Debug)]
enum PollEvent<T> {
    /// The ticker issued read `seq`
    Issued { epoch: u64, seq: u64 },
    /// Read `seq` finished
    Resolved {
        epoch: u64,
        seq: u64,
        result: Result<T, String>,
    },
}

/// Spawn a single read and report its result on `tx`
fn spawn_read<S: ResourceSource>(
    source: Arc<S>,
    tx: mpsc::UnboundedSender<PollEvent<S::Output>>,
    epoch: u64,
    seq: u64,
) {
    tokio::spawn(async move {
        let result = match source.fetch().await {
            Ok(data) => Ok(data),
            Err(e) => {
                tracing::warn!(
                    category = categorize_error(&e).label(),
                    "Failed to fetch {} (read {}): {}",
                    S::RESOURCE,
                    seq,
                    e
                );
                Err(format_sim_error(&e, S::FAILURE_MESSAGE))
            }
        };
        // The controller may be gone already; nothing to report to then.
        let _ = tx.send(PollEvent::Resolved { epoch, seq, result });
    });
}

/// Drives periodic reads of one resource into its snapshot
pub struct PollingController<S: ResourceSource> {
    source: Arc<S>,
    snapshot: ResourceSnapshot<S::Output>,
    tx: mpsc::UnboundedSender<PollEvent<S::Output>>,
    rx: mpsc::UnboundedReceiver<PollEvent<S::Output>>,
    /// Last sequence number handed out
    next_seq: Arc<AtomicU64>,
    /// Bumped on stop; events from older epochs are ignored
    epoch: u64,
    interval: Option<Duration>,
    ticker: Option<JoinHandle<()>>,
}

impl<S: ResourceSource> PollingController<S> {
    pub fn new(source: S, initial: S::Output) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source: Arc::new(source),
            snapshot: ResourceSnapshot::new(initial),
            tx,
            rx,
            next_seq: Arc::new(AtomicU64::new(0)),
            epoch: 0,
            interval: None,
            ticker: None,
        }
    }

    /// Begin polling: one read now, then one every `interval`
    ///
    /// Calling `start` while running restarts the timer with the new
    /// interval; reads already in flight still commit.
    ///
    /// Timer reads are issued on the ticker task. They count as
    /// outstanding in the snapshot (and `is_loading` turns on) only once
    /// the owner's next [`pump`](Self::pump) applies their issue event.
    /// [`reads_issued`](Self::reads_issued) sees them immediately.
    pub fn start(&mut self, interval: Duration) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let next_seq = Arc::clone(&self.next_seq);
        let epoch = self.epoch;

        self.ticker = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let seq = next_seq.fetch_add(1, Ordering::SeqCst) + 1;
                if tx.send(PollEvent::Issued { epoch, seq }).is_err() {
                    break;
                }
                spawn_read(Arc::clone(&source), tx.clone(), epoch, seq);
            }
        }));
        self.interval = Some(interval);

        tracing::info!(
            "{} poller started (every {}ms)",
            S::RESOURCE,
            interval.as_millis()
        );
    }

    /// Stop polling
    ///
    /// No further timer reads are issued. Reads already in flight run to
    /// completion but their results are ignored.
    pub fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
            tracing::info!("{} poller stopped", S::RESOURCE);
        }
        self.epoch += 1;
        self.snapshot.abandon_outstanding();
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    /// Interval of the running timer, if any
    pub fn interval(&self) -> Option<Duration> {
        self.ticker.as_ref().and(self.interval)
    }

    /// Issue an out-of-band read without touching the timer schedule
    ///
    /// Returns the sequence number of the new read.
    pub fn refresh_now(&mut self) -> u64 {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.snapshot.mark_issued(seq);
        spawn_read(Arc::clone(&self.source), self.tx.clone(), self.epoch, seq);
        tracing::debug!("{} refresh requested (read {})", S::RESOURCE, seq);
        seq
    }

    /// Apply every completion that has arrived, without waiting
    ///
    /// Returns the number of events applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.rx.try_recv() {
            if self.apply(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait until no read is outstanding, applying completions as they come
    pub async fn settle(&mut self) {
        self.pump();
        while self.snapshot.is_loading() {
            match self.rx.recv().await {
                Some(event) => {
                    self.apply(event);
                }
                None => break,
            }
        }
    }

    fn apply(&mut self, event: PollEvent<S::Output>) -> bool {
        match event {
            PollEvent::Issued { epoch, seq } => {
                if epoch != self.epoch {
                    return false;
                }
                self.snapshot.mark_issued(seq);
                true
            }
            PollEvent::Resolved { epoch, seq, result } => {
                if epoch != self.epoch {
                    tracing::debug!("Ignoring {} read {} from a stopped poller", S::RESOURCE, seq);
                    return false;
                }
                if self.snapshot.resolve(seq, result) == Commit::Applied {
                    tracing::debug!("Committed {} read {}", S::RESOURCE, seq);
                }
                true
            }
        }
    }

    pub fn snapshot(&self) -> &ResourceSnapshot<S::Output> {
        &self.snapshot
    }

    pub fn snapshot_mut(&mut self) -> &mut ResourceSnapshot<S::Output> {
        &mut self.snapshot
    }

    /// Number of reads issued so far (timer and manual)
    pub fn reads_issued(&self) -> u64 {
        self.next_seq.load(Ordering::SeqCst)
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: ResourceSource> Drop for PollingController<S> {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}
