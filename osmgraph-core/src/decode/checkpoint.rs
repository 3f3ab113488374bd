//! Periodic checkpoints for long passes.
//!
//! Every `interval` primitives the pass hands a [`CheckpointStats`] snapshot
//! to a [`CheckpointHook`]. Callers plug arena resets, allocator purges or
//! progress reporting in there.

use std::time::{Duration, Instant};

use log::info;

/// Default number of primitives between checkpoints.
pub const DEFAULT_CHECKPOINT_INTERVAL: u64 = 1_000_000;

/// Progress snapshot handed to a [`CheckpointHook`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckpointStats {
    /// Primitives consumed so far, skipped ones included.
    pub primitives: u64,
    /// Nodes delivered so far.
    pub nodes: u64,
    /// Ways delivered so far.
    pub ways: u64,
    /// Relations delivered so far.
    pub relations: u64,
    /// Distinct users interned so far.
    pub users: usize,
    /// Wall time since the previous checkpoint (or the start of the pass).
    pub elapsed: Duration,
}

/// Callback run at every checkpoint.
pub trait CheckpointHook {
    /// Observe progress. Must not affect the outcome of the pass.
    fn checkpoint(&mut self, stats: &CheckpointStats);
}

impl<F> CheckpointHook for F
where
    F: FnMut(&CheckpointStats),
{
    fn checkpoint(&mut self, stats: &CheckpointStats) {
        self(stats);
    }
}

/// Hook that logs progress at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogCheckpoint;

impl CheckpointHook for LogCheckpoint {
    fn checkpoint(&mut self, stats: &CheckpointStats) {
        info!(
            "Processed {} primitives ({} nodes, {} ways, {} relations, {} users) in {:?}",
            stats.primitives,
            stats.nodes,
            stats.ways,
            stats.relations,
            stats.users,
            stats.elapsed
        );
    }
}

/// Decides when a checkpoint is due and measures time between them.
#[derive(Debug)]
pub(crate) struct Governor {
    interval: u64,
    since_last: u64,
    last: Instant,
}

impl Governor {
    /// An `interval` of zero disables checkpoints.
    pub(crate) fn new(interval: u64) -> Self {
        Self {
            interval,
            since_last: 0,
            last: Instant::now(),
        }
    }

    /// Count one primitive; returns the elapsed time when a checkpoint is due.
    pub(crate) fn tick(&mut self) -> Option<Duration> {
        if self.interval == 0 {
            return None;
        }
        self.since_last += 1;
        if self.since_last < self.interval {
            return None;
        }
        self.since_last = 0;
        let now = Instant::now();
        let elapsed = now.duration_since(self.last);
        self.last = now;
        Some(elapsed)
    }
}
