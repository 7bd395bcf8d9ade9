//! Deadline scheduler - the external trigger for conflict resolution
//!
//! Nothing inside an event fires at its deadline; this poller asks the
//! ledger for due work on a fixed cadence and drains it. One `step` is a
//! single sweep (expiry plus batch resolution), which is what tests and
//! scripted demos call directly; `run` wraps it in a tokio interval loop
//! until shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;

use crate::conflict::ledger::ConflictLedger;
use crate::conflict::outcome::ConflictOutcome;
use crate::conflict::stats::{SnapshotSource, StatsSource};
use crate::core::types::ConflictId;
use crate::core::Clock;

pub struct ResolutionScheduler {
    ledger: Arc<ConflictLedger>,
    clock: Arc<dyn Clock>,
    stats: Arc<dyn StatsSource>,
    snapshots: Arc<dyn SnapshotSource>,
    poll_interval: Duration,
}

impl ResolutionScheduler {
    pub fn new(
        ledger: Arc<ConflictLedger>,
        clock: Arc<dyn Clock>,
        stats: Arc<dyn StatsSource>,
        snapshots: Arc<dyn SnapshotSource>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            ledger,
            clock,
            stats,
            snapshots,
            poll_interval,
        }
    }

    /// One sweep: expire stalled recruitment, resolve everything due
    pub fn step(&self) -> Vec<(ConflictId, ConflictOutcome)> {
        let now = self.clock.now();
        let resolved = self.ledger.resolve_due(&*self.stats, &*self.snapshots, now);
        if !resolved.is_empty() {
            tracing::info!(count = resolved.len(), "scheduler sweep resolved conflicts");
        }
        resolved
    }

    /// Poll until the shutdown signal arrives
    ///
    /// Returns every outcome produced while running, in sweep order.
    pub async fn run(&self, mut shutdown: oneshot::Receiver<()>) -> Vec<(ConflictId, ConflictOutcome)> {
        let mut interval = tokio::time::interval(self.poll_interval);
        let mut all = Vec::new();
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    all.extend(self.step());
                }
                _ = &mut shutdown => {
                    // Final sweep so nothing due at shutdown is stranded
                    all.extend(self.step());
                    return all;
                }
            }
        }
    }
}
