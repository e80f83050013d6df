//! Petition progress statistics.

use signvote_store::{SignatureStore, StoreError};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Default signature goal.
pub const DEFAULT_TARGET: u32 = 667;

/// Live progress toward the signature goal.
#[derive(Debug, Clone, PartialEq)]
pub struct PetitionStats {
    pub total: u64,
    pub target: u32,
    /// Percent of target, one decimal place, at most 100
    pub progress: f64,
}

/// Counts signatures against a fixed target.
#[derive(Clone)]
pub struct StatsAggregator {
    store: Arc<dyn SignatureStore>,
    target: NonZeroU32,
}

impl StatsAggregator {
    pub fn new(store: Arc<dyn SignatureStore>, target: NonZeroU32) -> Self {
        Self { store, target }
    }

    /// Recount and compute progress.
    pub async fn stats(&self) -> Result<PetitionStats, StoreError> {
        let total = self.store.count().await?;
        Ok(PetitionStats {
            total,
            target: self.target.get(),
            progress: compute_progress(total, self.target),
        })
    }
}

/// `min(round(total / target * 100, 1 decimal), 100)`, rounding halves up.
pub fn compute_progress(total: u64, target: NonZeroU32) -> f64 {
    let percent = total as f64 / f64::from(target.get()) * 100.0;
    let rounded = (percent * 10.0).round() / 10.0;
    rounded.min(100.0)
}
