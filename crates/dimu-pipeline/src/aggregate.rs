//! Single-threaded merge of per-task accumulators.
//!
//! Runs strictly after the scheduler's barrier. Each per-task set
//! contributes disjoint sample keys (one task per sample), so the merge
//! is a plain union per category: tallies move into the aggregate in
//! collect order, no numeric accumulation across samples.

use dimu_core::{Error, Result};
use dimu_select::CategorySet;

/// Fold all per-task category sets into one aggregate, consuming them
/// in the order the scheduler returned them.
pub fn merge(sets: Vec<CategorySet>) -> Result<CategorySet> {
    let mut iter = sets.into_iter();
    let mut aggregate = iter
        .next()
        .ok_or_else(|| Error::Sample("no category sets to merge".into()))?;
    for set in iter {
        aggregate.absorb(set)?;
    }
    Ok(aggregate)
}
