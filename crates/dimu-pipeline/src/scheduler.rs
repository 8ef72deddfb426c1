//! Bounded worker-pool scheduling of per-sample categorization tasks.
//!
//! One task per sample, each with its own freshly constructed selector
//! and accumulator; nothing mutable is shared across tasks. The ordered
//! parallel collect is the run's single synchronization barrier:
//! results come back in submission order whatever the worker count,
//! and the first failing task aborts the whole run with no partial
//! results.

use dimu_core::Result;
use dimu_select::{CategorySet, EventSelector};
use rayon::prelude::*;

use crate::sample::Sample;

/// Fixed-size worker pool running one categorization task per sample.
pub struct Scheduler {
    pool: rayon::ThreadPool,
    reduction: usize,
}

impl Scheduler {
    /// Build a scheduler with `threads` workers (minimum 1; 1 is fully
    /// sequential and the deterministic-parity default).
    pub fn new(threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .build()
            .map_err(|e| dimu_core::Error::Config(format!("building worker pool: {}", e)))?;
        Ok(Self { pool, reduction: 1 })
    }

    /// Debug subsampling: process only `len / reduction` events of each
    /// sample.
    pub fn with_reduction(mut self, reduction: usize) -> Self {
        self.reduction = reduction.max(1);
        self
    }

    /// Run one task per sample and collect the per-task accumulators in
    /// submission order. The factory builds a fresh selector inside
    /// each task, so selector state is never shared.
    pub fn run<F>(&self, samples: &[Sample], factory: F) -> Result<Vec<CategorySet>>
    where
        F: Fn() -> Result<EventSelector> + Sync,
    {
        let reduction = self.reduction;
        self.pool.install(|| {
            samples
                .par_iter()
                .map(|sample| process_sample(sample, &factory, reduction))
                .collect::<Result<Vec<_>>>()
        })
    }
}

/// One task: iterate every event of the sample exactly once, in index
/// order, recording into a task-owned accumulator.
fn process_sample<F>(sample: &Sample, factory: &F, reduction: usize) -> Result<CategorySet>
where
    F: Fn() -> Result<EventSelector> + Sync,
{
    let mut selector = factory()?;
    let mut set = selector.category_set();

    let n = sample.len() / reduction;
    let mut n_passed = 0u64;
    for i in 0..n {
        let event = sample.source.get(i)?;
        if selector.process_event(&sample.name, &event, &mut set)? {
            n_passed += 1;
        }
    }

    tracing::info!(sample = %sample.name, events = n, passed = n_passed, "sample processed");
    Ok(set)
}
