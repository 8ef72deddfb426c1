//! # dimu-pipeline
//!
//! The parallel per-sample categorization-and-merge pipeline: sample
//! descriptors with pluggable event sources, a bounded worker pool
//! running one categorization task per sample, and the single-threaded
//! aggregator that folds the per-task results into one deterministic
//! aggregate.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregate;
pub mod sample;
pub mod scheduler;

pub use aggregate::merge;
pub use sample::{EventSource, InMemoryEvents, Sample};
pub use scheduler::Scheduler;
