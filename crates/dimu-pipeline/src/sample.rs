//! Sample descriptors and event sources.
//!
//! A `Sample` is one logical batch of events sharing provenance: a
//! simulated process or a data-taking period. The descriptor is built
//! once before dispatch and read-only afterwards; events themselves
//! come through the [`EventSource`] seam so storage and decoding stay
//! outside the pipeline.

use dimu_core::{EventRecord, Result};
use std::sync::Arc;

/// Random-access supply of event records for one sample.
pub trait EventSource: Send + Sync {
    /// Number of events available.
    fn len(&self) -> usize;

    /// Whether the source holds no events.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch event `i`. An error here is corrupt sample data and is
    /// fatal for the task processing the sample.
    fn get(&self, i: usize) -> Result<EventRecord>;
}

/// Event source backed by a decoded in-memory collection.
pub struct InMemoryEvents {
    events: Vec<EventRecord>,
}

impl InMemoryEvents {
    /// Wrap a decoded event collection.
    pub fn new(events: Vec<EventRecord>) -> Self {
        Self { events }
    }
}

impl EventSource for InMemoryEvents {
    fn len(&self) -> usize {
        self.events.len()
    }

    fn get(&self, i: usize) -> Result<EventRecord> {
        self.events
            .get(i)
            .cloned()
            .ok_or_else(|| dimu_core::Error::Event(format!("event index {} out of range", i)))
    }
}

/// Immutable descriptor of one sample.
#[derive(Clone)]
pub struct Sample {
    /// Sample name, the key under which results accumulate.
    pub name: String,
    /// Real-data sample (as opposed to simulation).
    pub is_data: bool,
    /// Cross-section weight; reporting metadata only, never consulted
    /// by categorization.
    pub xsec: f64,
    /// The events.
    pub source: Arc<dyn EventSource>,
}

impl Sample {
    /// Build a sample over an in-memory event collection.
    pub fn in_memory(
        name: impl Into<String>,
        is_data: bool,
        xsec: f64,
        events: Vec<EventRecord>,
    ) -> Self {
        Self { name: name.into(), is_data, xsec, source: Arc::new(InMemoryEvents::new(events)) }
    }

    /// Number of events in the sample.
    pub fn len(&self) -> usize {
        self.source.len()
    }

    /// Whether the sample holds no events.
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }
}

impl std::fmt::Debug for Sample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sample")
            .field("name", &self.name)
            .field("is_data", &self.is_data)
            .field("xsec", &self.xsec)
            .field("events", &self.len())
            .finish()
    }
}
