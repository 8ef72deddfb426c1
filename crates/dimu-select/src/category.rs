//! Category accumulators.
//!
//! A `CategorySet` is the per-task result: for each category, how many
//! events of each sample landed in it and which ones. The category
//! name set is fixed before processing starts; only the accumulators
//! change. Tallies keep insertion order so that the merged aggregate
//! is ordered by task submission, independent of worker count.

use dimu_core::{Error, EventId, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::categorizer::CategoryDef;

/// Per-sample accumulator inside one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleTally {
    /// Sample name.
    pub sample: String,
    /// Number of events recorded.
    pub count: u64,
    /// Identifiers of the recorded events, in processing order.
    pub events: Vec<EventId>,
}

/// A named analysis bucket with its per-sample accumulators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category name.
    pub name: String,
    /// Intermediate categories are excluded from final output.
    pub hide: bool,
    /// Per-sample accumulators, in insertion order.
    pub tallies: Vec<SampleTally>,
}

/// Fixed set of categories with mutable accumulators. Owned by exactly
/// one task while it runs; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet {
    categories: Vec<Category>,
    index: HashMap<String, usize>,
}

impl CategorySet {
    /// Build an empty set from category definitions, preserving
    /// definition order.
    pub fn from_defs(defs: &[CategoryDef]) -> Self {
        let categories: Vec<Category> = defs
            .iter()
            .map(|d| Category { name: d.name.clone(), hide: d.hide, tallies: Vec::new() })
            .collect();
        let index =
            categories.iter().enumerate().map(|(i, c)| (c.name.clone(), i)).collect();
        Self { categories, index }
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the set holds no categories.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Look up a category by name.
    pub fn get(&self, name: &str) -> Option<&Category> {
        self.index.get(name).map(|&i| &self.categories[i])
    }

    /// Iterate categories in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    /// Record one event into a category for a sample: bump the sample's
    /// count and append the event id.
    pub fn record(&mut self, name: &str, sample: &str, id: EventId) -> Result<()> {
        let i = *self
            .index
            .get(name)
            .ok_or_else(|| Error::Sample(format!("unknown category '{}'", name)))?;
        let category = &mut self.categories[i];
        match category.tallies.iter_mut().find(|t| t.sample == sample) {
            Some(tally) => {
                tally.count += 1;
                tally.events.push(id);
            }
            None => category.tallies.push(SampleTally {
                sample: sample.to_string(),
                count: 1,
                events: vec![id],
            }),
        }
        Ok(())
    }

    /// Fold another set's accumulators into this one, draining the
    /// other set's buffers. Both sets must describe the same category
    /// names, and no sample key may appear twice for one category.
    pub fn absorb(&mut self, mut other: CategorySet) -> Result<()> {
        if self.categories.len() != other.categories.len() {
            return Err(Error::Sample(format!(
                "cannot merge category sets of different sizes ({} vs {})",
                self.categories.len(),
                other.categories.len()
            )));
        }
        for (mine, theirs) in self.categories.iter_mut().zip(other.categories.iter_mut()) {
            if mine.name != theirs.name {
                return Err(Error::Sample(format!(
                    "category set mismatch: '{}' vs '{}'",
                    mine.name, theirs.name
                )));
            }
            for tally in theirs.tallies.drain(..) {
                if mine.tallies.iter().any(|t| t.sample == tally.sample) {
                    return Err(Error::Sample(format!(
                        "duplicate sample '{}' in category '{}'",
                        tally.sample, mine.name
                    )));
                }
                mine.tallies.push(tally);
            }
        }
        Ok(())
    }
}
