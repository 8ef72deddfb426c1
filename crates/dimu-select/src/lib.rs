//! # dimu-select
//!
//! Everything that decides where one event goes: the ΔR-based object
//! deduplication, the valid-object collections, the ordered selection
//! stages, the classifier-score collaborator, and the categorizers
//! that tag a passing event into analysis categories.
//!
//! The per-task entry point is [`selector::EventSelector`]: one
//! instance per worker task, fed one event at a time, recording into a
//! task-owned [`category::CategorySet`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod category;
pub mod categorizer;
pub mod cleaning;
pub mod cuts;
pub mod objects;
pub mod score;
pub mod selector;
pub mod state;

pub use category::{Category, CategorySet, SampleTally};
pub use categorizer::{BaselineCategorizer, Categorizer, CategoryDef, ConfigCategorizer};
pub use cleaning::clean_by_dr;
pub use selector::{EventSelector, SelectionConfig};
pub use state::EventState;
