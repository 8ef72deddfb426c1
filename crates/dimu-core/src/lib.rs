//! # dimu-core
//!
//! Core building blocks for dimucat: the event data model, the error
//! type shared across crates, and the `Direction` trait that lets the
//! geometric routines stay generic over muons, electrons, jets, and
//! dimuon candidates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use traits::{delta_phi, delta_r, Direction};
pub use types::{DimuonCandidate, Electron, EventId, EventRecord, Jet, Muon};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
