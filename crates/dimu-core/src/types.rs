//! Event data model for dimucat.
//!
//! These are plain value types filled by an upstream reader. Kinematic
//! quantities (candidate mass, pt) are computed upstream and carried
//! here as opaque numbers; the categorization core only projects
//! directions and reads selection flags.

use serde::{Deserialize, Serialize};

use crate::traits::Direction;

/// Globally unique key for one collision event: (run, event).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId {
    /// Data-taking run number.
    pub run: u32,
    /// Event number within the run.
    pub event: u64,
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.run, self.event)
    }
}

/// Reconstructed muon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Muon {
    /// Transverse momentum (GeV).
    pub pt: f64,
    /// Pseudorapidity.
    pub eta: f64,
    /// Azimuthal angle (radians).
    pub phi: f64,
    /// Electric charge (±1).
    pub charge: i32,
    /// Relative isolation.
    pub iso: f64,
    /// Loose identification-quality bit.
    pub is_loose_id: bool,
    /// Medium identification-quality bit.
    pub is_medium_id: bool,
}

/// Reconstructed electron.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Electron {
    /// Transverse momentum (GeV).
    pub pt: f64,
    /// Pseudorapidity.
    pub eta: f64,
    /// Azimuthal angle (radians).
    pub phi: f64,
    /// Identification working-point bit.
    pub passes_id: bool,
}

/// Reconstructed jet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jet {
    /// Transverse momentum (GeV).
    pub pt: f64,
    /// Pseudorapidity.
    pub eta: f64,
    /// Azimuthal angle (radians).
    pub phi: f64,
    /// b-tagging discriminant.
    pub btag: f64,
}

/// A pair of muons considered jointly as one decay-product candidate.
///
/// `i_mu1`/`i_mu2` index into the owning event's muon collection.
/// Composite kinematics are computed upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimuonCandidate {
    /// Index of the first muon.
    pub i_mu1: usize,
    /// Index of the second muon.
    pub i_mu2: usize,
    /// Invariant mass of the pair (GeV).
    pub mass: f64,
    /// Transverse momentum of the pair (GeV).
    pub pt: f64,
    /// Pseudorapidity of the pair.
    pub eta: f64,
    /// Azimuthal angle of the pair (radians).
    pub phi: f64,
}

/// One reconstructed event: its unique key, the dimuon candidates, and
/// the raw object collections the selection builds valid lists from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// Run/event identifier pair.
    pub id: EventId,
    /// Dimuon candidates, in reconstruction order.
    #[serde(default)]
    pub candidates: Vec<DimuonCandidate>,
    /// Raw muon collection.
    #[serde(default)]
    pub muons: Vec<Muon>,
    /// Raw electron collection.
    #[serde(default)]
    pub electrons: Vec<Electron>,
    /// Raw jet collection.
    #[serde(default)]
    pub jets: Vec<Jet>,
}

impl Direction for Muon {
    fn eta(&self) -> f64 {
        self.eta
    }
    fn phi(&self) -> f64 {
        self.phi
    }
}

impl Direction for Electron {
    fn eta(&self) -> f64 {
        self.eta
    }
    fn phi(&self) -> f64 {
        self.phi
    }
}

impl Direction for Jet {
    fn eta(&self) -> f64 {
        self.eta
    }
    fn phi(&self) -> f64 {
        self.phi
    }
}

impl Direction for DimuonCandidate {
    fn eta(&self) -> f64 {
        self.eta
    }
    fn phi(&self) -> f64 {
        self.phi
    }
}
