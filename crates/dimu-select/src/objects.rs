//! Valid-object collections.
//!
//! Raw collections contain everything the reconstruction produced; the
//! selection stages only ever look at objects passing baseline quality
//! and kinematic requirements. These thresholds are configuration, not
//! code.

use dimu_core::{Electron, EventRecord, Jet, Muon};
use serde::{Deserialize, Serialize};

/// Baseline object-selection thresholds for building valid collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectSelection {
    /// Minimum jet pt (GeV).
    pub jet_min_pt: f64,
    /// Maximum |η| for jets.
    pub jet_max_eta: f64,
    /// b-tag discriminant threshold for the b-jet collection.
    pub btag_min: f64,
    /// Minimum electron pt (GeV).
    pub electron_min_pt: f64,
    /// Maximum |η| for electrons.
    pub electron_max_eta: f64,
    /// Minimum pt for extra muons (GeV).
    pub extra_muon_min_pt: f64,
    /// Maximum |η| for extra muons.
    pub extra_muon_max_eta: f64,
}

impl Default for ObjectSelection {
    fn default() -> Self {
        Self {
            jet_min_pt: 30.0,
            jet_max_eta: 4.7,
            btag_min: 0.8484,
            electron_min_pt: 10.0,
            electron_max_eta: 2.5,
            extra_muon_min_pt: 10.0,
            extra_muon_max_eta: 2.4,
        }
    }
}

impl ObjectSelection {
    /// Valid jets and valid b-tagged jets from the raw jet collection.
    pub fn valid_jets(&self, event: &EventRecord) -> (Vec<Jet>, Vec<Jet>) {
        let mut jets = Vec::new();
        let mut bjets = Vec::new();
        for jet in &event.jets {
            if jet.pt < self.jet_min_pt || jet.eta.abs() > self.jet_max_eta {
                continue;
            }
            jets.push(jet.clone());
            if jet.btag > self.btag_min {
                bjets.push(jet.clone());
            }
        }
        (jets, bjets)
    }

    /// Valid electrons from the raw electron collection.
    pub fn valid_electrons(&self, event: &EventRecord) -> Vec<Electron> {
        event
            .electrons
            .iter()
            .filter(|e| {
                e.passes_id && e.pt >= self.electron_min_pt && e.eta.abs() <= self.electron_max_eta
            })
            .cloned()
            .collect()
    }

    /// Quality muons other than the two forming the candidate.
    pub fn extra_muons(&self, event: &EventRecord, i_mu1: usize, i_mu2: usize) -> Vec<Muon> {
        event
            .muons
            .iter()
            .enumerate()
            .filter(|(i, m)| {
                *i != i_mu1
                    && *i != i_mu2
                    && m.is_loose_id
                    && m.pt >= self.extra_muon_min_pt
                    && m.eta.abs() <= self.extra_muon_max_eta
            })
            .map(|(_, m)| m.clone())
            .collect()
    }
}
