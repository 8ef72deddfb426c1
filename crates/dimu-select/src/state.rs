//! Finalized per-candidate event state.
//!
//! Once a dimuon candidate is chosen for evaluation, everything the
//! event cuts, the score model, and the category predicates look at is
//! gathered into one read-only view: the two chosen muons, the cleaned
//! valid collections, and the classifier score.

use dimu_core::{DimuonCandidate, Electron, EventId, Jet, Muon};

/// Read-only view of one event finalized for one dimuon candidate.
#[derive(Debug, Clone)]
pub struct EventState {
    /// Run/event identifier pair.
    pub id: EventId,
    /// Name of the sample the event belongs to.
    pub sample: String,
    /// First muon of the candidate pair.
    pub mu1: Muon,
    /// Second muon of the candidate pair.
    pub mu2: Muon,
    /// The candidate under evaluation.
    pub candidate: DimuonCandidate,
    /// Valid jets, cleaned against the candidate muons.
    pub jets: Vec<Jet>,
    /// Valid b-tagged jets, cleaned against the candidate muons.
    pub bjets: Vec<Jet>,
    /// Valid electrons.
    pub electrons: Vec<Electron>,
    /// Quality muons beyond the candidate pair.
    pub extra_muons: Vec<Muon>,
    /// Classifier score, set once the score collaborator has run.
    pub score: Option<f64>,
}

impl EventState {
    /// Look up a named observable for declarative predicates and score
    /// models. Returns `None` for unknown names, and for `score` before
    /// the score model has run.
    pub fn feature(&self, name: &str) -> Option<f64> {
        match name {
            "dimu_mass" => Some(self.candidate.mass),
            "dimu_pt" => Some(self.candidate.pt),
            "dimu_eta" => Some(self.candidate.eta),
            "mu1_pt" => Some(self.mu1.pt),
            "mu2_pt" => Some(self.mu2.pt),
            "mu1_eta" => Some(self.mu1.eta),
            "mu2_eta" => Some(self.mu2.eta),
            "n_jets" => Some(self.jets.len() as f64),
            "n_bjets" => Some(self.bjets.len() as f64),
            "n_electrons" => Some(self.electrons.len() as f64),
            "n_extra_muons" => Some(self.extra_muons.len() as f64),
            "score" => self.score,
            _ => None,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Minimal state for predicate tests.
    pub fn state(sample: &str, mass: f64, n_jets: usize, score: Option<f64>) -> EventState {
        let muon = Muon {
            pt: 30.0,
            eta: 0.5,
            phi: 0.0,
            charge: 1,
            iso: 0.05,
            is_loose_id: true,
            is_medium_id: true,
        };
        let mut mu2 = muon.clone();
        mu2.charge = -1;
        mu2.phi = 2.0;
        EventState {
            id: EventId { run: 1, event: 1 },
            sample: sample.into(),
            mu1: muon,
            mu2,
            candidate: DimuonCandidate { i_mu1: 0, i_mu2: 1, mass, pt: 20.0, eta: 0.1, phi: 1.0 },
            jets: vec![Jet { pt: 40.0, eta: 0.0, phi: 3.0, btag: 0.0 }; n_jets],
            bjets: Vec::new(),
            electrons: Vec::new(),
            extra_muons: Vec::new(),
            score,
        }
    }
}
