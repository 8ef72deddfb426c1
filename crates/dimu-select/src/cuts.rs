//! Selection cuts: per-muon kinematics, per-event observables, and the
//! sample-specific run-range exclusion used to avoid double-counting
//! events shared between overlapping data-taking periods.

use dimu_core::Muon;
use serde::{Deserialize, Serialize};

use crate::state::EventState;

/// Per-muon kinematic and isolation cuts (selection stage 2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MuonCuts {
    /// Minimum muon pt (GeV).
    pub min_pt: f64,
    /// Maximum |η|.
    pub max_eta: f64,
    /// Maximum relative isolation.
    pub max_iso: f64,
}

impl Default for MuonCuts {
    fn default() -> Self {
        Self { min_pt: 20.0, max_eta: 2.4, max_iso: 0.25 }
    }
}

impl MuonCuts {
    /// Whether one muon passes the kinematic cuts.
    pub fn evaluate(&self, muon: &Muon) -> bool {
        muon.pt >= self.min_pt && muon.eta.abs() <= self.max_eta && muon.iso <= self.max_iso
    }
}

/// Per-event cuts on composite observables (selection stage 3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventCuts {
    /// Minimum dimuon invariant mass (GeV).
    pub min_mass: f64,
    /// Maximum dimuon invariant mass (GeV), open-ended if absent.
    #[serde(default)]
    pub max_mass: Option<f64>,
    /// Minimum pt of the leading candidate muon (GeV), e.g. a trigger
    /// plateau requirement.
    #[serde(default)]
    pub min_lead_pt: Option<f64>,
    /// Minimum classifier score.
    #[serde(default)]
    pub min_score: Option<f64>,
    /// Require the two candidate muons to carry opposite charge.
    #[serde(default = "default_true")]
    pub require_opposite_charge: bool,
}

fn default_true() -> bool {
    true
}

impl Default for EventCuts {
    fn default() -> Self {
        Self {
            min_mass: 60.0,
            max_mass: None,
            min_lead_pt: None,
            min_score: None,
            require_opposite_charge: true,
        }
    }
}

impl EventCuts {
    /// Whether the finalized candidate state passes the event cuts.
    pub fn evaluate(&self, state: &EventState) -> bool {
        if state.candidate.mass < self.min_mass {
            return false;
        }
        if let Some(max_mass) = self.max_mass {
            if state.candidate.mass > max_mass {
                return false;
            }
        }
        if self.require_opposite_charge && state.mu1.charge * state.mu2.charge >= 0 {
            return false;
        }
        if let Some(min_lead_pt) = self.min_lead_pt {
            if state.mu1.pt.max(state.mu2.pt) < min_lead_pt {
                return false;
            }
        }
        if let Some(min_score) = self.min_score {
            if state.score.unwrap_or(f64::NEG_INFINITY) < min_score {
                return false;
            }
        }
        true
    }
}

/// Run-range exclusion for one named sample (selection stage 5).
///
/// Two samples covering one split data-taking period would otherwise
/// both contain the events near the boundary. The boundary run numbers
/// are analysis configuration; nothing in the code fixes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunExclusion {
    /// Sample name the rule applies to.
    pub sample: String,
    /// Keep only runs >= this value.
    #[serde(default)]
    pub first_run: Option<u32>,
    /// Keep only runs <= this value.
    #[serde(default)]
    pub last_run: Option<u32>,
}

impl RunExclusion {
    /// Whether an event with `run` in sample `sample_name` must be
    /// skipped under this rule.
    pub fn excludes(&self, sample_name: &str, run: u32) -> bool {
        if self.sample != sample_name {
            return false;
        }
        if let Some(first_run) = self.first_run {
            if run < first_run {
                return true;
            }
        }
        if let Some(last_run) = self.last_run {
            if run > last_run {
                return true;
            }
        }
        false
    }
}
