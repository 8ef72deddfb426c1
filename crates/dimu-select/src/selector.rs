//! Per-task event selector.
//!
//! One `EventSelector` lives inside each worker task. For every event
//! it scans the dimuon candidates in order, runs the fixed sequence of
//! selection stages, and on the first fully passing candidate asks the
//! categorizer which categories the event belongs to and records them
//! into the task-owned [`CategorySet`].
//!
//! Stage order (each strictly upstream of the next):
//! 1. identification-quality bits on the two candidate muons,
//! 2. per-muon kinematic cuts,
//! 3. per-event cuts on composite observables (after rebuilding and
//!    ΔR-cleaning the valid collections, and scoring the candidate),
//! 4. hard identification-bit check on both muons,
//! 5. sample-specific run-range exclusion.

use dimu_core::{Error, EventRecord, Result};
use serde::{Deserialize, Serialize};

use crate::category::CategorySet;
use crate::categorizer::Categorizer;
use crate::cleaning::clean_by_dr;
use crate::cuts::{EventCuts, MuonCuts, RunExclusion};
use crate::objects::ObjectSelection;
use crate::score::{ScoreModel, ScoreSpec};
use crate::state::EventState;

fn default_jet_mu_dr() -> f64 {
    0.4
}

/// Full selection configuration, loaded once per run and shared
/// read-only across tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Per-muon kinematic cuts (stage 2).
    #[serde(default)]
    pub muon: MuonCuts,
    /// Per-event cuts (stage 3).
    #[serde(default)]
    pub event: EventCuts,
    /// Valid-object thresholds.
    #[serde(default)]
    pub objects: ObjectSelection,
    /// Run-range exclusion rules (stage 5).
    #[serde(default)]
    pub run_exclusions: Vec<RunExclusion>,
    /// ΔR cone for cleaning jets against the candidate muons.
    #[serde(default = "default_jet_mu_dr")]
    pub jet_mu_dr: f64,
    /// Classifier score model.
    #[serde(default)]
    pub score: ScoreSpec,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            muon: MuonCuts::default(),
            event: EventCuts::default(),
            objects: ObjectSelection::default(),
            run_exclusions: Vec::new(),
            jet_mu_dr: default_jet_mu_dr(),
            score: ScoreSpec::default(),
        }
    }
}

/// Stateful per-task categorization object.
pub struct EventSelector {
    config: SelectionConfig,
    score: Box<dyn ScoreModel>,
    categorizer: Box<dyn Categorizer>,
}

impl EventSelector {
    /// Build a selector; the score model comes from the configuration.
    pub fn new(config: SelectionConfig, categorizer: Box<dyn Categorizer>) -> Result<Self> {
        let score = config.score.build()?;
        Ok(Self { config, score, categorizer })
    }

    /// Build a selector with an explicit score model.
    pub fn with_score_model(
        config: SelectionConfig,
        score: Box<dyn ScoreModel>,
        categorizer: Box<dyn Categorizer>,
    ) -> Self {
        Self { config, score, categorizer }
    }

    /// The categorizer driving this selector.
    pub fn categorizer(&self) -> &dyn Categorizer {
        self.categorizer.as_ref()
    }

    /// Fresh accumulator matching this selector's categories.
    pub fn category_set(&self) -> CategorySet {
        CategorySet::from_defs(self.categorizer.defs())
    }

    /// Process one event: scan candidates in order, record the first
    /// fully passing one. Returns whether any candidate passed. An
    /// event with no candidates is skipped without error; a candidate
    /// referencing a missing muon is corrupt data and fails the task.
    pub fn process_event(
        &mut self,
        sample: &str,
        event: &EventRecord,
        set: &mut CategorySet,
    ) -> Result<bool> {
        for (i_cand, candidate) in event.candidates.iter().enumerate() {
            self.categorizer.reset();

            let mu1 = event.muons.get(candidate.i_mu1).ok_or_else(|| {
                Error::Event(format!(
                    "event {}: candidate {} references missing muon {}",
                    event.id, i_cand, candidate.i_mu1
                ))
            })?;
            let mu2 = event.muons.get(candidate.i_mu2).ok_or_else(|| {
                Error::Event(format!(
                    "event {}: candidate {} references missing muon {}",
                    event.id, i_cand, candidate.i_mu2
                ))
            })?;

            // stage 1: object-quality bits
            if !mu1.is_loose_id || !mu2.is_loose_id {
                continue;
            }

            // stage 2: per-muon kinematic cuts
            if !self.config.muon.evaluate(mu1) || !self.config.muon.evaluate(mu2) {
                continue;
            }

            // rebuild valid collections and clean jets against the
            // candidate muons before any per-event observable is used
            let (mut jets, mut bjets) = self.config.objects.valid_jets(event);
            let pair = [mu1.clone(), mu2.clone()];
            clean_by_dr(&mut jets, &pair, self.config.jet_mu_dr);
            clean_by_dr(&mut bjets, &pair, self.config.jet_mu_dr);

            let mut state = EventState {
                id: event.id,
                sample: sample.to_string(),
                mu1: mu1.clone(),
                mu2: mu2.clone(),
                candidate: candidate.clone(),
                jets,
                bjets,
                electrons: self.config.objects.valid_electrons(event),
                extra_muons: self
                    .config
                    .objects
                    .extra_muons(event, candidate.i_mu1, candidate.i_mu2),
                score: None,
            };
            state.score = Some(self.score.score(&state));

            // stage 3: per-event cuts
            if !self.config.event.evaluate(&state) {
                continue;
            }

            // stage 4: hard identification bits
            if !state.mu1.is_medium_id || !state.mu2.is_medium_id {
                continue;
            }

            // stage 5: run-range exclusion
            if self.config.run_exclusions.iter().any(|r| r.excludes(sample, event.id.run)) {
                continue;
            }

            // first fully passing candidate wins; score the event once
            self.categorizer.evaluate(&state);
            for i in self.categorizer.matched() {
                let def = &self.categorizer.defs()[i];
                if def.hide {
                    continue;
                }
                set.record(&def.name, sample, event.id)?;
            }
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorizer::{BaselineCategorizer, CategoryDef, Condition, ConfigCategorizer, Op};
    use dimu_core::{DimuonCandidate, EventId, Jet, Muon};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn muon(pt: f64, charge: i32) -> Muon {
        Muon {
            pt,
            eta: 0.5,
            phi: 0.0,
            charge,
            iso: 0.05,
            is_loose_id: true,
            is_medium_id: true,
        }
    }

    fn candidate(i_mu1: usize, i_mu2: usize, mass: f64) -> DimuonCandidate {
        DimuonCandidate { i_mu1, i_mu2, mass, pt: 20.0, eta: 0.1, phi: 1.0 }
    }

    fn event(run: u32, n: u64, candidates: Vec<DimuonCandidate>, muons: Vec<Muon>) -> EventRecord {
        EventRecord {
            id: EventId { run, event: n },
            candidates,
            muons,
            electrons: Vec::new(),
            jets: Vec::new(),
        }
    }

    fn selector() -> EventSelector {
        EventSelector::new(SelectionConfig::default(), Box::new(BaselineCategorizer::new()))
            .unwrap()
    }

    /// Score model that counts how often stage 3 inputs were computed.
    struct CountingScore(Arc<AtomicUsize>);

    impl ScoreModel for CountingScore {
        fn score(&self, _state: &EventState) -> f64 {
            self.0.fetch_add(1, Ordering::SeqCst);
            0.0
        }
        fn name(&self) -> &str {
            "counting"
        }
    }

    #[test]
    fn test_no_candidates_is_skipped_without_error() {
        let mut sel = selector();
        let mut set = sel.category_set();
        let passed = sel
            .process_event("A", &event(1, 1, Vec::new(), vec![muon(40.0, 1)]), &mut set)
            .unwrap();
        assert!(!passed);
        assert!(set.get("inclusive").unwrap().tallies.is_empty());
    }

    #[test]
    fn test_passing_event_records_non_hidden_categories() {
        let mut sel = selector();
        let mut set = sel.category_set();
        let ev = event(1, 7, vec![candidate(0, 1, 125.0)], vec![muon(40.0, 1), muon(30.0, -1)]);
        assert!(sel.process_event("A", &ev, &mut set).unwrap());
        let inclusive = set.get("inclusive").unwrap();
        assert_eq!(inclusive.tallies[0].count, 1);
        assert_eq!(inclusive.tallies[0].events, vec![EventId { run: 1, event: 7 }]);
        // zero jets: the exclusive split lands on lt2_jets
        assert!(set.get("lt2_jets").unwrap().tallies[0].count == 1);
        assert!(set.get("ge2_jets").unwrap().tallies.is_empty());
    }

    #[test]
    fn test_second_candidate_selected_first_never_scored() {
        // first candidate fails stage 2 (soft muon); the second passes.
        // the score model runs exactly once, so stage 3 was never
        // reached for the failing candidate.
        let counter = Arc::new(AtomicUsize::new(0));
        let mut sel = EventSelector::with_score_model(
            SelectionConfig::default(),
            Box::new(CountingScore(counter.clone())),
            Box::new(BaselineCategorizer::new()),
        );
        let mut set = sel.category_set();
        let muons = vec![muon(5.0, 1), muon(40.0, 1), muon(30.0, -1)];
        let ev = event(1, 9, vec![candidate(0, 2, 125.0), candidate(1, 2, 124.0)], muons);
        assert!(sel.process_event("A", &ev, &mut set).unwrap());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(set.get("inclusive").unwrap().tallies[0].count, 1);
    }

    #[test]
    fn test_stops_at_first_passing_candidate() {
        // both candidates would pass; the event is scored exactly once
        let mut sel = selector();
        let mut set = sel.category_set();
        let muons = vec![muon(40.0, 1), muon(30.0, -1)];
        let ev = event(1, 3, vec![candidate(0, 1, 125.0), candidate(0, 1, 124.0)], muons);
        assert!(sel.process_event("A", &ev, &mut set).unwrap());
        assert_eq!(set.get("inclusive").unwrap().tallies[0].count, 1);
    }

    #[test]
    fn test_run_exclusion_skips_matching_sample() {
        let mut config = SelectionConfig::default();
        config.run_exclusions = vec![RunExclusion {
            sample: "RunF_1".into(),
            first_run: None,
            last_run: Some(278801),
        }];
        let mut sel =
            EventSelector::new(config, Box::new(BaselineCategorizer::new())).unwrap();
        let mut set = sel.category_set();
        let muons = vec![muon(40.0, 1), muon(30.0, -1)];

        let excluded = event(278802, 1, vec![candidate(0, 1, 125.0)], muons.clone());
        assert!(!sel.process_event("RunF_1", &excluded, &mut set).unwrap());

        // same event under a different sample name passes
        assert!(sel.process_event("RunF_2", &excluded, &mut set).unwrap());

        let kept = event(278801, 2, vec![candidate(0, 1, 125.0)], muons);
        assert!(sel.process_event("RunF_1", &kept, &mut set).unwrap());
    }

    #[test]
    fn test_medium_id_gate() {
        let mut sel = selector();
        let mut set = sel.category_set();
        let mut soft_id = muon(30.0, -1);
        soft_id.is_medium_id = false;
        let ev = event(1, 4, vec![candidate(0, 1, 125.0)], vec![muon(40.0, 1), soft_id]);
        assert!(!sel.process_event("A", &ev, &mut set).unwrap());
    }

    #[test]
    fn test_quality_bit_gate_before_kinematics() {
        let mut sel = selector();
        let mut set = sel.category_set();
        let mut no_loose = muon(40.0, 1);
        no_loose.is_loose_id = false;
        let ev = event(1, 5, vec![candidate(0, 1, 125.0)], vec![no_loose, muon(30.0, -1)]);
        assert!(!sel.process_event("A", &ev, &mut set).unwrap());
    }

    #[test]
    fn test_corrupt_candidate_is_fatal() {
        let mut sel = selector();
        let mut set = sel.category_set();
        let ev = event(1, 6, vec![candidate(0, 5, 125.0)], vec![muon(40.0, 1)]);
        assert!(sel.process_event("A", &ev, &mut set).is_err());
    }

    #[test]
    fn test_jets_cleaned_before_categorization() {
        // two valid jets, one inside the muon cone: the category split
        // must see one jet, not two
        let defs = vec![CategoryDef {
            name: "one_jet".into(),
            hide: false,
            exclusive_group: None,
            require: vec![
                Condition { feature: "n_jets".into(), op: Op::Ge, value: 1.0 },
                Condition { feature: "n_jets".into(), op: Op::Lt, value: 2.0 },
            ],
        }];
        let mut sel = EventSelector::new(
            SelectionConfig::default(),
            Box::new(ConfigCategorizer::new(defs).unwrap()),
        )
        .unwrap();
        let mut set = sel.category_set();
        let mut ev =
            event(1, 8, vec![candidate(0, 1, 125.0)], vec![muon(40.0, 1), muon(30.0, -1)]);
        ev.jets = vec![
            Jet { pt: 50.0, eta: 0.5, phi: 0.1, btag: 0.0 }, // within 0.4 of mu1
            Jet { pt: 50.0, eta: -1.5, phi: 2.5, btag: 0.0 },
        ];
        assert!(sel.process_event("A", &ev, &mut set).unwrap());
        assert_eq!(set.get("one_jet").unwrap().tallies[0].count, 1);
    }

    #[test]
    fn test_repeatable_categorization() {
        let muons = vec![muon(40.0, 1), muon(30.0, -1)];
        let ev = event(1, 2, vec![candidate(0, 1, 90.0), candidate(0, 1, 125.0)], muons);
        let run = || {
            let mut sel = selector();
            let mut set = sel.category_set();
            sel.process_event("A", &ev, &mut set).unwrap();
            set
        };
        assert_eq!(run(), run());
    }
}
