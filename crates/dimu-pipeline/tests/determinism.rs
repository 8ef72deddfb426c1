//! End-to-end pipeline determinism: the merged aggregate must not
//! depend on the worker count.

use dimu_core::{DimuonCandidate, EventId, EventRecord, Muon, Result};
use dimu_pipeline::{merge, Sample, Scheduler};
use dimu_select::categorizer::ConfigCategorizer;
use dimu_select::{CategorySet, EventSelector, SelectionConfig};

fn muon(pt: f64, charge: i32) -> Muon {
    Muon { pt, eta: 0.5, phi: 0.0, charge, iso: 0.05, is_loose_id: true, is_medium_id: true }
}

/// Sample where event i has a passing candidate iff `i % modulo == 0`.
fn sample(name: &str, n: u64, modulo: u64) -> Sample {
    let events = (0..n)
        .map(|i| {
            let candidates = if i % modulo == 0 {
                vec![DimuonCandidate { i_mu1: 0, i_mu2: 1, mass: 125.0, pt: 20.0, eta: 0.1, phi: 1.0 }]
            } else {
                Vec::new()
            };
            EventRecord {
                id: EventId { run: 1, event: i },
                candidates,
                muons: vec![muon(40.0, 1), muon(30.0, -1)],
                electrons: Vec::new(),
                jets: Vec::new(),
            }
        })
        .collect();
    Sample::in_memory(name, false, 1.0, events)
}

fn factory() -> Result<EventSelector> {
    let categorizer = ConfigCategorizer::from_json(
        r#"{"categories": [
            {"name": "cat1", "require": [{"feature": "dimu_mass", "op": "ge", "value": 110.0}]},
            {"name": "helper", "hide": true}
        ]}"#,
    )?;
    EventSelector::new(SelectionConfig::default(), Box::new(categorizer))
}

fn run_with_workers(workers: usize) -> CategorySet {
    let samples: Vec<Sample> =
        (0..6u64).map(|i| sample(&format!("S{}", i), 40 + i, 2 + i)).collect();
    let scheduler = Scheduler::new(workers).unwrap();
    let sets = scheduler.run(&samples, factory).unwrap();
    merge(sets).unwrap()
}

#[test]
fn aggregate_is_independent_of_worker_count() {
    let sequential = run_with_workers(1);
    let parallel = run_with_workers(8);
    assert_eq!(sequential, parallel);

    // tallies arrive in submission order
    let order: Vec<&str> =
        sequential.get("cat1").unwrap().tallies.iter().map(|t| t.sample.as_str()).collect();
    assert_eq!(order, vec!["S0", "S1", "S2", "S3", "S4", "S5"]);
}

#[test]
fn aggregate_counts_match_per_task_totals() {
    let a = sample("A", 10, 1); // 10 passing events
    let b = sample("B", 5, 5); // events 0 only
    let scheduler = Scheduler::new(3).unwrap();
    let sets = scheduler.run(&[a, b], factory).unwrap();

    let per_task: Vec<u64> = sets
        .iter()
        .map(|s| s.get("cat1").unwrap().tallies.iter().map(|t| t.count).sum())
        .collect();
    assert_eq!(per_task, vec![10, 1]);

    let merged = merge(sets).unwrap();
    let cat1 = merged.get("cat1").unwrap();
    assert_eq!(cat1.tallies[0].sample, "A");
    assert_eq!(cat1.tallies[0].count, 10);
    assert_eq!(cat1.tallies[0].events.len(), 10);
    assert_eq!(cat1.tallies[1].sample, "B");
    assert_eq!(cat1.tallies[1].count, 1);
    // hidden helper category never accumulates
    assert!(merged.get("helper").unwrap().tallies.is_empty());
}
