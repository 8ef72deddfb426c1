//! Persistence of the aggregate result.
//!
//! Writes, under the output directory:
//! - `counts.json` — per non-hidden category, per sample: the event
//!   count plus the sample's reporting metadata (cross-section, data
//!   flag);
//! - `events/<sample>_<category>.csv` — one `run,event` line per
//!   recorded event identifier.
//!
//! Nothing is written unless the whole run succeeded, so a fatal
//! failure never overwrites a previous artifact.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use dimu_pipeline::Sample;
use dimu_select::CategorySet;

/// Write the aggregate artifact.
pub fn write_aggregate(out_dir: &Path, aggregate: &CategorySet, samples: &[Sample]) -> Result<()> {
    let meta: HashMap<&str, &Sample> =
        samples.iter().map(|s| (s.name.as_str(), s)).collect();

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;
    let events_dir = out_dir.join("events");
    std::fs::create_dir_all(&events_dir)
        .with_context(|| format!("creating {}", events_dir.display()))?;

    let mut categories = Vec::new();
    for category in aggregate.iter() {
        // intermediate categories are excluded from final output
        if category.hide {
            continue;
        }
        let mut sample_entries = Vec::new();
        for tally in &category.tallies {
            let entry = match meta.get(tally.sample.as_str()) {
                Some(sample) => serde_json::json!({
                    "sample": tally.sample,
                    "count": tally.count,
                    "xsec": sample.xsec,
                    "data": sample.is_data,
                }),
                None => serde_json::json!({
                    "sample": tally.sample,
                    "count": tally.count,
                }),
            };
            sample_entries.push(entry);

            let csv_path = events_dir.join(format!("{}_{}.csv", tally.sample, category.name));
            let mut file = std::fs::File::create(&csv_path)
                .with_context(|| format!("creating {}", csv_path.display()))?;
            for id in &tally.events {
                writeln!(file, "{}", id)?;
            }
        }
        categories.push(serde_json::json!({
            "name": category.name,
            "samples": sample_entries,
        }));
    }

    let counts = serde_json::json!({ "categories": categories });
    let counts_path = out_dir.join("counts.json");
    std::fs::write(&counts_path, serde_json::to_string_pretty(&counts)?)
        .with_context(|| format!("writing {}", counts_path.display()))?;

    tracing::info!(path = %counts_path.display(), "aggregate written");
    Ok(())
}
