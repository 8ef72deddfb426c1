//! Config and sample loading for the CLI.
//!
//! All inputs are JSON: the selection configuration, the category
//! description, and the sample list. Sample events live inline or in a
//! referenced events file; a sample that fails to load is reported and
//! excluded from dispatch without aborting the run.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dimu_core::EventRecord;
use dimu_pipeline::Sample;
use dimu_select::categorizer::{CategoryDef, CategoryFile};
use dimu_select::SelectionConfig;
use serde::Deserialize;

/// One entry of the sample list file.
#[derive(Debug, Deserialize)]
pub struct SampleSpec {
    /// Sample name.
    pub name: String,
    /// Real-data sample.
    #[serde(default)]
    pub data: bool,
    /// Cross-section weight (reporting metadata).
    #[serde(default = "default_xsec")]
    pub xsec: f64,
    /// Inline event records.
    #[serde(default)]
    pub events: Option<Vec<EventRecord>>,
    /// Path to a JSON array of event records, relative to the sample
    /// list file.
    #[serde(default)]
    pub events_file: Option<PathBuf>,
}

fn default_xsec() -> f64 {
    1.0
}

/// Load and parse the selection configuration.
pub fn load_selection(path: &Path) -> Result<SelectionConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading selection config {}", path.display()))?;
    let config: SelectionConfig = serde_json::from_str(&json)
        .with_context(|| format!("parsing selection config {}", path.display()))?;
    Ok(config)
}

/// Load and parse the category description.
pub fn load_category_defs(path: &Path) -> Result<Vec<CategoryDef>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading category description {}", path.display()))?;
    let file: CategoryFile = serde_json::from_str(&json)
        .with_context(|| format!("parsing category description {}", path.display()))?;
    Ok(file.categories)
}

/// Load the sample list and materialize the samples. Malformed samples
/// are warned about and skipped; they never abort the run.
pub fn load_samples(path: &Path) -> Result<Vec<Sample>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading sample list {}", path.display()))?;
    let specs: Vec<SampleSpec> = serde_json::from_str(&json)
        .with_context(|| format!("parsing sample list {}", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut samples = Vec::new();
    for spec in specs {
        match build_sample(&spec, base_dir) {
            Ok(sample) => {
                tracing::info!(
                    sample = %sample.name,
                    events = sample.len(),
                    data = sample.is_data,
                    xsec = sample.xsec,
                    "sample loaded"
                );
                samples.push(sample);
            }
            Err(e) => {
                tracing::warn!(sample = %spec.name, error = %e, "skipping malformed sample");
            }
        }
    }
    Ok(samples)
}

fn build_sample(spec: &SampleSpec, base_dir: &Path) -> Result<Sample> {
    let events = match (&spec.events, &spec.events_file) {
        (Some(events), _) => events.clone(),
        (None, Some(file)) => {
            let events_path = base_dir.join(file);
            let json = std::fs::read_to_string(&events_path)
                .with_context(|| format!("reading events file {}", events_path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("parsing events file {}", events_path.display()))?
        }
        (None, None) => anyhow::bail!("sample '{}' has neither events nor events_file", spec.name),
    };
    Ok(Sample::in_memory(&spec.name, spec.data, spec.xsec, events))
}
