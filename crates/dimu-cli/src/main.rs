//! dimucat CLI

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use dimu_select::categorizer::{BaselineCategorizer, Categorizer, ConfigCategorizer};
use dimu_select::EventSelector;

mod config;
mod report;

#[derive(Parser)]
#[command(name = "dimucat")]
#[command(about = "dimucat - parallel dimuon event categorization")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Categorize all samples and write the aggregate artifact
    Run {
        /// Sample list (JSON)
        #[arg(short, long)]
        samples: PathBuf,

        /// Selection configuration (JSON)
        #[arg(long)]
        selection: PathBuf,

        /// Category description (JSON). Omit to use the hardcoded
        /// baseline categories.
        #[arg(long)]
        categories: Option<PathBuf>,

        /// Output directory for counts.json and event CSVs
        #[arg(short, long, default_value = "out")]
        out: PathBuf,

        /// Worker threads. Use 1 for deterministic parity.
        #[arg(long, default_value = "1")]
        threads: usize,

        /// Debug subsampling: process only 1/K of each sample's events
        #[arg(long, default_value = "1")]
        reduction: usize,
    },

    /// Parse all inputs and print a summary without processing
    Validate {
        /// Sample list (JSON)
        #[arg(short, long)]
        samples: PathBuf,

        /// Selection configuration (JSON)
        #[arg(long)]
        selection: PathBuf,

        /// Category description (JSON)
        #[arg(long)]
        categories: Option<PathBuf>,
    },

    /// Print version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    match cli.command {
        Commands::Run { samples, selection, categories, out, threads, reduction } => {
            cmd_run(&samples, &selection, categories.as_ref(), &out, threads, reduction)
        }
        Commands::Validate { samples, selection, categories } => {
            cmd_validate(&samples, &selection, categories.as_ref())
        }
        Commands::Version => {
            println!("dimucat {}", dimu_core::VERSION);
            Ok(())
        }
    }
}

fn cmd_run(
    samples_path: &PathBuf,
    selection_path: &PathBuf,
    categories_path: Option<&PathBuf>,
    out: &PathBuf,
    threads: usize,
    reduction: usize,
) -> Result<()> {
    let selection = config::load_selection(selection_path)?;
    let defs = categories_path.map(|p| config::load_category_defs(p)).transpose()?;

    let mut samples = config::load_samples(samples_path)?;
    if samples.is_empty() {
        bail!("no usable samples in {}", samples_path.display());
    }
    // dispatch in cross-section order, smallest first
    samples.sort_by(|a, b| a.xsec.total_cmp(&b.xsec));

    tracing::info!(
        samples = samples.len(),
        threads,
        reduction,
        available = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
        "dispatching categorization tasks"
    );

    // every task gets its own categorizer and selector
    let factory = || -> dimu_core::Result<EventSelector> {
        let categorizer: Box<dyn Categorizer> = match &defs {
            Some(defs) => Box::new(ConfigCategorizer::new(defs.clone())?),
            None => Box::new(BaselineCategorizer::new()),
        };
        EventSelector::new(selection.clone(), categorizer)
    };

    let start = Instant::now();
    let scheduler = dimu_pipeline::Scheduler::new(threads)?.with_reduction(reduction);
    let sets = scheduler.run(&samples, factory)?;
    let aggregate = dimu_pipeline::merge(sets)?;
    tracing::info!(elapsed_s = start.elapsed().as_secs_f64(), "all samples processed");

    report::write_aggregate(out, &aggregate, &samples)?;

    for category in aggregate.iter() {
        if category.hide {
            continue;
        }
        for tally in &category.tallies {
            println!("{}_{}: {}", tally.sample, category.name, tally.count);
        }
    }
    Ok(())
}

fn cmd_validate(
    samples_path: &PathBuf,
    selection_path: &PathBuf,
    categories_path: Option<&PathBuf>,
) -> Result<()> {
    let selection = config::load_selection(selection_path)?;
    let score = selection.score.build()?;

    let categorizer: Box<dyn Categorizer> = match categories_path {
        Some(path) => Box::new(ConfigCategorizer::new(config::load_category_defs(path)?)?),
        None => Box::new(BaselineCategorizer::new()),
    };

    let samples = config::load_samples(samples_path)?;

    println!("selection: ok (score model: {})", score.name());
    println!("categories: {}", categorizer.defs().len());
    for def in categorizer.defs() {
        let hidden = if def.hide { " (hidden)" } else { "" };
        println!("  {}{}", def.name, hidden);
    }
    println!("samples: {}", samples.len());
    for sample in &samples {
        println!("  {} ({} events)", sample.name, sample.len());
    }
    Ok(())
}
