//! Fairness experiments on random cardinal profiles

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use fairdiv::allocation::logging as alloc_log;
use fairdiv::config::{ExperimentConfig, load_config};
use fairdiv::experiment::{CheckKind, load_profile, simulate_twice, write_report_json};
use fairdiv::{
    Criterion, Dominance, MAX_SEARCH_AGENTS, find_fair_allocation, find_ndd_proportional_allocation,
    find_random_allocation, find_serpentine_allocation, logger,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::Path;
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (.pkl or .json)
    #[arg(long, default_value = "config/experiment.pkl")]
    config: String,

    /// Seed for the random profiles (overrides config)
    #[arg(long)]
    seed: Option<u64>,

    /// Which check to run (overrides config)
    #[arg(long, value_enum)]
    check: Option<CheckKind>,

    /// Analyse a single saved profile instead of running the sweeps
    #[arg(long)]
    profile: Option<String>,

    /// Log filter directive
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = &cli.config;
    let mut config: ExperimentConfig = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config {}: {}", config_path, e);
            return Err(e);
        }
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(check) = cli.check {
        config.check = check;
    }
    let seed = *config.seed.get_or_insert_with(rand::random);
    config.validate()?;

    // Setup output directory
    let output = &config.output_config;
    let result_dir = if output.use_timestamp {
        let date_str = Local::now().format(&output.timestamp_fmt).to_string();
        Path::new(&output.dir).join(date_str)
    } else {
        Path::new(&output.dir).to_path_buf()
    };
    std::fs::create_dir_all(&result_dir)
        .with_context(|| format!("Failed to create result dir {}", result_dir.display()))?;

    let _guard = logger::init(result_dir.join("simulation.log"), &cli.log_level)?;

    info!("Loaded configuration from {}", config_path);
    info!("Results will be saved to: {}", result_dir.display());
    info!(
        "{} agents, {} iterations, seed {}, check {:?}",
        config.agents.len(),
        config.iterations,
        seed,
        config.check
    );

    let mut rng = StdRng::seed_from_u64(seed);
    if let Some(profile_path) = &cli.profile {
        return analyze_profile(Path::new(profile_path), &mut rng);
    }

    let checker = config.check.checker();
    let report = simulate_twice(checker.as_ref(), &config, &mut rng)?;

    for (name, rows) in [("noise", &report.noise_sweep), ("items", &report.items_sweep)] {
        info!("--- {} sweep ---", name);
        for row in rows {
            let cells: Vec<String> = report
                .columns
                .iter()
                .zip(&row.means)
                .map(|(column, mean)| format!("{}={:.3}", column, mean))
                .collect();
            info!(
                "noise={} items_per_agent={}: {}",
                row.noise_size,
                row.items_per_agent,
                cells.join(" ")
            );
        }
    }

    let summary_path = write_report_json(&report, &result_dir)?;
    info!(
        "JSON summary saved to {} after {:.1} ms",
        summary_path.display(),
        report.total_duration_ms
    );

    Ok(())
}

/// Run every draft and every bounded search on one profile and log the results
fn analyze_profile(path: &Path, rng: &mut StdRng) -> anyhow::Result<()> {
    let profile = load_profile(path)?;
    info!("Loaded profile from {}", path.display());
    alloc_log::log_profile(&profile);

    let draft = find_ndd_proportional_allocation(&profile)?;
    alloc_log::log_allocation("NDD-proportional draft", draft.as_ref());
    let serpentine = find_serpentine_allocation(&profile)?;
    alloc_log::log_allocation("Serpentine draft", Some(&serpentine));
    let baseline = find_random_allocation(&profile, rng)?;
    alloc_log::log_allocation("Random baseline", baseline.as_ref());

    if profile.agent_count() > MAX_SEARCH_AGENTS {
        warn!(
            "Skipping search: {} agents, at most {} supported",
            profile.agent_count(),
            MAX_SEARCH_AGENTS
        );
        return Ok(());
    }
    for dominance in Dominance::ALL {
        for criterion in [Criterion::proportional(dominance), Criterion::envy_free(dominance)] {
            let found = find_fair_allocation(&profile, criterion)?;
            alloc_log::log_allocation(&criterion.to_string(), found.as_ref());
        }
    }
    Ok(())
}
