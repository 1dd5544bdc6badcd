//! Experiments on random cardinal profiles
//!
//! A sweep draws many random profiles at each (noise size, items per agent)
//! point, runs a [`ProfileCheck`] on each, and records the mean and standard
//! error of every column.

pub mod checks;
pub mod data;
pub mod report;
pub mod stats;

pub use checks::{CheckKind, EnvyFreenessCheck, ProfileCheck, ProportionalityCheck};
pub use data::{
    load_profile, random_cardinal, random_cardinal_gaussian, random_cardinal_profile,
    random_gaussian_profile, random_ordinal, save_profile,
};
pub use report::{SweepReport, SweepRow, write_report_json};
pub use stats::mean_and_stderr;

use crate::config::{ExperimentConfig, MarketConfig};
use crate::error::{Error, Result};
use crate::types::{AgentId, Item};
use rand::Rng;
use std::time::Instant;
use tracing::info;

/// Run `check` on `iterations` random cardinal profiles over `items`
pub fn average_over_random_profiles<R: Rng>(
    check: &dyn ProfileCheck,
    agents: &[AgentId],
    items: &[Item],
    market: &MarketConfig,
    max_noise: f64,
    iterations: usize,
    rng: &mut R,
) -> Result<(Vec<f64>, Vec<f64>)> {
    mean_and_stderr(iterations, || {
        let profile = data::random_cardinal_profile(agents, items, market, max_noise, rng)?;
        check.check(&profile, &mut *rng)
    })
}

/// One row for every noise size crossed with every items-per-agent count.
/// Items are numbered `0..items_per_agent * agents`.
pub fn simulate<R: Rng>(
    check: &dyn ProfileCheck,
    agents: &[AgentId],
    items_per_agent: &[usize],
    noise_sizes: &[f64],
    market: &MarketConfig,
    iterations: usize,
    rng: &mut R,
) -> Result<Vec<SweepRow>> {
    let columns = check.columns();
    let mut rows = Vec::with_capacity(noise_sizes.len() * items_per_agent.len());
    for &noise_size in noise_sizes {
        for &per_agent in items_per_agent {
            let start = Instant::now();
            let item_count = per_agent * agents.len();
            let items = Item::list(0..item_count as u32);
            let (means, errors) = average_over_random_profiles(
                check, agents, &items, market, noise_size, iterations, rng,
            )?;
            if means.len() != columns.len() {
                return Err(Error::InvalidConfig(format!(
                    "check {} returned {} values for {} columns",
                    check.name(),
                    means.len(),
                    columns.len()
                )));
            }
            info!(
                "noise={} items_per_agent={} done in {:.3}s",
                noise_size,
                per_agent,
                start.elapsed().as_secs_f64()
            );
            rows.push(SweepRow {
                agents: agents.len(),
                iterations,
                noise_size,
                items_per_agent: per_agent,
                means,
                errors,
            });
        }
    }
    Ok(rows)
}

/// Run the noise sweep and the item-count sweep of `config`
pub fn simulate_twice<R: Rng>(
    check: &dyn ProfileCheck,
    config: &ExperimentConfig,
    rng: &mut R,
) -> Result<SweepReport> {
    config.validate()?;
    let start = Instant::now();
    let agents: Vec<AgentId> = config.agents.iter().map(AgentId::new).collect();

    info!("Running noise sweep for {} check", check.name());
    let noise_sweep = simulate(
        check,
        &agents,
        &config.noise_sweep.items_per_agent,
        &config.noise_sweep.noise_sizes,
        &config.market,
        config.iterations,
        rng,
    )?;
    info!("Running items sweep for {} check", check.name());
    let items_sweep = simulate(
        check,
        &agents,
        &config.items_sweep.items_per_agent,
        &config.items_sweep.noise_sizes,
        &config.market,
        config.iterations,
        rng,
    )?;

    Ok(SweepReport {
        check: check.name().to_string(),
        columns: check.columns(),
        agent_count: agents.len(),
        iterations: config.iterations,
        seed: config.seed,
        noise_sweep,
        items_sweep,
        total_duration_ms: start.elapsed().as_secs_f64() * 1000.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SweepConfig;
    use crate::preference::PreferenceProfile;
    use rand::RngCore;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    struct Dummy;

    impl ProfileCheck for Dummy {
        fn name(&self) -> &'static str {
            "dummy"
        }

        fn columns(&self) -> Vec<String> {
            vec!["col1".to_string(), "col2".to_string(), "col3".to_string()]
        }

        fn check(&self, _profile: &PreferenceProfile, _rng: &mut dyn RngCore) -> Result<Vec<f64>> {
            Ok(vec![1.0, 0.0, 5.0])
        }
    }

    struct Narrow;

    impl ProfileCheck for Narrow {
        fn name(&self) -> &'static str {
            "narrow"
        }

        fn columns(&self) -> Vec<String> {
            vec!["only".to_string(), "missing".to_string()]
        }

        fn check(&self, _profile: &PreferenceProfile, _rng: &mut dyn RngCore) -> Result<Vec<f64>> {
            Ok(vec![1.0])
        }
    }

    fn agents() -> Vec<AgentId> {
        vec![AgentId::from("A"), AgentId::from("B")]
    }

    #[test]
    fn test_average_over_random_profiles() {
        let mut rng = StdRng::seed_from_u64(0);
        let (means, errors) = average_over_random_profiles(
            &Dummy,
            &agents(),
            &Item::list([0, 1, 2]),
            &MarketConfig::default(),
            0.5,
            10,
            &mut rng,
        )
        .unwrap();
        assert_eq!(means, vec![1.0, 0.0, 5.0]);
        assert_eq!(errors, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_simulate_rows_in_order() {
        let mut rng = StdRng::seed_from_u64(0);
        let rows = simulate(
            &Dummy,
            &agents(),
            &[2, 3, 4],
            &[0.3, 0.7],
            &MarketConfig::default(),
            10,
            &mut rng,
        )
        .unwrap();
        let points: Vec<(f64, usize)> =
            rows.iter().map(|r| (r.noise_size, r.items_per_agent)).collect();
        assert_eq!(points, vec![(0.3, 2), (0.3, 3), (0.3, 4), (0.7, 2), (0.7, 3), (0.7, 4)]);
        assert!(rows.iter().all(|r| r.agents == 2 && r.iterations == 10));
        assert!(rows.iter().all(|r| r.means == vec![1.0, 0.0, 5.0]));
    }

    #[test]
    fn test_simulate_rejects_column_mismatch() {
        let mut rng = StdRng::seed_from_u64(0);
        let result =
            simulate(&Narrow, &agents(), &[1], &[0.1], &MarketConfig::default(), 2, &mut rng);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_simulate_twice_default_sweeps() {
        let config = ExperimentConfig {
            iterations: 10,
            ..ExperimentConfig::for_agents(vec!["A".into(), "B".into()])
        };
        let mut rng = StdRng::seed_from_u64(0);
        let report = simulate_twice(&Dummy, &config, &mut rng).unwrap();
        assert_eq!(report.noise_sweep.len(), 10);
        assert!(report.noise_sweep.iter().all(|r| r.items_per_agent == 5));
        assert_eq!(report.items_sweep.len(), 7);
        assert!(report.items_sweep.iter().all(|r| r.noise_size == 0.5));
        assert_eq!(report.columns.len(), 3);
    }

    #[test]
    fn test_real_check_is_reproducible() {
        let config = ExperimentConfig {
            iterations: 5,
            noise_sweep: SweepConfig { items_per_agent: vec![2], noise_sizes: vec![0.2, 0.8] },
            items_sweep: SweepConfig { items_per_agent: vec![1, 3], noise_sizes: vec![0.5] },
            ..ExperimentConfig::default()
        };
        for kind in [CheckKind::Proportionality, CheckKind::EnvyFreeness] {
            let checker = kind.checker();
            let first =
                simulate_twice(checker.as_ref(), &config, &mut StdRng::seed_from_u64(11)).unwrap();
            let second =
                simulate_twice(checker.as_ref(), &config, &mut StdRng::seed_from_u64(11)).unwrap();
            assert_eq!(first.noise_sweep, second.noise_sweep);
            assert_eq!(first.items_sweep, second.items_sweep);
            for row in first.noise_sweep.iter().chain(&first.items_sweep) {
                assert_eq!(row.means.len(), checker.columns().len());
                // every column is a count, flag or share, never negative
                assert!(row.means.iter().all(|m| *m >= 0.0));
            }
        }
    }

    #[test]
    fn test_simulate_twice_validates() {
        let config = ExperimentConfig {
            iterations: 0,
            ..ExperimentConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            simulate_twice(&Dummy, &config, &mut rng),
            Err(Error::InvalidConfig(_))
        ));
    }
}
