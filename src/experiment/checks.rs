//! Per-profile measurements averaged by the sweeps
//!
//! A check inspects every equal partition of a profile, so its cost grows with
//! the partition count. Every partition is also used to verify that the
//! dominance notions imply each other and that necessary fairness implies
//! cardinal fairness.

use crate::allocation::{equal_partitions, find_random_allocation, find_serpentine_allocation};
use crate::dominance::Dominance;
use crate::error::{Error, Result};
use crate::fairness::{
    Criterion, is_cardinally_envy_free, is_cardinally_proportional, is_envy_free, is_proportional,
};
use crate::preference::PreferenceProfile;
use crate::types::{AgentId, Allocation, Item};
use crate::alloc_debug;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Maps a profile to a fixed-width vector of numbers
pub trait ProfileCheck {
    fn name(&self) -> &'static str;

    fn columns(&self) -> Vec<String>;

    fn check(&self, profile: &PreferenceProfile, rng: &mut dyn RngCore) -> Result<Vec<f64>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    #[default]
    Proportionality,
    EnvyFreeness,
}

impl CheckKind {
    pub fn checker(self) -> Box<dyn ProfileCheck> {
        match self {
            CheckKind::Proportionality => Box::new(ProportionalityCheck),
            CheckKind::EnvyFreeness => Box::new(EnvyFreenessCheck),
        }
    }
}

fn flag(b: bool) -> f64 {
    if b { 1.0 } else { 0.0 }
}

fn all_partitions(profile: &PreferenceProfile) -> Result<impl Iterator<Item = Allocation>> {
    let agents: Vec<AgentId> = profile.agents().cloned().collect();
    let items: Vec<Item> = profile.items().iter().copied().collect();
    equal_partitions(&agents, &items)
}

/// Evaluate `holds` under every dominance relation, strongest first, and fail
/// if a stronger relation holds while a weaker one does not.
fn evaluate_chain<F>(
    fairness_label: &str,
    cardinally_fair: bool,
    allocation: &Allocation,
    mut holds: F,
) -> Result<[bool; 4]>
where
    F: FnMut(Dominance) -> Result<bool>,
{
    let mut results = [false; 4];
    for (slot, dominance) in results.iter_mut().zip(Dominance::ALL) {
        *slot = holds(dominance)?;
    }
    for (i, pair) in results.windows(2).enumerate() {
        if pair[0] && !pair[1] {
            return Err(Error::ImplicationViolated(format!(
                "{}{} holds but {}{} does not for {}",
                Dominance::ALL[i],
                fairness_label,
                Dominance::ALL[i + 1],
                fairness_label,
                allocation
            )));
        }
    }
    if results[0] && !cardinally_fair {
        return Err(Error::ImplicationViolated(format!(
            "Nec{} holds but the allocation {} is not cardinally fair",
            fairness_label, allocation
        )));
    }
    Ok(results)
}

/// Which proportional allocations exist, and whether the fixed-order draft
/// is cardinally proportional when they do.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProportionalityCheck;

impl ProfileCheck for ProportionalityCheck {
    fn name(&self) -> &'static str {
        "proportionality"
    }

    fn columns(&self) -> Vec<String> {
        [
            "NecPR exists",
            "NDDPR exists",
            "NDDPR fair",
            "PDDPR exists",
            "PDDPR fair",
            "PosPR exists",
            "PosPR fair",
            "ABCCBA fair",
            "DD",
        ]
        .map(String::from)
        .to_vec()
    }

    fn check(&self, profile: &PreferenceProfile, _rng: &mut dyn RngCore) -> Result<Vec<f64>> {
        let mut exists = [false; 4];
        for allocation in all_partitions(profile)? {
            let cardinal = is_cardinally_proportional(profile, &allocation)?;
            let holds = evaluate_chain("PR", cardinal, &allocation, |d| {
                is_proportional(profile, &allocation, &d)
            })?;
            for (e, h) in exists.iter_mut().zip(holds) {
                *e |= h;
            }
        }

        let draft = find_serpentine_allocation(profile)?;
        let draft_fair = is_cardinally_proportional(profile, &draft)?;
        alloc_debug!("draft {} cardinally proportional: {}", draft, draft_fair);
        let dd_share =
            profile.count_diminishing_differences()? as f64 / profile.agent_count() as f64;

        let [nec, ndd, pdd, pos] = exists;
        Ok(vec![
            flag(nec),
            flag(ndd),
            flag(ndd && draft_fair),
            flag(pdd),
            flag(pdd && draft_fair),
            flag(pos),
            flag(pos && draft_fair),
            flag(draft_fair),
            dd_share,
        ])
    }
}

/// How many equal partitions are envy-free under each notion, how many of
/// those are also cardinally envy-free, and how the fixed-order draft and the
/// random baseline fare.
///
/// The PDD and Pos notions are the pairwise ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvyFreenessCheck;

impl ProfileCheck for EnvyFreenessCheck {
    fn name(&self) -> &'static str {
        "envy_freeness"
    }

    fn columns(&self) -> Vec<String> {
        let mut columns = vec!["Cardinally fair".to_string(), "Fair exists".to_string()];
        let labels = Dominance::ALL
            .map(|d| Criterion::envy_free(d).to_string())
            .into_iter()
            .chain(["ABCCBA".to_string(), "Baseline".to_string()]);
        for label in labels {
            columns.push(label.clone());
            columns.push(format!("{} and fair", label));
            columns.push(format!("{} exists", label));
        }
        columns
    }

    fn check(&self, profile: &PreferenceProfile, rng: &mut dyn RngCore) -> Result<Vec<f64>> {
        let mut fair_count = 0usize;
        let mut counts = [0usize; 4];
        let mut fair_counts = [0usize; 4];
        for allocation in all_partitions(profile)? {
            let cardinal = is_cardinally_envy_free(profile, &allocation)?;
            let holds = evaluate_chain("EF", cardinal, &allocation, |d| {
                is_envy_free(profile, &allocation, &d)
            })?;
            fair_count += usize::from(cardinal);
            for (i, h) in holds.into_iter().enumerate() {
                counts[i] += usize::from(h);
                fair_counts[i] += usize::from(h && cardinal);
            }
        }

        // both baselines only count when the best items are distinct
        let distinct_best = profile.best_items_distinct()?;
        let draft = find_serpentine_allocation(profile)?;
        let draft_fair = distinct_best && is_cardinally_envy_free(profile, &draft)?;
        let baseline_fair = match find_random_allocation(profile, rng)? {
            Some(baseline) => distinct_best && is_cardinally_envy_free(profile, &baseline)?,
            None => false,
        };
        let baseline_count = if distinct_best { fair_count } else { 0 };

        let mut row = vec![fair_count as f64, flag(fair_count > 0)];
        for (count, fair) in counts.into_iter().zip(fair_counts) {
            row.extend([count as f64, fair as f64, flag(count > 0)]);
        }
        for is_fair in [draft_fair, baseline_fair] {
            row.extend([
                baseline_count as f64,
                if is_fair { baseline_count as f64 } else { 0.0 },
                flag(baseline_count > 0),
            ]);
        }
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preference::Preference;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn identical_cardinal(agents: &[&str]) -> PreferenceProfile {
        PreferenceProfile::new(agents.iter().map(|agent| {
            let values = (1..=6).map(|i| (i, i as f64));
            (*agent, Preference::from_values(values).unwrap())
        }))
        .unwrap()
    }

    #[test]
    fn test_proportionality_identical_agents() {
        let profile = identical_cardinal(&["Alice", "Bob"]);
        let mut rng = StdRng::seed_from_u64(0);
        let row = ProportionalityCheck.check(&profile, &mut rng).unwrap();
        assert_eq!(row, vec![0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
        assert_eq!(row.len(), ProportionalityCheck.columns().len());
    }

    #[test]
    fn test_envy_freeness_identical_agents() {
        let profile = identical_cardinal(&["Alice", "Bob"]);
        let mut rng = StdRng::seed_from_u64(0);
        let row = EnvyFreenessCheck.check(&profile, &mut rng).unwrap();
        assert_eq!(
            row,
            vec![
                0.0, 0.0, // cardinal
                0.0, 0.0, 0.0, // Nec
                0.0, 0.0, 0.0, // NDD
                4.0, 0.0, 1.0, // PDD
                10.0, 0.0, 1.0, // Pos
                0.0, 0.0, 0.0, // draft
                0.0, 0.0, 0.0, // baseline
            ]
        );
        assert_eq!(row.len(), EnvyFreenessCheck.columns().len());
    }

    #[test]
    fn test_envy_free_columns() {
        let columns = EnvyFreenessCheck.columns();
        assert_eq!(columns[2], "NecEF");
        assert_eq!(columns[3], "NecEF and fair");
        assert_eq!(columns[4], "NecEF exists");
        assert_eq!(columns.last().map(String::as_str), Some("Baseline exists"));
    }

    #[test]
    fn test_checks_need_cardinal_values() {
        let profile = PreferenceProfile::new([
            ("Alice", Preference::from_order([1, 2]).unwrap()),
            ("Bob", Preference::from_order([2, 1]).unwrap()),
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        for kind in [CheckKind::Proportionality, CheckKind::EnvyFreeness] {
            assert_eq!(
                kind.checker().check(&profile, &mut rng),
                Err(Error::NoCardinalValues)
            );
        }
    }

    #[test]
    fn test_checks_need_even_split() {
        let profile = PreferenceProfile::new([
            ("Alice", Preference::from_values([(1, 3.0), (2, 2.0), (3, 1.0)]).unwrap()),
            ("Bob", Preference::from_values([(1, 1.0), (2, 2.0), (3, 3.0)]).unwrap()),
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            ProportionalityCheck.check(&profile, &mut rng),
            Err(Error::IndivisibleInput { items: 3, agents: 2 })
        );
    }

    #[test]
    fn test_opposed_agents_all_fair() {
        // Alice ranks 1 > 2 > 3 > 4, Bob the reverse
        let profile = PreferenceProfile::new([
            ("Alice", Preference::from_values([(1, 4.0), (2, 3.0), (3, 2.0), (4, 1.0)]).unwrap()),
            ("Bob", Preference::from_values([(1, 1.0), (2, 2.0), (3, 3.0), (4, 4.0)]).unwrap()),
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let row = ProportionalityCheck.check(&profile, &mut rng).unwrap();
        // Alice {1,2}, Bob {3,4} is necessarily proportional and is also what
        // the draft produces
        assert_eq!(&row[..8], &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
    }
}
