//! Fairness predicates over allocations
//!
//! Cardinal predicates use each agent's exact values. Ordinal predicates take
//! a [`WeaklyBetter`] relation, so one routine covers every dominance notion.

use crate::dominance::{Dominance, WeaklyBetter};
use crate::error::Result;
use crate::preference::PreferenceProfile;
use crate::types::{Allocation, Item};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Each agent values its own bundle at least `1/n` of all items.
pub fn is_cardinally_proportional(
    profile: &PreferenceProfile,
    allocation: &Allocation,
) -> Result<bool> {
    let agent_count = profile.agent_count() as f64;
    for (agent, pref) in profile.iter() {
        let own = pref.value_of(allocation.bundle_of(agent)?)?;
        if own * agent_count < pref.total_value()? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// No agent values another bundle strictly above its own.
pub fn is_cardinally_envy_free(
    profile: &PreferenceProfile,
    allocation: &Allocation,
) -> Result<bool> {
    for (agent, pref) in profile.iter() {
        let own = pref.value_of(allocation.bundle_of(agent)?)?;
        for other in profile.agents() {
            if own < pref.value_of(allocation.bundle_of(other)?)? {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

/// Repeat each item `times` times in place: `[2, 1]` twice is `[2, 2, 1, 1]`
pub fn duplicate_each_item(bundle: &[Item], times: usize) -> Vec<Item> {
    bundle
        .iter()
        .flat_map(|&item| std::iter::repeat_n(item, times))
        .collect()
}

/// Each agent's bundle, blown up `n` times, is weakly better than the full
/// ranking under `relation`.
pub fn is_proportional<R: WeaklyBetter + ?Sized>(
    profile: &PreferenceProfile,
    allocation: &Allocation,
    relation: &R,
) -> Result<bool> {
    let agent_count = profile.agent_count();
    for (agent, pref) in profile.iter() {
        let duplicated = duplicate_each_item(allocation.bundle_of(agent)?, agent_count);
        if !relation.weakly_better(pref, &duplicated, pref.order())? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Every agent finds its bundle weakly better than every other agent's
/// bundle under `relation`.
///
/// For the possible notions this is the pairwise (weak) form: each pair is
/// checked on its own, not under one common valuation.
pub fn is_envy_free<R: WeaklyBetter + ?Sized>(
    profile: &PreferenceProfile,
    allocation: &Allocation,
    relation: &R,
) -> Result<bool> {
    for (agent, pref) in profile.iter() {
        let own = allocation.bundle_of(agent)?;
        for other in profile.agents().filter(|&other| other != agent) {
            if !relation.weakly_better(pref, own, allocation.bundle_of(other)?)? {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

pub fn is_necessarily_proportional(
    profile: &PreferenceProfile,
    allocation: &Allocation,
) -> Result<bool> {
    is_proportional(profile, allocation, &Dominance::Necessary)
}

pub fn is_ndd_proportional(profile: &PreferenceProfile, allocation: &Allocation) -> Result<bool> {
    is_proportional(profile, allocation, &Dominance::NecessaryDD)
}

pub fn is_pdd_proportional(profile: &PreferenceProfile, allocation: &Allocation) -> Result<bool> {
    is_proportional(profile, allocation, &Dominance::PossibleDD)
}

pub fn is_possibly_proportional(
    profile: &PreferenceProfile,
    allocation: &Allocation,
) -> Result<bool> {
    is_proportional(profile, allocation, &Dominance::Possible)
}

pub fn is_necessarily_envy_free(
    profile: &PreferenceProfile,
    allocation: &Allocation,
) -> Result<bool> {
    is_envy_free(profile, allocation, &Dominance::Necessary)
}

pub fn is_ndd_envy_free(profile: &PreferenceProfile, allocation: &Allocation) -> Result<bool> {
    is_envy_free(profile, allocation, &Dominance::NecessaryDD)
}

pub fn is_pdd_envy_free(profile: &PreferenceProfile, allocation: &Allocation) -> Result<bool> {
    is_envy_free(profile, allocation, &Dominance::PossibleDD)
}

pub fn is_possibly_envy_free(profile: &PreferenceProfile, allocation: &Allocation) -> Result<bool> {
    is_envy_free(profile, allocation, &Dominance::Possible)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fairness {
    Proportional,
    EnvyFree,
}

/// A fairness notion evaluated under one dominance relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Criterion {
    pub fairness: Fairness,
    pub dominance: Dominance,
}

impl Criterion {
    pub const fn new(fairness: Fairness, dominance: Dominance) -> Self {
        Self { fairness, dominance }
    }

    pub const fn proportional(dominance: Dominance) -> Self {
        Self::new(Fairness::Proportional, dominance)
    }

    pub const fn envy_free(dominance: Dominance) -> Self {
        Self::new(Fairness::EnvyFree, dominance)
    }

    pub fn holds(&self, profile: &PreferenceProfile, allocation: &Allocation) -> Result<bool> {
        match self.fairness {
            Fairness::Proportional => is_proportional(profile, allocation, &self.dominance),
            Fairness::EnvyFree => is_envy_free(profile, allocation, &self.dominance),
        }
    }
}

impl fmt::Display for Criterion {
    /// `NDDPR`, `NecEF`, ...
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.fairness {
            Fairness::Proportional => "PR",
            Fairness::EnvyFree => "EF",
        };
        write!(f, "{}{}", self.dominance.label(), suffix)
    }
}
