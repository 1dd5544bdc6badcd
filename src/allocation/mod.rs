//! Constructing and searching for fair allocations
//!
//! Algorithms never mutate the caller's profile. They work on an [`ItemPool`]:
//! the immutable profile plus the set of items not yet handed out.

pub mod logging;
pub mod partitions;

pub use logging::*;
pub use partitions::{EqualPartitions, equal_partition_count, equal_partitions};

use crate::error::{Error, Result};
use crate::fairness::Criterion;
use crate::preference::PreferenceProfile;
use crate::types::{AgentId, Allocation, Item};
use crate::{alloc_debug, alloc_info};
use rand::Rng;
use rand::seq::IteratorRandom;
use std::collections::BTreeSet;

/// Largest number of agents the bounded search accepts
pub const MAX_SEARCH_AGENTS: usize = 3;

/// A profile together with the items that are still available
#[derive(Debug, Clone)]
pub struct ItemPool<'a> {
    profile: &'a PreferenceProfile,
    remaining: BTreeSet<Item>,
}

impl<'a> ItemPool<'a> {
    pub fn new(profile: &'a PreferenceProfile) -> Self {
        Self {
            profile,
            remaining: profile.items().clone(),
        }
    }

    pub fn profile(&self) -> &'a PreferenceProfile {
        self.profile
    }

    pub fn remaining(&self) -> &BTreeSet<Item> {
        &self.remaining
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    /// The agent's highest-ranked item that is still available
    pub fn best_item(&self, agent: &AgentId) -> Result<Item> {
        self.profile
            .preference(agent)?
            .order()
            .iter()
            .copied()
            .find(|item| self.remaining.contains(item))
            .ok_or_else(|| Error::InvalidPreference(format!("no items left for agent {}", agent)))
    }

    /// Mark an item as handed out
    pub fn take(&mut self, item: Item) -> Result<()> {
        if self.remaining.remove(&item) {
            Ok(())
        } else {
            Err(Error::ItemNotFound(item))
        }
    }

    /// Hand the agent its best available item
    pub fn give_best(&mut self, agent: &AgentId, allocation: &mut Allocation) -> Result<Item> {
        let item = self.best_item(agent)?;
        self.take(item)?;
        allocation.give(agent, item);
        Ok(item)
    }
}

/// Agents pick their best remaining item in turn; the order reverses after
/// every round (A B C C B A A B C ...).
fn serpentine_draft(
    profile: &PreferenceProfile,
    mut order: Vec<AgentId>,
    rounds: usize,
) -> Result<Allocation> {
    let mut pool = ItemPool::new(profile);
    let mut allocation = Allocation::for_agents(&order);
    for round in 1..=rounds {
        for agent in &order {
            let item = pool.give_best(agent, &mut allocation)?;
            alloc_debug!("round {}: {} picks {}", round, agent, item);
        }
        order.reverse();
    }
    Ok(allocation)
}

/// Serpentine draft that first checks the two necessary conditions for an
/// NDD-proportional allocation: the items split evenly, and every agent has a
/// different best item.
///
/// Returns `Ok(None)` when either condition fails.
pub fn find_ndd_proportional_allocation(profile: &PreferenceProfile) -> Result<Option<Allocation>> {
    let Some(per_agent) = profile.items_per_agent() else {
        alloc_info!(
            "{} items cannot be split evenly among {} agents",
            profile.item_count(),
            profile.agent_count()
        );
        return Ok(None);
    };
    if !profile.best_items_distinct()? {
        alloc_info!("best items collide; no NDD-proportional allocation");
        return Ok(None);
    }
    let order: Vec<AgentId> = profile.agents().cloned().collect();
    serpentine_draft(profile, order, per_agent).map(Some)
}

/// Serpentine draft in lexicographic agent order, without any precondition.
///
/// Each agent gets `item_count / agent_count` items; any remainder stays
/// unallocated. This is a baseline and carries no fairness guarantee.
pub fn find_serpentine_allocation(profile: &PreferenceProfile) -> Result<Allocation> {
    let per_agent = profile.item_count() / profile.agent_count();
    let order: Vec<AgentId> = profile.agents().cloned().collect();
    serpentine_draft(profile, order, per_agent)
}

/// Every agent, in lexicographic order, takes its best remaining item; the
/// rest is dealt out uniformly at random, one item per agent per round.
///
/// Returns `Ok(None)` when the items cannot be split evenly.
pub fn find_random_allocation<R: Rng + ?Sized>(
    profile: &PreferenceProfile,
    rng: &mut R,
) -> Result<Option<Allocation>> {
    let Some(per_agent) = profile.items_per_agent() else {
        return Ok(None);
    };
    let agents: Vec<AgentId> = profile.agents().cloned().collect();
    let mut pool = ItemPool::new(profile);
    let mut allocation = Allocation::for_agents(&agents);

    for agent in &agents {
        let item = pool.give_best(agent, &mut allocation)?;
        alloc_debug!("{} takes best item {}", agent, item);
    }
    for _ in 1..per_agent {
        for agent in &agents {
            let item = pool
                .remaining()
                .iter()
                .copied()
                .choose(rng)
                .ok_or_else(|| Error::InvalidProfile("ran out of items".to_string()))?;
            pool.take(item)?;
            allocation.give(agent, item);
            alloc_debug!("{} receives random item {}", agent, item);
        }
    }
    Ok(Some(allocation))
}

/// Exhaustive search for an allocation satisfying `is_fair`, for at most
/// [`MAX_SEARCH_AGENTS`] agents.
///
/// Every agent receives its best item; the remaining items are tried in every
/// equal partition and each candidate is tested against the full profile.
/// Returns the first candidate that passes, or `Ok(None)` if the items do not
/// split evenly, best items collide, or no candidate passes.
pub fn find_necessarily_fair_allocation<F>(
    profile: &PreferenceProfile,
    is_fair: F,
) -> Result<Option<Allocation>>
where
    F: Fn(&PreferenceProfile, &Allocation) -> Result<bool>,
{
    let agent_count = profile.agent_count();
    if agent_count > MAX_SEARCH_AGENTS {
        return Err(Error::UnsupportedAgentCount(agent_count));
    }
    if profile.items_per_agent().is_none() {
        alloc_info!(
            "{} items cannot be split evenly among {} agents",
            profile.item_count(),
            agent_count
        );
        return Ok(None);
    }

    let agents: Vec<AgentId> = profile.agents().cloned().collect();
    let best = agents
        .iter()
        .map(|agent| profile.preference(agent)?.best_item())
        .collect::<Result<Vec<Item>>>()?;
    if best.iter().collect::<BTreeSet<_>>().len() < agent_count {
        alloc_info!("best items collide; skipping search");
        return Ok(None);
    }

    let mut pool = ItemPool::new(profile);
    for &item in &best {
        pool.take(item)?;
    }
    let rest: Vec<Item> = pool.remaining().iter().copied().collect();
    alloc_debug!(
        "searching {:?} partitions of {} remaining items",
        equal_partition_count(agent_count, rest.len()),
        rest.len()
    );

    for (checked, partition) in equal_partitions(&agents, &rest)?.enumerate() {
        let candidate: Allocation = agents
            .iter()
            .zip(&best)
            .map(|(agent, &top)| {
                let mut bundle = vec![top];
                bundle.extend_from_slice(partition.bundle(agent).unwrap_or_default());
                (agent.clone(), bundle)
            })
            .collect();
        if is_fair(profile, &candidate)? {
            alloc_info!("found fair allocation {} after {} candidates", candidate, checked + 1);
            return Ok(Some(candidate));
        }
    }
    alloc_info!("no fair allocation among equal partitions");
    Ok(None)
}

/// Bounded search for an allocation satisfying `criterion`
pub fn find_fair_allocation(
    profile: &PreferenceProfile,
    criterion: Criterion,
) -> Result<Option<Allocation>> {
    find_necessarily_fair_allocation(profile, |p, a| criterion.holds(p, a))
}

pub fn find_necessarily_proportional_allocation(
    profile: &PreferenceProfile,
) -> Result<Option<Allocation>> {
    find_necessarily_fair_allocation(profile, crate::fairness::is_necessarily_proportional)
}

pub fn find_necessarily_envy_free_allocation(
    profile: &PreferenceProfile,
) -> Result<Option<Allocation>> {
    find_necessarily_fair_allocation(profile, crate::fairness::is_necessarily_envy_free)
}
