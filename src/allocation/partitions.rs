//! Enumeration of equal partitions
//!
//! Each partition of `n` items among `a` labelled agents into bundles of
//! `n / a` items corresponds to exactly one sequence that assigns an agent
//! index to every item, with each index used `n / a` times. Stepping through
//! those sequences in lexicographic order (next multiset permutation) visits
//! every partition once, lazily and in a fixed order.

use crate::error::{Error, Result};
use crate::types::{AgentId, Allocation, Bundle, Item};

/// Lazy iterator over every equal partition of `items` among `agents`
#[derive(Debug, Clone)]
pub struct EqualPartitions {
    agents: Vec<AgentId>,
    items: Vec<Item>,
    owners: Vec<usize>,
    done: bool,
}

/// Enumerate every split of `items` into one bundle of `items.len() / agents.len()`
/// items per agent.
///
/// Bundles list their items in the order they appear in `items`.
pub fn equal_partitions(agents: &[AgentId], items: &[Item]) -> Result<EqualPartitions> {
    if agents.is_empty() || items.len() % agents.len() != 0 {
        return Err(Error::IndivisibleInput {
            items: items.len(),
            agents: agents.len(),
        });
    }
    let per_agent = items.len() / agents.len();
    let owners = (0..agents.len())
        .flat_map(|a| std::iter::repeat_n(a, per_agent))
        .collect();
    Ok(EqualPartitions {
        agents: agents.to_vec(),
        items: items.to_vec(),
        owners,
        done: false,
    })
}

impl EqualPartitions {
    fn current(&self) -> Allocation {
        let mut bundles: Vec<Bundle> = vec![Bundle::new(); self.agents.len()];
        for (&owner, &item) in self.owners.iter().zip(&self.items) {
            bundles[owner].push(item);
        }
        self.agents.iter().cloned().zip(bundles).collect()
    }
}

impl Iterator for EqualPartitions {
    type Item = Allocation;

    fn next(&mut self) -> Option<Allocation> {
        if self.done {
            return None;
        }
        let allocation = self.current();
        self.done = !next_permutation(&mut self.owners);
        Some(allocation)
    }
}

/// Advance to the next lexicographic permutation. Returns false, leaving the
/// slice untouched, when it is already the last one.
fn next_permutation(seq: &mut [usize]) -> bool {
    let Some(pivot) = seq.windows(2).rposition(|w| w[0] < w[1]) else {
        return false;
    };
    let successor = seq
        .iter()
        .rposition(|&x| x > seq[pivot])
        .unwrap_or(pivot + 1);
    seq.swap(pivot, successor);
    seq[pivot + 1..].reverse();
    true
}

/// Number of equal partitions: `n! / ((n/a)!)^a`
pub fn equal_partition_count(agent_count: usize, item_count: usize) -> Option<u128> {
    if agent_count == 0 || item_count % agent_count != 0 {
        return None;
    }
    let per_agent = item_count / agent_count;
    let mut count: u128 = 1;
    let mut placed = 0u128;
    // product of binomials C(placed + per_agent, per_agent)
    for _ in 0..agent_count {
        for k in 1..=per_agent as u128 {
            count = count.checked_mul(placed + k)? / k;
        }
        placed += per_agent as u128;
    }
    Some(count)
}
