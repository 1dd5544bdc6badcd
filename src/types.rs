//! Core types shared by preferences, fairness predicates and allocation algorithms

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};

/// Identifier of an indivisible item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct Item(pub u32);

impl Item {
    /// Build a bundle from raw item ids, keeping their order
    pub fn list<I: IntoIterator<Item = u32>>(ids: I) -> Bundle {
        ids.into_iter().map(Item).collect()
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Item {
    fn from(v: u32) -> Self {
        Item(v)
    }
}

impl From<Item> for u32 {
    fn from(i: Item) -> Self {
        i.0
    }
}

/// Name of an agent. Agents iterate in lexicographic order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct AgentId(pub String);

impl AgentId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(v: &str) -> Self {
        Self(v.to_string())
    }
}

impl From<String> for AgentId {
    fn from(v: String) -> Self {
        Self(v)
    }
}

/// Items given to one agent, in the order they were handed out
pub type Bundle = Vec<Item>;

/// Mapping from agent to bundle
///
/// Backed by a `BTreeMap` so iteration and `Display` follow agent name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Allocation(BTreeMap<AgentId, Bundle>);

impl Allocation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty bundles for each of the given agents
    pub fn for_agents<'a, I: IntoIterator<Item = &'a AgentId>>(agents: I) -> Self {
        Self(agents.into_iter().map(|a| (a.clone(), Bundle::new())).collect())
    }

    pub fn insert(&mut self, agent: impl Into<AgentId>, bundle: Bundle) -> Option<Bundle> {
        self.0.insert(agent.into(), bundle)
    }

    /// Append an item to an agent's bundle, creating the bundle if needed
    pub fn give(&mut self, agent: &AgentId, item: Item) {
        self.0.entry(agent.clone()).or_default().push(item);
    }

    pub fn bundle(&self, agent: &AgentId) -> Option<&[Item]> {
        self.0.get(agent).map(Vec::as_slice)
    }

    /// Like `bundle`, but a missing agent is an error
    pub fn bundle_of(&self, agent: &AgentId) -> Result<&[Item]> {
        self.bundle(agent)
            .ok_or_else(|| Error::UnknownAgent(agent.clone()))
    }

    pub fn agents(&self) -> impl Iterator<Item = &AgentId> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AgentId, &Bundle)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of items over all bundles
    pub fn item_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn into_inner(self) -> BTreeMap<AgentId, Bundle> {
        self.0
    }
}

impl<A: Into<AgentId>> FromIterator<(A, Bundle)> for Allocation {
    fn from_iter<I: IntoIterator<Item = (A, Bundle)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(a, b)| (a.into(), b)).collect())
    }
}

impl<A: Into<AgentId>, const N: usize> From<[(A, Bundle); N]> for Allocation {
    fn from(entries: [(A, Bundle); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl fmt::Display for Allocation {
    /// Renders as `{Alice:[6, 1], Bob:[5, 2]}`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = self
            .0
            .iter()
            .map(|(agent, bundle)| format!("{}:{}", agent, bundle_string(bundle)))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{{{}}}", body)
    }
}

/// Render a bundle as `[6, 1]`
pub fn bundle_string(bundle: &[Item]) -> String {
    let inner = bundle
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", inner)
}
