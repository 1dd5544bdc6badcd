//! A group of agents whose preferences share one item universe

use super::Preference;
use crate::error::{Error, Result};
use crate::types::{AgentId, Item};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Preferences of several agents over the same items.
///
/// Agents are kept in lexicographic order. Every member preference ranks
/// exactly [`items`](Self::items).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<AgentId, Preference>", into = "BTreeMap<AgentId, Preference>")]
pub struct PreferenceProfile {
    prefs: BTreeMap<AgentId, Preference>,
    items: BTreeSet<Item>,
}

impl PreferenceProfile {
    pub fn new<I, A>(prefs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (A, Preference)>,
        A: Into<AgentId>,
    {
        let mut map = BTreeMap::new();
        for (agent, pref) in prefs {
            let agent: AgentId = agent.into();
            if map.contains_key(&agent) {
                return Err(Error::InvalidProfile(format!("agent {} listed twice", agent)));
            }
            map.insert(agent, pref);
        }
        let prefs = map;

        let Some(first) = prefs.values().next() else {
            return Err(Error::InvalidProfile("no agents".to_string()));
        };
        let items: BTreeSet<Item> = first.order().iter().copied().collect();
        if items.is_empty() {
            return Err(Error::InvalidProfile("no items".to_string()));
        }

        for (agent, pref) in &prefs {
            let ranked: BTreeSet<Item> = pref.order().iter().copied().collect();
            if ranked != items {
                return Err(Error::InvalidProfile(format!(
                    "agent {} ranks a different set of items",
                    agent
                )));
            }
        }

        Ok(Self { prefs, items })
    }

    /// Agents in lexicographic order
    pub fn agents(&self) -> impl Iterator<Item = &AgentId> {
        self.prefs.keys()
    }

    pub fn agent_count(&self) -> usize {
        self.prefs.len()
    }

    /// Items in increasing id order
    pub fn items(&self) -> &BTreeSet<Item> {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn preference(&self, agent: &AgentId) -> Result<&Preference> {
        self.prefs
            .get(agent)
            .ok_or_else(|| Error::UnknownAgent(agent.clone()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AgentId, &Preference)> {
        self.prefs.iter()
    }

    /// Remove the item from every member preference.
    ///
    /// Either every preference loses the item or, if it is unknown, none does.
    /// The last remaining item cannot be removed.
    pub fn remove_item(&mut self, item: Item) -> Result<()> {
        if !self.items.contains(&item) {
            return Err(Error::ItemNotFound(item));
        }
        if self.items.len() == 1 {
            return Err(Error::InvalidProfile(format!("cannot remove last item {}", item)));
        }
        self.items.remove(&item);
        for pref in self.prefs.values_mut() {
            pref.remove_item(item)?;
        }
        Ok(())
    }

    /// Set of the best items of all agents
    pub fn best_items(&self) -> Result<BTreeSet<Item>> {
        self.prefs.values().map(Preference::best_item).collect()
    }

    /// True iff no two agents share a best item
    pub fn best_items_distinct(&self) -> Result<bool> {
        Ok(self.best_items()?.len() == self.agent_count())
    }

    /// Number of agents whose cardinal values have diminishing differences
    pub fn count_diminishing_differences(&self) -> Result<usize> {
        let mut count = 0;
        for pref in self.prefs.values() {
            if pref.is_diminishing_differences()? {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Number of items each agent gets in an equal split, if one exists
    pub fn items_per_agent(&self) -> Option<usize> {
        let agents = self.agent_count();
        let items = self.item_count();
        (items % agents == 0).then_some(items / agents)
    }
}

impl TryFrom<BTreeMap<AgentId, Preference>> for PreferenceProfile {
    type Error = Error;

    fn try_from(prefs: BTreeMap<AgentId, Preference>) -> Result<Self> {
        Self::new(prefs)
    }
}

impl From<PreferenceProfile> for BTreeMap<AgentId, Preference> {
    fn from(profile: PreferenceProfile) -> Self {
        profile.prefs
    }
}

impl fmt::Display for PreferenceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (agent, pref)) in self.prefs.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", agent, pref)?;
        }
        Ok(())
    }
}
