//! Preferences of a single agent over a set of items
//!
//! A [`Preference`] is either ordinal (a ranking) or cardinal (a value per
//! item, which also determines the ranking). Every preference carries Borda
//! scores derived from its ranking: the top item scores the item count, the
//! last item scores 1.

pub mod profile;

pub use profile::PreferenceProfile;

use crate::error::{Error, Result};
use crate::types::Item;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Ranking of items by one agent, most-preferred first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PreferenceRecord", into = "PreferenceRecord")]
pub struct Preference {
    order: Vec<Item>,
    values: Option<HashMap<Item, f64>>,
    borda: HashMap<Item, u32>,
}

impl Preference {
    /// Build an ordinal preference from raw item ids, most-preferred first
    pub fn from_order<I: IntoIterator<Item = u32>>(order: I) -> Result<Self> {
        Self::from_items(order.into_iter().map(Item))
    }

    /// Build a cardinal preference from raw item ids and their values
    pub fn from_values<I: IntoIterator<Item = (u32, f64)>>(values: I) -> Result<Self> {
        Self::from_item_values(values.into_iter().map(|(i, v)| (Item(i), v)))
    }

    /// Build an ordinal preference from a ranking, most-preferred first
    pub fn from_items<I: IntoIterator<Item = Item>>(order: I) -> Result<Self> {
        let order: Vec<Item> = order.into_iter().collect();
        check_ranking(&order)?;
        let borda = derive_borda(&order);
        Ok(Self {
            order,
            values: None,
            borda,
        })
    }

    /// Build a cardinal preference. The ranking sorts items by decreasing
    /// value; equal values keep their input order.
    pub fn from_item_values<I: IntoIterator<Item = (Item, f64)>>(values: I) -> Result<Self> {
        let mut entries: Vec<(Item, f64)> = values.into_iter().collect();
        if let Some((item, value)) = entries.iter().find(|(_, v)| !v.is_finite()) {
            return Err(Error::InvalidPreference(format!(
                "value {} of item {} is not finite",
                value, item
            )));
        }
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));

        let order: Vec<Item> = entries.iter().map(|(i, _)| *i).collect();
        check_ranking(&order)?;
        let borda = derive_borda(&order);
        Ok(Self {
            order,
            values: Some(entries.into_iter().collect()),
            borda,
        })
    }

    /// Items in ranked order, most-preferred first
    pub fn order(&self) -> &[Item] {
        &self.order
    }

    pub fn values(&self) -> Option<&HashMap<Item, f64>> {
        self.values.as_ref()
    }

    pub fn is_cardinal(&self) -> bool {
        self.values.is_some()
    }

    pub fn item_count(&self) -> usize {
        self.order.len()
    }

    pub fn contains(&self, item: Item) -> bool {
        self.borda.contains_key(&item)
    }

    pub fn best_item(&self) -> Result<Item> {
        self.order
            .first()
            .copied()
            .ok_or_else(|| Error::InvalidPreference("ranking is empty".to_string()))
    }

    /// Borda score of a single item.
    ///
    /// Scores are fixed at construction time: removing other items does not
    /// renumber the survivors.
    pub fn borda_score(&self, item: Item) -> Result<u32> {
        self.borda.get(&item).copied().ok_or(Error::ItemNotFound(item))
    }

    /// Borda scores of the items in the bundle, largest first
    pub fn borda_scores_of(&self, bundle: &[Item]) -> Result<Vec<u32>> {
        let mut scores = bundle
            .iter()
            .map(|&item| self.borda_score(item))
            .collect::<Result<Vec<_>>>()?;
        scores.sort_unstable_by(|a, b| b.cmp(a));
        Ok(scores)
    }

    pub fn value(&self, item: Item) -> Result<f64> {
        let values = self.values.as_ref().ok_or(Error::NoCardinalValues)?;
        values.get(&item).copied().ok_or(Error::ItemNotFound(item))
    }

    /// Sum of the values of the items in the bundle
    pub fn value_of(&self, bundle: &[Item]) -> Result<f64> {
        bundle.iter().map(|&item| self.value(item)).sum()
    }

    /// Value of every item still ranked
    pub fn total_value(&self) -> Result<f64> {
        self.value_of(&self.order)
    }

    /// Remove an item from the ranking, the values and the scores.
    pub fn remove_item(&mut self, item: Item) -> Result<()> {
        let pos = self
            .order
            .iter()
            .position(|&i| i == item)
            .ok_or(Error::ItemNotFound(item))?;
        self.order.remove(pos);
        self.borda.remove(&item);
        if let Some(values) = self.values.as_mut() {
            values.remove(&item);
        }
        Ok(())
    }

    /// True iff the values, read in ranked order, have non-negative second
    /// differences: the gap between consecutive items never grows going down.
    pub fn is_diminishing_differences(&self) -> Result<bool> {
        let values = self
            .order
            .iter()
            .map(|&item| self.value(item))
            .collect::<Result<Vec<_>>>()?;
        let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
        Ok(diffs.windows(2).all(|w| w[1] - w[0] >= 0.0))
    }
}

impl fmt::Display for Preference {
    /// `cardinal=100:6.2 300:3.4 ordinal=100>300` or just the ordinal part
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(values) = &self.values {
            let cardinal = self
                .order
                .iter()
                .map(|item| format!("{}:{}", item, values[item]))
                .collect::<Vec<_>>()
                .join(" ");
            write!(f, "cardinal={} ", cardinal)?;
        }
        let ordinal = self
            .order
            .iter()
            .map(|item| item.to_string())
            .collect::<Vec<_>>()
            .join(">");
        write!(f, "ordinal={}", ordinal)
    }
}

fn check_ranking(order: &[Item]) -> Result<()> {
    if order.is_empty() {
        return Err(Error::InvalidPreference("ranking is empty".to_string()));
    }
    let mut seen = HashSet::with_capacity(order.len());
    for item in order {
        if !seen.insert(*item) {
            return Err(Error::InvalidPreference(format!(
                "item {} is ranked twice",
                item
            )));
        }
    }
    Ok(())
}

fn derive_borda(order: &[Item]) -> HashMap<Item, u32> {
    let count = order.len() as u32;
    order
        .iter()
        .enumerate()
        .map(|(rank, &item)| (item, count - rank as u32))
        .collect()
}

/// On-disk form of a preference: vectors aligned with the ranking
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PreferenceRecord {
    order: Vec<Item>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    values: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    borda: Option<Vec<u32>>,
}

impl From<Preference> for PreferenceRecord {
    fn from(p: Preference) -> Self {
        let values = p
            .values
            .as_ref()
            .map(|values| p.order.iter().map(|item| values[item]).collect());
        let borda = Some(p.order.iter().map(|item| p.borda[item]).collect());
        Self {
            order: p.order,
            values,
            borda,
        }
    }
}

impl TryFrom<PreferenceRecord> for Preference {
    type Error = Error;

    fn try_from(record: PreferenceRecord) -> Result<Self> {
        check_ranking(&record.order)?;
        let len = record.order.len();

        let values = match record.values {
            Some(values) => {
                if values.len() != len {
                    return Err(Error::InvalidPreference(format!(
                        "{} values for {} ranked items",
                        values.len(),
                        len
                    )));
                }
                if values.iter().any(|v| !v.is_finite()) {
                    return Err(Error::InvalidPreference("non-finite value".to_string()));
                }
                if values.windows(2).any(|w| w[0] < w[1]) {
                    return Err(Error::InvalidPreference(
                        "values contradict the ranking".to_string(),
                    ));
                }
                Some(record.order.iter().copied().zip(values).collect())
            }
            None => None,
        };

        let borda = match record.borda {
            Some(scores) => {
                if scores.len() != len {
                    return Err(Error::InvalidPreference(format!(
                        "{} scores for {} ranked items",
                        scores.len(),
                        len
                    )));
                }
                if scores.windows(2).any(|w| w[0] <= w[1]) || scores.iter().any(|&s| s == 0) {
                    return Err(Error::InvalidPreference(
                        "scores must be positive and strictly decreasing".to_string(),
                    ));
                }
                record.order.iter().copied().zip(scores).collect()
            }
            None => derive_borda(&record.order),
        };

        Ok(Self {
            order: record.order,
            values,
            borda,
        })
    }
}
