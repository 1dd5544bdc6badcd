//! Dominance relations between bundles under ordinal information
//!
//! Each relation answers "is bundle A weakly at least as good as bundle B for
//! this agent?" using only the agent's ranking, through Borda scores sorted in
//! decreasing order:
//!
//! | Relation | Holds for | Compares |
//! |---|---|---|
//! | [`Dominance::Necessary`] | every valuation consistent with the ranking | raw scores |
//! | [`Dominance::NecessaryDD`] | every such valuation with diminishing differences | prefix sums |
//! | [`Dominance::PossibleDD`] | some such valuation with diminishing differences | prefix sums |
//! | [`Dominance::Possible`] | some valuation consistent with the ranking | raw scores |
//!
//! Each relation implies the next one down the table.

use crate::error::Result;
use crate::preference::Preference;
use crate::types::Item;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A test of whether one bundle is weakly better than another for an agent
pub trait WeaklyBetter {
    fn weakly_better(&self, pref: &Preference, a: &[Item], b: &[Item]) -> Result<bool>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dominance {
    Necessary,
    NecessaryDD,
    PossibleDD,
    Possible,
}

impl Dominance {
    /// All relations, strongest first
    pub const ALL: [Dominance; 4] = [
        Dominance::Necessary,
        Dominance::NecessaryDD,
        Dominance::PossibleDD,
        Dominance::Possible,
    ];

    /// Whether the relation compares cumulative scores
    pub fn uses_prefix_sums(self) -> bool {
        matches!(self, Dominance::NecessaryDD | Dominance::PossibleDD)
    }

    pub fn is_necessary(self) -> bool {
        matches!(self, Dominance::Necessary | Dominance::NecessaryDD)
    }

    /// Short label used in logs and reports
    pub fn label(self) -> &'static str {
        match self {
            Dominance::Necessary => "Nec",
            Dominance::NecessaryDD => "NDD",
            Dominance::PossibleDD => "PDD",
            Dominance::Possible => "Pos",
        }
    }
}

impl fmt::Display for Dominance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl WeaklyBetter for Dominance {
    fn weakly_better(&self, pref: &Preference, a: &[Item], b: &[Item]) -> Result<bool> {
        let mut scores_a = widen(pref.borda_scores_of(a)?);
        let mut scores_b = widen(pref.borda_scores_of(b)?);
        if self.uses_prefix_sums() {
            accumulate(&mut scores_a);
            accumulate(&mut scores_b);
        }
        Ok(if self.is_necessary() {
            necessarily_dominates(&scores_a, &scores_b)
        } else {
            possibly_dominates(&scores_a, &scores_b)
        })
    }
}

fn widen(scores: Vec<u32>) -> Vec<u64> {
    scores.into_iter().map(u64::from).collect()
}

fn accumulate(scores: &mut [u64]) {
    for i in 1..scores.len() {
        scores[i] += scores[i - 1];
    }
}

/// A is at least as long as B and never loses a position within B's length.
fn necessarily_dominates(a: &[u64], b: &[u64]) -> bool {
    if a.len() < b.len() {
        return false;
    }
    a.iter().zip(b).all(|(x, y)| x >= y)
}

/// A longer A wins outright. Otherwise a single strict win anywhere in A's
/// length suffices, even after a loss; with no win, any loss means false.
fn possibly_dominates(a: &[u64], b: &[u64]) -> bool {
    if a.len() > b.len() {
        return true;
    }
    let mut default = true;
    for (x, y) in a.iter().zip(b) {
        if x > y {
            return true;
        }
        if x < y {
            default = false;
        }
    }
    default
}

impl Preference {
    /// `a >= b` for every valuation consistent with the ranking
    pub fn is_necessarily_weakly_better(&self, a: &[Item], b: &[Item]) -> Result<bool> {
        Dominance::Necessary.weakly_better(self, a, b)
    }

    /// `a >= b` for every valuation consistent with the ranking and with
    /// diminishing differences
    pub fn is_ndd_weakly_better(&self, a: &[Item], b: &[Item]) -> Result<bool> {
        Dominance::NecessaryDD.weakly_better(self, a, b)
    }

    /// `a >= b` for some valuation consistent with the ranking and with
    /// diminishing differences
    pub fn is_pdd_weakly_better(&self, a: &[Item], b: &[Item]) -> Result<bool> {
        Dominance::PossibleDD.weakly_better(self, a, b)
    }

    /// `a >= b` for some valuation consistent with the ranking
    pub fn is_possibly_weakly_better(&self, a: &[Item], b: &[Item]) -> Result<bool> {
        Dominance::Possible.weakly_better(self, a, b)
    }
}
