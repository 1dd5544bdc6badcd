use crate::config::MarketConfig;
use crate::error::{Error, Result};
use crate::preference::{Preference, PreferenceProfile};
use crate::types::{AgentId, Item};
use anyhow::Context;
use rand::Rng;
use rand::distr::{Distribution, Uniform};
use rand::seq::SliceRandom;
use rand_distr::Normal;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// A uniformly random ranking of `items`
pub fn random_ordinal<R: Rng + ?Sized>(items: &[Item], rng: &mut R) -> Result<Preference> {
    let mut order = items.to_vec();
    order.shuffle(rng);
    Preference::from_items(order)
}

/// Market value of each item plus uniform noise in `[-max_noise, max_noise]`
pub fn random_cardinal<R: Rng + ?Sized>(
    market_values: &BTreeMap<Item, f64>,
    max_noise: f64,
    rng: &mut R,
) -> Result<Preference> {
    let noise = Uniform::new_inclusive(-max_noise, max_noise)
        .map_err(|e| Error::InvalidConfig(format!("noise size {}: {}", max_noise, e)))?;
    Preference::from_item_values(
        market_values
            .iter()
            .map(|(&item, &value)| (item, value + noise.sample(rng))),
    )
}

/// Market value of each item plus noise drawn from `Normal(0, stddev)`
pub fn random_cardinal_gaussian<R: Rng + ?Sized>(
    market_values: &BTreeMap<Item, f64>,
    stddev: f64,
    rng: &mut R,
) -> Result<Preference> {
    if !(stddev.is_finite() && stddev >= 0.0) {
        return Err(Error::InvalidConfig(format!(
            "standard deviation {} must be finite and non-negative",
            stddev
        )));
    }
    let noise = Normal::new(0.0, stddev)
        .map_err(|e| Error::InvalidConfig(format!("standard deviation {}: {}", stddev, e)))?;
    Preference::from_item_values(
        market_values
            .iter()
            .map(|(&item, &value)| (item, value + noise.sample(rng))),
    )
}

fn random_market_values<R: Rng + ?Sized>(
    items: &[Item],
    market: &MarketConfig,
    rng: &mut R,
) -> Result<BTreeMap<Item, f64>> {
    let range = Uniform::new_inclusive(market.low, market.high).map_err(|e| {
        Error::InvalidConfig(format!("market range [{}, {}]: {}", market.low, market.high, e))
    })?;
    Ok(items.iter().map(|&item| (item, range.sample(rng))).collect())
}

/// Random cardinal profile: one market value per item, perturbed per agent
/// with uniform noise.
pub fn random_cardinal_profile<R: Rng + ?Sized>(
    agents: &[AgentId],
    items: &[Item],
    market: &MarketConfig,
    max_noise: f64,
    rng: &mut R,
) -> Result<PreferenceProfile> {
    let market_values = random_market_values(items, market, rng)?;
    let prefs = agents
        .iter()
        .map(|agent| Ok((agent.clone(), random_cardinal(&market_values, max_noise, rng)?)))
        .collect::<Result<Vec<_>>>()?;
    PreferenceProfile::new(prefs)
}

/// Like [`random_cardinal_profile`] with Gaussian noise
pub fn random_gaussian_profile<R: Rng + ?Sized>(
    agents: &[AgentId],
    items: &[Item],
    market: &MarketConfig,
    stddev: f64,
    rng: &mut R,
) -> Result<PreferenceProfile> {
    let market_values = random_market_values(items, market, rng)?;
    let prefs = agents
        .iter()
        .map(|agent| {
            Ok((
                agent.clone(),
                random_cardinal_gaussian(&market_values, stddev, rng)?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;
    PreferenceProfile::new(prefs)
}

pub fn load_profile(path: &Path) -> anyhow::Result<PreferenceProfile> {
    let json = fs::read_to_string(path).context("Failed to read profile file")?;
    let profile = serde_json::from_str(&json).context("Failed to parse profile json")?;
    Ok(profile)
}

pub fn save_profile(profile: &PreferenceProfile, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(profile).context("Failed to serialize profile")?;
    fs::write(path, json).context("Failed to write profile file")?;
    Ok(())
}
