use crate::error::Error;
use crate::experiment::checks::CheckKind;
use anyhow::{Context, Result, anyhow};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;
use tracing::error;

/// Evaluate a pkl config to JSON with the `pkl` command and deserialize it
pub fn load_pkl<T: DeserializeOwned>(config_path: impl AsRef<Path>) -> Result<T> {
    let config_path = config_path.as_ref();
    let output = Command::new("pkl")
        .args(["eval", "-f", "json"])
        .arg(config_path)
        .output()
        .context("Failed to execute pkl command")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!("pkl eval {} failed: {}", config_path.display(), stderr);
        return Err(anyhow!("pkl eval {} failed: {}", config_path.display(), stderr));
    }

    parse_config_json(&String::from_utf8_lossy(&output.stdout), config_path)
}

fn parse_config_json<T: DeserializeOwned>(json: &str, config_path: &Path) -> Result<T> {
    serde_json::from_str(json)
        .with_context(|| format!("Failed to parse config json from {}", config_path.display()))
}

/// Load a `.pkl` config through the `pkl` command or a `.json` config directly
pub fn load_config<T: DeserializeOwned>(config_path: impl AsRef<Path>) -> Result<T> {
    let config_path = config_path.as_ref();
    match config_path.extension().and_then(|ext| ext.to_str()) {
        Some("pkl") => load_pkl(config_path),
        Some("json") => {
            let json = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config {}", config_path.display()))?;
            parse_config_json(&json, config_path)
        }
        _ => Err(anyhow!(
            "Unsupported config format: {} (expected .pkl or .json)",
            config_path.display()
        )),
    }
}

/// Range of the per-item market value shared by all agents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    pub low: f64,
    pub high: f64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self { low: 1.0, high: 2.0 }
    }
}

/// One sweep: every noise size crossed with every items-per-agent count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    pub items_per_agent: Vec<usize>,
    pub noise_sizes: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: String,
    pub use_timestamp: bool,
    pub timestamp_fmt: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "results".to_string(),
            use_timestamp: true,
            timestamp_fmt: "%Y-%m-%d_%H-%M-%S".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub agents: Vec<String>,
    pub iterations: usize,
    pub seed: Option<u64>,
    pub check: CheckKind,
    pub market: MarketConfig,
    pub noise_sweep: SweepConfig,
    pub items_sweep: SweepConfig,
    pub output_config: OutputConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self::for_agents(vec!["Alice".to_string(), "Bob".to_string()])
    }
}

impl ExperimentConfig {
    /// Default sweeps for the given agents. Three or more agents get smaller
    /// instances since the partition count grows much faster.
    pub fn for_agents(agents: Vec<String>) -> Self {
        let few = agents.len() <= 2;
        let noise_sweep = SweepConfig {
            items_per_agent: vec![if few { 5 } else { 4 }],
            noise_sizes: (1..=10).map(|i| i as f64 / 10.0).collect(),
        };
        let items_sweep = SweepConfig {
            items_per_agent: if few { (2..=8).collect() } else { (2..=6).collect() },
            noise_sizes: vec![0.5],
        };
        Self {
            agents,
            iterations: 100,
            seed: None,
            check: CheckKind::default(),
            market: MarketConfig::default(),
            noise_sweep,
            items_sweep,
            output_config: OutputConfig::default(),
        }
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        if self.agents.is_empty() {
            return Err(Error::InvalidConfig("no agents".to_string()));
        }
        let mut seen = std::collections::BTreeSet::new();
        if let Some(agent) = self.agents.iter().find(|agent| !seen.insert(agent.as_str())) {
            return Err(Error::InvalidConfig(format!("agent {} listed twice", agent)));
        }
        if self.iterations == 0 {
            return Err(Error::InvalidConfig("iterations must be positive".to_string()));
        }
        if !(self.market.low.is_finite() && self.market.high.is_finite())
            || self.market.low > self.market.high
        {
            return Err(Error::InvalidConfig(format!(
                "invalid market value range [{}, {}]",
                self.market.low, self.market.high
            )));
        }
        for sweep in [&self.noise_sweep, &self.items_sweep] {
            if let Some(noise) = sweep.noise_sizes.iter().find(|n| !n.is_finite() || **n < 0.0) {
                return Err(Error::InvalidConfig(format!("invalid noise size {}", noise)));
            }
            if sweep.items_per_agent.contains(&0) {
                return Err(Error::InvalidConfig("items per agent must be positive".to_string()));
            }
        }
        Ok(())
    }
}
