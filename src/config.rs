use anyhow::{Context, Result, bail, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::probe::tiered::DEMO_TIERS;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProbeConfig {
    #[serde(default = "default_linear_capacity")]
    pub linear_capacity: usize,
    #[serde(default = "default_tiers")]
    pub tiers: Vec<usize>,
    /// Target of the "fill" action, as a fraction of capacity.
    #[serde(default = "default_fill_ratio")]
    pub fill_ratio: f64,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Fixed seed for the key generator; absent means OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            linear_capacity: default_linear_capacity(),
            tiers: default_tiers(),
            fill_ratio: default_fill_ratio(),
            batch_size: default_batch_size(),
            seed: None,
        }
    }
}

impl ProbeConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("no config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config file: {:?}", path))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: ProbeConfig = toml::from_str(content).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.linear_capacity > 0, "linear_capacity must be positive");
        ensure!(!self.tiers.is_empty(), "tiers must not be empty");
        if let Some(position) = self.tiers.iter().position(|&tier| tier == 0) {
            bail!("tier {} has zero capacity", position);
        }
        ensure!(
            self.fill_ratio > 0.0 && self.fill_ratio <= 1.0,
            "fill_ratio must be in (0, 1], got {}",
            self.fill_ratio
        );
        Ok(())
    }
}

// Defaults match the embedded demos: 50 slots either way.
fn default_linear_capacity() -> usize {
    50
}

fn default_tiers() -> Vec<usize> {
    DEMO_TIERS.to_vec()
}

fn default_fill_ratio() -> f64 {
    0.9
}

fn default_batch_size() -> usize {
    5
}
