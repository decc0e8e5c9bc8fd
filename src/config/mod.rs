//! Simulation configuration
//!
//! A `SimulationConfig` is read from an optional TOML file, overlaid with
//! command-line flags and validated once before the pipeline starts. Every
//! invalid value is fatal: the kitchen never sees a bad configuration.
//!
//! ```toml
//! restaurant = 42
//! mode = "ff"
//! chefs = 3
//! capacity = 10
//! delivery_min_secs = 1
//! delivery_max_secs = 5
//! seed = 7
//! ```

use crate::error::{ErrorCode, Result, SimError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tokio::fs;
use tracing::debug;

/// How simulated waits are carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum SimulationMode {
    /// Every wait really sleeps for its duration
    #[default]
    RealTime,
    /// Waits only log the duration they would have taken
    FastForward,
}

impl SimulationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RealTime => "realtime",
            Self::FastForward => "fastforward",
        }
    }
}

impl fmt::Display for SimulationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimulationMode {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "realtime" | "rt" => Ok(Self::RealTime),
            "fastforward" | "ff" => Ok(Self::FastForward),
            other => Err(SimError::config_with_code(
                ErrorCode::CONFIG_INVALID_MODE,
                format!("mode must be 'realtime' or 'fastforward', got '{}'", other),
            )),
        }
    }
}

impl TryFrom<String> for SimulationMode {
    type Error = SimError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Full configuration of one simulated restaurant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// Restaurant number (1-999)
    #[serde(default = "default_restaurant")]
    pub restaurant: u32,

    /// Display name; derived from the restaurant number when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub mode: SimulationMode,

    /// Chefs sharing the work of every order
    #[serde(default = "default_chefs")]
    pub chefs: usize,

    /// Maximum orders in preparation at once
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    #[serde(default = "default_delivery_min_secs")]
    pub delivery_min_secs: u64,

    #[serde(default = "default_delivery_max_secs")]
    pub delivery_max_secs: u64,

    /// Seed for delivery and arrival randomness
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_restaurant() -> u32 {
    1
}

fn default_chefs() -> usize {
    3
}

fn default_capacity() -> usize {
    10
}

fn default_delivery_min_secs() -> u64 {
    1
}

fn default_delivery_max_secs() -> u64 {
    5
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            restaurant: default_restaurant(),
            name: None,
            mode: SimulationMode::default(),
            chefs: default_chefs(),
            capacity: default_capacity(),
            delivery_min_secs: default_delivery_min_secs(),
            delivery_max_secs: default_delivery_max_secs(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Parse a configuration from TOML text without validating it
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            SimError::config_with_code(ErrorCode::CONFIG_PARSE_ERROR, "invalid configuration")
                .with_source(e)
        })
    }

    /// Load a configuration file from disk without validating it
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            SimError::config_with_code(ErrorCode::CONFIG_NOT_FOUND, "cannot read configuration")
                .with_path(path)
                .with_source(e)
        })?;
        let config = Self::from_toml(&content).map_err(|e| e.with_path(path))?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Display name of the restaurant
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Restaurant #{} - The Golden Spoon", self.restaurant))
    }

    /// Reject any configuration the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if !(1..=999).contains(&self.restaurant) {
            return Err(SimError::config_with_code(
                ErrorCode::CONFIG_INVALID_RESTAURANT,
                format!(
                    "restaurant number must be between 1 and 999, got {}",
                    self.restaurant
                ),
            ));
        }
        if self.chefs == 0 {
            return Err(SimError::config_with_code(
                ErrorCode::CONFIG_INVALID_CHEFS,
                "at least one chef is required",
            ));
        }
        if self.capacity == 0 {
            return Err(SimError::config_with_code(
                ErrorCode::CONFIG_INVALID_CAPACITY,
                "kitchen capacity must be at least 1",
            ));
        }
        if self.delivery_min_secs == 0 || self.delivery_min_secs > self.delivery_max_secs {
            return Err(SimError::config_with_code(
                ErrorCode::CONFIG_INVALID_DELIVERY_WINDOW,
                format!(
                    "delivery window {}..={} seconds is invalid",
                    self.delivery_min_secs, self.delivery_max_secs
                ),
            ));
        }
        Ok(())
    }
}
