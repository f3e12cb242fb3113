//! Configuration loading from TOML.
//!
//! Reads `shoe-oracle.toml` (or the path given on the command line) and
//! deserializes into strongly-typed structs. The file is optional: a
//! missing default file yields the built-in defaults. The heuristic
//! thresholds are fixed in the engine and deliberately absent here.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::types::OracleError;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "shoe-oracle.toml";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub backtest: BacktestConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    /// Emit JSON lines instead of human-readable logs.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "shoe_oracle=warn".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BacktestConfig {
    /// Flat stake in units per bet.
    pub stake: f64,
    /// Fraction withheld from Banker wins.
    pub banker_commission: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            stake: 1.0,
            banker_commission: 0.05,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Load an explicit path, or the default file if it exists, or defaults.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    /// Parse and validate TOML contents.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), OracleError> {
        let bt = &self.backtest;
        if !(bt.stake > 0.0) {
            return Err(OracleError::Config(format!(
                "backtest.stake must be positive, got {}",
                bt.stake
            )));
        }
        if !(0.0..1.0).contains(&bt.banker_commission) {
            return Err(OracleError::Config(format!(
                "backtest.banker_commission must be in [0, 1), got {}",
                bt.banker_commission
            )));
        }
        Ok(())
    }
}
