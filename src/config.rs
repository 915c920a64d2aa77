//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Minimum assessed-minus-sale surplus for a record to qualify
    #[serde(default = "default_min_surplus")]
    pub min_surplus: f64,

    /// Minimum similarity for a candidate to be accepted as a match
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f64,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// CSS selector isolating listing blocks in captured HTML
    #[serde(default)]
    pub block_selector: Option<String>,
}

fn default_min_surplus() -> f64 {
    25_000.0
}

fn default_min_similarity() -> f64 {
    0.5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_surplus: default_min_surplus(),
            min_similarity: default_min_similarity(),
            format: OutputFormat::Table,
            block_selector: None,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("deed-harvest").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(surplus) = std::env::var("DEED_MIN_SURPLUS") {
            if let Ok(s) = surplus.parse() {
                self.min_surplus = s;
            }
        }

        if let Ok(similarity) = std::env::var("DEED_MIN_SIMILARITY") {
            if let Ok(s) = similarity.parse() {
                self.min_similarity = s;
            }
        }

        if let Ok(selector) = std::env::var("DEED_BLOCK_SELECTOR") {
            if !selector.is_empty() {
                self.block_selector = Some(selector);
            }
        }

        self
    }

    /// Contract check at the boundary: thresholds are policy values and must
    /// be sane before any parsing starts.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !self.min_surplus.is_finite() || self.min_surplus < 0.0 {
            return Err(ConfigError::NegativeSurplus(self.min_surplus));
        }
        if !self.min_similarity.is_finite() || !(0.0..=1.0).contains(&self.min_similarity) {
            return Err(ConfigError::SimilarityOutOfRange(self.min_similarity));
        }
        Ok(())
    }
}

/// Invalid configuration values. These fail fast instead of being absorbed
/// the way data-quality problems are.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("minimum surplus must be a non-negative number, got {0}")]
    NegativeSurplus(f64),

    #[error("minimum similarity must be within [0, 1], got {0}")]
    SimilarityOutOfRange(f64),
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
