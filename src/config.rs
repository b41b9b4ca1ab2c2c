//! Configuration management for the invoice fraud engine

use crate::types::report::RiskThresholds;
use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Fraud detection heuristic settings
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionConfig {
    /// Jurisdictions that flag a payment routing as offshore
    #[serde(default = "default_flagged_jurisdictions")]
    pub flagged_jurisdictions: Vec<String>,

    /// Amount-to-benchmark ratio above which an invoice counts as overpriced
    #[serde(default = "default_overpricing_ratio")]
    pub overpricing_ratio: f64,

    /// Similarity ratio (0-100) that description and vendor must both exceed
    /// for a near-duplicate match
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: u32,

    /// Maximum amount difference between near-duplicate invoices
    #[serde(default = "default_amount_tolerance")]
    pub amount_tolerance: f64,

    /// Exclude invoices with a blank description from near-duplicate
    /// matching. Off by default: blank-vs-blank descriptions count as
    /// similar, which surfaces more candidates at the cost of false
    /// positives.
    #[serde(default)]
    pub exempt_blank_descriptions: bool,

    /// Risk level classification thresholds
    #[serde(default)]
    pub risk_levels: RiskThresholds,
}

fn default_flagged_jurisdictions() -> Vec<String> {
    vec![
        "cayman islands".to_string(),
        "panama".to_string(),
        "belize".to_string(),
    ]
}

fn default_overpricing_ratio() -> f64 {
    1.3
}

fn default_similarity_threshold() -> u32 {
    80
}

fn default_amount_tolerance() -> f64 {
    10.0
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            flagged_jurisdictions: default_flagged_jurisdictions(),
            overpricing_ratio: default_overpricing_ratio(),
            similarity_threshold: default_similarity_threshold(),
            amount_tolerance: default_amount_tolerance(),
            exempt_blank_descriptions: false,
            risk_levels: RiskThresholds::default(),
        }
    }
}

/// Batch intake limits enforced at the binary boundary
#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    /// Maximum records accepted per batch. The pairwise duplicate scan is
    /// quadratic within a vendor group, so oversized uploads are rejected
    /// rather than processed.
    #[serde(default = "default_max_records")]
    pub max_records: usize,
}

fn default_max_records() -> usize {
    10_000
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_records: default_max_records(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
