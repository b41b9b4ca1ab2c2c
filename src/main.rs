//! Invoice Fraud Engine - Main Entry Point
//!
//! Reads an uploaded invoice batch (CSV, from a file argument or stdin),
//! runs duplicate detection and risk scoring, and writes the fraud reports
//! as JSON to stdout.

use anyhow::{bail, Context, Result};
use invoice_fraud_engine::{
    config::AppConfig, engine::scorer::FraudAnalyzer, ingest::BatchParser, metrics::BatchSummary,
};
use std::io::Read;
use tracing::{info, warn};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("invoice_fraud_engine=info".parse()?),
        )
        .init();

    info!("Starting invoice fraud analysis");

    // Load configuration
    let config = match AppConfig::load() {
        Ok(config) => {
            info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            warn!(error = %e, "Falling back to default configuration");
            AppConfig::default()
        }
    };

    // Read the batch from a file argument, or stdin when none is given
    let raw = match std::env::args().nth(1) {
        Some(path) => {
            std::fs::read(&path).with_context(|| format!("Failed to read batch file {path}"))?
        }
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read batch from stdin")?;
            buf
        }
    };

    let parser = BatchParser::new();
    let records = parser.parse(&raw);
    info!(records = records.len(), "Batch parsed");

    // The pairwise duplicate scan is quadratic per vendor group; refuse
    // oversized uploads here rather than inside the engine.
    if records.len() > config.batch.max_records {
        bail!(
            "Batch of {} records exceeds the configured limit of {}",
            records.len(),
            config.batch.max_records
        );
    }

    let analyzer = FraudAnalyzer::new(config.detection.clone());
    let reports = analyzer.analyze(&records);

    let summary = BatchSummary::from_reports(&reports);
    summary.log_summary();

    println!("{}", serde_json::to_string_pretty(&reports)?);

    Ok(())
}
