//! Invoice Fraud Detection Engine
//!
//! A deterministic, rule-based scoring pipeline for uploaded invoice
//! batches: parses delimited records, detects exact and near-duplicate
//! invoices, and scores each record against independent fraud heuristics.
//! The engine is a pure, synchronous transform with no network or storage
//! dependencies; upload handling and report persistence belong to the
//! surrounding application.

pub mod config;
pub mod engine;
pub mod ingest;
pub mod metrics;
pub mod similarity;
pub mod types;

pub use config::{AppConfig, DetectionConfig};
pub use engine::dedup::DuplicateDetector;
pub use engine::scorer::FraudAnalyzer;
pub use ingest::BatchParser;
pub use metrics::BatchSummary;
pub use types::invoice::InvoiceRecord;
pub use types::report::{FraudIssue, InvoiceFraudReport, RiskLevel, Severity};

/// Parse a raw delimited batch into invoice records, skipping malformed rows
pub fn parse_batch(raw: &[u8]) -> Vec<InvoiceRecord> {
    ingest::parse_batch(raw)
}

/// Analyze records with default detection settings, producing one report
/// per record in input order
pub fn analyze_batch(records: &[InvoiceRecord]) -> Vec<InvoiceFraudReport> {
    FraudAnalyzer::new(DetectionConfig::default()).analyze(records)
}
