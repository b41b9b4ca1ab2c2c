//! Duplicate detection and risk scoring components

pub mod dedup;
pub mod scorer;

pub use dedup::{DuplicateDetector, DuplicateFindings, FuzzyMatch};
pub use scorer::FraudAnalyzer;
