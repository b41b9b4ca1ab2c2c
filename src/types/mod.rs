//! Type definitions for the invoice fraud engine

pub mod invoice;
pub mod report;

pub use invoice::InvoiceRecord;
pub use report::{FraudIssue, InvoiceFraudReport, RiskLevel, RiskThresholds, Severity};
