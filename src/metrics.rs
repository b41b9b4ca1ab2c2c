//! Summary statistics for a processed invoice batch.

use crate::types::report::{InvoiceFraudReport, RiskLevel};
use tracing::info;

/// Aggregate view of one batch analysis
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Reports produced
    pub records_analyzed: u64,
    /// Reports with at least one triggered issue
    pub records_flagged: u64,
    /// Total issues across the batch
    pub issues_total: u64,
    /// Reports classified Safe
    pub safe: u64,
    /// Reports classified Suspicious
    pub suspicious: u64,
    /// Reports classified Fraud Detected
    pub fraud_detected: u64,
    /// Risk score distribution, ten buckets of width 10
    pub score_buckets: [u64; 10],
}

impl BatchSummary {
    /// Build a summary from a batch of reports
    pub fn from_reports(reports: &[InvoiceFraudReport]) -> Self {
        let mut summary = Self::default();

        for report in reports {
            summary.records_analyzed += 1;
            summary.issues_total += report.issues.len() as u64;
            if !report.issues.is_empty() {
                summary.records_flagged += 1;
            }

            match report.risk_level {
                RiskLevel::Safe => summary.safe += 1,
                RiskLevel::Suspicious => summary.suspicious += 1,
                RiskLevel::FraudDetected => summary.fraud_detected += 1,
            }

            let bucket = (report.risk_score.min(99) / 10) as usize;
            summary.score_buckets[bucket] += 1;
        }

        summary
    }

    /// Fraction of analyzed records carrying at least one issue
    pub fn flagged_rate(&self) -> f64 {
        if self.records_analyzed == 0 {
            return 0.0;
        }
        self.records_flagged as f64 / self.records_analyzed as f64
    }

    /// Log the summary through the standard subscriber
    pub fn log_summary(&self) {
        info!(
            records = self.records_analyzed,
            flagged = self.records_flagged,
            flagged_rate = format!("{:.1}%", self.flagged_rate() * 100.0),
            issues = self.issues_total,
            "Batch analysis summary"
        );
        info!(
            safe = self.safe,
            suspicious = self.suspicious,
            fraud_detected = self.fraud_detected,
            "Reports by risk level"
        );

        let total: u64 = self.score_buckets.iter().sum();
        if total == 0 {
            return;
        }
        for (i, &count) in self.score_buckets.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let pct = count as f64 / total as f64 * 100.0;
            info!(
                bucket = format!("{}-{}", i * 10, i * 10 + 10),
                count,
                pct = format!("{pct:.1}%"),
                "Risk score distribution"
            );
        }
    }
}
