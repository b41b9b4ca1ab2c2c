//! Rule-based risk scoring over an invoice batch.
//!
//! Each record is evaluated against a fixed sequence of fraud heuristics.
//! Point contributions accumulate into a score clamped to [0, 100], and the
//! triggered issues are reported in evaluation order. Scoring is total over
//! well-formed records and never fails.

use crate::config::DetectionConfig;
use crate::engine::dedup::{DuplicateDetector, DuplicateFindings};
use crate::types::invoice::InvoiceRecord;
use crate::types::report::{FraudIssue, InvoiceFraudReport, RiskLevel, Severity};
use tracing::debug;

/// Maximum reportable risk score
const MAX_RISK_SCORE: u32 = 100;

/// Rule-based fraud analyzer for invoice batches
pub struct FraudAnalyzer {
    config: DetectionConfig,
    detector: DuplicateDetector,
}

impl FraudAnalyzer {
    /// Create an analyzer from detection settings
    pub fn new(config: DetectionConfig) -> Self {
        let detector = DuplicateDetector::new(&config);
        Self { config, detector }
    }

    /// Analyze a batch of records, producing one report per record in
    /// input order. Calling twice on the same batch yields identical
    /// reports; the analyzer holds no state between calls.
    pub fn analyze(&self, records: &[InvoiceRecord]) -> Vec<InvoiceFraudReport> {
        let findings = self.detector.detect(records);
        records
            .iter()
            .map(|record| self.score_record(record, &findings))
            .collect()
    }

    fn score_record(
        &self,
        record: &InvoiceRecord,
        findings: &DuplicateFindings,
    ) -> InvoiceFraudReport {
        let mut issues = Vec::new();
        let mut risk_score: u32 = 0;

        if findings.exact.contains(&record.invoice_id) {
            risk_score += 30;
            issues.push(FraudIssue::new(
                format!("Duplicate invoice {} detected.", record.invoice_id),
                Severity::High,
                30,
                "Verify before payment.",
            ));
        }

        for m in findings.fuzzy.iter().filter(|m| m.involves(&record.invoice_id)) {
            risk_score += 25;
            issues.push(FraudIssue::new(
                format!("Potential duplicate invoice: {}", m.describe()),
                Severity::MediumHigh,
                25,
                "Manually review for payment fraud.",
            ));
        }

        if self.is_overpriced(record) {
            risk_score += 25;
            issues.push(FraudIssue::new(
                "Overpricing detected.",
                Severity::High,
                25,
                "Verify pricing.",
            ));
        }

        if self.is_offshore(&record.payment_routing) {
            risk_score += 35;
            issues.push(FraudIssue::new(
                "Offshore payment detected.",
                Severity::High,
                35,
                "Flag for compliance review.",
            ));
        }

        if let Some(days) = record.payment_delay_days {
            if days > 0 {
                // A delay of five days or less scores no points but is
                // still reported; the issue entry always carries 10.
                risk_score += delay_points(days);
                issues.push(FraudIssue::new(
                    "Detected payment delays.",
                    Severity::Medium,
                    10,
                    "Review payment timelines.",
                ));
            }
        }

        if record.early_payment_requested {
            risk_score += 20;
            issues.push(FraudIssue::new(
                "Invoice requests early payment.",
                Severity::High,
                20,
                "Ensure service completion first.",
            ));
        }

        if !record.supporting_documents {
            risk_score += 25;
            issues.push(FraudIssue::new(
                "Missing supporting documentation.",
                Severity::High,
                25,
                "Request proof of delivery.",
            ));
        }

        let risk_score = risk_score.min(MAX_RISK_SCORE);
        let risk_level = RiskLevel::from_score(risk_score, &self.config.risk_levels);

        debug!(
            invoice_id = %record.invoice_id,
            risk_score,
            risk_level = %risk_level,
            issues = issues.len(),
            "Invoice scored"
        );

        InvoiceFraudReport {
            invoice_id: record.invoice_id.clone(),
            risk_score,
            risk_level,
            issues,
            final_recommendation: risk_level.recommendation().to_string(),
        }
    }

    fn is_overpriced(&self, record: &InvoiceRecord) -> bool {
        record.amount > record.gsa_standard * self.config.overpricing_ratio
    }

    fn is_offshore(&self, payment_routing: &str) -> bool {
        let routing = payment_routing.to_lowercase();
        self.config
            .flagged_jurisdictions
            .iter()
            .any(|jurisdiction| routing.contains(&jurisdiction.to_lowercase()))
    }
}

/// Tiered contribution of a reported payment delay
fn delay_points(days: u32) -> u32 {
    if days > 30 {
        30
    } else if days > 15 {
        20
    } else if days > 5 {
        10
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> FraudAnalyzer {
        FraudAnalyzer::new(DetectionConfig::default())
    }

    fn analyze_one(record: InvoiceRecord) -> InvoiceFraudReport {
        analyzer().analyze(&[record]).remove(0)
    }

    #[test]
    fn test_clean_record_is_safe() {
        let report = analyze_one(InvoiceRecord::new("INV-1", "Acme", 100.0, 100.0));

        assert_eq!(report.risk_score, 0);
        assert_eq!(report.risk_level, RiskLevel::Safe);
        assert!(report.issues.is_empty());
        assert_eq!(report.final_recommendation, "Likely safe.");
    }

    #[test]
    fn test_overpricing() {
        let report = analyze_one(InvoiceRecord::new("INV-1", "Acme", 1000.0, 500.0));

        assert_eq!(report.risk_score, 25);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].issue, "Overpricing detected.");
        assert_eq!(report.issues[0].risk_increase, 25);
        assert_eq!(report.issues[0].severity, Severity::High);
    }

    #[test]
    fn test_amount_at_ratio_boundary_is_not_overpriced() {
        // 130 == 100 * 1.3, strictly-greater comparison
        let report = analyze_one(InvoiceRecord::new("INV-1", "Acme", 130.0, 100.0));
        assert_eq!(report.risk_score, 0);
    }

    #[test]
    fn test_offshore_routing() {
        let record = InvoiceRecord::new("INV-1", "Acme", 100.0, 100.0)
            .with_routing("Acct at Bank of Panama");
        let report = analyze_one(record);

        assert_eq!(report.risk_score, 35);
        assert_eq!(report.issues[0].issue, "Offshore payment detected.");
    }

    #[test]
    fn test_offshore_matching_is_case_insensitive() {
        let record = InvoiceRecord::new("INV-1", "Acme", 100.0, 100.0)
            .with_routing("Transfer via CAYMAN ISLANDS branch");
        let report = analyze_one(record);

        assert_eq!(report.risk_score, 35);
    }

    #[test]
    fn test_exact_duplicates_flag_both_records() {
        let records = vec![
            InvoiceRecord::new("INV-1", "Acme", 100.0, 100.0)
                .with_date("2024-01-01")
                .with_description("a"),
            InvoiceRecord::new("INV-2", "Acme", 100.0, 100.0)
                .with_date("2024-01-01")
                .with_description("completely unrelated widget order"),
        ];

        let reports = analyzer().analyze(&records);

        for report in &reports {
            assert!(
                report
                    .issues
                    .iter()
                    .any(|issue| issue.issue.starts_with("Duplicate invoice")),
                "missing duplicate issue for {}",
                report.invoice_id
            );
            assert!(report.risk_score >= 30);
        }
    }

    #[test]
    fn test_fuzzy_duplicate_scores_both_records() {
        let records = vec![
            InvoiceRecord::new("INV-1", "Acme", 100.0, 100.0)
                .with_date("2024-01-01")
                .with_description("Office supplies delivery"),
            InvoiceRecord::new("INV-2", "Acme", 105.0, 100.0)
                .with_date("2024-02-01")
                .with_description("Office supplies deliveries"),
        ];

        let reports = analyzer().analyze(&records);

        for report in &reports {
            assert_eq!(report.risk_score, 25, "for {}", report.invoice_id);
            assert_eq!(report.issues.len(), 1);
            assert_eq!(report.issues[0].severity, Severity::MediumHigh);
            assert!(report.issues[0]
                .issue
                .starts_with("Potential duplicate invoice:"));
        }
    }

    #[test]
    fn test_delay_tiers() {
        let cases = [(45, 30), (31, 30), (30, 20), (16, 20), (15, 10), (6, 10)];
        for (days, expected) in cases {
            let report =
                analyze_one(InvoiceRecord::new("INV-1", "Acme", 100.0, 100.0).with_delay(days));
            assert_eq!(report.risk_score, expected, "delay of {days} days");
            assert_eq!(report.issues.len(), 1);
            assert_eq!(report.issues[0].issue, "Detected payment delays.");
        }
    }

    #[test]
    fn test_short_delay_emits_issue_without_points() {
        let report =
            analyze_one(InvoiceRecord::new("INV-1", "Acme", 100.0, 100.0).with_delay(3));

        assert_eq!(report.risk_score, 0);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].risk_increase, 10);
        assert_eq!(report.issues[0].severity, Severity::Medium);
    }

    #[test]
    fn test_zero_delay_emits_nothing() {
        let report =
            analyze_one(InvoiceRecord::new("INV-1", "Acme", 100.0, 100.0).with_delay(0));

        assert_eq!(report.risk_score, 0);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_early_payment_and_missing_documents_is_suspicious() {
        let record = InvoiceRecord::new("INV-1", "Acme", 100.0, 100.0)
            .with_early_payment()
            .with_supporting_documents(false);
        let report = analyze_one(record);

        assert_eq!(report.risk_score, 45);
        assert_eq!(report.risk_level, RiskLevel::Suspicious);
        assert_eq!(report.final_recommendation, "Review before payment.");
    }

    #[test]
    fn test_score_is_clamped_to_100() {
        let make = |id: &str| {
            InvoiceRecord::new(id, "Acme", 1000.0, 100.0)
                .with_date("2024-01-01")
                .with_routing("Bank of Belize")
                .with_delay(45)
                .with_early_payment()
                .with_supporting_documents(false)
                .with_description("Consulting retainer")
        };
        // force an amount collision so both exact and fuzzy heuristics fire
        let records = vec![make("INV-1"), make("INV-2")];

        let reports = analyzer().analyze(&records);

        for report in &reports {
            assert_eq!(report.risk_score, 100);
            assert_eq!(report.risk_level, RiskLevel::FraudDetected);
            assert_eq!(report.final_recommendation, "Immediate review required.");
        }
    }

    #[test]
    fn test_issue_order_follows_evaluation_order() {
        let record = InvoiceRecord::new("INV-1", "Acme", 1000.0, 100.0)
            .with_routing("Bank of Panama")
            .with_delay(45)
            .with_early_payment()
            .with_supporting_documents(false);
        let report = analyze_one(record);

        let issues: Vec<&str> = report.issues.iter().map(|i| i.issue.as_str()).collect();
        assert_eq!(
            issues,
            vec![
                "Overpricing detected.",
                "Offshore payment detected.",
                "Detected payment delays.",
                "Invoice requests early payment.",
                "Missing supporting documentation.",
            ]
        );
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let records = vec![
            InvoiceRecord::new("INV-1", "Acme", 100.0, 100.0)
                .with_date("2024-01-01")
                .with_description("Catering"),
            InvoiceRecord::new("INV-2", "Acme", 101.0, 100.0)
                .with_date("2024-01-02")
                .with_description("Catering"),
            InvoiceRecord::new("INV-3", "Globex", 500.0, 100.0).with_routing("Panama City"),
        ];

        let analyzer = analyzer();
        let first = analyzer.analyze(&records);
        let second = analyzer.analyze(&records);

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_empty_batch_yields_empty_reports() {
        assert!(analyzer().analyze(&[]).is_empty());
    }

    #[test]
    fn test_reports_preserve_input_order() {
        let records = vec![
            InvoiceRecord::new("INV-3", "Acme", 100.0, 100.0),
            InvoiceRecord::new("INV-1", "Globex", 100.0, 100.0),
            InvoiceRecord::new("INV-2", "Initech", 100.0, 100.0),
        ];

        let reports = analyzer().analyze(&records);
        let ids: Vec<&str> = reports.iter().map(|r| r.invoice_id.as_str()).collect();
        assert_eq!(ids, vec!["INV-3", "INV-1", "INV-2"]);
    }
}
