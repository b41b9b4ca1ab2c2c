//! Fraud report data structures

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity tag attached to a single fraud issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    #[serde(rename = "Medium-High")]
    MediumHigh,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::MediumHigh => "Medium-High",
            Severity::High => "High",
        };
        write!(f, "{tag}")
    }
}

/// Risk classification derived from the clamped score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Safe,
    Suspicious,
    #[serde(rename = "Fraud Detected")]
    FraudDetected,
}

impl RiskLevel {
    /// Determine risk level from score and thresholds
    pub fn from_score(score: u32, thresholds: &RiskThresholds) -> Self {
        if score >= thresholds.fraud {
            RiskLevel::FraudDetected
        } else if score >= thresholds.suspicious {
            RiskLevel::Suspicious
        } else {
            RiskLevel::Safe
        }
    }

    /// Payment guidance associated with this risk level
    pub fn recommendation(&self) -> &'static str {
        match self {
            RiskLevel::FraudDetected => "Immediate review required.",
            RiskLevel::Suspicious => "Review before payment.",
            RiskLevel::Safe => "Likely safe.",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            RiskLevel::Safe => "Safe",
            RiskLevel::Suspicious => "Suspicious",
            RiskLevel::FraudDetected => "Fraud Detected",
        };
        write!(f, "{tag}")
    }
}

/// Configurable score cutoffs for risk classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Scores at or above this value classify as Suspicious
    pub suspicious: u32,
    /// Scores at or above this value classify as Fraud Detected
    pub fraud: u32,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            suspicious: 40,
            fraud: 80,
        }
    }
}

/// A single triggered fraud heuristic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudIssue {
    /// Description of the triggered condition
    pub issue: String,

    /// Severity classification
    pub severity: Severity,

    /// Points the heuristic contributes to the aggregate score
    pub risk_increase: u32,

    /// Remediation guidance
    pub recommended_action: String,
}

impl FraudIssue {
    /// Create a new fraud issue
    pub fn new(
        issue: impl Into<String>,
        severity: Severity,
        risk_increase: u32,
        recommended_action: &str,
    ) -> Self {
        Self {
            issue: issue.into(),
            severity,
            risk_increase,
            recommended_action: recommended_action.to_string(),
        }
    }
}

/// Per-invoice fraud analysis result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceFraudReport {
    /// Identifier of the analyzed invoice
    pub invoice_id: String,

    /// Aggregate risk score, clamped to [0, 100]
    pub risk_score: u32,

    /// Risk classification derived from the score
    pub risk_level: RiskLevel,

    /// Triggered issues, in evaluation order
    pub issues: Vec<FraudIssue>,

    /// Overall payment guidance
    pub final_recommendation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_from_score() {
        let thresholds = RiskThresholds::default();

        assert_eq!(RiskLevel::from_score(0, &thresholds), RiskLevel::Safe);
        assert_eq!(RiskLevel::from_score(39, &thresholds), RiskLevel::Safe);
        assert_eq!(RiskLevel::from_score(40, &thresholds), RiskLevel::Suspicious);
        assert_eq!(RiskLevel::from_score(79, &thresholds), RiskLevel::Suspicious);
        assert_eq!(
            RiskLevel::from_score(80, &thresholds),
            RiskLevel::FraudDetected
        );
        assert_eq!(
            RiskLevel::from_score(100, &thresholds),
            RiskLevel::FraudDetected
        );
    }

    #[test]
    fn test_recommendation_per_level() {
        assert_eq!(RiskLevel::Safe.recommendation(), "Likely safe.");
        assert_eq!(
            RiskLevel::Suspicious.recommendation(),
            "Review before payment."
        );
        assert_eq!(
            RiskLevel::FraudDetected.recommendation(),
            "Immediate review required."
        );
    }

    #[test]
    fn test_severity_serialization() {
        let json = serde_json::to_string(&Severity::MediumHigh).unwrap();
        assert_eq!(json, "\"Medium-High\"");

        let parsed: Severity = serde_json::from_str("\"Medium-High\"").unwrap();
        assert_eq!(parsed, Severity::MediumHigh);
    }

    #[test]
    fn test_report_serialization() {
        let report = InvoiceFraudReport {
            invoice_id: "INV-1".to_string(),
            risk_score: 45,
            risk_level: RiskLevel::Suspicious,
            issues: vec![FraudIssue::new(
                "Overpricing detected.",
                Severity::High,
                25,
                "Verify pricing.",
            )],
            final_recommendation: "Review before payment.".to_string(),
        };

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"Suspicious\""));

        let deserialized: InvoiceFraudReport = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.risk_score, 45);
        assert_eq!(deserialized.issues.len(), 1);
        assert_eq!(deserialized.issues[0].severity, Severity::High);
    }
}
