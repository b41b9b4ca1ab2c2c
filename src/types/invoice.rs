//! Invoice record structures for fraud analysis

use serde::{Deserialize, Serialize};

/// A structured invoice parsed from an uploaded batch.
///
/// Records are immutable once parsed. `invoice_id` is expected to be unique
/// within a batch, but uniqueness is not enforced by the parser — repeated
/// identifiers are a detection target, not a parse error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Invoice identifier as written on the document
    pub invoice_id: String,

    /// Vendor name, free text
    pub vendor: String,

    /// Invoiced amount
    pub amount: f64,

    /// GSA benchmark price for the invoiced goods or services
    pub gsa_standard: f64,

    /// Payment destination / bank routing description
    pub payment_routing: String,

    /// Invoice date as written, kept as an opaque string
    #[serde(default)]
    pub invoice_date: Option<String>,

    /// Days the payment has been delayed, when reported
    #[serde(default)]
    pub payment_delay_days: Option<u32>,

    /// Whether early payment was requested before work completion
    #[serde(default)]
    pub early_payment_requested: bool,

    /// Whether supporting documentation for services/goods was provided
    #[serde(default = "default_supporting_documents")]
    pub supporting_documents: bool,

    /// Line-item description, used for near-duplicate detection
    #[serde(default)]
    pub description: String,
}

fn default_supporting_documents() -> bool {
    true
}

impl InvoiceRecord {
    /// Create a record with required fields, remaining fields at their defaults
    pub fn new(
        invoice_id: impl Into<String>,
        vendor: impl Into<String>,
        amount: f64,
        gsa_standard: f64,
    ) -> Self {
        Self {
            invoice_id: invoice_id.into(),
            vendor: vendor.into(),
            amount,
            gsa_standard,
            payment_routing: String::new(),
            invoice_date: None,
            payment_delay_days: None,
            early_payment_requested: false,
            supporting_documents: true,
            description: String::new(),
        }
    }

    /// Set the payment routing description
    pub fn with_routing(mut self, payment_routing: impl Into<String>) -> Self {
        self.payment_routing = payment_routing.into();
        self
    }

    /// Set the invoice date
    pub fn with_date(mut self, invoice_date: impl Into<String>) -> Self {
        self.invoice_date = Some(invoice_date.into());
        self
    }

    /// Set the line-item description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the reported payment delay in days
    pub fn with_delay(mut self, days: u32) -> Self {
        self.payment_delay_days = Some(days);
        self
    }

    /// Mark the invoice as requesting early payment
    pub fn with_early_payment(mut self) -> Self {
        self.early_payment_requested = true;
        self
    }

    /// Set whether supporting documentation was provided
    pub fn with_supporting_documents(mut self, provided: bool) -> Self {
        self.supporting_documents = provided;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_defaults() {
        let record = InvoiceRecord::new("INV-1", "Acme Corp", 100.0, 100.0);

        assert!(!record.early_payment_requested);
        assert!(record.supporting_documents);
        assert!(record.description.is_empty());
        assert!(record.invoice_date.is_none());
        assert!(record.payment_delay_days.is_none());
    }

    #[test]
    fn test_record_serialization() {
        let record = InvoiceRecord::new("INV-1", "Acme Corp", 150.0, 100.0)
            .with_date("2024-01-01")
            .with_description("Office supplies");

        let json = serde_json::to_string(&record).unwrap();
        let deserialized: InvoiceRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record.invoice_id, deserialized.invoice_id);
        assert_eq!(record.amount, deserialized.amount);
        assert_eq!(record.invoice_date, deserialized.invoice_date);
    }

    #[test]
    fn test_optional_fields_default_on_deserialize() {
        let json = r#"{
            "invoice_id": "INV-2",
            "vendor": "Globex",
            "amount": 42.0,
            "gsa_standard": 40.0,
            "payment_routing": "Domestic wire"
        }"#;

        let record: InvoiceRecord = serde_json::from_str(json).unwrap();

        assert!(record.supporting_documents);
        assert!(!record.early_payment_requested);
        assert!(record.payment_delay_days.is_none());
    }
}
