//! Duplicate detection across an invoice batch.
//!
//! Two independent strategies run over the full batch and their outputs are
//! merged: exact matching on a composite key, and a pairwise fuzzy scan
//! within each vendor group. The pairwise scan is quadratic per group;
//! batch size is bounded at the intake boundary, not here.

use crate::config::DetectionConfig;
use crate::similarity::similarity_ratio;
use crate::types::invoice::InvoiceRecord;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// A near-duplicate pair found within a vendor group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch {
    /// Id of the earlier record in batch order
    pub first_id: String,
    /// Id of the later record
    pub second_id: String,
    /// Lowercased vendor the pair shares
    pub vendor: String,
}

impl FuzzyMatch {
    /// Whether the finding names the given invoice
    pub fn involves(&self, invoice_id: &str) -> bool {
        self.first_id == invoice_id || self.second_id == invoice_id
    }

    /// Human-readable finding naming both invoices
    pub fn describe(&self) -> String {
        format!(
            "Potential duplicate invoices: {} and {} (similar descriptions and amounts)",
            self.first_id, self.second_id
        )
    }
}

/// Merged output of both detection strategies
#[derive(Debug, Default)]
pub struct DuplicateFindings {
    /// Ids of records belonging to an exact-duplicate group
    pub exact: HashSet<String>,
    /// Near-duplicate pairs, in batch order
    pub fuzzy: Vec<FuzzyMatch>,
}

/// Detector for exact and near-duplicate invoices
pub struct DuplicateDetector {
    similarity_threshold: u32,
    amount_tolerance: f64,
    exempt_blank_descriptions: bool,
}

impl DuplicateDetector {
    /// Create a detector from detection settings
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            similarity_threshold: config.similarity_threshold,
            amount_tolerance: config.amount_tolerance,
            exempt_blank_descriptions: config.exempt_blank_descriptions,
        }
    }

    /// Run both strategies against the batch
    pub fn detect(&self, records: &[InvoiceRecord]) -> DuplicateFindings {
        let findings = DuplicateFindings {
            exact: self.exact_duplicates(records),
            fuzzy: self.fuzzy_duplicates(records),
        };
        debug!(
            exact = findings.exact.len(),
            fuzzy = findings.fuzzy.len(),
            "Duplicate scan complete"
        );
        findings
    }

    /// Flag every member of a colliding composite-key group, plus any
    /// identifier repeated verbatim in the batch.
    fn exact_duplicates(&self, records: &[InvoiceRecord]) -> HashSet<String> {
        let mut by_key: HashMap<String, Vec<&InvoiceRecord>> = HashMap::new();
        for record in records {
            by_key.entry(dedup_key(record)).or_default().push(record);
        }

        let mut flagged = HashSet::new();
        for group in by_key.values().filter(|group| group.len() > 1) {
            for record in group {
                flagged.insert(record.invoice_id.clone());
            }
        }

        let mut id_counts: HashMap<&str, usize> = HashMap::new();
        for record in records {
            *id_counts.entry(record.invoice_id.as_str()).or_insert(0) += 1;
        }
        for (invoice_id, count) in id_counts {
            if count > 1 {
                flagged.insert(invoice_id.to_string());
            }
        }

        flagged
    }

    /// Pairwise scan within each vendor group. Groups are kept in first-seen
    /// order so repeated runs produce findings in the same order.
    fn fuzzy_duplicates(&self, records: &[InvoiceRecord]) -> Vec<FuzzyMatch> {
        let mut by_vendor: IndexMap<String, Vec<&InvoiceRecord>> = IndexMap::new();
        for record in records {
            by_vendor
                .entry(record.vendor.to_lowercase())
                .or_default()
                .push(record);
        }

        let mut matches = Vec::new();
        for (vendor, group) in &by_vendor {
            for i in 0..group.len() {
                for j in (i + 1)..group.len() {
                    let (a, b) = (group[i], group[j]);
                    if self.is_fuzzy_pair(a, b) {
                        matches.push(FuzzyMatch {
                            first_id: a.invoice_id.clone(),
                            second_id: b.invoice_id.clone(),
                            vendor: vendor.clone(),
                        });
                    }
                }
            }
        }

        matches
    }

    fn is_fuzzy_pair(&self, a: &InvoiceRecord, b: &InvoiceRecord) -> bool {
        if a.invoice_id == b.invoice_id {
            return false;
        }
        if self.exempt_blank_descriptions
            && (a.description.is_empty() || b.description.is_empty())
        {
            return false;
        }
        (a.amount - b.amount).abs() <= self.amount_tolerance
            && similarity_ratio(&a.description, &b.description) > self.similarity_threshold
            && similarity_ratio(&a.vendor, &b.vendor) > self.similarity_threshold
    }
}

/// Composite exact-duplicate key: lowercased vendor, amount, invoice date
fn dedup_key(record: &InvoiceRecord) -> String {
    format!(
        "{}|{}|{}",
        record.vendor.to_lowercase(),
        record.amount,
        record.invoice_date.as_deref().unwrap_or("")
    )
}
