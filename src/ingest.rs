//! Batch ingestion for delimited invoice uploads.
//!
//! Parses a CSV blob with a header row into [`InvoiceRecord`]s. Malformed
//! rows are skipped with a warning so one bad line never fails the upload;
//! output order follows input order, with gaps where rows were dropped.

use crate::types::invoice::InvoiceRecord;
use anyhow::{anyhow, bail, Result};
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, warn};

/// Header column positions resolved once per batch. A column missing from
/// the header leaves every row at that field's schema default.
#[derive(Debug)]
struct Columns {
    invoice_id: Option<usize>,
    vendor: Option<usize>,
    amount: Option<usize>,
    gsa_standard: Option<usize>,
    payment_routing: Option<usize>,
    invoice_date: Option<usize>,
    payment_delay_days: Option<usize>,
    early_payment_requested: Option<usize>,
    supporting_documents: Option<usize>,
    description: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        Self {
            invoice_id: find("invoice_id"),
            vendor: find("vendor"),
            amount: find("amount"),
            gsa_standard: find("gsa_standard"),
            payment_routing: find("payment_routing"),
            invoice_date: find("invoice_date"),
            payment_delay_days: find("payment_delay_days"),
            early_payment_requested: find("early_payment_requested"),
            supporting_documents: find("supporting_documents"),
            description: find("description"),
        }
    }
}

/// Parser for uploaded invoice batches
pub struct BatchParser;

impl BatchParser {
    /// Create a new batch parser
    pub fn new() -> Self {
        Self
    }

    /// Parse a raw delimited batch into invoice records.
    ///
    /// Never fails: undecodable bytes are replaced, unreadable or malformed
    /// rows are dropped, and an empty or headerless input yields an empty
    /// batch.
    pub fn parse(&self, raw: &[u8]) -> Vec<InvoiceRecord> {
        let text = String::from_utf8_lossy(raw);
        let mut reader = ReaderBuilder::new().from_reader(text.as_bytes());

        let headers = match reader.headers() {
            Ok(headers) => headers.clone(),
            Err(e) => {
                warn!(error = %e, "Batch has no readable header row");
                return Vec::new();
            }
        };
        let columns = Columns::from_headers(&headers);

        let mut records = Vec::new();
        for (index, row) in reader.records().enumerate() {
            let line = index + 2; // header occupies line 1
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    warn!(line, error = %e, "Skipping unreadable row");
                    continue;
                }
            };

            match parse_row(&row, &columns) {
                Ok(record) => records.push(record),
                Err(e) => warn!(line, error = %e, "Skipping malformed row"),
            }
        }

        debug!(records = records.len(), "Batch ingestion complete");
        records
    }
}

impl Default for BatchParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Trimmed field value, or `None` when the column is absent
fn field<'a>(row: &'a StringRecord, index: Option<usize>) -> Option<&'a str> {
    index.and_then(|i| row.get(i)).map(str::trim)
}

/// Case-insensitive match against the literal `"true"`
fn is_true(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

/// Monetary field: missing column defaults to zero, anything present must
/// parse as a non-negative finite number
fn parse_money(value: Option<&str>, name: &str) -> Result<f64> {
    let raw = value.unwrap_or("0");
    let parsed: f64 = raw
        .parse()
        .map_err(|_| anyhow!("unparsable {name} {raw:?}"))?;
    if !parsed.is_finite() || parsed < 0.0 {
        bail!("invalid {name} {raw:?}");
    }
    Ok(parsed)
}

fn parse_row(row: &StringRecord, columns: &Columns) -> Result<InvoiceRecord> {
    let amount = parse_money(field(row, columns.amount), "amount")?;
    let gsa_standard = parse_money(field(row, columns.gsa_standard), "gsa_standard")?;

    let payment_delay_days = match field(row, columns.payment_delay_days) {
        Some(value) if !value.is_empty() => Some(
            value
                .parse::<u32>()
                .map_err(|_| anyhow!("unparsable payment_delay_days {value:?}"))?,
        ),
        _ => None,
    };

    Ok(InvoiceRecord {
        invoice_id: field(row, columns.invoice_id).unwrap_or_default().to_string(),
        vendor: field(row, columns.vendor).unwrap_or_default().to_string(),
        amount,
        gsa_standard,
        payment_routing: field(row, columns.payment_routing)
            .unwrap_or_default()
            .to_string(),
        invoice_date: field(row, columns.invoice_date)
            .filter(|value| !value.is_empty())
            .map(String::from),
        payment_delay_days,
        early_payment_requested: field(row, columns.early_payment_requested)
            .map(is_true)
            .unwrap_or(false),
        supporting_documents: field(row, columns.supporting_documents)
            .map(is_true)
            .unwrap_or(true),
        description: field(row, columns.description)
            .unwrap_or_default()
            .to_string(),
    })
}

/// Parse a raw delimited batch into invoice records, skipping malformed rows
pub fn parse_batch(raw: &[u8]) -> Vec<InvoiceRecord> {
    BatchParser::new().parse(raw)
}
