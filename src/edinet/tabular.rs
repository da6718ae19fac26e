use csv::ReaderBuilder;
use encoding_rs::Encoding;
use encoding_rs_io::DecodeReaderBytesBuilder;
use std::io::{Cursor, Read};

use super::error::AttemptError;
use super::metrics::{AliasTable, Metric, MetricSet, MetricValue};

/// EDINET CSV exports carry the item identifier and the amount under these
/// headers.
pub const ITEM_ID_COLUMN: &str = "項目ID";
pub const AMOUNT_COLUMN: &str = "金額";

fn decode(bytes: &[u8], encoding: &str) -> Result<String, AttemptError> {
    let mut reader = DecodeReaderBytesBuilder::new()
        .encoding(Encoding::for_label(encoding.as_bytes()))
        .build(Cursor::new(bytes));
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| AttemptError::PayloadDecode {
            encoding: encoding.to_string(),
            source: e,
        })?;
    Ok(text)
}

fn parse_amount(raw: &str) -> MetricValue {
    match raw.trim().parse::<i64>() {
        Ok(v) => MetricValue::Amount(v),
        Err(_) => MetricValue::NotAvailable,
    }
}

/// Resolve the canonical metrics from a CSV payload.
///
/// The two required columns missing is a whole-table failure; an alias list
/// exhausted without a match is not, the metric just resolves to the
/// not-available sentinel. Matching is a case-sensitive substring test on
/// the identifier column, first alias with at least one row wins, first
/// such row wins.
pub fn extract_metrics(
    bytes: &[u8],
    encoding: &str,
    aliases: &AliasTable,
) -> Result<MetricSet, AttemptError> {
    let text = decode(bytes, encoding)?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|_| AttemptError::MalformedTabularSchema {
            missing: format!("{}, {}", ITEM_ID_COLUMN, AMOUNT_COLUMN),
        })?
        .clone();

    let item_idx = headers.iter().position(|h| h == ITEM_ID_COLUMN);
    let amount_idx = headers.iter().position(|h| h == AMOUNT_COLUMN);
    let (item_idx, amount_idx) = match (item_idx, amount_idx) {
        (Some(i), Some(a)) => (i, a),
        (i, a) => {
            let mut missing = Vec::new();
            if i.is_none() {
                missing.push(ITEM_ID_COLUMN);
            }
            if a.is_none() {
                missing.push(AMOUNT_COLUMN);
            }
            return Err(AttemptError::MalformedTabularSchema {
                missing: missing.join(", "),
            });
        }
    };

    // Unreadable rows are skipped the same way rows with a missing
    // identifier are; the table as a whole already passed the schema gate.
    let mut rows: Vec<(String, String)> = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Skipping unreadable CSV row: {}", e);
                continue;
            }
        };
        let item = match record.get(item_idx) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => continue,
        };
        let amount = record.get(amount_idx).unwrap_or("").to_string();
        rows.push((item, amount));
    }

    let mut metrics = MetricSet::not_available();
    for metric in Metric::ALL {
        'alias: for alias in aliases.aliases(metric) {
            if let Some((item, amount)) = rows.iter().find(|(item, _)| item.contains(alias.as_str()))
            {
                log::debug!("{} matched alias {} via row {}", metric, alias, item);
                metrics.set(metric, parse_amount(amount));
                break 'alias;
            }
        }
    }
    Ok(metrics)
}
