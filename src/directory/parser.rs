//! Lenient CSV parsing for directory exports.
//!
//! Directory export tools are not strict CSV writers: rows can be ragged,
//! quoting is inconsistent and trailing lines are often truncated. The parser
//! therefore works line by line and never fails:
//!
//! - line endings may be `\r\n` or `\n`
//! - the first line is the header; its comma-separated, trimmed tokens are the
//!   field names
//! - a data line is split on commas followed by an even number of double
//!   quotes, so `"Sales, APAC"` stays one field
//! - one layer of surrounding quotes is stripped from each trimmed field
//! - lines resolving to fewer than [`MIN_FIELDS`] fields are dropped

use super::types::RawUserRecord;
use tracing::debug;

/// Minimum number of fields a data line needs to become a record.
pub const MIN_FIELDS: usize = 5;

/// Outcome of parsing one export, including how many lines were dropped.
#[derive(Debug, Default)]
pub struct ParsedExport {
    pub headers: Vec<String>,
    pub records: Vec<RawUserRecord>,
    pub skipped_lines: usize,
}

/// Parse export text into raw records.
///
/// Returns an empty vector for empty or header-only input.
pub fn parse(text: &str) -> Vec<RawUserRecord> {
    parse_export(text).records
}

/// Parse export text, keeping header and skip statistics.
pub fn parse_export(text: &str) -> ParsedExport {
    let mut lines = text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l));

    let headers: Vec<String> = match lines.next() {
        Some(header_line) => header_line
            .split(',')
            .map(|h| h.trim().to_string())
            .collect(),
        None => return ParsedExport::default(),
    };

    let mut records = Vec::new();
    let mut skipped_lines = 0;

    for (idx, line) in lines.enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let values = split_fields(line);
        if values.len() < MIN_FIELDS {
            debug!(
                line = idx + 2,
                fields = values.len(),
                "Skipping row with too few fields"
            );
            skipped_lines += 1;
            continue;
        }

        let record = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let value = values.get(i).map_or("", |v| unquote(v.trim()));
                (header.clone(), value)
            })
            .collect();
        records.push(record);
    }

    ParsedExport {
        headers,
        records,
        skipped_lines,
    }
}

/// Split a line on commas that have an even number of `"` after them.
///
/// Embedded `""` escapes are not unescaped; a field keeps its inner quotes.
fn split_fields(line: &str) -> Vec<&str> {
    let total_quotes = line.bytes().filter(|&b| b == b'"').count();
    let mut fields = Vec::new();
    let mut quotes_seen = 0;
    let mut start = 0;

    for (pos, byte) in line.bytes().enumerate() {
        match byte {
            b'"' => quotes_seen += 1,
            b',' if (total_quotes - quotes_seen) % 2 == 0 => {
                fields.push(&line[start..pos]);
                start = pos + 1;
            }
            _ => {}
        }
    }
    fields.push(&line[start..]);
    fields
}

/// Strip one pair of surrounding double quotes.
fn unquote(value: &str) -> &str {
    if value.starts_with('"') && value.ends_with('"') {
        if value.len() >= 2 {
            &value[1..value.len() - 1]
        } else {
            ""
        }
    } else {
        value
    }
}
