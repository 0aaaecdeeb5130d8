//! Minimal CSV row reading for the one-shot bots' input files.
//!
//! First line is the header; every following non-empty line maps header
//! labels to field values. No quoting or escaping — the setup and trade
//! files are plain comma-separated values.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use bondbot_types::{BondbotError, Result};
use rust_decimal::Decimal;

pub(crate) type CsvRow = HashMap<String, String>;

pub(crate) fn read_rows(path: &Path) -> Result<Vec<CsvRow>> {
    if !path.exists() {
        return Err(BondbotError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;

    let mut lines = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());
    let Some((_, header)) = lines.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<&str> = header.split(',').map(str::trim).collect();

    let mut rows = Vec::new();
    for (index, line) in lines {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != headers.len() {
            return Err(BondbotError::MalformedCsv {
                path: path.display().to_string(),
                line: index + 1,
                reason: format!("expected {} fields, found {}", headers.len(), fields.len()),
            });
        }
        rows.push(
            headers
                .iter()
                .zip(&fields)
                .map(|(h, f)| ((*h).to_string(), (*f).to_string()))
                .collect(),
        );
    }
    Ok(rows)
}

/// Fetch a named column from a row, failing with file context.
pub(crate) fn row_field<'a>(row: &'a CsvRow, label: &str, path: &Path) -> Result<&'a str> {
    row.get(label)
        .map(String::as_str)
        .ok_or_else(|| BondbotError::MalformedCsv {
            path: path.display().to_string(),
            line: 0,
            reason: format!("missing column '{label}'"),
        })
}

/// Fetch and parse a decimal column.
pub(crate) fn row_decimal(row: &CsvRow, label: &str, path: &Path) -> Result<Decimal> {
    let raw = row_field(row, label, path)?;
    Decimal::from_str(raw).map_err(|err| BondbotError::MalformedCsv {
        path: path.display().to_string(),
        line: 0,
        reason: format!("column '{label}': {err}"),
    })
}
