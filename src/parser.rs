//! Row decoding for delimited panel files.

use csv::StringRecord;

use crate::error::RowError;

/// The columns of one data row before the weight is interpreted.
#[derive(Debug, PartialEq)]
pub struct RawRow<'a> {
    pub key: &'a str,
    pub weight: &'a str,
    pub features: Vec<&'a str>,
}

/// A decoded data row ready to be merged into the aggregation table.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelRow {
    pub key: String,
    pub weight: f64,
    pub features: Vec<String>,
}

/// Splits a record into key (column 0), raw weight (column 1) and the
/// remaining feature columns, which may be empty.
///
/// # Errors
///
/// Returns [`RowError::MalformedRow`] when fewer than two columns are present.
pub fn split_row(record: &StringRecord) -> Result<RawRow<'_>, RowError> {
    if record.len() < 2 {
        return Err(RowError::MalformedRow {
            fields: record.len(),
        });
    }

    Ok(RawRow {
        key: &record[0],
        weight: &record[1],
        features: record.iter().skip(2).collect(),
    })
}

/// Parses a weight, accepting a comma decimal separator.
///
/// Only the first comma is replaced with a period, so `"1,5"` becomes
/// `1.5` while a value such as `"1,000,5"` still fails.
pub fn normalize_weight(raw: &str) -> Result<f64, RowError> {
    raw.replacen(',', ".", 1)
        .parse::<f64>()
        .map_err(|source| RowError::NumericParse {
            value: raw.to_string(),
            source,
        })
}

/// Decodes a record into a [`PanelRow`].
pub fn parse_row(record: &StringRecord) -> Result<PanelRow, RowError> {
    let raw = split_row(record)?;

    Ok(PanelRow {
        key: raw.key.to_string(),
        weight: normalize_weight(raw.weight)?,
        features: raw.features.into_iter().map(str::to_string).collect(),
    })
}
