//! CSV data input

use crate::{FormError, Layout, Result};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// One CSV data row: column name -> cell value
pub type Row = HashMap<String, String>;

/// Read only the header row of a CSV file
pub fn read_headers<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    Ok(reader.headers()?.iter().map(str::to_string).collect())
}

/// Check that the CSV columns are exactly the layout's field names
///
/// Column order does not matter. Duplicate columns are rejected because a
/// row could not say which value belongs to the field.
pub fn validate_headers(layout: &Layout, headers: &[String]) -> Result<()> {
    let mut columns = BTreeSet::new();
    for header in headers {
        if !columns.insert(header.as_str()) {
            return Err(FormError::DuplicateColumn(header.clone()));
        }
    }

    let expected = layout.name_set();
    if expected == columns {
        return Ok(());
    }

    Err(FormError::HeaderMismatch {
        missing: expected
            .difference(&columns)
            .map(|s| s.to_string())
            .collect(),
        extra: columns
            .difference(&expected)
            .map(|s| s.to_string())
            .collect(),
    })
}

/// Pair a record with the header row
pub(crate) fn to_row(headers: &csv::StringRecord, record: &csv::StringRecord) -> Row {
    headers
        .iter()
        .zip(record.iter())
        .map(|(h, v)| (h.to_string(), v.to_string()))
        .collect()
}
