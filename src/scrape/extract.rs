//! HTML table extraction.
//!
//! Locates the schedule table in a current-conditions page and flattens it
//! into ordered row records keyed by stringified column index. No type
//! coercion happens here; cells are trimmed text exactly as rendered.

use scraper::{Html, Selector};
use std::collections::BTreeMap;
use thiserror::Error;

/// One table row: stringified column index (`"0"`, `"1"`, ...) -> cell text.
pub type RowRecord = BTreeMap<String, String>;

/// No schedule table in the document. Fatal for the refresh cycle; callers
/// must propagate rather than substitute an empty schedule.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("no schedule table found in document")]
pub struct ExtractionError;

/// Parse the first `<table>` of `html` into ordered row records.
///
/// The last row of the table is a known summary/footer artifact and is
/// dropped unconditionally, so the output always has one row fewer than the
/// table.
pub fn table_rows(html: &str) -> Result<Vec<RowRecord>, ExtractionError> {
    let document = Html::parse_document(html);

    let table_selector = Selector::parse("table").unwrap();
    let row_selector = Selector::parse("tr").unwrap();
    let cell_selector = Selector::parse("th, td").unwrap();

    let table = document
        .select(&table_selector)
        .next()
        .ok_or(ExtractionError)?;

    let mut rows = Vec::new();
    for row in table.select(&row_selector) {
        let mut record = RowRecord::new();
        for (index, cell) in row.select(&cell_selector).enumerate() {
            let text = cell.text().collect::<String>().trim().to_string();
            record.insert(index.to_string(), text);
        }
        rows.push(record);
    }

    // Trailing footer row.
    rows.pop();

    Ok(rows)
}
