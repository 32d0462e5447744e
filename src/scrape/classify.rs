//! Row cleaning and classification.
//!
//! The schedule table mixes real sailing data with page furniture: repeated
//! column headers, footnote legends, and condition banners. Cleaning strips
//! those cells out; classification then sorts each row by what is left.

use super::extract::RowRecord;

/// Substrings marking a cell as non-sailing content.
const DENYLIST: [&str; 10] = [
    "Conditions",
    "*denotes",
    "Route",
    "Next Sailings",
    "Car Waits",
    "Oversize Waits",
    "Later Sailings",
    "Depart, Arrive",
    "Service Notices",
    "Sailing Details",
];

/// Column index carrying the future-sailings token list. Its presence marks
/// a summary row.
const SUMMARY_MARKER: &str = "4";

/// What a cleaned row turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    /// Nothing left after cleaning.
    Noise,
    /// Single remaining cell naming the route: either
    /// `"<origin> to <destination>"` or a bare departure terminal.
    RouteHeader(String),
    /// Aggregate row for the current route: car/oversize wait percentages
    /// plus the future-sailing time list. Its label cell also names the
    /// route, which establishes the destination.
    Summary {
        label: Option<String>,
        car_waits: Option<String>,
        oversize_waits: Option<String>,
        future_sailings: String,
    },
    /// One scheduled sailing: departure time and capacity/status text.
    Sailing { time: String, status: String },
    /// A row shaped like data but with a required cell missing.
    Malformed,
}

/// Remove empty and denylisted cells. Cells are removed individually; a
/// banner in one column does not discard the rest of the row.
pub fn clean(record: &mut RowRecord) {
    record.retain(|_, value| !value.is_empty() && !DENYLIST.iter().any(|m| value.contains(m)));
}

/// Classify a cleaned row by its remaining cardinality and keys.
pub fn classify(record: &RowRecord) -> RowKind {
    if record.is_empty() {
        return RowKind::Noise;
    }

    if record.len() == 1 {
        let value = record.values().next().unwrap().clone();
        return RowKind::RouteHeader(value);
    }

    if let Some(future_sailings) = record.get(SUMMARY_MARKER) {
        return RowKind::Summary {
            label: record.get("0").cloned(),
            car_waits: record.get("2").cloned(),
            oversize_waits: record.get("3").cloned(),
            future_sailings: future_sailings.clone(),
        };
    }

    if let Some(status) = record.get("1") {
        return match record.get("0") {
            Some(time) => RowKind::Sailing {
                time: time.clone(),
                status: status.clone(),
            },
            None => RowKind::Malformed,
        };
    }

    RowKind::Malformed
}
