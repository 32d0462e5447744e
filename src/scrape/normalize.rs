//! Schedule normalization.
//!
//! Folds classified rows into the pre-declared snapshot skeleton. The parse
//! context (which route subsequent rows belong to) is an explicit state
//! machine driven by row classification, so a malformed or misplaced row
//! skips forward instead of aborting the document.

use super::classify::{self, RowKind};
use super::extract::{self, ExtractionError, RowRecord};
use super::{ScrapeDiagnostics, SkipReason};
use crate::terminals::{Route, Terminal};
use crate::types::{Sailing, ScheduleSnapshot};

/// Time/status cells longer than this are status banners, not sailings.
const FURNITURE_LENGTH: usize = 20;

const FURNITURE_TOKENS: [&str; 3] = ["Status", "Arrived", "ETA"];

/// Parse context while streaming rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    AwaitingRouteHeader,
    InRoute {
        origin: Terminal,
        /// A bare-terminal header leaves the destination open until the
        /// route's summary row names it.
        destination: Option<Terminal>,
    },
}

/// Extract and fold one document into `snapshot`, recording every dropped
/// row in `diagnostics`. A document without a schedule table is fatal.
pub fn apply_document(
    html: &str,
    snapshot: &mut ScheduleSnapshot,
    diagnostics: &mut ScrapeDiagnostics,
) -> Result<(), ExtractionError> {
    let rows = extract::table_rows(html)?;
    apply_rows(rows, snapshot, diagnostics);
    Ok(())
}

fn apply_rows(
    rows: Vec<RowRecord>,
    snapshot: &mut ScheduleSnapshot,
    diagnostics: &mut ScrapeDiagnostics,
) {
    let mut state = ParseState::AwaitingRouteHeader;

    for (index, mut row) in rows.into_iter().enumerate() {
        classify::clean(&mut row);

        match classify::classify(&row) {
            RowKind::Noise => diagnostics.record(index, SkipReason::Noise),
            RowKind::Malformed => diagnostics.record(index, SkipReason::Malformed),
            RowKind::RouteHeader(label) => match parse_route_header(&label) {
                Some(next) => state = next,
                None => {
                    state = ParseState::AwaitingRouteHeader;
                    diagnostics.record(index, SkipReason::UnknownRoute(label));
                }
            },
            RowKind::Summary {
                label,
                car_waits,
                oversize_waits,
                future_sailings,
            } => {
                let ParseState::InRoute { origin, .. } = state else {
                    diagnostics.record(index, SkipReason::NoRouteContext);
                    continue;
                };
                let Some(label) = label else {
                    diagnostics.record(index, SkipReason::Malformed);
                    continue;
                };
                let Some(destination) = destination_from_label(&label) else {
                    diagnostics.record(index, SkipReason::UnknownRoute(label));
                    continue;
                };
                let Some(slot) = slot(snapshot, origin, destination) else {
                    diagnostics.record(index, SkipReason::UnknownRoute(label));
                    continue;
                };

                if let Some(waits) = car_waits {
                    slot.car_waits = waits;
                }
                if let Some(waits) = oversize_waits {
                    slot.oversize_waits = waits;
                }
                slot.future_sailings = split_future_tokens(&future_sailings);

                state = ParseState::InRoute {
                    origin,
                    destination: Some(destination),
                };
            }
            RowKind::Sailing { time, status } => {
                if is_furniture(&time) || is_furniture(&status) {
                    diagnostics.record(index, SkipReason::Furniture);
                    continue;
                }
                let ParseState::InRoute {
                    origin,
                    destination: Some(destination),
                } = state
                else {
                    diagnostics.record(index, SkipReason::NoRouteContext);
                    continue;
                };
                let Some(slot) = slot(snapshot, origin, destination) else {
                    diagnostics.record(
                        index,
                        SkipReason::UnknownRoute(format!("{} to {}", origin, destination)),
                    );
                    continue;
                };

                slot.next_sailings.push(Sailing {
                    capacity: parse_capacity(&status),
                    time,
                });
            }
        }
    }
}

/// A route header is either `"<origin> to <destination>"` or a bare
/// departure terminal, depending on the page format.
fn parse_route_header(label: &str) -> Option<ParseState> {
    if let Some((origin, destination)) = label.split_once(" to ") {
        let origin = Terminal::parse(origin)?;
        let destination = Terminal::parse(destination)?;
        Route::find(origin, destination)?;
        return Some(ParseState::InRoute {
            origin,
            destination: Some(destination),
        });
    }

    let origin = Terminal::parse(label)?;
    Some(ParseState::InRoute {
        origin,
        destination: None,
    })
}

fn destination_from_label(label: &str) -> Option<Terminal> {
    let (_, destination) = label.split_once(" to ")?;
    Terminal::parse(destination)
}

fn slot<'a>(
    snapshot: &'a mut ScheduleSnapshot,
    origin: Terminal,
    destination: Terminal,
) -> Option<&'a mut crate::types::RouteSchedule> {
    Route::find(origin, destination)?;
    snapshot
        .schedule
        .get_mut(origin.name())?
        .get_mut(destination.name())
}

/// Normalize a capacity cell.
///
/// Precedence: a cell containing `:` is a literal time string (some page
/// variants put the time in the capacity column); the exact tokens `Full`
/// and `Cancelled` pass through; otherwise the leading integer is the deck
/// space *remaining*, stored as deck space *used* (`100 - x`).
pub fn parse_capacity(text: &str) -> String {
    if text.contains(':') {
        return text.to_string();
    }
    if text == "Full" || text == "Cancelled" {
        return text.to_string();
    }

    let leading = text.split(' ').next().unwrap_or("");
    let leading = leading.strip_suffix('%').unwrap_or(leading);
    match leading.parse::<i32>() {
        Ok(remaining) => format!("{}%", 100 - remaining),
        Err(_) => "Unknown".to_string(),
    }
}

/// Status banners occasionally land in the time/status columns; they are
/// longer than any real cell or carry live-status tokens.
pub fn is_furniture(cell: &str) -> bool {
    cell.len() > FURNITURE_LENGTH || FURNITURE_TOKENS.iter().any(|t| cell.contains(t))
}

/// Split a future-sailings cell into time tokens, stripping the `*`
/// footnote marker.
pub fn split_future_tokens(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|token| token.replace('*', ""))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn fold(html: &str) -> (ScheduleSnapshot, ScrapeDiagnostics) {
        let mut snapshot = ScheduleSnapshot::skeleton(Utc::now());
        let mut diagnostics = ScrapeDiagnostics::default();
        apply_document(html, &mut snapshot, &mut diagnostics).unwrap();
        (snapshot, diagnostics)
    }

    #[test]
    fn capacity_inversion_remaining_to_used() {
        assert_eq!(parse_capacity("25%"), "75%");
        assert_eq!(parse_capacity("25% full"), "75%");
        assert_eq!(parse_capacity("100%"), "0%");
    }

    #[test]
    fn capacity_literal_tokens_pass_through() {
        assert_eq!(parse_capacity("Full"), "Full");
        assert_eq!(parse_capacity("Cancelled"), "Cancelled");
        // Case-sensitive, exact.
        assert_eq!(parse_capacity("full"), "Unknown");
    }

    #[test]
    fn capacity_with_colon_is_a_time() {
        assert_eq!(parse_capacity("14:30"), "14:30");
        assert_eq!(parse_capacity("2:45 pm"), "2:45 pm");
    }

    #[test]
    fn capacity_garbage_is_unknown() {
        assert_eq!(parse_capacity("n/a"), "Unknown");
        assert_eq!(parse_capacity(""), "Unknown");
    }

    #[test]
    fn furniture_cells_are_detected() {
        assert!(is_furniture("Sailing Status: On Time and Loading"));
        assert!(is_furniture("Arrived"));
        assert!(is_furniture("ETA 10:45"));
        assert!(!is_furniture("10:00 am"));
        assert!(!is_furniture("75%"));
    }

    #[test]
    fn future_tokens_split_and_strip_footnote_markers() {
        assert_eq!(
            split_future_tokens("3:00pm 5:00pm* 7:00pm"),
            vec!["3:00pm", "5:00pm", "7:00pm"]
        );
        assert_eq!(split_future_tokens(""), Vec::<String>::new());
    }

    #[test]
    fn single_route_table_fills_one_slot() {
        let html = r#"<table>
            <tr><td>Tsawwassen to Swartz Bay</td></tr>
            <tr><td>10:00</td><td>25%</td></tr>
            <tr><td>footer</td></tr>
        </table>"#;
        let (snapshot, diagnostics) = fold(html);
        let slot = &snapshot.schedule["tsawwassen"]["swartz bay"];
        assert_eq!(
            slot.next_sailings,
            vec![Sailing {
                time: "10:00".to_string(),
                capacity: "75%".to_string(),
            }]
        );
        assert_eq!(diagnostics.skipped_rows(), 0);
    }

    #[test]
    fn bare_terminal_header_with_summary_row() {
        let html = r#"<table>
            <tr><th>Route</th><th>Next Sailings</th><th>Car Waits</th><th>Oversize Waits</th><th>Later Sailings</th></tr>
            <tr><td>Tsawwassen</td></tr>
            <tr><td>Tsawwassen to Swartz Bay</td><td></td><td>1</td><td>2</td><td>5:00pm 7:00pm*</td></tr>
            <tr><td>1:00 pm</td><td>40%</td></tr>
            <tr><td>3:00 pm</td><td>Full</td></tr>
            <tr><td>*denotes info</td></tr>
        </table>"#;
        let (snapshot, diagnostics) = fold(html);
        let slot = &snapshot.schedule["tsawwassen"]["swartz bay"];
        assert_eq!(slot.car_waits, "1");
        assert_eq!(slot.oversize_waits, "2");
        assert_eq!(slot.future_sailings, vec!["5:00pm", "7:00pm"]);
        assert_eq!(slot.next_sailings.len(), 2);
        assert_eq!(slot.next_sailings[0].capacity, "60%");
        assert_eq!(slot.next_sailings[1].capacity, "Full");
        // Only the cleaned-away header row counts as noise.
        assert_eq!(diagnostics.skipped_rows(), 1);
        assert_eq!(diagnostics.unexpected().count(), 0);
    }

    #[test]
    fn page_spelling_of_dep_bay_reaches_its_slot() {
        // The live page spells the header without a space after the period.
        let html = r#"<table>
            <tr><td>Nanaimo (Dep.Bay) to Horseshoe Bay</td></tr>
            <tr><td>8:25 am</td><td>30%</td></tr>
            <tr><td>footer</td></tr>
        </table>"#;
        let (snapshot, diagnostics) = fold(html);
        let slot = &snapshot.schedule["nanaimo (dep. bay)"]["horseshoe bay"];
        assert_eq!(
            slot.next_sailings,
            vec![Sailing {
                time: "8:25 am".to_string(),
                capacity: "70%".to_string(),
            }]
        );
        assert_eq!(diagnostics.skipped_rows(), 0);
    }

    #[test]
    fn sailing_before_any_header_is_skipped_not_fatal() {
        let html = r#"<table>
            <tr><td>10:00</td><td>25%</td></tr>
            <tr><td>Langdale to Horseshoe Bay</td></tr>
            <tr><td>11:30</td><td>Cancelled</td></tr>
            <tr><td>footer</td></tr>
        </table>"#;
        let (snapshot, diagnostics) = fold(html);
        assert_eq!(
            diagnostics.skipped,
            vec![super::super::SkippedRow {
                row: 0,
                reason: SkipReason::NoRouteContext,
            }]
        );
        let slot = &snapshot.schedule["langdale"]["horseshoe bay"];
        assert_eq!(slot.next_sailings[0].capacity, "Cancelled");
    }

    #[test]
    fn mid_page_banner_does_not_break_the_route_context() {
        let html = r#"<table>
            <tr><td>Horseshoe Bay to Langdale</td></tr>
            <tr><td>10:00</td><td>25%</td></tr>
            <tr><td>Sailing Status: delayed due to weather conditions</td><td>Arrived</td></tr>
            <tr><td>12:00</td><td>14:05</td></tr>
            <tr><td>footer</td></tr>
        </table>"#;
        let (snapshot, diagnostics) = fold(html);
        let slot = &snapshot.schedule["horseshoe bay"]["langdale"];
        assert_eq!(slot.next_sailings.len(), 2);
        // Capacity column carried a time on this page variant.
        assert_eq!(slot.next_sailings[1].capacity, "14:05");
        assert_eq!(
            diagnostics.skipped[0].reason,
            SkipReason::Furniture
        );
    }

    #[test]
    fn unknown_route_header_drops_following_rows() {
        let html = r#"<table>
            <tr><td>Atlantis to Narnia</td></tr>
            <tr><td>10:00</td><td>25%</td></tr>
            <tr><td>footer</td></tr>
        </table>"#;
        let (snapshot, diagnostics) = fold(html);
        assert_eq!(diagnostics.skipped_rows(), 2);
        assert!(matches!(
            diagnostics.skipped[0].reason,
            SkipReason::UnknownRoute(_)
        ));
        assert_eq!(snapshot.schedule, ScheduleSnapshot::skeleton(Utc::now()).schedule);
    }

    #[test]
    fn invalid_direction_never_gains_a_slot() {
        // Swartz Bay -> Langdale is not in the adjacency.
        let html = r#"<table>
            <tr><td>Swartz Bay to Langdale</td></tr>
            <tr><td>10:00</td><td>25%</td></tr>
            <tr><td>footer</td></tr>
        </table>"#;
        let (snapshot, diagnostics) = fold(html);
        assert!(diagnostics.skipped_rows() > 0);
        assert!(!snapshot.schedule["swartz bay"].contains_key("langdale"));
    }

    #[test]
    fn normalization_is_idempotent() {
        let html = r#"<table>
            <tr><td>Tsawwassen</td></tr>
            <tr><td>Tsawwassen to Duke Point</td><td></td><td>0</td><td>1</td><td>10:15pm*</td></tr>
            <tr><td>5:45 pm</td><td>62%</td></tr>
            <tr><td>footer</td></tr>
        </table>"#;
        let (first, first_diag) = fold(html);
        let (second, second_diag) = fold(html);
        assert_eq!(first.schedule, second.schedule);
        assert_eq!(first_diag, second_diag);
    }
}
