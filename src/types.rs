//! Schedule and API response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::terminals;

/// One scheduled or in-progress crossing.
///
/// `time` is free text as rendered on the page, either a clock time or a
/// descriptive token. `capacity` is a deck-space-used percentage, the literal
/// `"Full"` or `"Cancelled"` tokens, a verbatim time string for page variants
/// that put the time in the capacity column, or `"Unknown"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sailing {
    pub time: String,
    pub capacity: String,
}

/// Sailing data for one directed route, in document (chronological) order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSchedule {
    pub next_sailings: Vec<Sailing>,
    pub future_sailings: Vec<String>,
    #[serde(default)]
    pub car_waits: String,
    #[serde(default)]
    pub oversize_waits: String,
}

/// Nested schedule lookup: departure terminal -> destination terminal -> data.
pub type Schedule = BTreeMap<String, BTreeMap<String, RouteSchedule>>;

/// One complete scrape covering all configured routes.
///
/// Immutable once produced; each refresh cycle replaces the previous snapshot
/// wholesale. There is no cross-snapshot mutation and no history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSnapshot {
    pub schedule: Schedule,
    pub scraped_at: DateTime<Utc>,
}

impl ScheduleSnapshot {
    /// Pre-declared skeleton with an empty [`RouteSchedule`] slot for every
    /// valid route. The normalizer fills these in; unknown routes never gain
    /// a slot.
    pub fn skeleton(scraped_at: DateTime<Utc>) -> Self {
        let mut schedule = Schedule::new();
        for route in terminals::ROUTES {
            schedule
                .entry(route.origin.name().to_string())
                .or_default()
                .insert(route.destination.name().to_string(), RouteSchedule::default());
        }
        Self {
            schedule,
            scraped_at,
        }
    }
}

/// Soft-error payload. Served with HTTP 200; consumers check for the `error`
/// key rather than the status code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
