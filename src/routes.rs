//! API route handlers.
//!
//! Lookups follow the original public API's soft-error convention: an
//! invalid terminal, route, or data type answers HTTP 200 with a fixed
//! error payload rather than a 4xx/5xx status.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::store::SnapshotStore;
use crate::terminals::Terminal;
use crate::types::{ErrorResponse, HealthResponse, RouteSchedule, ScheduleSnapshot};

pub const ERR_NO_SCHEDULE: &str = "Schedule not yet available";
pub const ERR_INVALID_DEPARTURE: &str = "Invalid departure terminal";
pub const ERR_INVALID_DESTINATION: &str = "Invalid destination terminal";
pub const ERR_INVALID_DATA_TYPE: &str = "Invalid data type";

/// Application state shared across handlers.
pub struct AppState {
    pub store: Arc<SnapshotStore>,
}

fn soft_error(message: &str) -> Response {
    Json(ErrorResponse {
        error: message.to_string(),
    })
    .into_response()
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/` - the entire snapshot.
pub async fn all_sailings(State(state): State<Arc<AppState>>) -> Response {
    match state.store.current() {
        Some(snapshot) => Json(&*snapshot).into_response(),
        None => soft_error(ERR_NO_SCHEDULE),
    }
}

/// `GET /api/{departureTerminal}/` - all routes departing one terminal.
pub async fn by_departure(
    State(state): State<Arc<AppState>>,
    Path(departure): Path<String>,
) -> Response {
    let Some(snapshot) = state.store.current() else {
        return soft_error(ERR_NO_SCHEDULE);
    };
    match departure_slice(&snapshot, &departure) {
        Ok(slice) => Json(slice).into_response(),
        Err(message) => soft_error(message),
    }
}

/// `GET /api/{departureTerminal}/{destinationTerminal}/` - one route.
pub async fn by_route(
    State(state): State<Arc<AppState>>,
    Path((departure, destination)): Path<(String, String)>,
) -> Response {
    let Some(snapshot) = state.store.current() else {
        return soft_error(ERR_NO_SCHEDULE);
    };
    match route_slice(&snapshot, &departure, &destination) {
        Ok(slice) => Json(slice).into_response(),
        Err(message) => soft_error(message),
    }
}

/// `GET /api/{departureTerminal}/{destinationTerminal}/{dataType}/` - a
/// single field of one route's schedule.
pub async fn by_data_type(
    State(state): State<Arc<AppState>>,
    Path((departure, destination, data_type)): Path<(String, String, String)>,
) -> Response {
    let Some(snapshot) = state.store.current() else {
        return soft_error(ERR_NO_SCHEDULE);
    };
    let slice = match route_slice(&snapshot, &departure, &destination) {
        Ok(slice) => slice,
        Err(message) => return soft_error(message),
    };
    match data_slice(slice, &data_type) {
        Ok(value) => Json(value).into_response(),
        Err(message) => soft_error(message),
    }
}

/// Resolve a departure path segment against the snapshot. Path segments are
/// hyphenated (`nanaimo-(duke-pt)`) and matched case-insensitively.
fn departure_slice<'a>(
    snapshot: &'a ScheduleSnapshot,
    departure: &str,
) -> Result<&'a BTreeMap<String, RouteSchedule>, &'static str> {
    let terminal = Terminal::parse(departure).ok_or(ERR_INVALID_DEPARTURE)?;
    snapshot
        .schedule
        .get(terminal.name())
        .ok_or(ERR_INVALID_DEPARTURE)
}

fn route_slice<'a>(
    snapshot: &'a ScheduleSnapshot,
    departure: &str,
    destination: &str,
) -> Result<&'a RouteSchedule, &'static str> {
    let slice = departure_slice(snapshot, departure)?;
    let terminal = Terminal::parse(destination).ok_or(ERR_INVALID_DESTINATION)?;
    slice.get(terminal.name()).ok_or(ERR_INVALID_DESTINATION)
}

fn data_slice(
    schedule: &RouteSchedule,
    data_type: &str,
) -> Result<serde_json::Value, &'static str> {
    let value = match data_type {
        "next-sailings" => serde_json::json!(schedule.next_sailings),
        "future-sailings" => serde_json::json!(schedule.future_sailings),
        "car-waits" => serde_json::json!(schedule.car_waits),
        "oversize-waits" => serde_json::json!(schedule.oversize_waits),
        _ => return Err(ERR_INVALID_DATA_TYPE),
    };
    Ok(value)
}
