//! Schedule scraping pipeline.
//!
//! One refresh cycle walks the route table, fetches each current-conditions
//! page, and folds the extracted rows into a single [`ScheduleSnapshot`].
//! Fetches are sequential; there is no concurrency inside a cycle.

pub mod classify;
pub mod client;
pub mod extract;
pub mod normalize;

use anyhow::Result;
use chrono::Utc;
use std::fmt;
use tracing::warn;

use crate::config::ScraperConfig;
use crate::terminals::ROUTES;
use crate::types::ScheduleSnapshot;

pub use client::HttpClient;
pub use extract::ExtractionError;

/// Why a row was left out of the schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Nothing left after cleaning.
    Noise,
    /// Data-shaped row with a required cell missing.
    Malformed,
    /// Sailing or summary row before any route header established context.
    NoRouteContext,
    /// Route or terminal name outside the static route table.
    UnknownRoute(String),
    /// Status banner dressed up as a sailing row.
    Furniture,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Noise => write!(f, "noise"),
            SkipReason::Malformed => write!(f, "malformed"),
            SkipReason::NoRouteContext => write!(f, "no route context"),
            SkipReason::UnknownRoute(name) => write!(f, "unknown route {:?}", name),
            SkipReason::Furniture => write!(f, "page furniture"),
        }
    }
}

/// One skipped row, by position in the extracted table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: SkipReason,
}

/// Per-cycle record of everything the normalizer dropped. Recovery from
/// malformed rows is deliberate, but it should be observable rather than a
/// silent `continue`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeDiagnostics {
    pub skipped: Vec<SkippedRow>,
}

impl ScrapeDiagnostics {
    pub fn record(&mut self, row: usize, reason: SkipReason) {
        self.skipped.push(SkippedRow { row, reason });
    }

    pub fn skipped_rows(&self) -> usize {
        self.skipped.len()
    }

    /// Rows dropped for reasons other than being plain noise.
    pub fn unexpected(&self) -> impl Iterator<Item = &SkippedRow> {
        self.skipped
            .iter()
            .filter(|s| s.reason != SkipReason::Noise)
    }
}

/// A completed scrape: the snapshot plus what was dropped building it.
#[derive(Debug, Clone)]
pub struct ScrapeOutcome {
    pub snapshot: ScheduleSnapshot,
    pub diagnostics: ScrapeDiagnostics,
}

/// Run one full scrape pass over every route in the route table.
///
/// A route whose fetch fails is logged and skipped; the cycle still produces
/// a snapshot from the remaining routes. A fetched document with no schedule
/// table aborts the cycle with [`ExtractionError`] so the caller keeps the
/// previous snapshot.
pub async fn scrape_all(client: &HttpClient, config: &ScraperConfig) -> Result<ScrapeOutcome> {
    let mut snapshot = ScheduleSnapshot::skeleton(Utc::now());
    let mut diagnostics = ScrapeDiagnostics::default();

    for route in ROUTES {
        let url = route.url(&config.base_url);
        let html = match client.get(&url).await {
            Ok(html) => html,
            Err(e) => {
                warn!("fetch failed for {}: {}", route.key(), e);
                continue;
            }
        };

        normalize::apply_document(&html, &mut snapshot, &mut diagnostics)?;
    }

    Ok(ScrapeOutcome {
        snapshot,
        diagnostics,
    })
}
