//! Scheduled refresh driver.
//!
//! Fires the scrape pipeline on a fixed wall-clock interval and publishes
//! the result to the snapshot store and the database. Cycles are guarded by
//! a single-flight gate: a tick that fires while a refresh is still running
//! is skipped and deferred to the next tick.

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::scrape::{self, HttpClient};
use crate::storage::SnapshotRepository;
use crate::store::SnapshotStore;

/// Single-flight gate. `try_begin` hands out at most one guard at a time;
/// dropping the guard reopens the gate.
#[derive(Default)]
pub struct SingleFlight {
    in_flight: AtomicBool,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_begin(&self) -> Option<FlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightGuard { gate: self })
    }
}

pub struct FlightGuard<'a> {
    gate: &'a SingleFlight,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.gate.in_flight.store(false, Ordering::Release);
    }
}

/// Run the refresh loop forever.
pub async fn run(
    config: ScraperConfig,
    client: HttpClient,
    store: Arc<SnapshotStore>,
    repository: Arc<Mutex<SnapshotRepository>>,
) {
    let gate = SingleFlight::new();
    let mut interval = time::interval(Duration::from_secs(config.refresh_interval_secs));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let Some(_guard) = gate.try_begin() else {
            warn!("refresh already in flight, skipping tick");
            continue;
        };

        if let Err(e) = run_cycle(&config, &client, &store, &repository).await {
            // Keep serving the previous snapshot; the next tick retries.
            warn!("refresh cycle failed: {:#}", e);
        }
    }
}

/// One complete fetch-normalize-persist pass.
async fn run_cycle(
    config: &ScraperConfig,
    client: &HttpClient,
    store: &SnapshotStore,
    repository: &Mutex<SnapshotRepository>,
) -> Result<()> {
    let outcome = scrape::scrape_all(client, config).await?;

    let unexpected = outcome.diagnostics.unexpected().count();
    if unexpected > 0 {
        for skipped in outcome.diagnostics.unexpected() {
            debug!("skipped row {}: {}", skipped.row, skipped.reason);
        }
        info!(
            "scrape dropped {} rows ({} unexpected)",
            outcome.diagnostics.skipped_rows(),
            unexpected
        );
    }

    repository
        .lock()
        .expect("snapshot repository poisoned")
        .replace(&outcome.snapshot)?;
    store.replace(outcome.snapshot);

    info!("schedule updated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_flight_admits_one_cycle_at_a_time() {
        let gate = SingleFlight::new();
        let guard = gate.try_begin().expect("gate should be open");
        assert!(gate.try_begin().is_none());
        drop(guard);
        assert!(gate.try_begin().is_some());
    }
}
