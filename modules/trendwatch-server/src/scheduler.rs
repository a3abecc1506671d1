//! Recurring sweep schedule: once at process start, then at the top of
//! every fourth hour (the `0 */4 * * *` contract).

use std::time::Duration;

use chrono::{DateTime, Timelike, Utc};
use tracing::{error, info};

use trendwatch_common::{Config, Registry};
use trendwatch_scraper::{storage::Store, sweep};

const SWEEP_INTERVAL_HOURS: u32 = 4;

pub fn start(config: Config, registry: Registry, store: Store) {
    tokio::spawn(async move {
        run_once(&config, &registry, &store).await;

        loop {
            let wait = until_next_slot(Utc::now());
            info!(minutes = wait.as_secs() / 60, "Next sweep scheduled");
            tokio::time::sleep(wait).await;
            run_once(&config, &registry, &store).await;
        }
    });
}

async fn run_once(config: &Config, registry: &Registry, store: &Store) {
    if let Err(e) = sweep::run_sweep(registry, store, config).await {
        error!(error = %e, "Scheduled sweep failed");
    }
}

/// Time until the next top-of-hour whose hour is divisible by four.
fn until_next_slot(now: DateTime<Utc>) -> Duration {
    let seconds_into_slot = (now.hour() % SWEEP_INTERVAL_HOURS) as u64 * 3600
        + now.minute() as u64 * 60
        + now.second() as u64;
    let slot_seconds = SWEEP_INTERVAL_HOURS as u64 * 3600;
    Duration::from_secs((slot_seconds - seconds_into_slot).max(1))
}
