use std::env;

use log::info;
use tokio::time::MissedTickBehavior;

use healthwatch::{init_logging, WatchConfig, Watchdog};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    init_logging(&level)?;

    let config = WatchConfig::from_env()?;
    info!(
        "healthwatch starting: endpoint={}, interval={}s, webhooks={}",
        config.endpoint,
        config.check_interval.as_secs(),
        config.webhooks.len()
    );

    let watchdog = Watchdog::from_config(&config)?;

    let mut ticker = tokio::time::interval(config.check_interval);
    // A stalled run must not cause a burst of catch-up checks.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        watchdog.run_once().await;
    }
}
