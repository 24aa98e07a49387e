use chrono::Utc;
use log::{info, warn};
use reqwest::Client;

use crate::alert::AlertDecision;
use crate::config::WatchConfig;
use crate::dispatch::AlertDispatcher;
use crate::evaluator::HealthEvaluator;
use crate::probe::HealthProbe;

/// Wires probe → evaluator → dispatcher for one deployment
///
/// Holds no state across ticks; every run is self-contained.
pub struct Watchdog {
    probe: HealthProbe,
    evaluator: HealthEvaluator,
    dispatcher: AlertDispatcher,
}

impl Watchdog {
    /// Build the pipeline from a config
    ///
    /// One HTTP client, bounded by the configured timeout, is shared by
    /// the probe and the dispatcher so no call can outlive a tick.
    pub fn from_config(config: &WatchConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.call_timeout).build()?;

        Ok(Self {
            probe: HealthProbe::new(config.endpoint.clone(), client.clone()),
            evaluator: HealthEvaluator::new(
                config.schema.clone(),
                config.alert_title.clone(),
                config.service_name.clone(),
            ),
            dispatcher: AlertDispatcher::new(config.webhooks.clone(), client),
        })
    }

    /// Run one scheduled check: probe, evaluate, dispatch
    ///
    /// Returns the decision so callers can observe what happened; all
    /// delivery failures are already logged by the dispatcher.
    pub async fn run_once(&self) -> AlertDecision {
        let outcome = self.probe.probe().await;
        if let Err(e) = &outcome {
            warn!("health probe failed: {}", e);
        }

        let decision = self.evaluator.evaluate(&outcome, Utc::now());
        match &decision {
            AlertDecision::NoAlert => info!("all checks passed"),
            AlertDecision::Alert(alert) => {
                warn!("sending alert, failed checks: {:?}", alert.fields);
            }
        }

        self.dispatcher.dispatch(&decision).await;
        decision
    }
}
