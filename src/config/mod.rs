use chrono::Duration as ChronoDuration;
use std::collections::HashMap;
use std::env;
use std::time::Duration;

use crate::evaluator::{DegradedAnnotation, HealthSchema, ScalarSpec, ToleranceRule};

/// Default deployment: the Saerro PS2 stats backend.
const DEFAULT_ENDPOINT: &str = "https://saerro.ps2.live/graphql?query={%20health%20{%20database%20ingest%20ingestReachable%20worlds%20{%20name%20status%20lastEvent%20}%20}%20}";
const DEFAULT_TITLE: &str = "Saerro Health Alert";
const DEFAULT_SERVICE: &str = "Saerro";
const DEFAULT_DEGRADED_TEXT: &str = "DEGRADED - WORLDS DOWN (see https://saerro.ps2.live/ingest)";

/// Error for missing or malformed configuration values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(String),
    Invalid(String, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(var) => write!(f, "Missing required variable: {}", var),
            ConfigError::Invalid(var, reason) => {
                write!(f, "Invalid value for {}: {}", var, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Runtime configuration for the watchdog
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Full health endpoint URL, query string included
    pub endpoint: String,
    /// Webhook destinations, in configured order
    pub webhooks: Vec<String>,
    /// Embed title used for every alert
    pub alert_title: String,
    /// Service name used in the probe-failure message
    pub service_name: String,
    /// Health schema evaluated each tick
    pub schema: HealthSchema,
    /// Time between scheduled checks
    pub check_interval: Duration,
    /// Bound on the probe and each webhook POST
    pub call_timeout: Duration,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            webhooks: Vec::new(),
            alert_title: DEFAULT_TITLE.to_string(),
            service_name: DEFAULT_SERVICE.to_string(),
            schema: saerro_schema(),
            check_interval: Duration::from_secs(300),
            call_timeout: Duration::from_secs(10),
        }
    }
}

impl WatchConfig {
    /// Load configuration from the environment
    ///
    /// Only `DISCORD_WEBHOOK_URL` is required; everything else falls back
    /// to the default deployment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let webhooks = env::var("DISCORD_WEBHOOK_URL")
            .map_err(|_| ConfigError::Missing("DISCORD_WEBHOOK_URL".to_string()))?;
        config.webhooks = split_list(&webhooks);
        if config.webhooks.is_empty() {
            return Err(ConfigError::Invalid(
                "DISCORD_WEBHOOK_URL".to_string(),
                "no destinations configured".to_string(),
            ));
        }

        if let Some(endpoint) = read_var("HEALTH_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Some(title) = read_var("ALERT_TITLE") {
            config.alert_title = title;
        }
        if let Some(service) = read_var("SERVICE_NAME") {
            config.service_name = service;
        }
        if let Some(raw) = read_var("REQUIRED_SCALARS") {
            config.schema.scalars = parse_scalars(&raw)?;
            // The degraded rewrite only makes sense while its scalar exists.
            if let Some(hook) = &config.schema.degraded {
                if !config.schema.scalars.iter().any(|s| s.field == hook.field) {
                    config.schema.degraded = None;
                }
            }
        }
        if let Some(raw) = read_var("TOLERANCE_RULES") {
            config.schema.tolerance = parse_tolerance(&raw)?;
        }
        if let Some(raw) = read_var("CHECK_INTERVAL_SECS") {
            config.check_interval = Duration::from_secs(parse_secs("CHECK_INTERVAL_SECS", &raw)?);
        }
        if let Some(raw) = read_var("PROBE_TIMEOUT_SECS") {
            config.call_timeout = Duration::from_secs(parse_secs("PROBE_TIMEOUT_SECS", &raw)?);
        }

        Ok(config)
    }
}

/// Schema of the default deployment: three aggregate scalars, a jaeger
/// exemption, and a one-hour grace window for the PlayStation worlds
/// whose event feeds go quiet regularly.
pub fn saerro_schema() -> HealthSchema {
    HealthSchema {
        scalars: vec![
            ScalarSpec::new("ingestReachable", "Ingest Reachability", "UP"),
            ScalarSpec::new("ingest", "Ingest", "UP"),
            ScalarSpec::new("database", "Database", "UP"),
        ],
        tolerance: HashMap::from([
            ("jaeger".to_string(), ToleranceRule::Ignore),
            ("genudine".to_string(), ToleranceRule::default_grace()),
            ("ceres".to_string(), ToleranceRule::default_grace()),
        ]),
        degraded: Some(DegradedAnnotation {
            field: "ingest".to_string(),
            text: DEFAULT_DEGRADED_TEXT.to_string(),
        }),
    }
}

fn read_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Split a comma-separated value, dropping empty entries
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(String::from)
        .collect()
}

/// Parse `field=healthy` entries into scalar specs, in order
///
/// Labels are derived from the field name (`ingestReachable` becomes
/// "Ingest Reachable"); the built-in schema carries hand-written labels.
fn parse_scalars(raw: &str) -> Result<Vec<ScalarSpec>, ConfigError> {
    let mut specs = Vec::new();
    for entry in split_list(raw) {
        let (field, healthy) = entry.split_once('=').ok_or_else(|| {
            ConfigError::Invalid(
                "REQUIRED_SCALARS".to_string(),
                format!("expected field=value, got '{}'", entry),
            )
        })?;
        specs.push(ScalarSpec::new(field, field_label(field), healthy));
    }
    if specs.is_empty() {
        return Err(ConfigError::Invalid(
            "REQUIRED_SCALARS".to_string(),
            "no scalars configured".to_string(),
        ));
    }
    Ok(specs)
}

/// Parse `name=ignore` / `name=grace[:secs]` entries into a rule table
fn parse_tolerance(raw: &str) -> Result<HashMap<String, ToleranceRule>, ConfigError> {
    let mut rules = HashMap::new();
    for entry in split_list(raw) {
        let (name, spec) = entry.split_once('=').ok_or_else(|| {
            ConfigError::Invalid(
                "TOLERANCE_RULES".to_string(),
                format!("expected name=rule, got '{}'", entry),
            )
        })?;

        let rule = match spec {
            "ignore" => ToleranceRule::Ignore,
            "grace" => ToleranceRule::default_grace(),
            _ => match spec.strip_prefix("grace:") {
                Some(secs) => {
                    let secs = parse_secs("TOLERANCE_RULES", secs)?;
                    ToleranceRule::Grace(ChronoDuration::seconds(secs as i64))
                }
                None => {
                    return Err(ConfigError::Invalid(
                        "TOLERANCE_RULES".to_string(),
                        format!("unknown rule '{}' for '{}'", spec, name),
                    ))
                }
            },
        };
        rules.insert(name.to_string(), rule);
    }
    Ok(rules)
}

fn parse_secs(var: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::Invalid(var.to_string(), e.to_string()))
}

/// Derive a display label from a camelCase field name
fn field_label(field: &str) -> String {
    let mut label = String::with_capacity(field.len() + 4);
    for (i, ch) in field.chars().enumerate() {
        if i == 0 {
            label.extend(ch.to_uppercase());
        } else if ch.is_uppercase() {
            label.push(' ');
            label.push(ch);
        } else {
            label.push(ch);
        }
    }
    label
}
