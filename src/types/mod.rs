use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Binary status reported by the health endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UpDown {
    Up,
    Down,
}

/// Health report for a single world (one named shard of the ingest layer)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldStatus {
    pub name: String,
    pub status: UpDown,
    /// Timestamp of the last event seen from this world
    #[serde(rename = "lastEvent")]
    pub last_event: DateTime<Utc>,
}

/// One parsed health response
///
/// The set of top-level scalar fields differs per deployment, so scalars
/// are kept as a name → raw value map rather than a fixed struct. Which
/// of them must be healthy is decided by the evaluator's schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthSnapshot {
    pub scalars: HashMap<String, String>,
    pub worlds: Vec<WorldStatus>,
}

impl HealthSnapshot {
    /// Raw value of a top-level scalar field, if present in the response
    pub fn scalar(&self, field: &str) -> Option<&str> {
        self.scalars.get(field).map(String::as_str)
    }
}

// Wire envelope: { "data": { "health": { <scalars>, "worlds": [...] } } }
#[derive(Debug, Deserialize)]
pub(crate) struct HealthEnvelope {
    pub data: HealthData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HealthData {
    pub health: HealthBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HealthBody {
    #[serde(default)]
    pub worlds: Vec<WorldStatus>,
    #[serde(flatten)]
    pub scalars: HashMap<String, String>,
}

impl From<HealthEnvelope> for HealthSnapshot {
    fn from(envelope: HealthEnvelope) -> Self {
        Self {
            scalars: envelope.data.health.scalars,
            worlds: envelope.data.health.worlds,
        }
    }
}
