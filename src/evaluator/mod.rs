use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

use crate::alert::{Alert, AlertDecision, AlertField, Severity};
use crate::probe::ProbeError;
use crate::types::{HealthSnapshot, UpDown, WorldStatus};

/// Tolerance policy for a single world's DOWN reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToleranceRule {
    /// Never alert on this world, whatever its state
    Ignore,
    /// Tolerate DOWN while the world's last event is younger than the window
    Grace(Duration),
}

impl ToleranceRule {
    /// Default grace window for worlds with flaky event feeds
    pub fn default_grace() -> Self {
        ToleranceRule::Grace(Duration::hours(1))
    }

    /// Whether a DOWN report should be suppressed at `now`
    ///
    /// A gap exactly equal to the grace window counts as a real outage.
    fn suppresses(&self, world: &WorldStatus, now: DateTime<Utc>) -> bool {
        match self {
            ToleranceRule::Ignore => true,
            ToleranceRule::Grace(window) => now - world.last_event < *window,
        }
    }
}

/// One required top-level status field and its healthy value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarSpec {
    /// Field name in the health response
    pub field: String,
    /// Label rendered into the alert
    pub label: String,
    /// Value the field must hold to count as healthy
    pub healthy: String,
}

impl ScalarSpec {
    pub fn new(
        field: impl Into<String>,
        label: impl Into<String>,
        healthy: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            healthy: healthy.into(),
        }
    }
}

/// Rendering hook for deployments with an aggregate ingest scalar: when
/// the service itself is healthy but worlds are down, the hooked scalar's
/// displayed value is replaced by `text` instead of its raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegradedAnnotation {
    pub field: String,
    pub text: String,
}

/// Declarative description of one deployment's health schema
///
/// The required scalar fields, the per-world tolerance table, and the
/// optional degraded-value rewrite are all data, so one evaluator serves
/// every deployment variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthSchema {
    /// Required scalars, in render order
    pub scalars: Vec<ScalarSpec>,
    /// Tolerance rules keyed by exact world name
    pub tolerance: HashMap<String, ToleranceRule>,
    /// Optional degraded-value rewrite
    pub degraded: Option<DegradedAnnotation>,
}

/// Turns probe outcomes into alert decisions
///
/// Pure with respect to its inputs: the same outcome and `now` always
/// produce the same decision.
pub struct HealthEvaluator {
    schema: HealthSchema,
    title: String,
    service: String,
}

impl HealthEvaluator {
    pub fn new(
        schema: HealthSchema,
        title: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            schema,
            title: title.into(),
            service: service.into(),
        }
    }

    /// Evaluate one probe outcome
    pub fn evaluate(
        &self,
        outcome: &Result<HealthSnapshot, ProbeError>,
        now: DateTime<Utc>,
    ) -> AlertDecision {
        match outcome {
            Ok(snapshot) => self.evaluate_snapshot(snapshot, now),
            Err(_) => AlertDecision::Alert(self.probe_failure_alert()),
        }
    }

    /// Generic payload for a probe that produced no snapshot at all
    fn probe_failure_alert(&self) -> Alert {
        Alert {
            title: self.title.clone(),
            description: String::new(),
            severity: Severity::Critical,
            fields: vec![AlertField::new(
                "General Failure",
                format!("{} did not respond to health check.", self.service),
            )],
        }
    }

    fn evaluate_snapshot(&self, snapshot: &HealthSnapshot, now: DateTime<Utc>) -> AlertDecision {
        let down_worlds = self.down_worlds(&snapshot.worlds, now);
        let scalars_healthy = self
            .schema
            .scalars
            .iter()
            .all(|spec| snapshot.scalar(&spec.field) == Some(spec.healthy.as_str()));

        if scalars_healthy && down_worlds.is_empty() {
            return AlertDecision::NoAlert;
        }

        // A failing scalar means the service itself is broken; worlds alone
        // only degrade it.
        let severity = if scalars_healthy {
            Severity::Warning
        } else {
            Severity::Critical
        };

        let mut fields = Vec::with_capacity(self.schema.scalars.len() + 1);
        for spec in &self.schema.scalars {
            let value = match &self.schema.degraded {
                Some(hook) if severity == Severity::Warning && hook.field == spec.field => {
                    hook.text.clone()
                }
                _ => snapshot.scalar(&spec.field).unwrap_or("MISSING").to_string(),
            };
            fields.push(AlertField::new(spec.label.clone(), value));
        }

        if !down_worlds.is_empty() {
            let names: Vec<&str> = down_worlds.iter().map(|w| w.name.as_str()).collect();
            fields.push(AlertField::new("Down Worlds", names.join(", ")));
        }

        AlertDecision::Alert(Alert {
            title: self.title.clone(),
            description: String::new(),
            severity,
            fields,
        })
    }

    /// Worlds that are DOWN and not suppressed by their tolerance rule,
    /// in source order. Worlds without a rule count unconditionally.
    fn down_worlds<'a>(
        &self,
        worlds: &'a [WorldStatus],
        now: DateTime<Utc>,
    ) -> Vec<&'a WorldStatus> {
        worlds
            .iter()
            .filter(|w| w.status == UpDown::Down)
            .filter(|w| match self.schema.tolerance.get(&w.name) {
                Some(rule) => !rule.suppresses(w, now),
                None => true,
            })
            .collect()
    }
}
