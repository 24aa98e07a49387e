use serde::Serialize;

/// Alert severity, mapped onto the embed accent color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Service is up but partially impaired
    Warning,
    /// Service is down or unreachable
    Critical,
}

impl Severity {
    /// Embed color used by the webhook payload
    pub fn color(self) -> u32 {
        match self {
            Severity::Warning => 0xFFD700,
            Severity::Critical => 0xFF5858,
        }
    }
}

/// One name/value pair rendered into the alert embed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertField {
    pub name: String,
    pub value: String,
}

impl AlertField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A fully assembled alert, ready for delivery
///
/// Constructed once per evaluation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub fields: Vec<AlertField>,
}

/// Outcome of one evaluation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertDecision {
    /// Everything healthy, nothing to deliver
    NoAlert,
    /// Anomaly detected, deliver this payload
    Alert(Alert),
}

impl AlertDecision {
    pub fn is_alert(&self) -> bool {
        matches!(self, AlertDecision::Alert(_))
    }
}
