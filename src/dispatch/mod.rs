use futures_util::future::join_all;
use log::{error, info};
use reqwest::Client;
use serde::Serialize;

use crate::alert::{Alert, AlertDecision, AlertField};

/// Error for a single webhook delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    NetworkError(String),
    StatusError(u16),
}

impl std::fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            DeliveryError::StatusError(code) => write!(f, "Webhook returned status: {}", code),
        }
    }
}

impl std::error::Error for DeliveryError {}

// Discord rich-embed wire format.
#[derive(Debug, Serialize)]
struct Embed<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    title: &'a str,
    description: &'a str,
    color: u32,
    fields: &'a [AlertField],
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    embeds: [Embed<'a>; 1],
}

impl<'a> WebhookPayload<'a> {
    fn render(alert: &'a Alert) -> Self {
        Self {
            embeds: [Embed {
                kind: "rich",
                title: &alert.title,
                description: &alert.description,
                color: alert.severity.color(),
                fields: &alert.fields,
            }],
        }
    }
}

/// Delivers rendered alerts to every configured webhook
///
/// Deliveries are independent: a destination that fails is logged and
/// never blocks the others, and nothing is retried within a run. Webhook
/// URLs carry credentials, so logs refer to destinations by position.
pub struct AlertDispatcher {
    destinations: Vec<String>,
    client: Client,
}

impl AlertDispatcher {
    pub fn new(destinations: Vec<String>, client: Client) -> Self {
        Self {
            destinations,
            client,
        }
    }

    /// Deliver the decision's payload to every destination
    ///
    /// No-op for `NoAlert`.
    pub async fn dispatch(&self, decision: &AlertDecision) {
        let alert = match decision {
            AlertDecision::NoAlert => return,
            AlertDecision::Alert(alert) => alert,
        };

        let payload = WebhookPayload::render(alert);
        let deliveries = self
            .destinations
            .iter()
            .map(|url| self.deliver(url, &payload));

        for (index, result) in join_all(deliveries).await.into_iter().enumerate() {
            match result {
                Ok(()) => info!("alert delivered to webhook #{}", index),
                Err(e) => error!("delivery to webhook #{} failed: {}", index, e),
            }
        }
    }

    async fn deliver(&self, url: &str, payload: &WebhookPayload<'_>) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| DeliveryError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DeliveryError::StatusError(response.status().as_u16()));
        }

        Ok(())
    }
}
