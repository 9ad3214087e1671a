use crate::dish::wire::{WireDish, WireErrors};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::StatusCode;
use serde_json::Value as JsonValue;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Result of one submission attempt, as consumed by the form.
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    /// Any 2xx; the server's body (JSON when it parses, text otherwise).
    Success(JsonValue),
    /// HTTP 400 carrying wire-keyed field errors.
    ValidationFailure(WireErrors),
    /// Everything else: transport errors, timeouts, other statuses.
    GenericFailure,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("server answered {status}")]
    Status { status: StatusCode },
    #[error("400 body is not a field error map: {0}")]
    MalformedErrors(String),
}

pub trait SubmissionGateway: Send + Sync {
    /// Exactly one attempt, no retry.
    fn submit(&self, dish: &WireDish) -> SubmitOutcome;
}

pub struct HttpGateway {
    client: Client,
    endpoint: String,
}

impl HttpGateway {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(GatewayError::Client)?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn post(&self, dish: &WireDish) -> Result<SubmitOutcome, GatewayError> {
        let transport = |source: reqwest::Error| GatewayError::Transport {
            url: self.endpoint.clone(),
            source,
        };
        debug!(
            endpoint = %self.endpoint,
            dish_type = %dish.dish_type(),
            name = %dish.base().name,
            "posting dish"
        );
        let resp = self
            .client
            .post(&self.endpoint)
            .header(
                USER_AGENT,
                format!("dish-tui/{}", env!("CARGO_PKG_VERSION")),
            )
            .header(ACCEPT, "application/json")
            .json(dish)
            .send()
            .map_err(transport)?;
        let status = resp.status();
        if status.is_success() {
            let text = resp.text().map_err(transport)?;
            return Ok(SubmitOutcome::Success(parse_payload(&text)));
        }
        if status == StatusCode::BAD_REQUEST {
            let text = resp.text().map_err(transport)?;
            let v: JsonValue = serde_json::from_str(&text)
                .map_err(|e| GatewayError::MalformedErrors(e.to_string()))?;
            let errors = parse_wire_errors(&v).ok_or_else(|| {
                GatewayError::MalformedErrors(format!("expected object, got {v}"))
            })?;
            return Ok(SubmitOutcome::ValidationFailure(errors));
        }
        Err(GatewayError::Status { status })
    }
}

impl SubmissionGateway for HttpGateway {
    fn submit(&self, dish: &WireDish) -> SubmitOutcome {
        match self.post(dish) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "dish submission failed");
                SubmitOutcome::GenericFailure
            }
        }
    }
}

fn parse_payload(text: &str) -> JsonValue {
    if text.trim().is_empty() {
        return JsonValue::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| JsonValue::String(text.to_string()))
}

/// Read a `{ field: [message, ...] }` body. A bare string becomes a
/// one-message list; other scalars are stringified.
pub fn parse_wire_errors(v: &JsonValue) -> Option<WireErrors> {
    let obj = v.as_object()?;
    let mut out = WireErrors::new();
    for (key, val) in obj {
        let messages = match val {
            JsonValue::Array(items) => items.iter().map(message_text).collect(),
            other => vec![message_text(other)],
        };
        out.insert(key.clone(), messages);
    }
    Some(out)
}

fn message_text(v: &JsonValue) -> String {
    match v {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Run one submission off the UI thread and report the outcome on `tx`.
pub fn spawn_submit(
    gateway: Arc<dyn SubmissionGateway>,
    dish: WireDish,
    tx: Sender<SubmitOutcome>,
) {
    thread::spawn(move || {
        let outcome = gateway.submit(&dish);
        let _ = tx.send(outcome);
    });
}

#[cfg(test)]
mod gateway_tests;
