//! Event configurations and the payload handlers receive

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use switchboard_core::{HttpRequest, HttpResponse};
use tracing::warn;

/// Descriptor of one registered event.
///
/// Immutable after creation; `id` uniqueness is a construction convention
/// (`Event/<name>/<connectorId>` or an explicit override), not enforced by
/// the bus. Options are opaque to the bus and interpreted by the declaring
/// connector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfiguration {
    pub id: String,
    pub connector_id: String,
    pub options: Value,
}

impl EventConfiguration {
    pub fn new(id: impl Into<String>, connector_id: impl Into<String>, options: Value) -> Self {
        Self {
            id: id.into(),
            connector_id: connector_id.into(),
            options,
        }
    }
}

/// The payload a handler is invoked with: the configuration's own fields
/// merged with the dispatch payload, plus the HTTP context for
/// request-triggered events.
#[derive(Debug, Clone)]
pub struct Event {
    pub id: String,
    pub connector_id: String,
    pub options: Value,
    pub payload: Value,
    pub dispatched_at: DateTime<Utc>,
    pub http: Option<HttpContext>,
}

impl Event {
    pub fn from_configuration(configuration: &EventConfiguration, payload: Value) -> Self {
        Self {
            id: configuration.id.clone(),
            connector_id: configuration.connector_id.clone(),
            options: configuration.options.clone(),
            payload,
            dispatched_at: Utc::now(),
            http: None,
        }
    }

    pub fn with_http(mut self, http: HttpContext) -> Self {
        self.http = Some(http);
        self
    }
}

/// Request context attached to HTTP-triggered events
#[derive(Debug, Clone)]
pub struct HttpContext {
    pub request: HttpRequest,
    pub responder: Responder,
}

/// Single-use response slot shared between an HTTP delegate and the
/// handlers it dispatches to. The first `send` wins; later sends are
/// logged and dropped.
#[derive(Clone, Default)]
pub struct Responder {
    slot: Arc<Mutex<Option<HttpResponse>>>,
}

impl Responder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&self, response: HttpResponse) {
        let mut slot = self.slot.lock().unwrap();
        if slot.is_some() {
            warn!("response already set for this request, dropping a second response");
            return;
        }
        *slot = Some(response);
    }

    /// Take the response out of the slot, if a handler set one
    pub fn take(&self) -> Option<HttpResponse> {
        self.slot.lock().unwrap().take()
    }

    pub fn is_set(&self) -> bool {
        self.slot.lock().unwrap().is_some()
    }
}

impl std::fmt::Debug for Responder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Responder")
            .field("set", &self.is_set())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_merges_configuration_and_payload() {
        let configuration = EventConfiguration::new(
            "Event/ORDER_CANCELED/custom-1",
            "custom-1",
            json!({"event": "ORDER_CANCELED"}),
        );
        let event = Event::from_configuration(&configuration, json!({"orderNumber": "234"}));

        assert_eq!(event.id, "Event/ORDER_CANCELED/custom-1");
        assert_eq!(event.connector_id, "custom-1");
        assert_eq!(event.options["event"], "ORDER_CANCELED");
        assert_eq!(event.payload["orderNumber"], "234");
        assert!(event.http.is_none());
    }

    #[test]
    fn test_responder_first_send_wins() {
        let responder = Responder::new();
        responder.send(HttpResponse::ok().with_text("first"));
        responder.send(HttpResponse::ok().with_text("second"));

        let response = responder.take().unwrap();
        assert_eq!(response.body, b"first".to_vec());
        assert!(responder.take().is_none());
    }

    #[test]
    fn test_responder_clone_shares_slot() {
        let responder = Responder::new();
        let shared = responder.clone();
        shared.send(HttpResponse::no_content());

        assert!(responder.is_set());
        assert_eq!(responder.take().unwrap().status, 204);
    }
}
