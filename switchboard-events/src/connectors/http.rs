//! Request-triggered connector: binds (method, path) pairs to handlers

use crate::bus::EventBus;
use crate::connectors::Connector;
use crate::event::{Event, EventConfiguration, HttpContext, Responder};
use crate::handler::{Handler, HandlerError};
use crate::multiplexer::{DelegateDecision, HttpDelegate};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::{Arc, RwLock};
use switchboard_core::{HttpMethod, HttpRequest, HttpResponse};
use uuid::Uuid;

/// Options binding one (method, path) tuple
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpEventOptions {
    pub method: HttpMethod,
    pub path: String,
}

impl HttpEventOptions {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }
}

/// Connector for events triggered by inbound HTTP requests.
///
/// Each `on` call installs the connector as a delegate for the path; at
/// request time the connector matches method and original path against its
/// configurations, dispatches the event through the bus and answers with
/// the handler-provided response.
pub struct HttpConnector {
    id: String,
    bus: EventBus,
    configurations: RwLock<Vec<EventConfiguration>>,
}

impl HttpConnector {
    pub fn new(bus: EventBus) -> Arc<Self> {
        Self::with_id(bus, format!("http-{}", Uuid::new_v4()))
    }

    pub fn with_id(bus: EventBus, id: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id: id.into(),
            bus,
            configurations: RwLock::new(Vec::new()),
        })
    }

    /// Bind a (method, path) tuple to a handler.
    ///
    /// The configuration id is `HTTP/<method>/<path>/<connectorId>`;
    /// re-registering the same tuple replaces the stored configuration in
    /// place while the handler is appended to the bus registry.
    pub fn on(self: &Arc<Self>, options: HttpEventOptions, handler: Handler) -> EventConfiguration {
        let id = format!(
            "HTTP/{}/{}/{}",
            options.method.as_str(),
            options.path,
            self.id
        );
        let configuration = EventConfiguration::new(
            id,
            &self.id,
            json!({ "method": options.method.as_str(), "path": options.path }),
        );

        {
            let mut configurations = self.configurations.write().unwrap();
            match configurations.iter_mut().find(|c| c.id == configuration.id) {
                Some(existing) => *existing = configuration.clone(),
                None => configurations.push(configuration.clone()),
            }
        }

        self.bus.when(&configuration, handler);
        self.bus
            .register_http_delegate(&options.path, self.clone());
        configuration
    }

    fn matching_configuration(&self, method: &str, pattern: &str) -> Option<EventConfiguration> {
        self.configurations
            .read()
            .unwrap()
            .iter()
            .find(|c| {
                c.options.get("method").and_then(Value::as_str) == Some(method)
                    && c.options.get("path").and_then(Value::as_str) == Some(pattern)
            })
            .cloned()
    }
}

#[async_trait]
impl Connector for HttpConnector {
    fn id(&self) -> &str {
        &self.id
    }
}

#[async_trait]
impl HttpDelegate for HttpConnector {
    async fn handle(&self, request: HttpRequest) -> Result<DelegateDecision, HandlerError> {
        let pattern = request
            .original_path
            .clone()
            .unwrap_or_else(|| request.path.clone());

        let Some(configuration) = self.matching_configuration(&request.method, &pattern) else {
            return Ok(DelegateDecision::Deferred);
        };

        let responder = Responder::new();
        let payload = json!({
            "method": request.method,
            "path": request.path,
            "params": request.path_params,
            "query": request.query_params,
            "headers": request.headers,
            "body": body_value(&request),
        });
        let event = Event::from_configuration(&configuration, payload).with_http(HttpContext {
            request,
            responder: responder.clone(),
        });

        self.bus.handle_event(&configuration.id, event).await;

        // the route claimed the request; a handler that never responded
        // still gets an empty 200 back to the client
        let response = responder.take().unwrap_or_else(HttpResponse::ok);
        Ok(DelegateDecision::Handled(response))
    }
}

/// Body as JSON when it parses, raw text otherwise, null when empty
fn body_value(request: &HttpRequest) -> Value {
    if request.body.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&request.body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&request.body).into_owned()))
}
