//! In-process emit connector: named events dispatched from application code

use crate::bus::EventBus;
use crate::connectors::Connector;
use crate::event::{Event, EventConfiguration};
use crate::handler::Handler;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Options for one custom event registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomEventOptions {
    pub event: String,
}

impl CustomEventOptions {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
        }
    }
}

/// Connector for events emitted directly by application code.
///
/// `on` declares a named event and binds a handler; `dispatch` fires every
/// configuration registered for that name, sequentially and in
/// registration order.
pub struct CustomEventConnector {
    id: String,
    bus: EventBus,
    configurations: RwLock<Vec<EventConfiguration>>,
}

impl CustomEventConnector {
    pub fn new(bus: EventBus) -> Arc<Self> {
        Self::with_id(bus, format!("custom-event-{}", Uuid::new_v4()))
    }

    pub fn with_id(bus: EventBus, id: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id: id.into(),
            bus,
            configurations: RwLock::new(Vec::new()),
        })
    }

    /// Declare an event and bind a handler to it.
    ///
    /// The configuration id defaults to `Event/<name>/<connectorId>`; an
    /// explicit `event_id` overrides it. Re-registering an id replaces the
    /// stored configuration in place (keeping its original position) while
    /// the handler is appended to the bus registry.
    pub fn on(
        &self,
        options: CustomEventOptions,
        handler: Handler,
        event_id: Option<String>,
    ) -> EventConfiguration {
        let id = event_id.unwrap_or_else(|| format!("Event/{}/{}", options.event, self.id));
        let configuration =
            EventConfiguration::new(id, &self.id, json!({ "event": options.event }));

        {
            let mut configurations = self.configurations.write().unwrap();
            match configurations.iter_mut().find(|c| c.id == configuration.id) {
                Some(existing) => *existing = configuration.clone(),
                None => configurations.push(configuration.clone()),
            }
        }

        self.bus.when(&configuration, handler);
        configuration
    }

    /// Dispatch a named event to every matching configuration.
    ///
    /// Each matching configuration is dispatched and awaited in turn, so
    /// side effects across configurations keep registration order. Returns
    /// true when every invoked handler succeeded and at least one
    /// configuration matched.
    pub async fn dispatch(&self, event: &str, payload: Value) -> bool {
        let matching: Vec<EventConfiguration> = self
            .configurations
            .read()
            .unwrap()
            .iter()
            .filter(|c| c.options.get("event").and_then(Value::as_str) == Some(event))
            .cloned()
            .collect();

        let mut handled = !matching.is_empty();
        for configuration in matching {
            let event = Event::from_configuration(&configuration, payload.clone());
            handled &= self.bus.handle_event(&configuration.id, event).await;
        }
        handled
    }
}

#[async_trait]
impl Connector for CustomEventConnector {
    fn id(&self) -> &str {
        &self.id
    }
}
