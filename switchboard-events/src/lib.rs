//! Event registry and dispatch engine.
//!
//! The [`EventBus`] owns three registries: connectors keyed by id, handler
//! lists keyed by event-configuration id, and HTTP delegates keyed by path
//! pattern. Connectors describe event sources; handlers are async callbacks
//! run sequentially in registration order; delegates back the listener that
//! [`EventBus::start`] materializes when at least one path is registered.
//!
//! ```no_run
//! use switchboard_events::{CustomEventConnector, CustomEventOptions, EventBus, Handler};
//!
//! # async fn demo() {
//! let bus = EventBus::new();
//! let orders = CustomEventConnector::new(bus.clone());
//! orders.on(
//!     CustomEventOptions::new("ORDER_CANCELED"),
//!     Handler::from_fn(|event, _bus| async move {
//!         println!("canceled: {}", event.payload);
//!         Ok(())
//!     }),
//!     None,
//! );
//! orders.dispatch("ORDER_CANCELED", serde_json::json!({"orderNumber": "234"})).await;
//! # }
//! ```

pub mod bus;
pub mod connectors;
pub mod event;
pub mod handler;
pub mod multiplexer;

pub use bus::EventBus;
pub use connectors::{
    Connector, ConnectorResult, CustomEventConnector, CustomEventOptions, HttpConnector,
    HttpEventOptions,
};
pub use event::{Event, EventConfiguration, HttpContext, Responder};
pub use handler::{EventHandler, Handler, HandlerError, HandlerResult};
pub use multiplexer::{
    DelegateDecision, DelegateRouter, HttpDelegate, HttpMultiplexer, WEBHOOK_NOT_REGISTERED,
    WEBHOOK_PREFIX,
};
