//! Handler contract and the registry entry wrapper

use crate::bus::EventBus;
use crate::event::Event;
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;
use uuid::Uuid;

pub type HandlerResult = Result<(), HandlerError>;

/// Handler error
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("handler failed: {0}")]
    Failed(String),

    #[error("event processing error: {0}")]
    Processing(String),
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::Processing(err.to_string())
    }
}

/// A unit of consumer logic bound to one event id.
///
/// Handlers receive the event payload and a bus handle so they can trigger
/// further in-process dispatch (fan-out); the nested dispatch runs to
/// completion before the handler's own call resolves.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: Event, bus: EventBus) -> HandlerResult;
}

/// Registry entry: a handler plus the id stamped on the log context while
/// the handler runs.
#[derive(Clone)]
pub struct Handler {
    id: String,
    inner: Arc<dyn EventHandler>,
}

impl Handler {
    pub fn new(id: impl Into<String>, handler: impl EventHandler + 'static) -> Self {
        Self {
            id: id.into(),
            inner: Arc::new(handler),
        }
    }

    /// Wrap a bare async closure, assigning an auto-generated id
    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(Event, EventBus) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self {
            id: Uuid::new_v4().to_string(),
            inner: Arc::new(FnHandler {
                f: Box::new(move |event, bus| Box::pin(f(event, bus))),
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn handle(&self, event: Event, bus: EventBus) -> HandlerResult {
        self.inner.handle(event, bus).await
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler").field("id", &self.id).finish()
    }
}

type HandlerFn = Box<dyn Fn(Event, EventBus) -> BoxFuture<'static, HandlerResult> + Send + Sync>;

struct FnHandler {
    f: HandlerFn,
}

#[async_trait]
impl EventHandler for FnHandler {
    async fn handle(&self, event: Event, bus: EventBus) -> HandlerResult {
        (self.f)(event, bus).await
    }
}
