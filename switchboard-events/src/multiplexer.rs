//! Per-path chains of competing HTTP delegates, and the router that
//! installs them in precedence order.

use crate::handler::HandlerError;
use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, RwLock};
use switchboard_core::{HttpRequest, HttpResponse, HttpService, RoutePattern};
use tracing::{error, info};

/// Reserved prefix served by the catch-all fallback
pub const WEBHOOK_PREFIX: &str = "/events/webhooks/";

/// Fixed body of the 501 fallback response
pub const WEBHOOK_NOT_REGISTERED: &str = "Webhook not registered";

/// Outcome of one delegate's look at a request.
///
/// An explicit type rather than a bare bool: `Handled` carries the response
/// and ends the chain, `Deferred` passes the request on.
#[derive(Debug)]
pub enum DelegateDecision {
    Handled(HttpResponse),
    Deferred,
}

/// A connector-owned handler candidate for a path. Decides per request
/// whether it claims the request.
#[async_trait]
pub trait HttpDelegate: Send + Sync {
    async fn handle(&self, request: HttpRequest) -> Result<DelegateDecision, HandlerError>;
}

/// Chain of competing delegates registered under one path string.
///
/// Created lazily on first registration and never removed; unregistration
/// only clears the delegate list, leaving an empty chain that defers
/// everything.
pub struct HttpMultiplexer {
    original_path: String,
    delegates: RwLock<Vec<Arc<dyn HttpDelegate>>>,
}

impl HttpMultiplexer {
    pub fn new(original_path: impl Into<String>) -> Self {
        Self {
            original_path: original_path.into(),
            delegates: RwLock::new(Vec::new()),
        }
    }

    pub fn original_path(&self) -> &str {
        &self.original_path
    }

    /// Append a delegate; chain order is registration order
    pub fn push(&self, delegate: Arc<dyn HttpDelegate>) {
        self.delegates.write().unwrap().push(delegate);
    }

    /// Drop every delegate, keeping the multiplexer itself
    pub fn clear(&self) {
        self.delegates.write().unwrap().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.read().unwrap().is_empty()
    }

    /// Offer the request to each delegate in registration order. The first
    /// `Handled` wins; a failing delegate is logged and skipped so the
    /// chain keeps going.
    pub async fn handle(&self, mut request: HttpRequest) -> DelegateDecision {
        request.original_path = Some(self.original_path.clone());

        let delegates: Vec<Arc<dyn HttpDelegate>> = self.delegates.read().unwrap().clone();
        for delegate in delegates {
            match delegate.handle(request.clone()).await {
                Ok(DelegateDecision::Handled(response)) => {
                    return DelegateDecision::Handled(response);
                }
                Ok(DelegateDecision::Deferred) => {}
                Err(err) => {
                    error!(path = %self.original_path, "HTTP delegate failed: {err}");
                }
            }
        }

        DelegateDecision::Deferred
    }
}

/// The installed route table: patterns in precedence order, each pointing
/// at its path's multiplexer. Materialized once at bus start.
pub struct DelegateRouter {
    routes: Vec<(RoutePattern, Arc<HttpMultiplexer>)>,
}

impl DelegateRouter {
    pub fn new(routes: Vec<(RoutePattern, Arc<HttpMultiplexer>)>) -> Self {
        Self { routes }
    }
}

#[async_trait]
impl HttpService for DelegateRouter {
    async fn call(&self, request: HttpRequest) -> HttpResponse {
        for (pattern, multiplexer) in &self.routes {
            let Some(params) = pattern.matches(&request.path) else {
                continue;
            };

            let mut scoped = request.clone();
            scoped.path_params = params;

            match multiplexer.handle(scoped).await {
                DelegateDecision::Handled(response) => return response,
                DelegateDecision::Deferred => {}
            }
        }

        if request.path.starts_with(WEBHOOK_PREFIX) {
            info!(
                "{WEBHOOK_NOT_REGISTERED} for {} {}",
                request.method, request.path
            );
            return HttpResponse::not_implemented().with_text(WEBHOOK_NOT_REGISTERED);
        }

        let body = json!({
            "error": format!("Route not found: {} {}", request.method, request.path),
            "status": 404,
        });
        HttpResponse::not_found()
            .with_json(&body)
            .unwrap_or_else(|_| HttpResponse::internal_server_error())
    }
}
