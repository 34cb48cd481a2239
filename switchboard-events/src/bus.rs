//! Event bus: connector lifecycle, handler registry and the HTTP surface

use crate::connectors::{Connector, ConnectorResult};
use crate::event::Event;
use crate::event::EventConfiguration;
use crate::handler::Handler;
use crate::multiplexer::{DelegateRouter, HttpDelegate, HttpMultiplexer};
use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};
use switchboard_core::{Error, RoutePattern, Server, ServerConfig, install_order};
use switchboard_storage::{MemoryStoreAdapter, PersistentStore};
use tracing::{Instrument, error, info};

/// Orchestration root: maps event ids to ordered handler lists and HTTP
/// paths to delegate chains, and drives connector lifecycle.
///
/// Cheap to clone; clones share the same tables, so a handler can carry a
/// bus handle and trigger further dispatch. Every table is owned by the
/// bus value — independent buses never share state.
#[derive(Clone)]
pub struct EventBus {
    connectors: Arc<DashMap<String, Arc<dyn Connector>>>,
    handlers: Arc<DashMap<String, Vec<Handler>>>,
    delegates: Arc<DashMap<String, Arc<HttpMultiplexer>>>,
    store: Arc<RwLock<Option<Arc<dyn PersistentStore>>>>,
    config: Arc<ServerConfig>,
    bound_addr: Arc<RwLock<Option<SocketAddr>>>,
}

impl EventBus {
    /// Create a bus configured from the environment
    pub fn new() -> Self {
        Self::with_config(ServerConfig::from_env())
    }

    pub fn with_config(config: ServerConfig) -> Self {
        info!("event bus initializing");
        Self {
            connectors: Arc::new(DashMap::new()),
            handlers: Arc::new(DashMap::new()),
            delegates: Arc::new(DashMap::new()),
            store: Arc::new(RwLock::new(None)),
            config: Arc::new(config),
            bound_addr: Arc::new(RwLock::new(None)),
        }
    }

    /// Add a connector to the connector table.
    ///
    /// Bookkeeping only — the connector is not started here. Registering a
    /// second connector under the same id silently replaces the first.
    pub fn register(&self, connector: Arc<dyn Connector>) -> &Self {
        self.connectors
            .insert(connector.id().to_string(), connector);
        self
    }

    /// Stop a connector and remove it from the table.
    ///
    /// A `stop` failure propagates to the caller and the table entry is
    /// kept, matching the connector's own stop contract.
    pub async fn unregister(&self, connector: &dyn Connector) -> ConnectorResult {
        connector.stop().await?;
        self.connectors.remove(connector.id());
        Ok(())
    }

    /// Look up a connector, logging when it is absent
    pub fn get_connector(&self, connector_id: &str) -> Option<Arc<dyn Connector>> {
        let found = self
            .connectors
            .get(connector_id)
            .map(|entry| entry.value().clone());
        if found.is_none() {
            error!("could not find connector [id={connector_id}]");
        }
        found
    }

    /// Append a delegate under `path`, lazily creating the multiplexer.
    ///
    /// Delegates compete per request in registration order; the first one
    /// reporting handled wins.
    pub fn register_http_delegate(&self, path: &str, delegate: Arc<dyn HttpDelegate>) -> &Self {
        self.delegates
            .entry(path.to_string())
            .or_insert_with(|| Arc::new(HttpMultiplexer::new(path)))
            .push(delegate);
        self
    }

    /// Clear the delegate list for `path`. The multiplexer entry stays, as
    /// an empty chain that defers every request until re-registered.
    pub fn unregister_http_delegate(&self, path: &str) {
        if let Some(multiplexer) = self.delegates.get(path) {
            multiplexer.clear();
        }
    }

    /// Append a handler for the configuration's event id
    pub fn when(&self, configuration: &EventConfiguration, handler: Handler) -> &Self {
        info!(event_id = %configuration.id, "registering event handler");
        self.handlers
            .entry(configuration.id.clone())
            .or_default()
            .push(handler);
        self
    }

    /// Start every registered connector, then materialize the HTTP surface
    /// when any delegate paths exist.
    ///
    /// Connector start order follows table iteration and is unspecified;
    /// each connector is started exactly once and a start failure is
    /// logged, never raised. Routes are installed literal-paths-first,
    /// each group in reverse-lexicographic order, with the webhook
    /// catch-all behind them. Returns once the listener is bound and the
    /// accept loop is running.
    pub async fn start(&self) -> Result<(), Error> {
        let connectors: Vec<Arc<dyn Connector>> = self
            .connectors
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        for connector in connectors {
            if let Err(err) = connector.start().await {
                error!(connector_id = connector.id(), "connector failed to start: {err}");
            }
        }

        if !self.delegates.is_empty() {
            let paths: Vec<String> = self
                .delegates
                .iter()
                .map(|entry| entry.key().clone())
                .collect();

            let mut routes = Vec::new();
            for path in install_order(&paths) {
                if let Some(multiplexer) = self.delegates.get(&path) {
                    routes.push((RoutePattern::new(&path), multiplexer.value().clone()));
                }
            }

            let server = Server::bind(self.config.port).await?;
            let addr = server.local_addr()?;
            *self.bound_addr.write().unwrap() = Some(addr);
            server.spawn(Arc::new(DelegateRouter::new(routes)));
            info!("listening on http://{addr}");
        }

        Ok(())
    }

    /// Address the listener bound to, once `start` materialized it
    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self.bound_addr.read().unwrap()
    }

    /// Dispatch an event to every handler registered for `event_id`.
    ///
    /// Returns false immediately when no handlers exist. Otherwise every
    /// handler runs in registration order — a failure never stops the
    /// remaining handlers — and the result is the AND of all outcomes.
    pub async fn handle_event(&self, event_id: &str, event: Event) -> bool {
        let handlers: Vec<Handler> = match self.handlers.get(event_id) {
            Some(entry) if !entry.is_empty() => entry.clone(),
            _ => return false,
        };

        let mut handled = true;
        for handler in &handlers {
            handled &= self.on_handle_event(handler, event.clone()).await;
        }
        handled
    }

    /// Invoke one handler, containing any failure at this boundary.
    ///
    /// The handler id is stamped on the log context for exactly the
    /// duration of the call. A failure is logged with its diagnostic and
    /// reported as false, never re-raised.
    pub async fn on_handle_event(&self, handler: &Handler, event: Event) -> bool {
        let span = tracing::info_span!("handler", handler_id = %handler.id());
        let bus = self.clone();
        async move {
            match handler.handle(event, bus).await {
                Ok(()) => true,
                Err(err) => {
                    error!("handler failed: {err:?}");
                    false
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Install the persistent store for this bus instance
    pub fn set_persistent_store(&self, adapter: Arc<dyn PersistentStore>) -> Arc<dyn PersistentStore> {
        *self.store.write().unwrap() = Some(adapter.clone());
        adapter
    }

    /// The bus's persistent store, installing the in-memory default on
    /// first use. Later calls return the same instance.
    pub fn persistent_store(&self) -> Arc<dyn PersistentStore> {
        if let Some(store) = self.store.read().unwrap().as_ref() {
            return store.clone();
        }

        let mut slot = self.store.write().unwrap();
        if let Some(store) = slot.as_ref() {
            return store.clone();
        }
        let store: Arc<dyn PersistentStore> = Arc::new(MemoryStoreAdapter::new());
        *slot = Some(store.clone());
        store
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
