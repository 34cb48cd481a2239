//! Connector lifecycle contract

use async_trait::async_trait;

/// Result of a connector lifecycle transition
pub type ConnectorResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// A pluggable source or sink of events.
///
/// Connectors are created independently, registered into a bus, started
/// once during bus startup and stopped during unregistration. A connector
/// keeps its own event configurations and calls back into the bus only for
/// dispatch and registration — never lifecycle.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Unique id within the bus's connector table
    fn id(&self) -> &str;

    /// Called once during bus startup
    async fn start(&self) -> ConnectorResult {
        Ok(())
    }

    /// Called during unregistration; a failure here propagates to the
    /// caller of `unregister`
    async fn stop(&self) -> ConnectorResult {
        Ok(())
    }
}
