//! Pluggable event sources and sinks

pub mod connector;
pub mod custom;
pub mod http;

pub use connector::{Connector, ConnectorResult};
pub use custom::{CustomEventConnector, CustomEventOptions};
pub use http::{HttpConnector, HttpEventOptions};
