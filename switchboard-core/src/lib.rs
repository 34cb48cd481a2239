//! Switchboard core - HTTP primitives, routing and the listener surface.
//!
//! This crate carries everything the event engine needs to face HTTP:
//! request/response wrappers, route-pattern matching with the
//! literal-before-parameterized precedence rule, the hyper-based listener,
//! and server configuration.

pub mod config;
pub mod error;
pub mod http;
pub mod routing;
pub mod server;

pub use config::{DEFAULT_PORT, PORT_ENV_VAR, ServerConfig};
pub use error::Error;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use routing::{RoutePattern, install_order, match_path, parse_query_string};
pub use server::{HttpService, Server};
