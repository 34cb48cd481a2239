// Switchboard - an in-process event bus with an HTTP request multiplexer
//
// This library ties named and HTTP-triggered events to async handlers through
// pluggable connectors, with a built-in hyper listener for registered routes.

// Re-export core functionality
pub use switchboard_core::*;

// Re-export the event engine
pub use switchboard_events::*;

// Re-export persistence
pub use switchboard_storage::*;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Connector,
        CustomEventConnector,
        CustomEventOptions,
        DEFAULT_PORT,
        Event,
        EventBus,
        EventConfiguration,
        Handler,
        HandlerError,
        HandlerResult,
        HttpConnector,
        HttpEventOptions,
        HttpMethod,
        HttpRequest,
        HttpResponse,
        MemoryStoreAdapter,
        PersistentStore,
        Responder,
        ServerConfig,
    };
}
