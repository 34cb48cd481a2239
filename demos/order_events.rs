//! Minimal end-to-end wiring: an HTTP route that dispatches a named event.
//!
//! Run with `cargo run --example order_events`, then:
//!
//! ```text
//! curl http://localhost:8000/test
//! ```

use switchboard::prelude::*;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let bus = EventBus::new();

    let orders = CustomEventConnector::with_id(bus.clone(), "orders");
    orders.on(
        CustomEventOptions::new("ORDER_CANCELED"),
        Handler::from_fn(|event, _bus| async move {
            println!("order canceled: {}", event.payload);
            Ok(())
        }),
        None,
    );

    let web = HttpConnector::with_id(bus.clone(), "web");
    let dispatcher = orders.clone();
    web.on(
        HttpEventOptions::new(HttpMethod::GET, "/test"),
        Handler::from_fn(move |event, _bus| {
            let orders = dispatcher.clone();
            async move {
                orders
                    .dispatch("ORDER_CANCELED", serde_json::json!({"orderNumber": "234"}))
                    .await;
                if let Some(http) = event.http {
                    http.responder.send(HttpResponse::ok().with_text("Hello World!"));
                }
                Ok(())
            }
        }),
    );

    bus.register(orders).register(web);

    bus.start().await.expect("failed to start the event bus");
    if let Some(addr) = bus.local_addr() {
        println!("listening on http://{addr}");
    }

    // keep the listener alive
    tokio::signal::ctrl_c().await.ok();
}
