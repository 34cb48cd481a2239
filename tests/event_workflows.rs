//! Integration tests for common Switchboard workflows.
//!
//! Each test starts a bus on an ephemeral port and drives it with real HTTP
//! requests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use switchboard::prelude::*;

// =============================================================================
// HTTP-triggered events
// =============================================================================

#[tokio::test]
async fn test_http_route_dispatches_named_event() {
    let bus = EventBus::with_config(ServerConfig::with_port(0));

    let canceled = Arc::new(AtomicUsize::new(0));

    let orders = CustomEventConnector::with_id(bus.clone(), "orders");
    let counter = canceled.clone();
    orders.on(
        CustomEventOptions::new("ORDER_CANCELED"),
        Handler::from_fn(move |_event, _bus| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
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
    bus.start().await.expect("bus failed to start");
    let base = format!("http://{}", bus.local_addr().unwrap());

    let response = reqwest::get(format!("{base}/test")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "Hello World!");
    assert_eq!(canceled.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unregistered_webhook_returns_501() {
    let bus = EventBus::with_config(ServerConfig::with_port(0));

    let web = HttpConnector::new(bus.clone());
    web.on(
        HttpEventOptions::new(HttpMethod::GET, "/ping"),
        Handler::from_fn(|event, _bus| async move {
            if let Some(http) = event.http {
                http.responder.send(HttpResponse::ok().with_text("pong"));
            }
            Ok(())
        }),
    );
    bus.register(web);
    bus.start().await.expect("bus failed to start");
    let base = format!("http://{}", bus.local_addr().unwrap());

    let response = reqwest::get(format!("{base}/events/webhooks/github/push"))
        .await
        .unwrap();
    assert_eq!(response.status(), 501);
    assert_eq!(response.text().await.unwrap(), "Webhook not registered");
}

#[tokio::test]
async fn test_unknown_route_returns_404_json() {
    let bus = EventBus::with_config(ServerConfig::with_port(0));

    let web = HttpConnector::new(bus.clone());
    web.on(
        HttpEventOptions::new(HttpMethod::GET, "/known"),
        Handler::from_fn(|event, _bus| async move {
            if let Some(http) = event.http {
                http.responder.send(HttpResponse::ok());
            }
            Ok(())
        }),
    );
    bus.register(web);
    bus.start().await.expect("bus failed to start");
    let base = format!("http://{}", bus.local_addr().unwrap());

    let response = reqwest::get(format!("{base}/missing")).await.unwrap();
    assert_eq!(response.status(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], 404);
    assert_eq!(body["error"], "Route not found: GET /missing");
}

#[tokio::test]
async fn test_first_registered_delegate_wins_on_shared_path() {
    let bus = EventBus::with_config(ServerConfig::with_port(0));

    let first = HttpConnector::with_id(bus.clone(), "first");
    first.on(
        HttpEventOptions::new(HttpMethod::GET, "/shared"),
        Handler::from_fn(|event, _bus| async move {
            if let Some(http) = event.http {
                http.responder.send(HttpResponse::ok().with_text("first"));
            }
            Ok(())
        }),
    );

    let second = HttpConnector::with_id(bus.clone(), "second");
    second.on(
        HttpEventOptions::new(HttpMethod::GET, "/shared"),
        Handler::from_fn(|event, _bus| async move {
            if let Some(http) = event.http {
                http.responder.send(HttpResponse::ok().with_text("second"));
            }
            Ok(())
        }),
    );

    bus.register(first).register(second);
    bus.start().await.expect("bus failed to start");
    let base = format!("http://{}", bus.local_addr().unwrap());

    let response = reqwest::get(format!("{base}/shared")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "first");
}

#[tokio::test]
async fn test_literal_path_beats_parameterized_path() {
    let bus = EventBus::with_config(ServerConfig::with_port(0));

    let web = HttpConnector::new(bus.clone());
    web.on(
        HttpEventOptions::new(HttpMethod::GET, "/orders/:id"),
        Handler::from_fn(|event, _bus| async move {
            if let Some(http) = event.http {
                let id = http.request.param("id").cloned().unwrap_or_default();
                http.responder
                    .send(HttpResponse::ok().with_text(format!("order {id}")));
            }
            Ok(())
        }),
    );
    web.on(
        HttpEventOptions::new(HttpMethod::GET, "/orders/latest"),
        Handler::from_fn(|event, _bus| async move {
            if let Some(http) = event.http {
                http.responder.send(HttpResponse::ok().with_text("latest"));
            }
            Ok(())
        }),
    );
    bus.register(web);
    bus.start().await.expect("bus failed to start");
    let base = format!("http://{}", bus.local_addr().unwrap());

    let response = reqwest::get(format!("{base}/orders/latest")).await.unwrap();
    assert_eq!(response.text().await.unwrap(), "latest");

    let response = reqwest::get(format!("{base}/orders/42")).await.unwrap();
    assert_eq!(response.text().await.unwrap(), "order 42");
}

#[tokio::test]
async fn test_request_body_and_params_reach_the_handler() {
    let bus = EventBus::with_config(ServerConfig::with_port(0));

    let web = HttpConnector::new(bus.clone());
    web.on(
        HttpEventOptions::new(HttpMethod::POST, "/orders/:id/cancel"),
        Handler::from_fn(|event, _bus| async move {
            let id = event.payload["params"]["id"].as_str().unwrap_or("").to_string();
            let reason = event.payload["body"]["reason"]
                .as_str()
                .unwrap_or("")
                .to_string();
            if let Some(http) = event.http {
                let response = HttpResponse::ok()
                    .with_json(&serde_json::json!({"id": id, "reason": reason}))
                    .unwrap();
                http.responder.send(response);
            }
            Ok(())
        }),
    );
    bus.register(web);
    bus.start().await.expect("bus failed to start");
    let base = format!("http://{}", bus.local_addr().unwrap());

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base}/orders/99/cancel"))
        .json(&serde_json::json!({"reason": "out of stock"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["id"], "99");
    assert_eq!(body["reason"], "out of stock");
}
