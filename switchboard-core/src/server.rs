// HTTP listener built on hyper

use crate::routing::parse_query_string;
use crate::{Error, HttpRequest, HttpResponse};
use http_body_util::{BodyExt, Full};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, body::Incoming as IncomingBody};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error};

/// The request-handling surface plugged into the listener.
///
/// A service owns its own error handling and always produces a response.
#[async_trait::async_trait]
pub trait HttpService: Send + Sync + 'static {
    async fn call(&self, request: HttpRequest) -> HttpResponse;
}

/// An HTTP listener bound to a local port
pub struct Server {
    listener: TcpListener,
}

impl Server {
    /// Bind on all interfaces. Port 0 picks a free port.
    pub async fn bind(port: u16) -> Result<Self, Error> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        Ok(self.listener.local_addr()?)
    }

    /// Spawn the accept loop, serving each connection with `service`
    pub fn spawn(self, service: Arc<dyn HttpService>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let (stream, _) = match self.listener.accept().await {
                    Ok(accepted) => accepted,
                    Err(error) => {
                        error!("failed to accept connection: {error}");
                        continue;
                    }
                };
                let io = TokioIo::new(stream);
                let service = service.clone();

                tokio::spawn(async move {
                    let hyper_service = service_fn(move |req: Request<IncomingBody>| {
                        let service = service.clone();
                        async move { handle_request(req, service).await }
                    });

                    if let Err(err) = http1::Builder::new()
                        .serve_connection(io, hyper_service)
                        .await
                    {
                        debug!("error serving connection: {err:?}");
                    }
                });
            }
        })
    }
}

/// Handle an incoming HTTP request
async fn handle_request(
    req: Request<IncomingBody>,
    service: Arc<dyn HttpService>,
) -> Result<Response<Full<bytes::Bytes>>, hyper::Error> {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);

    let mut request = HttpRequest::new(method, path);

    if let Some(query) = query {
        request.query_params = parse_query_string(&query);
    }

    for (name, value) in req.headers() {
        if let Ok(value_str) = value.to_str() {
            request
                .headers
                .insert(name.to_string(), value_str.to_string());
        }
    }

    let body_bytes = req.collect().await?.to_bytes();
    request.body = body_bytes.to_vec();

    let response = service.call(request).await;
    Ok(into_hyper_response(response))
}

/// Convert our HttpResponse to a hyper response
fn into_hyper_response(response: HttpResponse) -> Response<Full<bytes::Bytes>> {
    let mut builder = Response::builder().status(response.status);

    for (key, value) in response.headers {
        builder = builder.header(key, value);
    }

    let body = Full::new(bytes::Bytes::from(response.body));
    builder.body(body).unwrap_or_else(|err| {
        error!("failed to build response: {err}");
        let mut fallback = Response::new(Full::new(bytes::Bytes::new()));
        *fallback.status_mut() = hyper::StatusCode::INTERNAL_SERVER_ERROR;
        fallback
    })
}
