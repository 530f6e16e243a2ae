//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with a single fallback handler
//! - Wire up middleware (request ID, tracing, timeout)
//! - Buffer the request body within the configured limit
//! - Hand the request to [`WebApp::dispatch`] on a blocking worker
//! - Convert the serialized response, or the error, into an HTTP response
//! - Record request metrics

use axum::{
    body::{to_bytes, Body},
    extract::{Query, Request, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::WebApp;
use crate::observability::metrics;
use crate::payload::SerializedResponse;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub app: Arc<WebApp>,
    pub max_body_size: usize,
}

/// HTTP server in front of a [`WebApp`].
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    pub fn new(config: ServerConfig, app: Arc<WebApp>) -> Self {
        let state = AppState {
            app,
            max_body_size: config.max_body_size,
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .fallback(payload_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(TraceLayer::new_for_http())
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// Serve on `listener` until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Single entry point for every request.
async fn payload_handler(State(state): State<AppState>, request: Request) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&request);
    let (parts, body) = request.into_parts();

    let method = parts.method.clone();
    let method_str = method.to_string();
    let path = parts.uri.path().to_string();

    let query = match Query::<Vec<(String, String)>>::try_from_uri(&parts.uri) {
        Ok(Query(query)) => query,
        Err(e) => {
            tracing::debug!(request_id = %request_id, error = %e, "Malformed query string");
            metrics::record_request(&method_str, 400, start_time);
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let body = match to_bytes(body, state.max_body_size).await {
        Ok(bytes) => bytes.to_vec(),
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Request body rejected");
            metrics::record_request(&method_str, 413, start_time);
            return StatusCode::PAYLOAD_TOO_LARGE.into_response();
        }
    };

    let app = state.app.clone();
    let uri = path.clone();
    let headers = parts.headers;
    let dispatch_method = method.clone();
    let result = tokio::task::spawn_blocking(move || {
        app.dispatch(dispatch_method, &uri, query, headers, body)
    })
    .await;

    let response = match result {
        Ok(Ok(serialized)) => {
            tracing::debug!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = serialized.status,
                "Request served"
            );
            into_response(serialized, method == Method::HEAD)
        }
        Ok(Err(e)) => {
            let status = e.status_code();
            if status >= 500 {
                tracing::error!(request_id = %request_id, path = %path, error = %e, "Request failed");
            } else {
                tracing::debug!(request_id = %request_id, path = %path, error = %e, "Request rejected");
            }
            StatusCode::from_u16(status)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
                .into_response()
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, path = %path, error = %e, "Dispatch task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    };

    metrics::record_request(&method_str, response.status().as_u16(), start_time);
    response
}

/// Copy status, headers, cookies and body onto an Axum response. HEAD keeps
/// the headers but drops the body.
fn into_response(serialized: SerializedResponse, head: bool) -> Response {
    let status =
        StatusCode::from_u16(serialized.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut builder = Response::builder().status(status);
    for (name, value) in &serialized.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    for cookie in &serialized.cookies {
        builder = builder.header(header::SET_COOKIE, cookie.to_header_value());
    }

    let body = match serialized.body {
        Some(bytes) if !head => Body::from(bytes),
        _ => Body::empty(),
    };

    builder.body(body).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid response header");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::lifecycle::startup::build_app_with_resources;
    use crate::payload::Cookie;
    use crate::resources::{MemoryResources, Resources};
    use crate::routing::RouteCollection;
    use tower::ServiceExt;

    fn server(max_body_size: usize) -> HttpServer {
        let resources: Arc<dyn Resources> =
            Arc::new(MemoryResources::new().with_file("index.html", "home"));
        let routes = RouteCollection::new().post("/echo", |context, _| {
            Ok(context.payload().to_vec().into())
        });
        let app = build_app_with_resources(&AppConfig::default(), resources, routes);
        let config = ServerConfig {
            max_body_size,
            ..ServerConfig::default()
        };
        HttpServer::new(config, Arc::new(app))
    }

    fn request(method: Method, uri: &str, body: &'static str) -> Request {
        axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body))
            .unwrap()
    }

    fn serialized(body: Option<&str>) -> SerializedResponse {
        SerializedResponse {
            status: 200,
            headers: vec![
                ("Content-Type".into(), "text/html;charset=UTF-8".into()),
                ("Content-Length".into(), body.map_or(0, str::len).to_string()),
            ],
            cookies: vec![Cookie::new("a", "1"), Cookie::new("b", "2")],
            body: body.map(|b| b.as_bytes().to_vec()),
        }
    }

    #[tokio::test]
    async fn test_into_response_copies_everything() {
        let response = into_response(serialized(Some("hi")), false);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "text/html;charset=UTF-8");

        let cookies: Vec<_> = response.headers().get_all(header::SET_COOKIE).iter().collect();
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[0], "a=1; Path=/; Secure");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"hi");
    }

    #[tokio::test]
    async fn test_head_has_no_body() {
        let response = into_response(serialized(Some("hi")), true);
        assert_eq!(response.headers()["content-length"], "2");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_router_serves_and_tags_request_id() {
        let response = server(1024)
            .router
            .oneshot(request(Method::GET, "/", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(crate::http::X_REQUEST_ID));
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"home");
    }

    #[tokio::test]
    async fn test_body_reaches_handler() {
        let response = server(1024)
            .router
            .oneshot(request(Method::POST, "/echo", "ping"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"ping");
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let response = server(2)
            .router
            .oneshot(request(Method::POST, "/echo", "too long"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_invalid_header_is_500() {
        let mut response = serialized(None);
        response.headers.push(("Bad Header".into(), "x".into()));
        assert_eq!(
            into_response(response, false).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
