//! Shared helpers for the API integration tests.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use catalens_api::config::ServerConfig;
use catalens_api::state::AppState;
use catalens_api::{render, routes};
use catalens_openai::OpenAiClient;

/// Boundary used by [`multipart_body`].
pub const BOUNDARY: &str = "catalens-test-boundary";

/// Build a test `ServerConfig` with safe defaults.
///
/// Media files land in a per-test scratch directory. Pass a mock server
/// URL as `openai_base_url` in tests that reach the inference client.
pub fn test_config(openai_base_url: Option<String>) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        media_dir: scratch_media_dir(),
        request_timeout_secs: 30,
        openai_api_key: "test-key".to_string(),
        openai_base_url,
    }
}

/// A fresh media directory under the OS temp dir, kept for the test's
/// lifetime so handlers can write into it.
fn scratch_media_dir() -> PathBuf {
    tempfile::tempdir().unwrap().keep()
}

/// Build the full application router with all middleware layers, using
/// the given database pool.
///
/// This mirrors the router construction in `main.rs` so integration
/// tests exercise the same middleware stack (request ID, timeout,
/// tracing, panic recovery) that production uses.
pub fn build_test_app(pool: PgPool, config: ServerConfig) -> Router {
    let openai = match &config.openai_base_url {
        Some(base_url) => {
            OpenAiClient::with_base_url(config.openai_api_key.clone(), base_url.clone())
        }
        None => OpenAiClient::new(config.openai_api_key.clone()),
    };

    let templates = render::build_templates().expect("Failed to compile page templates");
    let media_dir = config.media_dir.clone();

    let state = AppState {
        pool,
        config: Arc::new(config),
        openai: Arc::new(openai),
        templates: Arc::new(templates),
    };

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .merge(routes::page_routes())
        .nest_service("/media", ServeDir::new(&media_dir))
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .with_state(state)
}

/// Send a GET request to the app.
pub async fn get(app: Router, path: &str) -> Response {
    let request = Request::builder().uri(path).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a multipart POST built by [`multipart_body`] to the app.
pub async fn post_multipart(app: Router, path: &str, body: Vec<u8>) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Assemble a multipart/form-data body from `(field, filename, bytes)`
/// file parts.
pub fn multipart_body(files: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Collect a response body as a UTF-8 string.
pub async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
