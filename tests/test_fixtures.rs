//! Shared helpers for the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use error_pipeline::{
    api::{create_router, router::AppState},
    ErrorFacade, ErrorHandlingConfig, MemoryLogger,
};

/// Router backed by an in-memory logger the test can inspect
pub fn test_app(config: ErrorHandlingConfig) -> (Router, Arc<MemoryLogger>) {
    let logger = Arc::new(MemoryLogger::new());
    let facade = Arc::new(ErrorFacade::new(Arc::clone(&logger), config));
    (create_router(AppState::default(), facade), logger)
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("router is infallible")
}

/// Client address every fixture request claims through `X-Forwarded-For`
pub const CLIENT_IP: &str = "203.0.113.9";

pub fn get(uri: &str, accept: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .header("x-forwarded-for", CLIENT_IP);
    if let Some(accept) = accept {
        builder = builder.header("accept", accept);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("accept", "application/json")
        .header("x-forwarded-for", CLIENT_IP)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
