use std::path::Path;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::state::AppState;
use crate::store::DataPaths;

/// Full router over a fresh state rooted in `dir`.
pub fn app(dir: &TempDir) -> Router {
    let state = AppState::open(&DataPaths::new(dir.path()));
    crate::app(state, Path::new("static"))
}

/// One request through the router; non-JSON bodies come back as `Null`.
pub async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}
