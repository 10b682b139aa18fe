//! Shared test utilities for Engine Twin integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use engine_twin::api::{create_router, AppState};
use engine_twin::config::TwinConfig;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// UUID v4 string length: "xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx"
pub const UUID_V4_STRING_LEN: usize = 36;

/// Two units, two sensors: RUL [2, 1, 0, 1, 0].
pub const TWO_UNIT_DATASET: &str = "\
1 1 518.67 641.82
1 2 518.67 642.15
1 3 518.67 642.35
2 1 518.67 641.71
2 2 518.67 642.40
";

/// Write `content` to a temp file with the given extension.
pub fn dataset_file(content: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Config pointing at `path`, loaded lazily on the first request.
pub fn config_for(path: Option<PathBuf>) -> TwinConfig {
    let mut config = TwinConfig::default();
    config.dataset.path = path;
    config.dataset.load_on_startup = false;
    config
}

pub fn make_state(config: TwinConfig) -> Arc<AppState> {
    Arc::new(AppState::new(Arc::new(config)))
}

pub fn make_app(config: TwinConfig) -> (axum::Router, Arc<AppState>) {
    let state = make_state(config);
    (create_router(Arc::clone(&state)), state)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}
