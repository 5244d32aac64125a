//! Shared helpers for the router-level tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use ytdlp_api::config::{AppState, Config};
use ytdlp_api::extractor::{ExtractError, Extractor};
use ytdlp_api::model::{ExtractionResult, ValidatedUrl};
use ytdlp_api::route::create_app;

pub const API_KEY: &str = "test_key";

/// Extractor double returning a canned outcome and counting calls
pub struct FakeExtractor {
    outcome: Result<Option<String>, String>,
    pub calls: AtomicUsize,
}

impl FakeExtractor {
    pub fn returning(media_url: Option<&str>) -> Self {
        Self {
            outcome: Ok(media_url.map(str::to_string)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Extractor for FakeExtractor {
    async fn extract(&self, _url: &ValidatedUrl) -> Result<ExtractionResult, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Ok(url) => Ok(ExtractionResult {
                url: url.clone(),
                title: Some("Test video".to_string()),
                ..Default::default()
            }),
            Err(message) => Err(ExtractError::Failed(message.clone())),
        }
    }
}

pub fn config_with_keys(keys: &[&str]) -> Config {
    Config {
        allowed_api_keys: keys.iter().map(|key| key.to_string()).collect(),
        log_requests: false,
        ..Config::default()
    }
}

/// Builds the router around `extractor` with [`API_KEY`] allow-listed
pub fn setup_test_app(extractor: Arc<FakeExtractor>) -> axum::Router {
    setup_app_with_config(config_with_keys(&[API_KEY]), extractor)
}

pub fn setup_app_with_config(config: Config, extractor: Arc<FakeExtractor>) -> axum::Router {
    create_app(AppState::new(config, extractor))
}

pub async fn get(app: axum::Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Helper function to parse response body as JSON
pub async fn response_json(body: Body) -> Value {
    let bytes = body
        .collect()
        .await
        .expect("Failed to read response body")
        .to_bytes();

    serde_json::from_slice(&bytes).expect("Failed to parse JSON")
}
