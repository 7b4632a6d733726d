//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with a mock fetcher and tagger injected, so the HTTP surface can be
//! exercised without yt-dlp or real audio files.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use playlist2album_core::{
    testing::{MockFetcher, MockTagger},
    Config, StorageConfig,
};
use playlist2album_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use playlist2album_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_download() {
///     let fixture = TestFixture::with_fetcher(MockFetcher::new().with_file("01 - A.mp3"));
///
///     let response = fixture.post("/download", json!({
///         "playlist_url": "https://example.com/list"
///     })).await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Shared state, for waiting on jobs
    pub state: Arc<AppState>,
    /// Mock fetcher - scripted output lines and files
    pub fetcher: MockFetcher,
    /// Mock tagger - records tag writes
    pub tagger: MockTagger,
    /// Temporary data directory
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Response with the raw body and headers
#[derive(Debug)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestFixture {
    /// Create a new test fixture whose fetcher produces nothing.
    pub fn new() -> Self {
        Self::with_fetcher(MockFetcher::new())
    }

    /// Create a test fixture around a configured fetcher.
    pub fn with_fetcher(fetcher: MockFetcher) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let tagger = MockTagger::new();

        let config = Config {
            storage: StorageConfig::new(temp_dir.path()),
            ..Default::default()
        };

        let state = Arc::new(AppState::new(
            config,
            Arc::new(fetcher.clone()),
            Arc::new(tagger.clone()),
        ));
        let router = create_router(Arc::clone(&state));

        Self {
            router,
            state,
            fetcher,
            tagger,
            temp_dir,
        }
    }

    /// Directory holding finished archives.
    pub fn out_dir(&self) -> PathBuf {
        self.state.storage().out_dir()
    }

    /// Start a download and wait for its worker to finish.
    pub async fn download_and_wait(&self, body: Value) -> TestResponse {
        let response = self.post("/download", body).await;
        if let Some(job_id) = response.body["job_id"].as_str() {
            self.state.jobs().wait(job_id).await;
        }
        response
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let raw = self.send(request).await;
        TestResponse {
            status: raw.status,
            body: parse_json(&raw.body),
        }
    }

    /// Send a GET request and keep the body as bytes.
    pub async fn get_raw(&self, path: &str) -> RawResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Send an arbitrary request.
    pub async fn send(&self, request: Request<Body>) -> RawResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        RawResponse {
            status,
            headers,
            body,
        }
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let raw = self.send(request_builder.body(body).unwrap()).await;
        TestResponse {
            status: raw.status,
            body: parse_json(&raw.body),
        }
    }
}

fn parse_json(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(bytes).unwrap_or(Value::Null)
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
