//! Shared helpers for relay integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use codegen_relay::config::{
    ArtifactConfig, ArtifactPath, GenerationConfig, GithubConfig, ProviderKind, RelayConfig,
};
use codegen_relay::models::ArtifactWrite;
use codegen_relay::services::providers::mock::MockTextProvider;
use codegen_relay::services::{ArtifactStore, StoreError};
use codegen_relay::startup::{build_router, AppState};
use secrecy::Secret;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

pub const GEMINI_KEY: &str = "test-gemini-key";
pub const GITHUB_TOKEN: &str = "ghp_test";
pub const GEMINI_PATH: &str = "/models/gemini-2.0-flash:generateContent";
pub const CONTENTS_PATH: &str = "/repos/octo/generated/contents/code-gen-result.js";

pub fn test_config(generation_base: &str, github_base: &str) -> RelayConfig {
    RelayConfig {
        common: service_core::config::Config {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        generation: GenerationConfig {
            provider: ProviderKind::Gemini,
            api_key: Secret::new(GEMINI_KEY.to_string()),
            model: "gemini-2.0-flash".to_string(),
            api_base: generation_base.to_string(),
            max_tokens: 64,
        },
        github: GithubConfig {
            token: Secret::new(GITHUB_TOKEN.to_string()),
            owner: "octo".to_string(),
            repo: "generated".to_string(),
            api_base: github_base.to_string(),
        },
        artifact: ArtifactConfig {
            path: ArtifactPath::Fixed("code-gen-result.js".to_string()),
        },
        otlp_endpoint: None,
    }
}

/// Router wired to the real HTTP clients, pointed at stub servers.
pub fn http_router(config: RelayConfig) -> Router {
    let state = AppState::from_config(config).expect("Failed to wire relay clients");
    build_router(state)
}

/// Artifact store stub that records writes and answers with a canned reply.
pub struct RecordingStore {
    reply: Result<Value, (StatusCode, String)>,
    writes: Mutex<Vec<ArtifactWrite>>,
}

impl RecordingStore {
    pub fn succeeding(reply: Value) -> Self {
        Self {
            reply: Ok(reply),
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting(status: StatusCode, body: &str) -> Self {
        Self {
            reply: Err((status, body.to_string())),
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn writes(&self) -> Vec<ArtifactWrite> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArtifactStore for RecordingStore {
    async fn put(&self, write: &ArtifactWrite) -> Result<Value, StoreError> {
        self.writes.lock().unwrap().push(write.clone());
        match &self.reply {
            Ok(value) => Ok(value.clone()),
            Err((status, body)) => Err(StoreError::Rejected {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}

/// Router backed by in-process stubs for both dependencies.
pub fn stub_router(provider: Arc<MockTextProvider>, store: Arc<RecordingStore>) -> Router {
    let config = test_config("http://127.0.0.1:1", "http://127.0.0.1:1");
    build_router(AppState::new(config, provider, store))
}

pub fn stored_file_reply() -> Value {
    json!({ "content": { "html_url": "https://example/repo/blob/main/x.js" } })
}

pub fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("Response body is not JSON")
    }
}

pub async fn send(router: Router, request: Request<Body>) -> TestResponse {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    TestResponse {
        status,
        headers,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}
