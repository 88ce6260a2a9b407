//! Artifact Store client: GitHub's repository contents API.
//!
//! A write is a create-or-update of a single file on one branch. The current
//! blob sha is looked up first so an existing file is overwritten instead of
//! rejected; concurrent writers to the same path race and the last one wins.

use crate::config::GithubConfig;
use crate::models::ArtifactWrite;
use crate::services::providers::USER_AGENT;
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Artifact store not configured: {0}")]
    NotConfigured(String),

    /// Non-success status; `body` is the raw upstream text.
    #[error("Artifact store rejected write {status}: {body}")]
    Rejected { status: StatusCode, body: String },

    #[error("Failed to parse artifact store response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Destination for generated artifacts.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Create or overwrite `write.path`; returns the store's JSON reply.
    async fn put(&self, write: &ArtifactWrite) -> Result<Value, StoreError>;
}

#[derive(Clone)]
pub struct GithubStore {
    config: GithubConfig,
    client: Client,
}

impl GithubStore {
    pub fn new(config: GithubConfig) -> Result<Self, StoreError> {
        if config.token.expose_secret().is_empty() {
            return Err(StoreError::NotConfigured(
                "GitHub token not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| StoreError::NotConfigured(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// `{base}/repos/{owner}/{repo}/contents/{path}` with each path segment
    /// percent-encoded.
    pub fn contents_url(&self, path: &str) -> String {
        let encoded_path = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        format!(
            "{}/repos/{}/{}/contents/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.owner,
            self.config.repo,
            encoded_path
        )
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .bearer_auth(self.config.token.expose_secret())
            .header(header::ACCEPT, GITHUB_ACCEPT)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
    }

    /// Sha of the file currently at `url` on `branch`, if there is one.
    async fn current_sha(&self, url: &str, branch: &str) -> Result<Option<String>, StoreError> {
        let response = self
            .request(self.client.get(url))
            .query(&[("ref", branch)])
            .send()
            .await
            .map_err(|e| StoreError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "No existing artifact, creating it");
            return Ok(None);
        }

        // A directory listing or an unexpected body means there is no blob to replace.
        let sha = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body.get("sha").and_then(Value::as_str).map(str::to_string));

        Ok(sha)
    }
}

#[derive(Debug, Serialize)]
struct PutContentsBody<'a> {
    message: &'a str,
    content: &'a str,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

#[async_trait]
impl ArtifactStore for GithubStore {
    async fn put(&self, write: &ArtifactWrite) -> Result<Value, StoreError> {
        let url = self.contents_url(&write.path);
        let sha = self.current_sha(&url, &write.branch).await?;

        tracing::debug!(
            path = %write.path,
            branch = %write.branch,
            update = sha.is_some(),
            "Pushing artifact to GitHub"
        );

        let body = PutContentsBody {
            message: &write.message,
            content: &write.content,
            branch: &write.branch,
            sha,
        };

        let response = self
            .request(self.client.put(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::NetworkError(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| StoreError::NetworkError(e.to_string()))?;

        tracing::debug!(status = %status, body = %text, "GitHub API response");

        if !status.is_success() {
            tracing::error!(status = %status, body = %text, "Error from GitHub API");
            return Err(StoreError::Rejected { status, body: text });
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(error = %e, "Error parsing GitHub API response");
            StoreError::InvalidResponse(text.clone())
        })
    }
}
