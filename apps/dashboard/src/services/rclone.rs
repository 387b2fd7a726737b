//! rclone remote-control API client.
//!
//! Talks to a running `rclone rcd` (or any rclone started with `--rc`) and
//! returns the raw JSON bodies of the calls the dashboard reads. Decoding is
//! left to the caller so a bad body never reaches the snapshot.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use crate::config::RcloneConfig;
use crate::error::{AppError, Result};

/// Anything that can hand out raw rclone stats payloads.
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Raw body of `core/stats`.
    async fn fetch_stats(&self) -> Result<String>;

    /// Raw body of `core/transferred`.
    async fn fetch_transferred(&self) -> Result<String>;
}

/// HTTP client for the rclone rc API.
pub struct RcloneClient {
    client: Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
}

impl RcloneClient {
    /// Create a client for the configured rc endpoint.
    ///
    /// Returns an error if the URL is empty or if the HTTP client cannot be built.
    pub fn new(config: &RcloneConfig) -> Result<Self> {
        let base_url = config.url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(AppError::Internal("rclone URL cannot be empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// Create a new client wrapped in Arc for shared access.
    pub fn new_shared(config: &RcloneConfig) -> Result<Arc<Self>> {
        Ok(Arc::new(Self::new(config)?))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST an rc method with an empty JSON object and return the body.
    async fn call(&self, method: &str) -> Result<String> {
        let url = format!("{}/{}", self.base_url, method);
        tracing::trace!(url = %url, "Calling rclone rc");

        let mut request = self.client.post(&url).json(&serde_json::json!({}));
        if let (Some(user), Some(pass)) = (&self.username, &self.password) {
            request = request.basic_auth(user, Some(pass));
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("rclone {} request failed: {}", method, e)))?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AppError::Upstream(
                "rclone rejected the configured credentials".to_string(),
            ));
        }

        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "rclone {} returned error status: {}",
                method, status
            )));
        }

        response.text().await.map_err(|e| {
            AppError::Upstream(format!("Failed to read rclone {} response: {}", method, e))
        })
    }
}

#[async_trait]
impl StatsSource for RcloneClient {
    async fn fetch_stats(&self) -> Result<String> {
        self.call("core/stats").await
    }

    async fn fetch_transferred(&self) -> Result<String> {
        self.call("core/transferred").await
    }
}
