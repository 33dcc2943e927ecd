//! HTTP client for the Webflow asset API.
//!
//! Provides a minimal client with Bearer auth, generic GET/POST helpers that
//! map failures onto [`reelpush_core::Error`], the [`AssetService`] domain
//! methods, and the uploader that posts bytes to a pre-signed storage target.
//!
//! [`AssetService`]: reelpush_core::AssetService

pub mod api;
pub mod form_upload;

use reelpush_core::{Config, Error, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub use api::{AssetUploadResponse, Pagination};
pub use form_upload::FormUploader;

/// API version prefix for every Data API path.
pub const API_PREFIX: &str = "/v2";

/// HTTP client for the Webflow Data API.
#[derive(Clone)]
pub struct WebflowClient {
    client: Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for WebflowClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebflowClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl WebflowClient {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Validation(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.api_base_url.clone(),
            config.api_token.clone(),
            config.http_timeout,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let mut request = self.apply_auth(self.client.get(self.build_url(path)));
        if !query.is_empty() {
            request = request.query(query);
        }
        Self::execute(operation, request).await
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        operation: &'static str,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.apply_auth(self.client.post(self.build_url(path)).json(body));
        Self::execute(operation, request).await
    }

    async fn execute<T: DeserializeOwned>(
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::remote(operation, format!("Failed to send request: {}", e)))?;

        let status = response.status();
        tracing::debug!(operation, status = status.as_u16(), "API response");

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::remote_status(operation, status.as_u16(), error_text));
        }

        response.json::<T>().await.map_err(|e| {
            Error::remote(operation, format!("Failed to parse response as JSON: {}", e))
        })
    }
}
