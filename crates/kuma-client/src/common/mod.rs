//! Common utilities for the Uptime Kuma API client
//!
//! Provides the authenticated HTTP wrapper and status-code mapping shared by
//! every endpoint.

use crate::error::KumaError;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// HTTP client wrapper with authentication
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpClient {
    /// Create a new HTTP client wrapper
    pub fn new(client: Client, base_url: String, token: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a full URL from a path
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Make a GET request
    pub async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, KumaError> {
        let url = self.build_url(path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(KumaError::Http)?;

        let response = check_status("GET", path, response).await?;

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            KumaError::Api(format!(
                "error decoding response body: {} - Response (first 500 chars): {}",
                e,
                response_text.chars().take(500).collect::<String>()
            ))
        })
    }

    /// Make a PUT request whose response body is ignored
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), KumaError> {
        let url = self.build_url(path);
        debug!(
            "PUT {} with body: {}",
            url,
            serde_json::to_string(body).unwrap_or_default()
        );

        let response = self
            .client
            .put(&url)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(KumaError::Http)?;

        check_status("PUT", path, response).await?;
        Ok(())
    }
}

/// Map a non-success response onto a typed error
///
/// 404 → `NotFound`, 409 → `Conflict`, 401/403 → `Authentication`,
/// 400/422 → `InvalidRequest`, anything else → `Api`.
pub async fn check_status(method: &str, path: &str, response: Response) -> Result<Response, KumaError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = format!("{} {} failed: {} - {}", method, path, status, body);
    Err(match status {
        StatusCode::NOT_FOUND => KumaError::NotFound(message),
        StatusCode::CONFLICT => KumaError::Conflict(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => KumaError::Authentication(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => KumaError::InvalidRequest(message),
        _ => KumaError::Api(message),
    })
}
