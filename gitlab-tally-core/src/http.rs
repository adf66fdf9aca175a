//! # http: one authenticated request, raw bytes back
//!
//! [`HttpClient`] is the seam between the GitLab walkers and the network. The
//! production implementation is [`ReqwestClient`]; tests use the generated
//! `MockHttpClient` or their own fakes.
//!
//! ## Contract
//! - Exactly one request per call. No retries, no redirects special-cased.
//! - Only HTTP 200 counts as success; everything else is
//!   [`HttpError::UnexpectedStatus`].
//! - The response is fully read and dropped before the call returns.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::error::HttpError;

/// Issues a single HTTP request and returns the body on a 200 response.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn request(
        &self,
        method: &str,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<Vec<u8>, HttpError>;
}

/// Builds the bearer-token header GitLab expects for private tokens.
pub fn auth_headers(token: &str) -> Vec<(String, String)> {
    vec![("Authorization".to_string(), format!("Bearer {token}"))]
}

/// [`HttpClient`] backed by a shared `reqwest::Client`.
///
/// Cloning is cheap; clones share the same connection pool.
#[derive(Clone, Debug)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Builds a client whose requests give up after `timeout`. `None` waits forever.
    pub fn new(timeout: Option<Duration>) -> reqwest::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        tracing::debug!(?timeout, "Initialised reqwest HTTP client");
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn request(
        &self,
        method: &str,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<Vec<u8>, HttpError> {
        let construction = |reason: String| HttpError::RequestConstruction {
            method: method.to_string(),
            url: url.to_string(),
            reason,
        };

        let method =
            Method::from_bytes(method.as_bytes()).map_err(|e| construction(e.to_string()))?;
        let mut builder = self.client.request(method, url);
        for (key, value) in headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        let request = builder.build().map_err(|e| construction(e.to_string()))?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| HttpError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::debug!(url = %url, status = %status, "Non-200 response");
            return Err(HttpError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| HttpError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(body.to_vec())
    }
}
