//! Internal HTTP client for the control plane REST API.

use crate::core::{
    config::ClientConfig,
    domain::{
        error::{ConsoleError, ConsoleResult},
        value_object::ControlPlaneUrl,
    },
};
use governor::DefaultDirectRateLimiter;
use reqwest::{Client, Method, Response};
use serde::Deserialize;
use std::sync::Arc;

/// Error body the backend sends with non-success responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(rename = "Detail")]
    detail: Option<String>,
}

/// Internal HTTP client that performs JSON requests against the control plane.
///
/// Every request goes through the optional rate limiter. Transport failures
/// map to `ConsoleError::Connection`, non-2xx answers to `ConsoleError::Api`
/// and undecodable bodies to `ConsoleError::Parse`.
#[derive(Debug)]
pub struct ApiClient {
    http_client: Client,
    base_url: ControlPlaneUrl,
    rate_limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl ApiClient {
    /// Creates a new `ApiClient`.
    ///
    /// # Errors
    /// Returns `ConsoleError::Validation` for an invalid rate limit and
    /// `ConsoleError::Connection` if the HTTP client cannot be built.
    pub fn new(base_url: ControlPlaneUrl, config: &ClientConfig) -> ConsoleResult<Self> {
        let http_client = Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConsoleError::Connection(e.to_string()))?;

        let rate_limiter = config
            .rate_limit
            .map(|rl| rl.quota().map(|q| Arc::new(DefaultDirectRateLimiter::direct(q))))
            .transpose()?;

        Ok(Self {
            http_client,
            base_url,
            rate_limiter,
        })
    }

    /// Returns the base URL requests are resolved against.
    pub fn base_url(&self) -> &ControlPlaneUrl {
        &self.base_url
    }

    /// Performs a GET request and decodes the JSON body.
    pub async fn get<T>(&self, path: &str) -> ConsoleResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.send(Method::GET, path, None::<&()>).await?;
        Self::decode(response).await
    }

    /// Performs a PUT request with an optional JSON body, discarding the
    /// response body.
    pub async fn put<B>(&self, path: &str, body: Option<&B>) -> ConsoleResult<()>
    where
        B: serde::Serialize,
    {
        self.send(Method::PUT, path, body).await.map(drop)
    }

    /// Performs a DELETE request, discarding the response body.
    pub async fn delete(&self, path: &str) -> ConsoleResult<()> {
        self.send(Method::DELETE, path, None::<&()>).await.map(drop)
    }

    /// Sends a request and turns non-success statuses into errors.
    async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> ConsoleResult<Response>
    where
        B: serde::Serialize,
    {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        let url = self.base_url.endpoint(path);
        let mut req_builder = self.http_client.request(method, &url);
        if let Some(body) = body {
            req_builder = req_builder.json(body);
        }

        let response = req_builder
            .send()
            .await
            .map_err(|e| ConsoleError::Connection(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.detail)
                .unwrap_or(text);
            return Err(ConsoleError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn decode<T>(response: Response) -> ConsoleResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ConsoleError::Connection(format!("Failed to read response: {}", e)))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ConsoleError::Parse(format!("Failed to parse response: {}", e)))
    }
}
