use std::time::Duration;

use async_trait::async_trait;
use px6_core::{ClientConfig, TransportError};

use super::http_trait::{AsyncConnector, AsyncHttpClient};

/// Async HTTP client implementation using reqwest.
///
/// Wraps one `reqwest::Client`, i.e. one connection pool. Clones share the
/// pool; it is released once the last clone is dropped. Dropping an
/// in-flight request future closes or returns its connection.
#[derive(Clone, Debug)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Create a new reqwest HTTP client with a custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    /// Create a new reqwest HTTP client with a custom client configuration.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AsyncHttpClient for ReqwestClient {
    async fn get(&self, url: &str, query_params: &[(&str, String)]) -> Result<String, TransportError> {
        let response = self
            .client
            .get(url)
            .query(query_params)
            .send()
            .await
            .map_err(classify)?
            .error_for_status()
            .map_err(classify)?;

        response
            .text()
            .await
            .map_err(|e| TransportError::ResponseBody(e.to_string()))
    }
}

fn classify(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if let Some(status) = e.status() {
        TransportError::Status {
            status: status.as_u16(),
        }
    } else {
        TransportError::Request(e.to_string())
    }
}

/// Opens a fresh [`ReqwestClient`] per session.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReqwestConnector;

#[async_trait]
impl AsyncConnector for ReqwestConnector {
    type Session = ReqwestClient;

    async fn connect(&self, config: &ClientConfig) -> Result<ReqwestClient, TransportError> {
        ReqwestClient::with_timeout(config.timeout_secs)
    }
}
