use async_trait::async_trait;
use px6_core::{ClientConfig, TransportError};

/// Blocking HTTP GET transport.
///
/// Implement this to run [`Proxy6`](crate::Proxy6) on any HTTP library. The
/// value owns its connections; dropping it releases them.
pub trait HttpClient: Send + Sync {
    /// Perform a GET request with query parameters.
    ///
    /// # Arguments
    /// * `url` - The full URL to request
    /// * `query_params` - Query parameters as key-value pairs, not yet encoded
    ///
    /// # Returns
    /// The response body as a string. Non-2xx statuses are errors.
    fn get(&self, url: &str, query_params: &[(&str, String)]) -> Result<String, TransportError>;
}

/// Non-blocking HTTP GET transport, one per open session.
///
/// A session is shared by every in-flight call of an
/// [`AsyncProxy6`](crate::AsyncProxy6), so `get` must not keep per-call state
/// in `self`.
#[async_trait]
pub trait AsyncHttpClient: Send + Sync {
    /// Same contract as [`HttpClient::get`].
    async fn get(&self, url: &str, query_params: &[(&str, String)]) -> Result<String, TransportError>;
}

/// Opens sessions for [`AsyncProxy6`](crate::AsyncProxy6) when its scope is
/// entered.
#[async_trait]
pub trait AsyncConnector: Send + Sync {
    type Session: AsyncHttpClient;

    /// Create a session honouring `config` (the request timeout in
    /// particular).
    async fn connect(&self, config: &ClientConfig) -> Result<Self::Session, TransportError>;
}
