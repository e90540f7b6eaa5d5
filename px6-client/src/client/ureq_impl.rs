use std::io;
use std::time::Duration;

use px6_core::{TransportError, DEFAULT_TIMEOUT_SECS};

use super::http_trait::HttpClient;

/// Blocking HTTP client implementation using ureq.
///
/// The agent keeps a pool of keep-alive connections that is reused across
/// calls and released when the client is dropped.
///
/// # Example
///
/// ```ignore
/// use px6_client::{Proxy6, UreqClient, ClientConfig};
///
/// let config = ClientConfig::default();
/// let client = Proxy6::with_http_client("api-key", &config, UreqClient::with_timeout(10))?;
/// ```
#[derive(Clone)]
pub struct UreqClient {
    agent: ureq::Agent,
}

impl UreqClient {
    /// Create a new ureq HTTP client with the default timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Create a new ureq HTTP client with a custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(timeout_secs))
                .build(),
        }
    }

    /// Wrap an agent configured by the caller.
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for UreqClient {
    fn get(&self, url: &str, query_params: &[(&str, String)]) -> Result<String, TransportError> {
        let mut request = self.agent.get(url);

        for (key, value) in query_params {
            request = request.query(key, value);
        }

        let response = request.call().map_err(|e| match e {
            ureq::Error::Status(status, _) => TransportError::Status { status },
            ureq::Error::Transport(transport) if is_timeout(&transport) => TransportError::Timeout,
            ureq::Error::Transport(transport) => TransportError::Request(transport.to_string()),
        })?;

        response.into_string().map_err(|e| {
            if is_timeout_kind(e.kind()) {
                TransportError::Timeout
            } else {
                TransportError::ResponseBody(e.to_string())
            }
        })
    }
}

fn is_timeout(transport: &ureq::Transport) -> bool {
    std::error::Error::source(transport)
        .and_then(|source| source.downcast_ref::<io::Error>())
        .is_some_and(|io_error| is_timeout_kind(io_error.kind()))
}

// Socket read timeouts surface as `WouldBlock` on some platforms.
fn is_timeout_kind(kind: io::ErrorKind) -> bool {
    matches!(kind, io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}
