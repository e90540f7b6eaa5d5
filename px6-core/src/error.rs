use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Failure raised by a transport implementation before a body was obtained.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("request timed out")]
    Timeout,
    #[error("server returned HTTP status {status}")]
    Status { status: u16 },
    #[error("failed to read response body: {0}")]
    ResponseBody(String),
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

#[derive(Debug, Error)]
pub enum Error {
    // Remote side
    #[error("transport failure while calling `{operation}`: {source}")]
    Transport {
        operation: String,
        #[source]
        source: TransportError,
    },
    #[error("malformed response from `{operation}`: {reason}")]
    MalformedResponse { operation: String, reason: String },
    #[error("`{operation}` rejected by API: {failure}")]
    Api {
        operation: String,
        failure: ApiFailure,
    },

    // Caller bugs
    #[error("session not initialized: enter the client scope before issuing requests")]
    SessionNotInitialized,

    // Construction
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`], comparable across client variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Transport,
    MalformedResponse,
    Api,
    Usage,
}

impl Error {
    pub fn transport(operation: &str, source: TransportError) -> Self {
        Error::Transport {
            operation: operation.to_string(),
            source,
        }
    }

    pub fn malformed(operation: &str, reason: impl Into<String>) -> Self {
        Error::MalformedResponse {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Transport { .. } => ErrorKind::Transport,
            Error::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            Error::Api { .. } => ErrorKind::Api,
            Error::SessionNotInitialized | Error::InvalidEndpoint(_) => ErrorKind::Usage,
        }
    }

    /// Name of the remote operation the error belongs to, if any.
    pub fn operation(&self) -> Option<&str> {
        match self {
            Error::Transport { operation, .. }
            | Error::MalformedResponse { operation, .. }
            | Error::Api { operation, .. } => Some(operation.as_str()),
            Error::SessionNotInitialized | Error::InvalidEndpoint(_) => None,
        }
    }
}

/// Diagnostic payload of a response whose status discriminator is not the
/// success sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiFailure {
    /// The `status` field as received; `Value::Null` when it was missing.
    pub status: Value,
    /// The `error` message field.
    pub message: Option<String>,
    /// The `error_id` code field.
    pub code: Option<i64>,
    /// The complete decoded body.
    pub payload: Value,
}

impl ApiFailure {
    pub(crate) fn from_payload(payload: Value) -> Self {
        let status = payload.get("status").cloned().unwrap_or(Value::Null);
        let message = payload
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string);
        let code = payload.get("error_id").and_then(|v| match v {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        });
        ApiFailure {
            status,
            message,
            code,
            payload,
        }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.message, self.code) {
            (Some(message), Some(code)) => write!(f, "{message} (error_id {code})"),
            (Some(message), None) => write!(f, "{message}"),
            (None, Some(code)) => write!(f, "error_id {code}"),
            (None, None) => write!(f, "unknown API error (status {})", self.status),
        }
    }
}
