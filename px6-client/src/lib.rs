//! Blocking and non-blocking clients for the PROXY6 API.
//!
//! [`Proxy6`] owns its transport from construction until `close`.
//! [`AsyncProxy6`] only holds a session between `enter` and `exit`. Both run
//! the same request types from `px6-core` and report failures through the
//! same [`Error`].

mod client;
mod proxy6;
mod proxy6_async;

/// Operation name used for the account status endpoint in errors and logs.
pub(crate) const ACCOUNT_OPERATION: &str = "account";

pub use client::{AsyncConnector, AsyncHttpClient, HttpClient};
#[cfg(feature = "reqwest-client")]
pub use client::{ReqwestClient, ReqwestConnector};
#[cfg(feature = "ureq-client")]
pub use client::UreqClient;
pub use proxy6::Proxy6;
pub use proxy6_async::AsyncProxy6;

// Re-export core types for convenience
pub use px6_core::*;
