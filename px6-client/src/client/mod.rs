mod http_trait;
#[cfg(feature = "reqwest-client")]
mod reqwest_impl;
#[cfg(feature = "ureq-client")]
mod ureq_impl;

pub use http_trait::{AsyncConnector, AsyncHttpClient, HttpClient};

#[cfg(feature = "reqwest-client")]
pub use reqwest_impl::{ReqwestClient, ReqwestConnector};
#[cfg(feature = "ureq-client")]
pub use ureq_impl::UreqClient;
