//! Transport-agnostic core of the PROXY6 API client.
//!
//! Turns typed requests into wire parameters and classifies raw response
//! bodies. The HTTP round-trip itself lives in `px6-client`.

mod config;
mod endpoint;
pub mod error;
pub mod operations;
pub mod params;
mod response;
mod structs;

pub use config::{ApiKey, ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use endpoint::Endpoint;
pub use error::{ApiFailure, Error, ErrorKind, Result, TransportError};
pub use operations::{
    BuyRequest, CheckRequest, CountRequest, CountryRequest, DeleteRequest, Operation,
    PriceRequest, ProlongRequest, ProxyListRequest, SetDescrRequest, SetTypeRequest,
};
pub use params::{normalize, ParamValue, Params, Scalar, WireParams};
pub use response::{decode_response, ApiResponse, STATUS_SUCCESS};
pub use structs::{AccountInfo, ProxyRecord, ProxyState, ProxyType, ProxyVersion, PurchaseOrder};
