use log::debug;
use px6_core::{
    decode_response, normalize, AccountInfo, ApiKey, ApiResponse, BuyRequest, CheckRequest,
    ClientConfig, CountRequest, CountryRequest, DeleteRequest, Endpoint, Error, Operation,
    PriceRequest, ProlongRequest, ProxyListRequest, ProxyRecord, PurchaseOrder, Result,
    SetDescrRequest, SetTypeRequest, WireParams,
};

use crate::client::HttpClient;
#[cfg(feature = "ureq-client")]
use crate::client::UreqClient;
use crate::ACCOUNT_OPERATION;

/// Blocking PROXY6 client.
///
/// The transport is created with the client and kept until [`close`]; every
/// call blocks the current thread until the response arrives or the
/// transport times out. Sequential reuse is the intended pattern; share one
/// instance across threads only behind a lock.
///
/// [`close`]: Proxy6::close
pub struct Proxy6<H: HttpClient> {
    endpoint: Endpoint,
    session: Option<H>,
}

#[cfg(feature = "ureq-client")]
impl Proxy6<UreqClient> {
    /// Client with the default configuration and a ureq transport.
    pub fn new(api_key: impl Into<ApiKey>) -> Result<Self> {
        Self::with_config(api_key, &ClientConfig::default())
    }

    pub fn with_config(api_key: impl Into<ApiKey>, config: &ClientConfig) -> Result<Self> {
        let http_client = UreqClient::with_timeout(config.timeout_secs);
        Self::with_http_client(api_key, config, http_client)
    }
}

impl<H: HttpClient> Proxy6<H> {
    /// Create a client over a caller-supplied transport.
    ///
    /// The transport is expected to enforce its own timeout; `config` only
    /// contributes the base URL here.
    pub fn with_http_client(
        api_key: impl Into<ApiKey>,
        config: &ClientConfig,
        http_client: H,
    ) -> Result<Self> {
        let endpoint = Endpoint::new(config, &api_key.into())?;
        Ok(Self {
            endpoint,
            session: Some(http_client),
        })
    }

    /// Release the transport. Calling it again does nothing; later requests
    /// fail with [`Error::SessionNotInitialized`].
    pub fn close(&mut self) {
        if self.session.take().is_some() {
            debug!("session closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.session.is_none()
    }

    /// Run any operation.
    pub fn execute<O: Operation>(&self, operation: &O) -> Result<O::Output> {
        let url = self.endpoint.operation_url(O::NAME)?;
        let wire = normalize(&operation.params());
        let response = self.call(O::NAME, url.as_str(), &wire)?;
        operation.extract(response)
    }

    fn call(&self, operation: &str, url: &str, wire: &WireParams) -> Result<ApiResponse> {
        let session = self.session.as_ref().ok_or(Error::SessionNotInitialized)?;
        debug!(
            "{operation}: GET with params [{}]",
            wire.keys().collect::<Vec<_>>().join(",")
        );
        let body = session
            .get(url, &wire.as_query())
            .map_err(|source| Error::transport(operation, source))?;
        decode_response(operation, &body)
    }

    pub fn get_price(&self, request: &PriceRequest) -> Result<f64> {
        self.execute(request)
    }

    pub fn get_count(&self, request: &CountRequest) -> Result<u64> {
        self.execute(request)
    }

    pub fn get_country(&self, request: &CountryRequest) -> Result<Vec<String>> {
        self.execute(request)
    }

    pub fn get_proxy(&self, request: &ProxyListRequest) -> Result<Vec<ProxyRecord>> {
        self.execute(request)
    }

    pub fn set_type(&self, request: &SetTypeRequest) -> Result<()> {
        self.execute(request)
    }

    /// Returns how many proxies were relabelled.
    pub fn set_descr(&self, request: &SetDescrRequest) -> Result<u64> {
        self.execute(request)
    }

    pub fn buy(&self, request: &BuyRequest) -> Result<PurchaseOrder> {
        self.execute(request)
    }

    pub fn prolong(&self, request: &ProlongRequest) -> Result<()> {
        self.execute(request)
    }

    pub fn delete(&self, request: &DeleteRequest) -> Result<()> {
        self.execute(request)
    }

    /// `Ok(false)` for a proxy that is not working.
    pub fn check(&self, request: &CheckRequest) -> Result<bool> {
        self.execute(request)
    }

    /// Account summary from the status endpoint.
    pub fn account_info(&self) -> Result<AccountInfo> {
        let url = self.endpoint.status_url();
        let response = self.call(ACCOUNT_OPERATION, url.as_str(), &WireParams::default())?;
        Ok(AccountInfo::from_response(response))
    }
}
