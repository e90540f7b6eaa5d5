use futures::future::BoxFuture;
use log::debug;
use px6_core::{
    decode_response, normalize, AccountInfo, ApiKey, ApiResponse, BuyRequest, CheckRequest,
    ClientConfig, CountRequest, CountryRequest, DeleteRequest, Endpoint, Error, Operation,
    PriceRequest, ProlongRequest, ProxyListRequest, ProxyRecord, PurchaseOrder, Result,
    SetDescrRequest, SetTypeRequest, WireParams,
};

use crate::client::{AsyncConnector, AsyncHttpClient};
#[cfg(feature = "reqwest-client")]
use crate::client::ReqwestConnector;
use crate::ACCOUNT_OPERATION;

/// Operation name reported when opening a session fails.
const CONNECT_OPERATION: &str = "connect";

/// Non-blocking PROXY6 client with a scoped session.
///
/// No session exists until [`enter`] runs, and [`exit`] releases it again.
/// Calls made outside that window fail with
/// [`Error::SessionNotInitialized`] instead of opening a session on their
/// own. Inside it, any number of calls may be in flight at once; they share
/// the session and complete in no particular order.
///
/// ```ignore
/// let mut client = AsyncProxy6::new("api-key")?;
/// let price = client
///     .scoped(|c| Box::pin(async move { c.get_price(&PriceRequest::new(5, 30)).await }))
///     .await?;
/// ```
///
/// [`enter`]: AsyncProxy6::enter
/// [`exit`]: AsyncProxy6::exit
pub struct AsyncProxy6<C: AsyncConnector> {
    endpoint: Endpoint,
    config: ClientConfig,
    connector: C,
    session: Option<C::Session>,
}

#[cfg(feature = "reqwest-client")]
impl AsyncProxy6<ReqwestConnector> {
    /// Client with the default configuration and a reqwest transport.
    pub fn new(api_key: impl Into<ApiKey>) -> Result<Self> {
        Self::with_config(api_key, ClientConfig::default())
    }

    pub fn with_config(api_key: impl Into<ApiKey>, config: ClientConfig) -> Result<Self> {
        Self::with_connector(api_key, config, ReqwestConnector)
    }
}

impl<C: AsyncConnector> AsyncProxy6<C> {
    pub fn with_connector(api_key: impl Into<ApiKey>, config: ClientConfig, connector: C) -> Result<Self> {
        let endpoint = Endpoint::new(&config, &api_key.into())?;
        Ok(Self {
            endpoint,
            config,
            connector,
            session: None,
        })
    }

    /// Open the session. Entering an already open scope keeps the current
    /// session.
    pub async fn enter(&mut self) -> Result<()> {
        if self.session.is_some() {
            return Ok(());
        }
        let session = self
            .connector
            .connect(&self.config)
            .await
            .map_err(|source| Error::transport(CONNECT_OPERATION, source))?;
        self.session = Some(session);
        debug!("session opened");
        Ok(())
    }

    /// Release the session and its connections. A no-op when no session is
    /// open.
    pub fn exit(&mut self) {
        if self.session.take().is_some() {
            debug!("session closed");
        }
    }

    /// Manual counterpart of [`exit`](Self::exit) for code not using
    /// [`scoped`](Self::scoped). Safe to call repeatedly.
    pub fn close(&mut self) {
        self.exit();
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Run `f` inside an entered scope and exit afterwards, whether `f`
    /// succeeded, failed or was dropped before completing.
    pub async fn scoped<T, F>(&mut self, f: F) -> Result<T>
    where
        F: for<'c> FnOnce(&'c Self) -> BoxFuture<'c, Result<T>>,
    {
        self.enter().await?;
        let scope = ScopeGuard { client: self };
        let result = f(&*scope.client).await;
        drop(scope);
        result
    }

    fn session(&self) -> Result<&C::Session> {
        self.session.as_ref().ok_or(Error::SessionNotInitialized)
    }

    /// Run any operation.
    pub async fn execute<O: Operation>(&self, operation: &O) -> Result<O::Output> {
        let url = self.endpoint.operation_url(O::NAME)?;
        let wire = normalize(&operation.params());
        let response = self.call(O::NAME, url.as_str(), &wire).await?;
        operation.extract(response)
    }

    async fn call(&self, operation: &str, url: &str, wire: &WireParams) -> Result<ApiResponse> {
        let session = self.session()?;
        debug!(
            "{operation}: GET with params [{}]",
            wire.keys().collect::<Vec<_>>().join(",")
        );
        let body = session
            .get(url, &wire.as_query())
            .await
            .map_err(|source| Error::transport(operation, source))?;
        decode_response(operation, &body)
    }

    pub async fn get_price(&self, request: &PriceRequest) -> Result<f64> {
        self.execute(request).await
    }

    pub async fn get_count(&self, request: &CountRequest) -> Result<u64> {
        self.execute(request).await
    }

    pub async fn get_country(&self, request: &CountryRequest) -> Result<Vec<String>> {
        self.execute(request).await
    }

    pub async fn get_proxy(&self, request: &ProxyListRequest) -> Result<Vec<ProxyRecord>> {
        self.execute(request).await
    }

    pub async fn set_type(&self, request: &SetTypeRequest) -> Result<()> {
        self.execute(request).await
    }

    /// Returns how many proxies were relabelled.
    pub async fn set_descr(&self, request: &SetDescrRequest) -> Result<u64> {
        self.execute(request).await
    }

    pub async fn buy(&self, request: &BuyRequest) -> Result<PurchaseOrder> {
        self.execute(request).await
    }

    pub async fn prolong(&self, request: &ProlongRequest) -> Result<()> {
        self.execute(request).await
    }

    pub async fn delete(&self, request: &DeleteRequest) -> Result<()> {
        self.execute(request).await
    }

    /// `Ok(false)` for a proxy that is not working.
    pub async fn check(&self, request: &CheckRequest) -> Result<bool> {
        self.execute(request).await
    }

    /// Account summary from the status endpoint.
    pub async fn account_info(&self) -> Result<AccountInfo> {
        let url = self.endpoint.status_url();
        let response = self
            .call(ACCOUNT_OPERATION, url.as_str(), &WireParams::default())
            .await?;
        Ok(AccountInfo::from_response(response))
    }
}

/// Exits the scope when dropped, including when the future running the
/// scope is abandoned mid-flight.
struct ScopeGuard<'a, C: AsyncConnector> {
    client: &'a mut AsyncProxy6<C>,
}

impl<C: AsyncConnector> Drop for ScopeGuard<'_, C> {
    fn drop(&mut self) {
        self.client.exit();
    }
}
