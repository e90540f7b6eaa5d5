//! One request type per remote method.
//!
//! Each type knows its wire name, how to lay itself out as [`Params`], and
//! how to pull its result out of a successful [`ApiResponse`]. Both client
//! variants execute the same values, so given the same response they return
//! the same result.
//!
//! Where the API wants exactly one of two parameters (`setdescr`, `delete`,
//! `check`) the request is sent as built; the remote side reports a missing
//! or conflicting pair as an API error.

use crate::error::{Error, Result};
use crate::params::Params;
use crate::response::ApiResponse;
use crate::structs::{
    parse_flag, proxy_records, ProxyRecord, ProxyState, ProxyType, ProxyVersion, PurchaseOrder,
};

pub trait Operation {
    /// Method name, the last path segment of the request URL.
    const NAME: &'static str;

    type Output;

    fn params(&self) -> Params;

    fn extract(&self, response: ApiResponse) -> Result<Self::Output>;
}

/// `getprice`: cost of `count` proxies for `period` days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRequest {
    pub count: u32,
    pub period: u32,
    pub version: ProxyVersion,
}

impl PriceRequest {
    pub fn new(count: u32, period: u32) -> Self {
        Self {
            count,
            period,
            version: ProxyVersion::default(),
        }
    }

    pub fn version(mut self, version: ProxyVersion) -> Self {
        self.version = version;
        self
    }
}

impl Operation for PriceRequest {
    const NAME: &'static str = "getprice";
    type Output = f64;

    fn params(&self) -> Params {
        Params::new()
            .with("count", self.count)
            .with("period", self.period)
            .with("version", self.version)
    }

    fn extract(&self, response: ApiResponse) -> Result<f64> {
        response.number("price")
    }
}

/// `getcount`: proxies available in a country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountRequest {
    /// ISO2 country code.
    pub country: String,
    pub version: ProxyVersion,
}

impl CountRequest {
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            version: ProxyVersion::default(),
        }
    }

    pub fn version(mut self, version: ProxyVersion) -> Self {
        self.version = version;
        self
    }
}

impl Operation for CountRequest {
    const NAME: &'static str = "getcount";
    type Output = u64;

    fn params(&self) -> Params {
        Params::new()
            .with("country", &self.country)
            .with("version", self.version)
    }

    fn extract(&self, response: ApiResponse) -> Result<u64> {
        response.count("count")
    }
}

/// `getcountry`: ISO2 codes of countries with stock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryRequest {
    pub version: ProxyVersion,
}

impl CountryRequest {
    pub fn new(version: ProxyVersion) -> Self {
        Self { version }
    }
}

impl Operation for CountryRequest {
    const NAME: &'static str = "getcountry";
    type Output = Vec<String>;

    fn params(&self) -> Params {
        Params::new().with("version", self.version)
    }

    fn extract(&self, response: ApiResponse) -> Result<Vec<String>> {
        response.field("list")
    }
}

/// `getproxy`: the account's proxies, one page at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyListRequest {
    pub state: ProxyState,
    /// Only proxies carrying this descriptor.
    pub descr: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl Default for ProxyListRequest {
    fn default() -> Self {
        Self {
            state: ProxyState::All,
            descr: None,
            page: 1,
            limit: 1000,
        }
    }
}

impl ProxyListRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(mut self, state: ProxyState) -> Self {
        self.state = state;
        self
    }

    pub fn descr(mut self, descr: impl Into<String>) -> Self {
        self.descr = Some(descr.into());
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

impl Operation for ProxyListRequest {
    const NAME: &'static str = "getproxy";
    type Output = Vec<ProxyRecord>;

    fn params(&self) -> Params {
        Params::new()
            .with("state", self.state)
            .with("descr", self.descr.as_deref())
            .with("page", self.page)
            .with("limit", self.limit)
    }

    fn extract(&self, response: ApiResponse) -> Result<Vec<ProxyRecord>> {
        proxy_records(&response, "list")
    }
}

/// `settype`: switch the protocol of the given proxies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetTypeRequest {
    pub ids: Vec<u64>,
    pub proxy_type: ProxyType,
}

impl SetTypeRequest {
    pub fn new(ids: impl IntoIterator<Item = u64>, proxy_type: ProxyType) -> Self {
        Self {
            ids: ids.into_iter().collect(),
            proxy_type,
        }
    }
}

impl Operation for SetTypeRequest {
    const NAME: &'static str = "settype";
    type Output = ();

    fn params(&self) -> Params {
        Params::new()
            .with("ids", self.ids.as_slice())
            .with("type", self.proxy_type)
    }

    fn extract(&self, _response: ApiResponse) -> Result<()> {
        Ok(())
    }
}

/// `setdescr`: relabel proxies selected by their old descriptor or by id.
/// Yields the number of proxies updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetDescrRequest {
    pub new: String,
    pub old: Option<String>,
    pub ids: Option<Vec<u64>>,
}

impl SetDescrRequest {
    pub fn new(new: impl Into<String>) -> Self {
        Self {
            new: new.into(),
            old: None,
            ids: None,
        }
    }

    /// Relabel every proxy currently carrying `old`.
    pub fn replacing(new: impl Into<String>, old: impl Into<String>) -> Self {
        Self::new(new).old(old)
    }

    /// Relabel the proxies with the given ids.
    pub fn for_ids(new: impl Into<String>, ids: impl IntoIterator<Item = u64>) -> Self {
        Self::new(new).ids(ids)
    }

    pub fn old(mut self, old: impl Into<String>) -> Self {
        self.old = Some(old.into());
        self
    }

    pub fn ids(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.ids = Some(ids.into_iter().collect());
        self
    }
}

impl Operation for SetDescrRequest {
    const NAME: &'static str = "setdescr";
    type Output = u64;

    fn params(&self) -> Params {
        Params::new()
            .with("new", &self.new)
            .with("old", self.old.as_deref())
            .with("ids", self.ids.as_deref())
    }

    fn extract(&self, response: ApiResponse) -> Result<u64> {
        response.count("count")
    }
}

/// `buy`: purchase proxies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyRequest {
    pub count: u32,
    pub period: u32,
    pub country: String,
    pub version: ProxyVersion,
    pub proxy_type: ProxyType,
    pub descr: Option<String>,
    pub auto_prolong: bool,
}

impl BuyRequest {
    pub fn new(count: u32, period: u32, country: impl Into<String>) -> Self {
        Self {
            count,
            period,
            country: country.into(),
            version: ProxyVersion::default(),
            proxy_type: ProxyType::default(),
            descr: None,
            auto_prolong: false,
        }
    }

    pub fn version(mut self, version: ProxyVersion) -> Self {
        self.version = version;
        self
    }

    pub fn proxy_type(mut self, proxy_type: ProxyType) -> Self {
        self.proxy_type = proxy_type;
        self
    }

    pub fn descr(mut self, descr: impl Into<String>) -> Self {
        self.descr = Some(descr.into());
        self
    }

    pub fn auto_prolong(mut self, auto_prolong: bool) -> Self {
        self.auto_prolong = auto_prolong;
        self
    }
}

impl Operation for BuyRequest {
    const NAME: &'static str = "buy";
    type Output = PurchaseOrder;

    fn params(&self) -> Params {
        Params::new()
            .with("count", self.count)
            .with("period", self.period)
            .with("country", &self.country)
            .with("version", self.version)
            .with("type", self.proxy_type)
            .with("descr", self.descr.as_deref())
            .with("auto_prolong", self.auto_prolong)
    }

    fn extract(&self, response: ApiResponse) -> Result<PurchaseOrder> {
        PurchaseOrder::from_response(&response)
    }
}

/// `prolong`: extend proxies by `period` days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProlongRequest {
    pub period: u32,
    pub ids: Vec<u64>,
}

impl ProlongRequest {
    pub fn new(period: u32, ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            period,
            ids: ids.into_iter().collect(),
        }
    }
}

impl Operation for ProlongRequest {
    const NAME: &'static str = "prolong";
    type Output = ();

    fn params(&self) -> Params {
        Params::new()
            .with("period", self.period)
            .with("ids", self.ids.as_slice())
    }

    fn extract(&self, _response: ApiResponse) -> Result<()> {
        Ok(())
    }
}

/// `delete`: remove proxies by id and/or descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteRequest {
    pub ids: Option<Vec<u64>>,
    pub descr: Option<String>,
}

impl DeleteRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.ids = Some(ids.into_iter().collect());
        self
    }

    pub fn descr(mut self, descr: impl Into<String>) -> Self {
        self.descr = Some(descr.into());
        self
    }
}

impl Operation for DeleteRequest {
    const NAME: &'static str = "delete";
    type Output = ();

    fn params(&self) -> Params {
        Params::new()
            .with("ids", self.ids.as_deref())
            .with("descr", self.descr.as_deref())
    }

    fn extract(&self, _response: ApiResponse) -> Result<()> {
        Ok(())
    }
}

/// `check`: is a proxy working. An invalid proxy is `Ok(false)`, not an
/// error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckRequest {
    pub ids: Option<u64>,
    /// `ip:port:user:pass`
    pub proxy: Option<String>,
}

impl CheckRequest {
    pub fn by_id(id: u64) -> Self {
        Self {
            ids: Some(id),
            proxy: None,
        }
    }

    pub fn by_proxy(proxy: impl Into<String>) -> Self {
        Self {
            ids: None,
            proxy: Some(proxy.into()),
        }
    }
}

impl Operation for CheckRequest {
    const NAME: &'static str = "check";
    type Output = bool;

    fn params(&self) -> Params {
        Params::new()
            .with("ids", self.ids)
            .with("proxy", self.proxy.as_deref())
    }

    fn extract(&self, response: ApiResponse) -> Result<bool> {
        let status = response.require("proxy_status")?;
        parse_flag(status).ok_or_else(|| {
            Error::malformed(
                response.operation(),
                format!("field `proxy_status` is not a boolean: {status}"),
            )
        })
    }
}
