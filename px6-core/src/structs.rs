use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::params::{ParamValue, Scalar};
use crate::response::{lenient_f64, lenient_u64, ApiResponse};

/// Proxy IP version as the API numbers it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ProxyVersion {
    Ipv4,
    Ipv4Shared,
    #[default]
    Ipv6,
}

impl ProxyVersion {
    pub fn code(self) -> u8 {
        match self {
            ProxyVersion::Ipv4 => 4,
            ProxyVersion::Ipv4Shared => 3,
            ProxyVersion::Ipv6 => 6,
        }
    }
}

impl From<ProxyVersion> for ParamValue {
    fn from(v: ProxyVersion) -> Self {
        ParamValue::Scalar(Scalar::from(v.code()))
    }
}

/// Proxy protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ProxyType {
    /// HTTP(S)
    #[default]
    Http,
    /// SOCKS5
    Socks,
}

impl ProxyType {
    pub fn as_str(self) -> &'static str {
        match self {
            ProxyType::Http => "http",
            ProxyType::Socks => "socks",
        }
    }
}

impl From<ProxyType> for ParamValue {
    fn from(v: ProxyType) -> Self {
        ParamValue::from(v.as_str())
    }
}

/// Filter for the proxy listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ProxyState {
    Active,
    Expired,
    Expiring,
    #[default]
    All,
}

impl ProxyState {
    pub fn as_str(self) -> &'static str {
        match self {
            ProxyState::Active => "active",
            ProxyState::Expired => "expired",
            ProxyState::Expiring => "expiring",
            ProxyState::All => "all",
        }
    }
}

impl From<ProxyState> for ParamValue {
    fn from(v: ProxyState) -> Self {
        ParamValue::from(v.as_str())
    }
}

/// One proxy as returned by `getproxy` and `buy`.
///
/// The API sends most numbers as strings, so every field is decoded
/// leniently and missing fields fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProxyRecord {
    #[serde(deserialize_with = "de_u64")]
    pub id: u64,
    #[serde(default, deserialize_with = "de_string")]
    pub ip: String,
    #[serde(default, deserialize_with = "de_string")]
    pub host: String,
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub port: Option<u64>,
    #[serde(default, deserialize_with = "de_string")]
    pub user: String,
    #[serde(default, deserialize_with = "de_string")]
    pub pass: String,
    #[serde(default, rename = "type", deserialize_with = "de_string")]
    pub proxy_type: String,
    #[serde(default, deserialize_with = "de_string")]
    pub country: String,
    #[serde(default, deserialize_with = "de_string")]
    pub date: String,
    #[serde(default, deserialize_with = "de_string")]
    pub date_end: String,
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub unixtime: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub unixtime_end: Option<u64>,
    #[serde(default, deserialize_with = "de_string")]
    pub descr: String,
    #[serde(default, deserialize_with = "de_flag")]
    pub active: bool,
}

impl ProxyRecord {
    /// `host:port:user:pass`, the form the validity check accepts.
    pub fn proxy_string(&self) -> String {
        let port = self.port.map(|p| p.to_string()).unwrap_or_default();
        format!("{}:{}:{}:{}", self.host, port, self.user, self.pass)
    }
}

/// Result of a purchase.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PurchaseOrder {
    pub count: Option<u64>,
    pub price: Option<f64>,
    pub period: Option<u64>,
    pub country: Option<String>,
    pub proxies: Vec<ProxyRecord>,
}

impl PurchaseOrder {
    pub(crate) fn from_response(response: &ApiResponse) -> Result<Self> {
        Ok(PurchaseOrder {
            count: response.get("count").and_then(lenient_u64),
            price: response.get("price").and_then(lenient_f64),
            period: response.get("period").and_then(lenient_u64),
            country: response
                .get("country")
                .and_then(Value::as_str)
                .map(str::to_string),
            proxies: proxy_records(response, "list")?,
        })
    }
}

/// Account summary returned by the status endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountInfo {
    pub user_id: Option<String>,
    pub balance: Option<f64>,
    pub currency: Option<String>,
    /// The whole decoded body, status field included.
    pub raw: Value,
}

impl AccountInfo {
    pub fn from_response(response: ApiResponse) -> Self {
        let user_id = response.get("user_id").and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });
        let balance = response.get("balance").and_then(lenient_f64);
        let currency = response
            .get("currency")
            .and_then(Value::as_str)
            .map(str::to_string);
        AccountInfo {
            user_id,
            balance,
            currency,
            raw: response.into_value(),
        }
    }
}

/// Decode the proxy records held in `field`, sorted by id.
///
/// The API sends an object keyed by id, or `[]` when there is nothing.
pub(crate) fn proxy_records(response: &ApiResponse, field: &str) -> Result<Vec<ProxyRecord>> {
    let items: Vec<&Value> = match response.require(field)? {
        Value::Object(map) => map.values().collect(),
        Value::Array(items) => items.iter().collect(),
        other => {
            return Err(Error::malformed(
                response.operation(),
                format!("field `{field}` is not a proxy list: {other}"),
            ))
        }
    };

    let mut records = items
        .into_iter()
        .map(|item| {
            ProxyRecord::deserialize(item).map_err(|e| {
                Error::malformed(response.operation(), format!("proxy record: {e}"))
            })
        })
        .collect::<Result<Vec<_>>>()?;
    records.sort_by_key(|r| r.id);
    Ok(records)
}

fn de_string<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

fn de_u64<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<u64, D::Error> {
    let value = Value::deserialize(d)?;
    lenient_u64(&value).ok_or_else(|| D::Error::custom(format!("expected an integer, got {value}")))
}

fn de_opt_u64<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<u64>, D::Error> {
    match Value::deserialize(d)? {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        value => lenient_u64(&value)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected an integer, got {value}"))),
    }
}

fn de_flag<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<bool, D::Error> {
    Ok(parse_flag(&Value::deserialize(d)?).unwrap_or(false))
}

/// `true`, `1`, `"1"` and `"true"` (and their negatives) as a boolean.
pub(crate) fn parse_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_u64().and_then(|n| match n {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        }),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
