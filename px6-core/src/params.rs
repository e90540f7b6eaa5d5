//! Request parameters and their wire form.
//!
//! Callers describe a request as [`Params`], a map from parameter name to a
//! [`ParamValue`]. [`normalize`] turns it into [`WireParams`], the string map
//! sent as the query string:
//!
//! - absent values are dropped
//! - `true` becomes `"1"`, `false` is dropped (flags are opt-in only)
//! - sequences are comma-joined with no whitespace (`[1, 2, 5]` → `"1,2,5"`)
//! - scalars use their `Display` form
//!
//! An empty sequence is still sent, as an empty string.

use std::collections::BTreeMap;
use std::fmt;

/// A single scalar parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Str(v) => f.write_str(v),
        }
    }
}

macro_rules! int_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Scalar {
                fn from(v: $t) -> Self {
                    Scalar::Int(i64::from(v))
                }
            }
        )*
    };
}

int_scalar!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Scalar {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(v) => Scalar::Int(v),
            // out of range for i64, keep the exact digits
            Err(_) => Scalar::Str(v.to_string()),
        }
    }
}

impl From<f32> for Scalar {
    fn from(v: f32) -> Self {
        Scalar::Float(f64::from(v))
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Str(v)
    }
}

impl From<&String> for Scalar {
    fn from(v: &String) -> Self {
        Scalar::Str(v.clone())
    }
}

/// Value of one request parameter before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Absent,
    Bool(bool),
    Scalar(Scalar),
    Seq(Vec<Scalar>),
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

macro_rules! scalar_param {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ParamValue {
                fn from(v: $t) -> Self {
                    ParamValue::Scalar(v.into())
                }
            }
        )*
    };
}

scalar_param!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, &str, String, &String);

impl From<Scalar> for ParamValue {
    fn from(v: Scalar) -> Self {
        ParamValue::Scalar(v)
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for ParamValue {
    fn from(v: Vec<T>) -> Self {
        ParamValue::Seq(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Scalar> + Clone> From<&[T]> for ParamValue {
    fn from(v: &[T]) -> Self {
        ParamValue::Seq(v.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<Scalar>, const N: usize> From<[T; N]> for ParamValue {
    fn from(v: [T; N]) -> Self {
        ParamValue::Seq(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(ParamValue::Absent, Into::into)
    }
}

/// Raw request parameters, keyed by wire name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: BTreeMap<String, ParamValue>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Params::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Normalized parameters, ready to be sent as a query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireParams {
    entries: BTreeMap<String, String>,
}

impl WireParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Query pairs in the shape transports take.
    pub fn as_query(&self) -> Vec<(&str, String)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.clone()))
            .collect()
    }

    /// Unencoded `key=value&...` rendering, sorted by key.
    pub fn to_query_string(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Normalize raw parameters into their wire form. Never fails and never
/// mutates the input.
pub fn normalize(params: &Params) -> WireParams {
    let entries = params
        .entries
        .iter()
        .filter_map(|(key, value)| wire_value(value).map(|v| (key.clone(), v)))
        .collect();
    WireParams { entries }
}

fn wire_value(value: &ParamValue) -> Option<String> {
    match value {
        ParamValue::Absent => None,
        ParamValue::Bool(true) => Some("1".to_string()),
        ParamValue::Bool(false) => None,
        ParamValue::Seq(items) => Some(
            items
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(","),
        ),
        ParamValue::Scalar(scalar) => Some(scalar.to_string()),
    }
}
