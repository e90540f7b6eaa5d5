use log::{trace, warn};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{ApiFailure, Error, Result};

/// Value of the `status` field on success.
pub const STATUS_SUCCESS: &str = "yes";

/// A decoded body whose status discriminator was the success sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    operation: String,
    fields: Map<String, Value>,
}

impl ApiResponse {
    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// Required payload field; a missing one means the body is malformed.
    pub fn require(&self, field: &str) -> Result<&Value> {
        self.fields
            .get(field)
            .ok_or_else(|| Error::malformed(&self.operation, format!("missing field `{field}`")))
    }

    /// Required payload field decoded into `T`.
    pub fn field<T: DeserializeOwned>(&self, field: &str) -> Result<T> {
        let value = self.require(field)?;
        T::deserialize(value).map_err(|e| {
            Error::malformed(&self.operation, format!("field `{field}`: {e}"))
        })
    }

    /// Numeric field that may arrive as a JSON number or a numeric string.
    pub fn number(&self, field: &str) -> Result<f64> {
        let value = self.require(field)?;
        lenient_f64(value).ok_or_else(|| {
            Error::malformed(&self.operation, format!("field `{field}` is not a number: {value}"))
        })
    }

    /// Non-negative integer field, number or numeric string.
    pub fn count(&self, field: &str) -> Result<u64> {
        let value = self.require(field)?;
        lenient_u64(value).ok_or_else(|| {
            Error::malformed(
                &self.operation,
                format!("field `{field}` is not a non-negative integer: {value}"),
            )
        })
    }
}

/// Classify a raw body for `operation`.
///
/// Bodies that are not JSON objects are malformed. Objects whose `status` is
/// anything but [`STATUS_SUCCESS`] are API failures.
pub fn decode_response(operation: &str, body: &str) -> Result<ApiResponse> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| Error::malformed(operation, format!("invalid JSON: {e}")))?;

    let fields = match value {
        Value::Object(fields) => fields,
        other => {
            return Err(Error::malformed(
                operation,
                format!("expected a JSON object, got {}", json_type(&other)),
            ))
        }
    };

    if fields.get("status").and_then(Value::as_str) != Some(STATUS_SUCCESS) {
        let failure = ApiFailure::from_payload(Value::Object(fields));
        warn!("{operation}: API reported failure: {failure}");
        return Err(Error::Api {
            operation: operation.to_string(),
            failure,
        });
    }

    trace!("{operation}: {} response fields", fields.len());
    Ok(ApiResponse {
        operation: operation.to_string(),
        fields,
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub(crate) fn lenient_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn lenient_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
