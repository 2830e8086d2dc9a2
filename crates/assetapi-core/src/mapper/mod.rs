//! Per-version wire mappers
//!
//! Each API version owns one request mapper and one response mapper. They are
//! stateless and only know their own version's DTOs, so a new version adds a
//! module here without touching the existing ones.
//!
//! Decoding reads the body as a JSON object and checks each wire field on its
//! own, so a value of the wrong type or outside its domain becomes a
//! field-scoped error named after the version's wire field. Encoding writes exactly the fields of the version's
//! response shape; domain data the shape cannot hold is dropped, and shape
//! fields the domain has no value for are written as `null`.

pub mod v1;
pub mod v2;

use crate::domain::{Asset, AssetStatus, AssetUpdate, Money, RetirementChange};
use crate::error::{DecodeError, FieldError};
use assetapi_openapi::OpenApiSpec;
use chrono::NaiveDate;
use serde_json::{Map, Value};

/// Wire date format for retirement dates
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Decodes a version's request bodies into domain input
pub trait RequestDecoder: Send + Sync {
    /// Decode an update request body
    fn decode_update(&self, body: &[u8]) -> Result<AssetUpdate, DecodeError>;

    /// Component name of the update request schema
    fn update_schema(&self) -> &'static str;

    /// Register the request DTO schemas in a document
    fn register_schemas(&self, spec: OpenApiSpec) -> OpenApiSpec;
}

/// Encodes domain results into a version's response bodies
pub trait ResponseEncoder: Send + Sync {
    /// Encode an asset as this version's response DTO
    fn encode(&self, asset: &Asset) -> Result<serde_json::Value, serde_json::Error>;

    /// Component name of the asset response schema
    fn asset_schema(&self) -> &'static str;

    /// Register the response DTO schemas in a document
    fn register_schemas(&self, spec: OpenApiSpec) -> OpenApiSpec;
}

impl std::fmt::Debug for dyn RequestDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RequestDecoder({})", self.update_schema())
    }
}

impl std::fmt::Debug for dyn ResponseEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ResponseEncoder({})", self.asset_schema())
    }
}

/// Collects field errors so one response reports every bad field
#[derive(Debug, Default)]
pub(crate) struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Keep the value, or record its error
    pub(crate) fn check<T>(&mut self, result: Result<T, FieldError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.0.push(err);
                None
            }
        }
    }

    /// Fail with every recorded error, if any
    pub(crate) fn finish(self) -> Result<(), DecodeError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(DecodeError::Fields(self.0))
        }
    }
}

/// Parse a request body into its top-level fields
///
/// Only bodies that are not JSON, or not a JSON object, fail as a whole.
pub(crate) fn body_fields(body: &[u8]) -> Result<Map<String, Value>, DecodeError> {
    match serde_json::from_slice::<Value>(body)? {
        Value::Object(fields) => Ok(fields),
        other => Err(DecodeError::Body(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn type_error(field: &str, expected: &str, found: &Value) -> FieldError {
    FieldError::new(
        field,
        "type",
        format!("expected {}, got {}", expected, json_kind(found)),
    )
}

/// A field that is absent or `null`
fn present(raw: Option<&Value>) -> Option<&Value> {
    raw.filter(|value| !value.is_null())
}

pub(crate) fn decode_status(field: &str, raw: Option<&Value>) -> Result<AssetStatus, FieldError> {
    let raw = present(raw).ok_or_else(|| FieldError::new(field, "required", "status is required"))?;
    let token = raw
        .as_str()
        .ok_or_else(|| type_error(field, "a status name", raw))?;
    token
        .parse::<AssetStatus>()
        .map_err(|err| FieldError::new(field, "enum", err.to_string()))
}

pub(crate) fn decode_text(field: &str, raw: Option<&Value>) -> Result<Option<String>, FieldError> {
    present(raw)
        .map(|raw| {
            raw.as_str()
                .map(str::to_owned)
                .ok_or_else(|| type_error(field, "a string", raw))
        })
        .transpose()
}

pub(crate) fn decode_money(field: &str, raw: Option<&Value>) -> Result<Option<Money>, FieldError> {
    present(raw)
        .map(|raw| {
            let amount = raw
                .as_f64()
                .ok_or_else(|| type_error(field, "a number", raw))?;
            Money::new(amount).map_err(|err| FieldError::new(field, "range", err.to_string()))
        })
        .transpose()
}

pub(crate) fn decode_date(field: &str, raw: &Value) -> Result<NaiveDate, FieldError> {
    let text = raw
        .as_str()
        .ok_or_else(|| type_error(field, "a date string", raw))?;
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| {
        FieldError::new(
            field,
            "date",
            format!("expected a date formatted YYYY-MM-DD, got {:?}", text),
        )
    })
}

/// Absent keeps the stored date, `null` clears it
pub(crate) fn decode_retirement(
    field: &str,
    raw: Option<&Value>,
) -> Result<RetirementChange, FieldError> {
    match raw {
        None => Ok(RetirementChange::Keep),
        Some(Value::Null) => Ok(RetirementChange::Clear),
        Some(raw) => decode_date(field, raw).map(RetirementChange::Set),
    }
}
