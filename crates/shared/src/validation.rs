//! Common validation utilities.

use serde_json::{Map, Value};
use validator::ValidationError;

lazy_static::lazy_static! {
    /// `#RRGGBB` colour code.
    pub static ref HEX_COLOR_REGEX: regex::Regex =
        regex::Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap();
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Validates a `#RRGGBB` colour code.
pub fn validate_hex_color(value: &str) -> Result<(), ValidationError> {
    if HEX_COLOR_REGEX.is_match(value) {
        Ok(())
    } else {
        Err(error("hex_color", "Colour must be a hex code like #1A2B3C"))
    }
}

/// Rejects strings that are empty once surrounding whitespace is removed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("blank", "Value must not be blank"))
    } else {
        Ok(())
    }
}

/// Normalizes free-form structured data into a JSON object.
///
/// - objects are kept as-is
/// - absent, `null` and blank strings become `{}`
/// - other strings are parsed and must contain an object
/// - every other JSON value is rejected
pub fn normalize_json_object(value: Option<Value>) -> Result<Value, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(Value::Object(Map::new())),
        Some(Value::Object(map)) => Ok(Value::Object(map)),
        Some(Value::String(raw)) if raw.trim().is_empty() => Ok(Value::Object(Map::new())),
        Some(Value::String(raw)) => match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(Value::Object(map)),
            Ok(_) => Err(error("json_object", "Value must be a JSON object")),
            Err(_) => Err(error("json_syntax", "Value is not valid JSON")),
        },
        Some(_) => Err(error("json_object", "Value must be a JSON object")),
    }
}

/// Like [`normalize_json_object`], but absent, `null` and blank input stay
/// empty instead of becoming `{}`.
pub fn normalize_optional_json_object(
    value: Option<Value>,
) -> Result<Option<Value>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) if raw.trim().is_empty() => Ok(None),
        other => normalize_json_object(other).map(Some),
    }
}
