//! Parameter extraction helpers shared by every operator. Required strings
//! must be present and non-empty; booleans accept the common truthy/falsy
//! textual spellings in addition to native JSON booleans.

use flatedit_foundation::FzError;
use serde_json::Value;

pub fn required_string(args: &Value, key: &str) -> Result<String, FzError> {
    let value = args
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| FzError::invalid_request(format!("missing required parameter: {key}")))?;
    if value.is_empty() {
        return Err(FzError::invalid_request(format!(
            "parameter {key} must not be empty"
        )));
    }
    Ok(value)
}

pub fn optional_string(args: &Value, key: &str) -> Option<String> {
    args.get(key).and_then(Value::as_str).map(str::to_string)
}

pub fn optional_string_or_default(args: &Value, key: &str, default: &str) -> String {
    optional_string(args, key).unwrap_or_else(|| default.to_string())
}

/// Coerce a boolean parameter, accepting native JSON booleans and the
/// strings `"true"`/`"false"`, `"yes"`/`"no"`, `"1"`/`"0"` (case-insensitive).
/// Anything else, or a missing key, falls back to `default`.
pub fn coerce_bool(args: &Value, key: &str, default: bool) -> bool {
    match args.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => match s.to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => true,
            "false" | "no" | "0" => false,
            _ => default,
        },
        Some(Value::Number(n)) => n.as_i64().map(|v| v != 0).unwrap_or(default),
        _ => default,
    }
}
