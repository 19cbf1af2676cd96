//! Attribute Accessor
//!
//! Total functions from an untyped attribute value to a concrete type.
//! An absent key and a value of the wrong type read the same way: as the
//! zero value. Sparse fieldsets make absence the common case.

use serde_json::{Map, Number, Value};

/// A resource's `attributes` member
pub type Attributes = Map<String, Value>;

/// Raw value for `key`, treating JSON null as absent
pub fn any_attr<'a>(attrs: &'a Attributes, key: &str) -> Option<&'a Value> {
    attrs.get(key).filter(|value| !value.is_null())
}

/// String value, or `""`. Numbers and booleans are not stringified.
pub fn string_attr(attrs: &Attributes, key: &str) -> String {
    match any_attr(attrs, key) {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

pub fn bool_attr(attrs: &Attributes, key: &str) -> bool {
    matches!(any_attr(attrs, key), Some(Value::Bool(true)))
}

/// Integer value from a JSON number or numeric string. Fractional values
/// truncate toward zero; anything else reads as `0`.
pub fn int_attr(attrs: &Attributes, key: &str) -> i64 {
    match any_attr(attrs, key) {
        Some(Value::Number(n)) => number_to_int(n),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(truncate))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

fn number_to_int(n: &Number) -> i64 {
    n.as_i64()
        .or_else(|| n.as_f64().map(truncate))
        .unwrap_or(0)
}

fn truncate(value: f64) -> i64 {
    if value.is_finite() {
        value.trunc() as i64
    } else {
        0
    }
}

/// Float value from a JSON number or numeric string, else `0.0`
pub fn float_attr(attrs: &Attributes, key: &str) -> f64 {
    match any_attr(attrs, key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Array of strings, or empty when absent or when any element is not a string
pub fn string_slice_attr(attrs: &Attributes, key: &str) -> Vec<String> {
    let Some(Value::Array(items)) = any_attr(attrs, key) else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default()
}

/// Number rendered in shortest form; numeric strings are trimmed, other
/// values JSON-encoded, absent values empty
pub fn number_attr_as_string(attrs: &Attributes, key: &str) -> String {
    match any_attr(attrs, key) {
        None => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => format_number(n),
        Some(other) => other.to_string(),
    }
}

pub fn format_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    format_float(n.as_f64().unwrap_or(0.0))
}

/// Shortest decimal form: `3`, `1.5`, `0.125`
pub fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

pub fn format_bool(value: bool) -> String {
    let text = if value { "yes" } else { "no" };
    text.to_string()
}

pub fn format_optional(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        "(none)".to_string()
    } else {
        value.to_string()
    }
}

/// `name (id)`, or whichever of the two is present
pub fn format_related(name: &str, id: &str) -> String {
    match (name.is_empty(), id.is_empty()) {
        (true, _) => id.to_string(),
        (false, true) => name.to_string(),
        (false, false) => format!("{} ({})", name, id),
    }
}

/// Display text for any attribute value. Shared by typed rows and sparse
/// output so both render a field identically.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => format_number(n),
        Value::Bool(b) => format_bool(*b),
        Value::Array(items) if items.iter().all(is_scalar) => items
            .iter()
            .map(display_value)
            .filter(|item| !item.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}
