//! JSON output

use serde_json::Value;
use std::io::{self, Write};

/// Recursively drop null object members. Nulls inside arrays are kept so
/// positions stay meaningful.
pub fn prune_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, prune_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(prune_nulls).collect()),
        other => other,
    }
}

/// Pretty-print `value` followed by a newline
pub fn write_json<W: Write>(writer: &mut W, value: &Value, omit_null: bool) -> io::Result<()> {
    let rendered = if omit_null {
        serde_json::to_string_pretty(&prune_nulls(value.clone()))
    } else {
        serde_json::to_string_pretty(value)
    }
    .map_err(io::Error::other)?;
    writeln!(writer, "{}", rendered)
}
