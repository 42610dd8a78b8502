//! Command handlers

pub mod config;
pub mod doc;
pub mod kv;
pub mod list;
pub mod log;

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};

/// Parse a command-line argument as JSON
///
/// Anything that isn't valid JSON is taken as a plain string, so
/// `kv set users name ada` works without quoting.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Parse a command-line argument that must be a JSON object
pub fn parse_object(raw: &str) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(raw).context("Argument is not valid JSON")?;
    match value {
        Value::Object(map) => Ok(map),
        other => bail!("Expected a JSON object, got: {}", other),
    }
}
