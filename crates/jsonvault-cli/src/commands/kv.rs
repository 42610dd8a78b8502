//! Key/value command handlers

use anyhow::{Context, Result};
use tracing::debug;

use jsonvault_core::{Config, KeyedView};

use crate::output::Output;

fn open(config: &Config, name: &str) -> Result<KeyedView> {
    debug!("Opening mapping '{}'", name);
    KeyedView::open(config.store_config(name).auto_create(false))
        .with_context(|| format!("Failed to open document '{}'", name))
}

/// Print one key's value
pub fn get(config: &Config, name: &str, key: &str, output: &Output) -> Result<()> {
    match open(config, name)?.get(key)? {
        Some(value) => output.print_value(&value),
        None => output.message(&format!("Key '{}' not found", key)),
    }
    Ok(())
}

pub fn set(config: &Config, name: &str, key: &str, raw: &str, output: &Output) -> Result<()> {
    open(config, name)?.set(key, super::parse_value(raw))?;
    output.success(&format!("Set '{}'", key));
    Ok(())
}

pub fn delete(config: &Config, name: &str, key: &str, output: &Output) -> Result<()> {
    open(config, name)?.delete_key(key)?;
    output.success(&format!("Deleted '{}'", key));
    Ok(())
}

pub fn keys(config: &Config, name: &str, output: &Output) -> Result<()> {
    output.print_list(&open(config, name)?.keys()?, "key");
    Ok(())
}

/// Merge a JSON object into the document
pub fn merge(
    config: &Config,
    name: &str,
    raw: &str,
    keep_existing: bool,
    output: &Output,
) -> Result<()> {
    let other = super::parse_object(raw)?;
    let count = other.len();
    open(config, name)?.merge(other, !keep_existing)?;
    output.success(&format!("Merged {} key(s) into '{}'", count, name));
    Ok(())
}
