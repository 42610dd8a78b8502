//! Sequence command handlers

use anyhow::{Context, Result};
use tracing::debug;

use jsonvault_core::{Config, SequenceView};

use crate::output::Output;

fn open(config: &Config, name: &str) -> Result<SequenceView> {
    debug!("Opening list '{}'", name);
    SequenceView::open(config.store_config(name).auto_create(false))
        .with_context(|| format!("Failed to open document '{}'", name))
}

pub fn append(config: &Config, name: &str, raw: &str, output: &Output) -> Result<()> {
    let view = open(config, name)?;
    view.append(super::parse_value(raw))?;
    output.success(&format!("Appended to '{}' ({} item(s))", name, view.len()?));
    Ok(())
}

pub fn get(config: &Config, name: &str, index: usize, output: &Output) -> Result<()> {
    match open(config, name)?.get_at(index)? {
        Some(value) => output.print_value(&value),
        None => output.message(&format!("No item at index {}", index)),
    }
    Ok(())
}

pub fn len(config: &Config, name: &str, output: &Output) -> Result<()> {
    output.print_count("items", open(config, name)?.len()? as u64);
    Ok(())
}

pub fn remove_at(config: &Config, name: &str, index: usize, output: &Output) -> Result<()> {
    match open(config, name)?.remove_at(index)? {
        Some(removed) => output.print_value(&removed),
        None => output.message(&format!("No item at index {}", index)),
    }
    Ok(())
}

pub fn clear(config: &Config, name: &str, output: &Output) -> Result<()> {
    open(config, name)?.clear()?;
    output.success(&format!("Cleared '{}'", name));
    Ok(())
}
