//! Document command handlers

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use jsonvault_core::{Config, DocumentStore};

use crate::output::Output;

fn open(config: &Config, name: &str) -> Result<DocumentStore> {
    debug!("Opening document '{}'", name);
    DocumentStore::open(config.store_config(name).auto_create(false))
        .with_context(|| format!("Failed to open document '{}'", name))
}

/// Print a document
pub fn read(config: &Config, name: &str, output: &Output) -> Result<()> {
    let doc = open(config, name)?.read(None)?;
    output.print_value(&doc);
    Ok(())
}

/// Replace a document
pub fn write(config: &Config, name: &str, raw: &str, output: &Output) -> Result<()> {
    let value = super::parse_value(raw);
    open(config, name)?.write(&value, true)?;
    output.success(&format!("Wrote '{}'", name));
    Ok(())
}

/// Delete a document, backing it up unless told not to
pub fn delete(config: &Config, name: &str, no_backup: bool, output: &Output) -> Result<()> {
    if open(config, name)?.delete(!no_backup)? {
        output.success(&format!("Deleted '{}'", name));
    } else {
        output.message(&format!("Document '{}' does not exist", name));
    }
    Ok(())
}

/// Print the document size in bytes
pub fn size(config: &Config, name: &str, output: &Output) -> Result<()> {
    output.print_count("bytes", open(config, name)?.size());
    Ok(())
}

/// Gzip a document beside itself (or to `out`)
pub fn compress(config: &Config, name: &str, out: Option<PathBuf>, output: &Output) -> Result<()> {
    let path = open(config, name)?.compress(out.as_deref())?;
    output.print_path("compressed", &path);
    Ok(())
}

/// Restore a document from a gzip file
pub fn decompress(config: &Config, name: &str, from: PathBuf, output: &Output) -> Result<()> {
    open(config, name)?.decompress(&from)?;
    output.success(&format!("Restored '{}' from {}", name, from.display()));
    Ok(())
}

/// List a document's backups, newest first
pub fn backups(config: &Config, name: &str, output: &Output) -> Result<()> {
    let backups: Vec<String> = open(config, name)?
        .backups()?
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    output.print_list(&backups, "backup");
    Ok(())
}
