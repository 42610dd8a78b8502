//! Journal command handlers

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

use jsonvault_core::{Config, LogJournal};

use crate::output::Output;

fn open(config: &Config) -> Result<LogJournal> {
    let journal_config = config.journal_config();
    debug!("Opening journal in {:?}", journal_config.directory);
    LogJournal::open(journal_config.clone())
        .with_context(|| format!("Failed to open journal in {:?}", journal_config.directory))
}

/// Parse an RFC 3339 bound such as `2024-05-17T00:00:00Z`
pub fn parse_bound(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .with_context(|| format!("Invalid RFC 3339 time: {}", raw))
}

/// Append one entry
pub fn add(config: &Config, raw: &str, output: &Output) -> Result<()> {
    let entry = super::parse_object(raw)?;
    let path = open(config)?.add_log(entry)?;
    output.print_path("appended to", &path);
    Ok(())
}

/// Print entries, optionally bounded in time and filtered by level
pub fn show(
    config: &Config,
    since: Option<String>,
    until: Option<String>,
    level: Option<String>,
    output: &Output,
) -> Result<()> {
    let since = since.as_deref().map(parse_bound).transpose()?;
    let until = until.as_deref().map(parse_bound).transpose()?;

    let journal = open(config)?;
    let by_level = |entry: &Value| match &level {
        Some(level) => entry.get("level").and_then(Value::as_str) == Some(level.as_str()),
        None => true,
    };
    let entries = journal.get_logs(since, until, Some(&by_level))?;

    output.print_entries(&entries);
    Ok(())
}

/// Delete journal files older than `days` (or the configured retention)
pub fn prune(config: &Config, days: Option<u64>, output: &Output) -> Result<()> {
    let days = days.unwrap_or(config.retention_days);
    let deleted = open(config)?.clear_old_logs(days)?;
    output.print_count("deleted", deleted as u64);
    Ok(())
}
