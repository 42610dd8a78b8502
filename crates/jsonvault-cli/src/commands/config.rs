//! Config command handlers

use std::path::Path;

use anyhow::{bail, Context, Result};

use jsonvault_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&Path>, output: &Output) -> Result<()> {
    let config = Config::load_with_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_value(&config)?);
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .map(Path::to_path_buf)
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:             {}", config.data_dir.display());
            println!("  auto_backup:          {}", config.auto_backup);
            println!("  max_backups:          {}", config.max_backups);
            println!("  indent:               {}", config.indent);
            println!("  log_dir:              {}", config.log_dir().display());
            println!("  log_prefix:           {}", config.log_prefix);
            println!("  max_entries_per_file: {}", config.max_entries_per_file);
            println!("  auto_rotate:          {}", config.auto_rotate);
            println!("  retention_days:       {}", config.retention_days);
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(key: String, value: String, config_path: Option<&Path>, output: &Output) -> Result<()> {
    let mut config =
        Config::load_with_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    let saved = config.save(config_path)?;
    output.success(&format!("Set {} = {} ({})", key, value, saved.display()));
    Ok(())
}

/// Apply one `key = value` assignment
fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => config.data_dir = value.into(),
        "log_dir" => {
            config.log_dir = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.into())
            }
        }
        "log_prefix" => config.log_prefix = value.to_string(),
        "auto_backup" => config.auto_backup = parse_bool(value)?,
        "auto_rotate" => config.auto_rotate = parse_bool(value)?,
        "max_backups" => config.max_backups = parse_number(key, value)?,
        "indent" => config.indent = parse_number(key, value)?,
        "max_entries_per_file" => config.max_entries_per_file = parse_number(key, value)?,
        "retention_days" => config.retention_days = parse_number(key, value)?,
        _ => bail!(
            "Unknown config key: {}. Valid keys: data_dir, log_dir, log_prefix, auto_backup, \
             auto_rotate, max_backups, indent, max_entries_per_file, retention_days",
            key
        ),
    }
    Ok(())
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => bail!("Invalid boolean value: {}. Use true/false", value),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    match value.trim().parse() {
        Ok(n) => Ok(n),
        Err(_) => bail!("Invalid number for {}: {}", key, value),
    }
}
