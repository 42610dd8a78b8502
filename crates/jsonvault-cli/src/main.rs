//! jsonvault CLI
//!
//! Command-line interface for jsonvault - file-backed JSON documents and logs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jsonvault_core::Config;

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "jsonvault")]
#[command(about = "jsonvault - atomic JSON documents and rotating logs on local disk")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config file (defaults to ~/.config/jsonvault/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Whole-document operations
    Doc {
        #[command(subcommand)]
        command: DocCommands,
    },
    /// Key/value operations on an object document
    Kv {
        #[command(subcommand)]
        command: KvCommands,
    },
    /// Operations on an array document
    List {
        #[command(subcommand)]
        command: ListCommands,
    },
    /// Append and query the log journal
    Log {
        #[command(subcommand)]
        command: LogCommands,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum DocCommands {
    /// Print a document
    Read { name: String },
    /// Replace a document with a JSON value
    Write { name: String, value: String },
    /// Delete a document
    #[command(alias = "rm")]
    Delete {
        name: String,
        /// Skip the backup taken before deleting
        #[arg(long)]
        no_backup: bool,
    },
    /// Print the document size in bytes
    Size { name: String },
    /// Gzip a document
    Compress {
        name: String,
        /// Output path (defaults to <file>.gz)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Restore a document from a gzip file
    Decompress { name: String, from: PathBuf },
    /// List backups, newest first
    Backups { name: String },
}

#[derive(Subcommand)]
enum KvCommands {
    /// Print the value of a key
    Get { name: String, key: String },
    /// Set a key to a JSON value (bare words are stored as strings)
    Set {
        name: String,
        key: String,
        value: String,
    },
    /// Delete a key
    #[command(alias = "rm")]
    Del { name: String, key: String },
    /// List keys
    Keys { name: String },
    /// Merge a JSON object into the document
    Merge {
        name: String,
        object: String,
        /// Keep existing values for keys present in both
        #[arg(long)]
        keep_existing: bool,
    },
}

#[derive(Subcommand)]
enum ListCommands {
    /// Append a JSON value
    Append { name: String, value: String },
    /// Print the item at an index
    Get { name: String, index: usize },
    /// Print the number of items
    Len { name: String },
    /// Remove the item at an index
    RemoveAt { name: String, index: usize },
    /// Remove every item
    Clear { name: String },
}

#[derive(Subcommand)]
enum LogCommands {
    /// Append a JSON object entry
    Add { entry: String },
    /// Print entries
    #[command(alias = "ls")]
    Show {
        /// Only entries at or after this RFC 3339 time
        #[arg(long)]
        since: Option<String>,
        /// Only entries at or before this RFC 3339 time
        #[arg(long)]
        until: Option<String>,
        /// Only entries whose "level" field equals this
        #[arg(short, long)]
        level: Option<String>,
    },
    /// Delete log files older than N days
    Prune {
        /// Age in days (defaults to retention_days from config)
        #[arg(short, long)]
        days: Option<u64>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, max_backups, log_prefix, ...)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_deref();

    // Config commands load (and may rewrite) the file themselves
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), config_path, &output);
    }

    let config = Config::load_with_override(config_path).context("Failed to load configuration")?;

    match cli.command {
        Commands::Doc { command } => handle_doc_command(command, &config, &output),
        Commands::Kv { command } => handle_kv_command(command, &config, &output),
        Commands::List { command } => handle_list_command(command, &config, &output),
        Commands::Log { command } => handle_log_command(command, &config, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

/// Initialize stderr logging
///
/// The filter comes from JSONVAULT_LOG (e.g. `debug`); without it only
/// warnings are shown.
fn init_logging() {
    let level = std::env::var("JSONVAULT_LOG").unwrap_or_else(|_| "warn".to_string());
    let env_filter = EnvFilter::new(format!("jsonvault_core={},jsonvault_cli={}", level, level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_doc_command(command: DocCommands, config: &Config, output: &Output) -> Result<()> {
    match command {
        DocCommands::Read { name } => commands::doc::read(config, &name, output),
        DocCommands::Write { name, value } => commands::doc::write(config, &name, &value, output),
        DocCommands::Delete { name, no_backup } => {
            commands::doc::delete(config, &name, no_backup, output)
        }
        DocCommands::Size { name } => commands::doc::size(config, &name, output),
        DocCommands::Compress { name, output: out } => {
            commands::doc::compress(config, &name, out, output)
        }
        DocCommands::Decompress { name, from } => {
            commands::doc::decompress(config, &name, from, output)
        }
        DocCommands::Backups { name } => commands::doc::backups(config, &name, output),
    }
}

fn handle_kv_command(command: KvCommands, config: &Config, output: &Output) -> Result<()> {
    match command {
        KvCommands::Get { name, key } => commands::kv::get(config, &name, &key, output),
        KvCommands::Set { name, key, value } => {
            commands::kv::set(config, &name, &key, &value, output)
        }
        KvCommands::Del { name, key } => commands::kv::delete(config, &name, &key, output),
        KvCommands::Keys { name } => commands::kv::keys(config, &name, output),
        KvCommands::Merge {
            name,
            object,
            keep_existing,
        } => commands::kv::merge(config, &name, &object, keep_existing, output),
    }
}

fn handle_list_command(command: ListCommands, config: &Config, output: &Output) -> Result<()> {
    match command {
        ListCommands::Append { name, value } => {
            commands::list::append(config, &name, &value, output)
        }
        ListCommands::Get { name, index } => commands::list::get(config, &name, index, output),
        ListCommands::Len { name } => commands::list::len(config, &name, output),
        ListCommands::RemoveAt { name, index } => {
            commands::list::remove_at(config, &name, index, output)
        }
        ListCommands::Clear { name } => commands::list::clear(config, &name, output),
    }
}

fn handle_log_command(command: LogCommands, config: &Config, output: &Output) -> Result<()> {
    match command {
        LogCommands::Add { entry } => commands::log::add(config, &entry, output),
        LogCommands::Show {
            since,
            until,
            level,
        } => commands::log::show(config, since, until, level, output),
        LogCommands::Prune { days } => commands::log::prune(config, days, output),
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&std::path::Path>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}
