//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use std::path::Path;

use serde_json::Value;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a JSON value
    ///
    /// Human mode pretty-prints; JSON and quiet modes print one compact line.
    pub fn print_value(&self, value: &Value) {
        match self.format {
            OutputFormat::Human => println!("{}", render_pretty(value)),
            OutputFormat::Json | OutputFormat::Quiet => println!("{}", value),
        }
    }

    /// Print a list of strings (keys, paths)
    pub fn print_list(&self, items: &[String], noun: &str) {
        match self.format {
            OutputFormat::Human => {
                if items.is_empty() {
                    println!("No {}s found.", noun);
                    return;
                }
                for item in items {
                    println!("{}", item);
                }
                println!("\n{} {}(s)", items.len(), noun);
            }
            OutputFormat::Json => println!("{}", serde_json::json!(items)),
            OutputFormat::Quiet => {
                for item in items {
                    println!("{}", item);
                }
            }
        }
    }

    /// Print log entries, one per line in human mode
    pub fn print_entries(&self, entries: &[Value]) {
        match self.format {
            OutputFormat::Human => {
                if entries.is_empty() {
                    println!("No log entries found.");
                    return;
                }
                for entry in entries {
                    println!("{}", truncate(&entry.to_string(), 120));
                }
                println!("\n{} entr{}", entries.len(), if entries.len() == 1 { "y" } else { "ies" });
            }
            OutputFormat::Json => println!("{}", Value::Array(entries.to_vec())),
            OutputFormat::Quiet => println!("{}", entries.len()),
        }
    }

    /// Print a count with a label
    pub fn print_count(&self, label: &str, count: u64) {
        match self.format {
            OutputFormat::Human => println!("{}: {}", label, count),
            OutputFormat::Json => println!("{}", serde_json::json!({ label: count })),
            OutputFormat::Quiet => println!("{}", count),
        }
    }

    /// Print a path produced by a command
    pub fn print_path(&self, label: &str, path: &Path) {
        match self.format {
            OutputFormat::Human => println!("{}: {}", label, path.display()),
            OutputFormat::Json => println!("{}", serde_json::json!({ label: path })),
            OutputFormat::Quiet => println!("{}", path.display()),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn render_pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
