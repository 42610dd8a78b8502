//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/jsonvault/config.toml)
//! 3. Environment variables (JSONVAULT_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::journal::JournalConfig;
use crate::store::StoreConfig;

/// Environment variable prefix
const ENV_PREFIX: &str = "JSONVAULT";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding named documents
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Back up documents before each write
    #[serde(default = "default_true")]
    pub auto_backup: bool,

    /// Backups kept per document
    #[serde(default = "default_max_backups")]
    pub max_backups: usize,

    /// Pretty-print indent width, 0 for compact output
    #[serde(default = "default_indent")]
    pub indent: usize,

    /// Directory for journal files (defaults to `<data_dir>/logs`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    /// Journal file prefix
    #[serde(default = "default_log_prefix")]
    pub log_prefix: String,

    /// Entries per journal file before rotating
    #[serde(default = "default_max_entries")]
    pub max_entries_per_file: usize,

    /// Rotate journal files when full
    #[serde(default = "default_true")]
    pub auto_rotate: bool,

    /// Age in days after which `log prune` removes journal files
    #[serde(default = "default_retention_days")]
    pub retention_days: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            auto_backup: true,
            max_backups: default_max_backups(),
            indent: default_indent(),
            log_dir: None,
            log_prefix: default_log_prefix(),
            max_entries_per_file: default_max_entries(),
            auto_rotate: true,
            retention_days: default_retention_days(),
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (JSONVAULT_DATA_DIR, JSONVAULT_MAX_BACKUPS, ...)
    /// 2. Config file (~/.config/jsonvault/config.toml or JSONVAULT_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load from `path` if given, otherwise from the default location
    pub fn load_with_override(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    ///
    /// Unparseable numeric values are ignored.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var(format!("{}_AUTO_BACKUP", ENV_PREFIX)) {
            self.auto_backup = val.eq_ignore_ascii_case("true") || val == "1";
        }

        if let Some(n) = env_number(&format!("{}_MAX_BACKUPS", ENV_PREFIX)) {
            self.max_backups = n;
        }

        if let Ok(val) = std::env::var(format!("{}_LOG_PREFIX", ENV_PREFIX)) {
            if !val.is_empty() {
                self.log_prefix = val;
            }
        }

        if let Some(n) = env_number(&format!("{}_MAX_ENTRIES", ENV_PREFIX)) {
            self.max_entries_per_file = n;
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to `path`, or the default config file
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::config_file_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(config_path)
    }

    /// Get the config file path
    ///
    /// Can be overridden with JSONVAULT_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("jsonvault")
            .join("config.toml")
    }

    /// Path of the named document
    pub fn document_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", name))
    }

    /// Journal directory
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("logs"))
    }

    /// Store configuration for the named document
    pub fn store_config(&self, name: &str) -> StoreConfig {
        StoreConfig::new(self.document_path(name))
            .auto_backup(self.auto_backup)
            .max_backups(self.max_backups)
            .indent(self.indent_width())
    }

    /// Journal configuration
    pub fn journal_config(&self) -> JournalConfig {
        JournalConfig::new(self.log_dir())
            .prefix(self.log_prefix.clone())
            .max_entries_per_file(self.max_entries_per_file)
            .auto_rotate(self.auto_rotate)
            .indent(self.indent_width())
    }

    fn indent_width(&self) -> Option<usize> {
        (self.indent > 0).then_some(self.indent)
    }
}

fn env_number(name: &str) -> Option<usize> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("jsonvault")
}

fn default_true() -> bool {
    true
}

fn default_max_backups() -> usize {
    5
}

fn default_indent() -> usize {
    2
}

fn default_log_prefix() -> String {
    "log".to_string()
}

fn default_max_entries() -> usize {
    1000
}

fn default_retention_days() -> u64 {
    30
}
