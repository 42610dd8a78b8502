//! Document store
//!
//! A `DocumentStore` owns one JSON file. Reads and writes go through the
//! per-path lock, writes are atomic (stage + rename) and optionally preceded
//! by a timestamped backup.
//!
//! ## Usage
//!
//! ```ignore
//! let store = DocumentStore::open(StoreConfig::new("data/users.json").max_backups(3))?;
//!
//! store.write(&json!({"users": []}), true)?;
//! store.update(|mut doc| {
//!     doc["users"].as_array_mut().map(|u| u.push(json!("ada")));
//!     doc
//! })?;
//! ```
//!
//! ## States
//!
//! A store's file is either absent or holds a complete committed document.
//! `write`, `update` and auto-create move it to present; `delete` moves it
//! to absent. Nothing in between is ever visible on disk.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::storage::{backup, codec, persistence, PathLock, StoreError, StoreResult};

/// Predicate run against a document before `write` commits it
pub type Validator = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Construction-time configuration for a single store
#[derive(Clone)]
pub struct StoreConfig {
    /// Path of the document file
    pub path: PathBuf,
    /// Write an empty object at construction if the file is absent
    pub auto_create: bool,
    /// Back up the current file before every write
    pub auto_backup: bool,
    /// Number of backups kept; older ones are pruned after each backup
    pub max_backups: usize,
    /// Pretty-print indent width, `None` for compact output
    pub indent: Option<usize>,
    /// Text encoding label, recorded but not enforced (documents are UTF-8)
    pub encoding: String,
    /// Optional gate evaluated by `write`
    pub validator: Option<Validator>,
}

impl StoreConfig {
    /// Configuration with defaults for the document at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            auto_create: true,
            auto_backup: true,
            max_backups: 5,
            indent: Some(2),
            encoding: "utf-8".to_string(),
            validator: None,
        }
    }

    pub fn auto_create(mut self, auto_create: bool) -> Self {
        self.auto_create = auto_create;
        self
    }

    pub fn auto_backup(mut self, auto_backup: bool) -> Self {
        self.auto_backup = auto_backup;
        self
    }

    pub fn max_backups(mut self, max_backups: usize) -> Self {
        self.max_backups = max_backups;
        self
    }

    pub fn indent(mut self, indent: Option<usize>) -> Self {
        self.indent = indent;
        self
    }

    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Reject writes of documents for which `validator` returns false
    pub fn validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("path", &self.path)
            .field("auto_create", &self.auto_create)
            .field("auto_backup", &self.auto_backup)
            .field("max_backups", &self.max_backups)
            .field("indent", &self.indent)
            .field("encoding", &self.encoding)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// Atomic, lock-guarded access to one JSON document file
#[derive(Clone, Debug)]
pub struct DocumentStore {
    config: Arc<StoreConfig>,
    lock: PathLock,
}

impl DocumentStore {
    /// Open a store with default configuration
    pub fn new(path: impl Into<PathBuf>) -> StoreResult<Self> {
        Self::open(StoreConfig::new(path))
    }

    /// Open a store, creating parent directories and (if configured) the file
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| StoreError::from_io(e, parent.to_path_buf()))?;
            }
        }

        let store = Self {
            lock: PathLock::for_path(&config.path),
            config: Arc::new(config),
        };

        if store.config.auto_create {
            let _guard = store.lock.lock();
            if !store.config.path.exists() {
                debug!("Creating empty document at {:?}", store.config.path);
                persistence::atomic_write(
                    &store.config.path,
                    &Value::Object(Map::new()),
                    store.config.indent,
                )?;
            }
        }

        Ok(store)
    }

    /// Get the configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Path of the document file
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Read the document
    ///
    /// If the file is absent, returns `default` when one is given (including
    /// `Some(Value::Null)`), otherwise fails with `NotFound`.
    pub fn read(&self, default: Option<Value>) -> StoreResult<Value> {
        let _guard = self.lock.lock();
        self.read_locked(default)
    }

    /// Write the document atomically
    ///
    /// With `validate` set, the configured validator must accept `data` or
    /// the call fails with `ValidationFailed` and nothing on disk changes.
    pub fn write(&self, data: &Value, validate: bool) -> StoreResult<()> {
        if validate {
            if let Some(validator) = &self.config.validator {
                if !validator(data) {
                    return Err(StoreError::ValidationFailed {
                        path: self.config.path.clone(),
                    });
                }
            }
        }

        let _guard = self.lock.lock();
        self.write_locked(data)
    }

    /// Read, transform and write back under one lock
    ///
    /// An absent file reads as an empty object. The validator is not run;
    /// views built on `update` enforce their own shape. Returns the new
    /// document.
    pub fn update<F>(&self, transform: F) -> StoreResult<Value>
    where
        F: FnOnce(Value) -> Value,
    {
        let _guard = self.lock.lock();
        let current = self.read_locked(Some(Value::Object(Map::new())))?;
        let next = transform(current);
        self.write_locked(&next)?;
        Ok(next)
    }

    /// Delete the document file
    ///
    /// Returns `false` if there was nothing to delete.
    pub fn delete(&self, with_backup: bool) -> StoreResult<bool> {
        let _guard = self.lock.lock();
        if !self.config.path.exists() {
            return Ok(false);
        }

        if with_backup {
            backup::create(&self.config.path, self.config.max_backups)?;
        }

        fs::remove_file(&self.config.path)
            .map_err(|e| StoreError::from_io(e, self.config.path.clone()))?;
        debug!("Deleted {:?}", self.config.path);
        Ok(true)
    }

    /// Check if the document exists on disk
    pub fn exists(&self) -> bool {
        self.config.path.exists()
    }

    /// Size of the document file in bytes, 0 if absent
    pub fn size(&self) -> u64 {
        fs::metadata(&self.config.path)
            .map(|m| m.len())
            .unwrap_or(0)
    }

    /// Take a backup now, regardless of `auto_backup`
    ///
    /// Returns `None` if the document does not exist.
    pub fn create_backup(&self) -> StoreResult<Option<PathBuf>> {
        let _guard = self.lock.lock();
        backup::create(&self.config.path, self.config.max_backups)
    }

    /// Prune backups beyond `max_backups`, returning how many were removed
    pub fn prune_backups(&self) -> StoreResult<usize> {
        let _guard = self.lock.lock();
        backup::prune(&self.config.path, self.config.max_backups)
    }

    /// This store's backups, newest first
    pub fn backups(&self) -> StoreResult<Vec<PathBuf>> {
        backup::list(&self.config.path)
    }

    /// Gzip the document to `output`, or to `<file>.gz` beside it
    pub fn compress(&self, output: Option<&Path>) -> StoreResult<PathBuf> {
        let output = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| codec::default_output(&self.config.path));
        let _guard = self.lock.lock();
        codec::compress(&self.config.path, &output)?;
        debug!("Compressed {:?} to {:?}", self.config.path, output);
        Ok(output)
    }

    /// Replace the document with the inflated contents of `from`
    ///
    /// The inflated bytes must parse as JSON; otherwise the call fails with
    /// `Corrupt` and the current document is kept.
    pub fn decompress(&self, from: &Path) -> StoreResult<()> {
        let _guard = self.lock.lock();
        let staged = codec::decompress_staged(from, &self.config.path)?;

        if let Err(err) = persistence::load(&staged) {
            persistence::discard(&staged);
            return Err(match err {
                StoreError::Corrupt { source, .. } => StoreError::Corrupt {
                    path: from.to_path_buf(),
                    source,
                },
                other => other,
            });
        }

        if let Err(source) = fs::rename(&staged, &self.config.path) {
            persistence::discard(&staged);
            return Err(StoreError::IoFailed {
                path: self.config.path.clone(),
                source,
            });
        }

        debug!("Decompressed {:?} into {:?}", from, self.config.path);
        Ok(())
    }

    fn read_locked(&self, default: Option<Value>) -> StoreResult<Value> {
        match persistence::load(&self.config.path)? {
            Some(value) => Ok(value),
            None => default.ok_or_else(|| StoreError::NotFound {
                path: self.config.path.clone(),
            }),
        }
    }

    fn write_locked(&self, data: &Value) -> StoreResult<()> {
        if self.config.auto_backup {
            backup::create(&self.config.path, self.config.max_backups)?;
        }
        persistence::atomic_write(&self.config.path, data, self.config.indent)
    }
}
