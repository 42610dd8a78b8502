//! jsonvault Core Library
//!
//! Local, file-backed JSON documents with atomic writes, bounded backups and
//! gzip side files, plus a rotating append-only log journal built on top.
//!
//! # Architecture
//!
//! - **DocumentStore**: one JSON file, read/write/update under a per-path lock
//! - **KeyedView / SequenceView**: object- and array-shaped projections that
//!   express every mutation as a single `update`
//! - **LogJournal**: date-partitioned, size-rotated log files of JSON entries
//!
//! # Quick Start
//!
//! ```text
//! let settings = KeyedView::open(StoreConfig::new("data/settings.json"))?;
//! settings.set("theme", json!("dark"))?;
//!
//! let mut journal = LogJournal::open(JournalConfig::new("data/logs"))?;
//! journal.add_log(entry)?;
//! let errors = journal.get_logs(None, None, Some(&|e| e["level"] == "error"))?;
//! ```
//!
//! # Modules
//!
//! - `store`: DocumentStore and its configuration (main entry point)
//! - `keyed`: mapping view
//! - `sequence`: array view
//! - `journal`: rotating log journal
//! - `storage`: atomic persistence, backups, gzip, path locks, errors
//! - `config`: application configuration

pub mod config;
pub mod journal;
pub mod keyed;
pub mod sequence;
pub mod storage;
pub mod store;

pub use config::Config;
pub use journal::{JournalConfig, LogEntry, LogJournal};
pub use keyed::KeyedView;
pub use sequence::SequenceView;
pub use storage::{StoreError, StoreResult};
pub use store::{DocumentStore, StoreConfig, Validator};
