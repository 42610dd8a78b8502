//! Storage layer
//!
//! Filesystem mechanics underneath `DocumentStore`.
//!
//! ## Layout
//!
//! - **persistence**: atomic JSON write (stage, sync, rename) and load
//! - **backup**: timestamped copies and pruning to a maximum count
//! - **codec**: gzip side files
//! - **lock**: process-wide per-path mutex registry

pub mod backup;
pub mod codec;
pub mod error;
pub mod lock;
pub mod persistence;

pub use error::{StoreError, StoreResult};
pub use lock::PathLock;
