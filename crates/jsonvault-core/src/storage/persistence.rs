//! JSON document persistence
//!
//! Handles saving and loading JSON documents to/from the filesystem.
//! Uses atomic writes (write to temp file, then rename) to prevent corruption.
//!
//! Files:
//! - `<name>` - The committed document
//! - `<name>.tmp` - Staging file, only present while a write is in flight

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{CompactFormatter, PrettyFormatter};
use serde_json::{Serializer, Value};
use tracing::{debug, warn};

use super::error::{StoreError, StoreResult};

/// Suffix appended to the document's file name while staging a write
pub const TEMP_SUFFIX: &str = ".tmp";

/// Sibling staging path for `path`: the full file name plus `.tmp`
pub fn temp_path(path: &Path) -> PathBuf {
    with_suffix(path, TEMP_SUFFIX)
}

/// Append `suffix` to the file name of `path` (`data.json` -> `data.json.gz`)
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

/// Load a document from disk
///
/// Returns `None` if the file doesn't exist.
/// Returns an error if the file exists but can't be read or parsed.
pub fn load(path: &Path) -> StoreResult<Option<Value>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::from_io(e, path.to_path_buf())),
    };

    let value = serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Some(value))
}

/// Serialize a document with the given indent width
///
/// `None` prints compact JSON. Output is deterministic for a given indent.
pub fn encode<W: Write>(writer: W, value: &Value, indent: Option<usize>) -> io::Result<()> {
    match indent {
        Some(width) => {
            let pad = vec![b' '; width];
            let mut ser = Serializer::with_formatter(writer, PrettyFormatter::with_indent(&pad));
            value.serialize(&mut ser)?;
        }
        None => {
            let mut ser = Serializer::with_formatter(writer, CompactFormatter);
            value.serialize(&mut ser)?;
        }
    }
    Ok(())
}

/// Write a document to a file atomically
///
/// 1. Serialize to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// The rename is the only visible transition. On failure the temp file is
/// removed and the target is left exactly as it was.
pub fn atomic_write(path: &Path, value: &Value, indent: Option<usize>) -> StoreResult<()> {
    let temp_path = temp_path(path);

    if let Err(source) = stage(&temp_path, value, indent) {
        discard(&temp_path);
        return Err(StoreError::WriteFailed {
            path: path.to_path_buf(),
            source,
        });
    }

    if let Err(source) = fs::rename(&temp_path, path) {
        discard(&temp_path);
        return Err(StoreError::WriteFailed {
            path: path.to_path_buf(),
            source,
        });
    }

    debug!("Committed {:?}", path);
    Ok(())
}

/// Serialize into the staging file and flush it to disk
fn stage(temp_path: &Path, value: &Value, indent: Option<usize>) -> io::Result<()> {
    let file = File::create(temp_path)?;
    let mut writer = BufWriter::new(file);
    encode(&mut writer, value, indent)?;
    writer.flush()?;

    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()
}

/// Best-effort removal of a staging file
pub(crate) fn discard(temp_path: &Path) {
    if let Err(e) = fs::remove_file(temp_path) {
        if e.kind() != io::ErrorKind::NotFound {
            warn!("Failed to remove temp file {:?}: {}", temp_path, e);
        }
    }
}
