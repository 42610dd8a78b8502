//! Timestamped backups
//!
//! A backup of `dir/<stem><ext>` is `dir/<stem>_backup_<YYYYMMDD_HHMMSS><ext>`.
//! Two backups taken within the same second share a name; the later copy
//! overwrites the earlier one.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDateTime};
use tracing::{debug, warn};

use super::error::{StoreError, StoreResult};

const BACKUP_MARKER: &str = "_backup_";
const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const STAMP_LEN: usize = 15;

/// Split a document path into its stem and extension (with the leading dot)
fn stem_and_ext(path: &Path) -> (String, String) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (stem, ext)
}

/// Backup path for `path` taken at `at`
pub fn backup_path(path: &Path, at: DateTime<Local>) -> PathBuf {
    let (stem, ext) = stem_and_ext(path);
    let name = format!("{}{}{}{}", stem, BACKUP_MARKER, at.format(STAMP_FORMAT), ext);
    path.with_file_name(name)
}

/// Check whether `file_name` is a backup of the document at `path`
pub fn is_backup_of(path: &Path, file_name: &str) -> bool {
    let (stem, ext) = stem_and_ext(path);
    let Some(rest) = file_name.strip_prefix(&stem) else {
        return false;
    };
    let Some(rest) = rest.strip_prefix(BACKUP_MARKER) else {
        return false;
    };
    let Some(stamp) = rest.strip_suffix(ext.as_str()) else {
        return false;
    };
    stamp.len() == STAMP_LEN && NaiveDateTime::parse_from_str(stamp, STAMP_FORMAT).is_ok()
}

/// List the backups of `path`, newest first
///
/// Ordered by modification time, ties broken by name (later stamp first).
pub fn list(path: &Path) -> StoreResult<Vec<PathBuf>> {
    let dir = parent_dir(path);
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StoreError::from_io(e, dir)),
    };

    let mut backups: Vec<(SystemTime, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| is_backup_of(path, &entry.file_name().to_string_lossy()))
        .map(|entry| {
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, entry.path())
        })
        .collect();

    backups.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));
    Ok(backups.into_iter().map(|(_, p)| p).collect())
}

/// Copy the current document to a fresh backup, then prune to `max_backups`
///
/// Returns `None` when there is nothing to back up.
pub fn create(path: &Path, max_backups: usize) -> StoreResult<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }

    let target = backup_path(path, Local::now());
    fs::copy(path, &target).map_err(|e| StoreError::from_io(e, target.clone()))?;
    debug!("Backed up {:?} to {:?}", path, target);

    prune(path, max_backups)?;
    Ok(Some(target))
}

/// Delete every backup beyond the newest `max_backups`
///
/// Individual deletion failures are logged and skipped. Returns how many
/// backups were removed.
pub fn prune(path: &Path, max_backups: usize) -> StoreResult<usize> {
    let mut removed = 0;
    for stale in list(path)?.into_iter().skip(max_backups) {
        match fs::remove_file(&stale) {
            Ok(()) => removed += 1,
            Err(e) => warn!("Failed to remove old backup {:?}: {}", stale, e),
        }
    }
    Ok(removed)
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_backup_path_format() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        let path = Path::new("/data/users.json");

        assert_eq!(
            backup_path(path, at),
            PathBuf::from("/data/users_backup_20240309_070501.json")
        );
    }

    #[test]
    fn test_is_backup_of() {
        let path = Path::new("/data/users.json");

        assert!(is_backup_of(path, "users_backup_20240309_070501.json"));
        assert!(!is_backup_of(path, "users.json"));
        assert!(!is_backup_of(path, "users_backup_latest.json"));
        assert!(!is_backup_of(path, "users_backup_20240309_070501.txt"));
        assert!(!is_backup_of(path, "other_backup_20240309_070501.json"));
        assert!(!is_backup_of(path, "users_backup_20241399_070501.json"));
    }

    #[test]
    fn test_create_skips_missing_document() {
        let temp_dir = TempDir::new().unwrap();
        let created = create(&temp_dir.path().join("absent.json"), 5).unwrap();
        assert!(created.is_none());
    }

    #[test]
    fn test_prune_keeps_newest() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("users.json");
        fs::write(&path, "{}").unwrap();

        for second in 0..5 {
            let at = Local.with_ymd_and_hms(2024, 1, 1, 0, 0, second).unwrap();
            fs::write(backup_path(&path, at), "{}").unwrap();
        }
        // Unrelated files in the same directory are never touched
        fs::write(temp_dir.path().join("orders_backup_20240101_000000.json"), "{}").unwrap();

        let removed = prune(&path, 2).unwrap();
        assert_eq!(removed, 3);

        let remaining = list(&path).unwrap();
        assert_eq!(remaining.len(), 2);
        assert!(temp_dir
            .path()
            .join("orders_backup_20240101_000000.json")
            .exists());
    }

    #[test]
    fn test_create_copies_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("users.json");
        fs::write(&path, "{\"a\":1}").unwrap();

        let backup = create(&path, 5).unwrap().unwrap();
        assert_eq!(fs::read_to_string(backup).unwrap(), "{\"a\":1}");
    }
}
