//! Per-path mutual exclusion
//!
//! Every store addressing the same file shares one mutex, looked up in a
//! process-wide registry keyed by canonical path. The registry only holds
//! `Weak` references, so a lock lives exactly as long as some store uses it.
//! There is no cross-process coordination.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::{Mutex, MutexGuard};

type Registry = Mutex<HashMap<PathBuf, Weak<Mutex<()>>>>;

fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Shared exclusive lock for one document path
#[derive(Clone)]
pub struct PathLock {
    key: PathBuf,
    mutex: Arc<Mutex<()>>,
}

impl PathLock {
    /// Get the lock shared by every store on `path`
    ///
    /// The parent directory should already exist so the key can be
    /// canonicalized; otherwise the path is made absolute as-is.
    pub fn for_path(path: &Path) -> Self {
        let key = canonical_key(path);
        let mut registry = registry().lock();

        if let Some(mutex) = registry.get(&key).and_then(Weak::upgrade) {
            return Self { key, mutex };
        }

        registry.retain(|_, weak| weak.strong_count() > 0);
        let mutex = Arc::new(Mutex::new(()));
        registry.insert(key.clone(), Arc::downgrade(&mutex));
        Self { key, mutex }
    }

    /// Block until this path is exclusively held
    pub fn lock(&self) -> MutexGuard<'_, ()> {
        self.mutex.lock()
    }

    /// Canonical path the lock is registered under
    pub fn key(&self) -> &Path {
        &self.key
    }

    /// Check whether two handles guard the same path
    pub fn is_shared_with(&self, other: &PathLock) -> bool {
        Arc::ptr_eq(&self.mutex, &other.mutex)
    }
}

impl std::fmt::Debug for PathLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathLock").field("key", &self.key).finish()
    }
}

/// Canonical registry key: canonical parent directory joined with the file name
fn canonical_key(path: &Path) -> PathBuf {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let parent = parent.canonicalize().unwrap_or_else(|_| {
        std::env::current_dir()
            .map(|cwd| cwd.join(parent))
            .unwrap_or_else(|_| parent.to_path_buf())
    });

    match path.file_name() {
        Some(name) => parent.join(name),
        None => parent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_same_path_shares_lock() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.json");

        let a = PathLock::for_path(&path);
        let b = PathLock::for_path(&path);
        assert!(a.is_shared_with(&b));
    }

    #[test]
    fn test_equivalent_spellings_share_lock() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("sub")).unwrap();

        let direct = PathLock::for_path(&temp_dir.path().join("doc.json"));
        let dotted = PathLock::for_path(&temp_dir.path().join("sub").join("..").join("doc.json"));
        assert!(direct.is_shared_with(&dotted));
        assert_eq!(direct.key(), dotted.key());
    }

    #[test]
    fn test_different_paths_do_not_share() {
        let temp_dir = TempDir::new().unwrap();

        let a = PathLock::for_path(&temp_dir.path().join("a.json"));
        let b = PathLock::for_path(&temp_dir.path().join("b.json"));
        assert!(!a.is_shared_with(&b));

        let _held = a.lock();
        assert!(b.mutex.try_lock().is_some());
    }

    #[test]
    fn test_lock_released_when_unused() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.json");

        let first = PathLock::for_path(&path);
        let weak = Arc::downgrade(&first.mutex);
        drop(first);

        assert!(weak.upgrade().is_none());
        let second = PathLock::for_path(&path);
        assert!(second.mutex.try_lock().is_some());
    }
}
