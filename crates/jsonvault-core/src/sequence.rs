//! Array-shaped view over a document store
//!
//! Mutations go through `DocumentStore::update`. Appending to a document
//! that is not an array replaces it with a fresh one; removal and filtering
//! leave a non-array document untouched.

use serde_json::Value;

use crate::storage::StoreResult;
use crate::store::{DocumentStore, StoreConfig};

/// Ordered access to a JSON array document
#[derive(Clone, Debug)]
pub struct SequenceView {
    store: DocumentStore,
}

impl SequenceView {
    /// Wrap an existing store
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Open a store with `config` and wrap it
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        Ok(Self::new(DocumentStore::open(config)?))
    }

    /// The underlying store
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// All elements; absent or non-array documents read as empty
    pub fn items(&self) -> StoreResult<Vec<Value>> {
        match self.store.read(Some(Value::Array(Vec::new())))? {
            Value::Array(items) => Ok(items),
            _ => Ok(Vec::new()),
        }
    }

    pub fn append(&self, item: Value) -> StoreResult<()> {
        self.extend(std::iter::once(item))
    }

    /// Append every item in order
    pub fn extend<I>(&self, items: I) -> StoreResult<()>
    where
        I: IntoIterator<Item = Value>,
    {
        self.store.update(|doc| {
            let mut seq = into_sequence(doc);
            seq.extend(items);
            Value::Array(seq)
        })?;
        Ok(())
    }

    /// Remove the first element equal to `item`
    ///
    /// Returns whether anything was removed.
    pub fn remove(&self, item: &Value) -> StoreResult<bool> {
        let mut removed = false;
        self.store.update(|mut doc| {
            if let Value::Array(seq) = &mut doc {
                if let Some(pos) = seq.iter().position(|v| v == item) {
                    seq.remove(pos);
                    removed = true;
                }
            }
            doc
        })?;
        Ok(removed)
    }

    /// Remove and return the element at `index`; out of range is a no-op
    pub fn remove_at(&self, index: usize) -> StoreResult<Option<Value>> {
        let mut removed = None;
        self.store.update(|mut doc| {
            if let Value::Array(seq) = &mut doc {
                if index < seq.len() {
                    removed = Some(seq.remove(index));
                }
            }
            doc
        })?;
        Ok(removed)
    }

    pub fn get_at(&self, index: usize) -> StoreResult<Option<Value>> {
        Ok(self.items()?.into_iter().nth(index))
    }

    /// Element at `index`, or `default` when out of range
    pub fn get_at_or(&self, index: usize, default: Value) -> StoreResult<Value> {
        Ok(self.get_at(index)?.unwrap_or(default))
    }

    /// Number of elements, 0 for a non-array document
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.items()?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Replace the document with an empty array
    pub fn clear(&self) -> StoreResult<()> {
        self.store.write(&Value::Array(Vec::new()), true)
    }

    /// Keep only elements matching `predicate`, preserving order
    pub fn filter<F>(&self, mut predicate: F) -> StoreResult<()>
    where
        F: FnMut(&Value) -> bool,
    {
        self.store.update(|mut doc| {
            if let Value::Array(seq) = &mut doc {
                seq.retain(|v| predicate(v));
            }
            doc
        })?;
        Ok(())
    }
}

fn into_sequence(doc: Value) -> Vec<Value> {
    match doc {
        Value::Array(seq) => seq,
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn view(temp_dir: &TempDir) -> SequenceView {
        SequenceView::open(StoreConfig::new(temp_dir.path().join("queue.json")).auto_backup(false))
            .unwrap()
    }

    #[test]
    fn test_fresh_store_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let seq = view(&temp_dir);

        // Auto-created as `{}`, which is not an array
        assert_eq!(seq.len().unwrap(), 0);
        assert!(seq.is_empty().unwrap());
        assert_eq!(seq.get_at(0).unwrap(), None);
    }

    #[test]
    fn test_append_preserves_order() {
        let temp_dir = TempDir::new().unwrap();
        let seq = view(&temp_dir);

        seq.append(json!("a")).unwrap();
        seq.append(json!("b")).unwrap();

        assert_eq!(seq.get_at(0).unwrap(), Some(json!("a")));
        assert_eq!(seq.get_at(1).unwrap(), Some(json!("b")));
        assert_eq!(seq.get_at_or(2, json!("none")).unwrap(), json!("none"));
        assert_eq!(seq.len().unwrap(), 2);
    }

    #[test]
    fn test_extend() {
        let temp_dir = TempDir::new().unwrap();
        let seq = view(&temp_dir);
        seq.append(json!(0)).unwrap();

        seq.extend(vec![json!(1), json!(2), json!(3)]).unwrap();
        assert_eq!(seq.items().unwrap(), vec![json!(0), json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn test_remove_first_match() {
        let temp_dir = TempDir::new().unwrap();
        let seq = view(&temp_dir);
        seq.extend(vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 1})])
            .unwrap();

        assert!(seq.remove(&json!({"id": 1})).unwrap());
        assert_eq!(seq.items().unwrap(), vec![json!({"id": 2}), json!({"id": 1})]);

        assert!(!seq.remove(&json!({"id": 9})).unwrap());
        assert_eq!(seq.len().unwrap(), 2);
    }

    #[test]
    fn test_remove_at() {
        let temp_dir = TempDir::new().unwrap();
        let seq = view(&temp_dir);
        seq.extend(vec![json!("x"), json!("y"), json!("z")]).unwrap();

        assert_eq!(seq.remove_at(1).unwrap(), Some(json!("y")));
        assert_eq!(seq.remove_at(5).unwrap(), None);
        assert_eq!(seq.items().unwrap(), vec![json!("x"), json!("z")]);
    }

    #[test]
    fn test_filter() {
        let temp_dir = TempDir::new().unwrap();
        let seq = view(&temp_dir);
        seq.extend(vec![json!(1), json!(2), json!(3), json!(4)]).unwrap();

        seq.filter(|v| v.as_i64().map_or(false, |n| n > 2)).unwrap();
        assert_eq!(seq.store().read(None).unwrap(), json!([3, 4]));
    }

    #[test]
    fn test_non_array_document() {
        let temp_dir = TempDir::new().unwrap();
        let seq = view(&temp_dir);
        seq.store().write(&json!({"not": "a list"}), true).unwrap();

        assert_eq!(seq.remove_at(0).unwrap(), None);
        seq.filter(|_| false).unwrap();
        assert_eq!(seq.store().read(None).unwrap(), json!({"not": "a list"}));

        seq.append(json!(1)).unwrap();
        assert_eq!(seq.store().read(None).unwrap(), json!([1]));
    }

    #[test]
    fn test_clear() {
        let temp_dir = TempDir::new().unwrap();
        let seq = view(&temp_dir);
        seq.extend(vec![json!(1), json!(2)]).unwrap();

        seq.clear().unwrap();
        assert_eq!(seq.store().read(None).unwrap(), json!([]));
    }
}
