//! Mapping-shaped view over a document store
//!
//! Every mutation is a single `DocumentStore::update`, so concurrent callers
//! never lose each other's keys. A document that is not an object reads as
//! an empty mapping and is replaced by one on the next mutation.

use serde_json::{Map, Value};

use crate::storage::StoreResult;
use crate::store::{DocumentStore, StoreConfig};

/// Key/value access to a JSON object document
#[derive(Clone, Debug)]
pub struct KeyedView {
    store: DocumentStore,
}

impl KeyedView {
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

    /// Current mapping; absent or non-object documents read as empty
    pub fn mapping(&self) -> StoreResult<Map<String, Value>> {
        match self.store.read(Some(Value::Object(Map::new())))? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }

    pub fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.mapping()?.shift_remove(key))
    }

    /// Value for `key`, or `default` when the key is missing
    pub fn get_or(&self, key: &str, default: Value) -> StoreResult<Value> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    pub fn set(&self, key: &str, value: Value) -> StoreResult<()> {
        self.store.update(|doc| {
            let mut map = into_mapping(doc);
            map.insert(key.to_string(), value);
            Value::Object(map)
        })?;
        Ok(())
    }

    /// Remove `key` if present
    ///
    /// Always succeeds, whether or not the key existed.
    pub fn delete_key(&self, key: &str) -> StoreResult<bool> {
        self.store.update(|mut doc| {
            if let Value::Object(map) = &mut doc {
                map.shift_remove(key);
            }
            doc
        })?;
        Ok(true)
    }

    pub fn has_key(&self, key: &str) -> StoreResult<bool> {
        Ok(self.mapping()?.contains_key(key))
    }

    /// Keys in persisted order
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.mapping()?.into_iter().map(|(k, _)| k).collect())
    }

    pub fn values(&self) -> StoreResult<Vec<Value>> {
        Ok(self.mapping()?.into_iter().map(|(_, v)| v).collect())
    }

    pub fn items(&self) -> StoreResult<Vec<(String, Value)>> {
        Ok(self.mapping()?.into_iter().collect())
    }

    /// Replace the document with an empty mapping
    pub fn clear(&self) -> StoreResult<()> {
        self.store.write(&Value::Object(Map::new()), true)
    }

    /// Merge `other` into the mapping
    ///
    /// With `overwrite`, keys from `other` replace existing ones; otherwise
    /// only keys missing from the mapping are added.
    pub fn merge(&self, other: Map<String, Value>, overwrite: bool) -> StoreResult<()> {
        self.store.update(|doc| {
            let mut map = into_mapping(doc);
            for (key, value) in other {
                if overwrite || !map.contains_key(&key) {
                    map.insert(key, value);
                }
            }
            Value::Object(map)
        })?;
        Ok(())
    }
}

fn into_mapping(doc: Value) -> Map<String, Value> {
    match doc {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
