//! Typed Persistence
//!
//! The host platform's key-value storage, behind explicit interfaces: a plain
//! option store and a transient variant whose entries carry an expiry. The
//! typed facades (`SchemaStore`, `ValueStore`, `DataObjectStore`) each own a
//! narrow slice of the keyspace and are constructed per request and passed
//! explicitly - no global state, no ad hoc string keys at call sites.
//!
//! Concurrent writers are not arbitrated: last write wins, exactly as the
//! underlying storage behaves.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{FieldsError, Result};

/// Plain key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value) -> Result<()>;
    fn delete(&mut self, key: &str) -> Result<bool>;
    /// Keys currently present under a prefix, in stable order.
    fn keys_with_prefix(&self, prefix: &str) -> Vec<String>;
}

/// Key-value storage with per-entry expiry. Expired entries read as absent.
pub trait TransientStore {
    fn get_transient(&self, key: &str) -> Option<Value>;
    fn set_transient(&mut self, key: &str, value: Value, ttl: Duration) -> Result<()>;
    fn delete_transient(&mut self, key: &str) -> Result<bool>;
}

// =============================================================================
// MemoryStore
// =============================================================================

/// In-process store, for tests and request-scoped composition.
#[derive(Debug, Default)]
pub struct MemoryStore {
    options: BTreeMap<String, Value>,
    transients: BTreeMap<String, (Value, DateTime<Utc>)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.options.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.options.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<bool> {
        Ok(self.options.remove(key).is_some())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.options
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect()
    }
}

impl TransientStore for MemoryStore {
    fn get_transient(&self, key: &str) -> Option<Value> {
        let (value, deadline) = self.transients.get(key)?;
        if *deadline <= Utc::now() {
            return None;
        }
        Some(value.clone())
    }

    fn set_transient(&mut self, key: &str, value: Value, ttl: Duration) -> Result<()> {
        let deadline = Utc::now()
            + chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::seconds(0));
        self.transients.insert(key.to_string(), (value, deadline));
        Ok(())
    }

    fn delete_transient(&mut self, key: &str) -> Result<bool> {
        Ok(self.transients.remove(key).is_some())
    }
}

// =============================================================================
// FileStore
// =============================================================================

/// One transient entry as persisted: the value plus a unix-epoch deadline.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TransientEntry {
    value: Value,
    expires_at: i64,
}

/// The on-disk document shape.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    options: BTreeMap<String, Value>,
    #[serde(default)]
    transients: BTreeMap<String, TransientEntry>,
}

/// JSON-file-backed store - the analog of the host platform's options table.
///
/// The whole document is loaded on open and rewritten after every mutation;
/// the workloads here are small admin-side maps, not hot paths.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    doc: StoreDocument,
}

impl FileStore {
    /// Open an existing store document or start an empty one.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let doc = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)
                .map_err(|e| FieldsError::MalformedStore(format!("{}: {e}", path.display())))?
        } else {
            StoreDocument::default()
        };

        debug!(path = %path.display(), "opened store");
        Ok(Self { path, doc })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&self.doc)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.doc.options.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.doc.options.insert(key.to_string(), value);
        self.persist()
    }

    fn delete(&mut self, key: &str) -> Result<bool> {
        let removed = self.doc.options.remove(key).is_some();
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.doc
            .options
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect()
    }
}

impl TransientStore for FileStore {
    fn get_transient(&self, key: &str) -> Option<Value> {
        let entry = self.doc.transients.get(key)?;
        if entry.expires_at <= Utc::now().timestamp() {
            return None;
        }
        Some(entry.value.clone())
    }

    fn set_transient(&mut self, key: &str, value: Value, ttl: Duration) -> Result<()> {
        let expires_at = Utc::now().timestamp() + ttl.as_secs() as i64;
        // Drop entries that have already lapsed while we hold the document
        let now = Utc::now().timestamp();
        self.doc.transients.retain(|_, e| e.expires_at > now);
        self.doc
            .transients
            .insert(key.to_string(), TransientEntry { value, expires_at });
        self.persist()
    }

    fn delete_transient(&mut self, key: &str) -> Result<bool> {
        let removed = self.doc.transients.remove(key).is_some();
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }
}

// =============================================================================
// Typed facades
// =============================================================================

const GLOBAL_SCHEMA_KEY: &str = "schema:global";
const TEMPLATE_SCHEMA_PREFIX: &str = "schema:template:";
const POST_VALUES_PREFIX: &str = "values:post:";
const DATA_OBJECT_PREFIX: &str = "data:";

/// Schema text per template, plus the global schema slot.
pub struct SchemaStore<'a, S: KeyValueStore> {
    store: &'a mut S,
}

impl<'a, S: KeyValueStore> SchemaStore<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    fn template_key(template: &str) -> String {
        format!("{TEMPLATE_SCHEMA_PREFIX}{template}")
    }

    pub fn schema_for_template(&self, template: &str) -> Option<String> {
        self.store
            .get(&Self::template_key(template))
            .and_then(|v| v.as_str().map(String::from))
    }

    pub fn set_schema_for_template(&mut self, template: &str, yaml: &str) -> Result<()> {
        self.store
            .set(&Self::template_key(template), Value::String(yaml.into()))
    }

    pub fn delete_schema_for_template(&mut self, template: &str) -> Result<bool> {
        self.store.delete(&Self::template_key(template))
    }

    pub fn global_schema(&self) -> Option<String> {
        self.store
            .get(GLOBAL_SCHEMA_KEY)
            .and_then(|v| v.as_str().map(String::from))
    }

    pub fn set_global_schema(&mut self, yaml: &str) -> Result<()> {
        self.store.set(GLOBAL_SCHEMA_KEY, Value::String(yaml.into()))
    }

    /// Templates that currently have a schema, in stable order.
    pub fn templates(&self) -> Vec<String> {
        self.store
            .keys_with_prefix(TEMPLATE_SCHEMA_PREFIX)
            .into_iter()
            .map(|k| k[TEMPLATE_SCHEMA_PREFIX.len()..].to_string())
            .collect()
    }
}

/// Per-post field-value maps.
pub struct ValueStore<'a, S: KeyValueStore> {
    store: &'a mut S,
}

impl<'a, S: KeyValueStore> ValueStore<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    fn post_key(post_id: u64) -> String {
        format!("{POST_VALUES_PREFIX}{post_id}")
    }

    pub fn values_for_post(&self, post_id: u64) -> BTreeMap<String, Value> {
        self.store
            .get(&Self::post_key(post_id))
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default()
    }

    pub fn set_values_for_post(
        &mut self,
        post_id: u64,
        values: &BTreeMap<String, Value>,
    ) -> Result<()> {
        self.store
            .set(&Self::post_key(post_id), serde_json::to_value(values)?)
    }

    pub fn value(&self, post_id: u64, field: &str) -> Option<Value> {
        self.values_for_post(post_id).remove(field)
    }

    pub fn set_value(&mut self, post_id: u64, field: &str, value: Value) -> Result<()> {
        let mut values = self.values_for_post(post_id);
        values.insert(field.to_string(), value);
        self.set_values_for_post(post_id, &values)
    }

    pub fn delete_values_for_post(&mut self, post_id: u64) -> Result<bool> {
        self.store.delete(&Self::post_key(post_id))
    }
}

/// A named, schema-governed collection of entries independent of posts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DataObject {
    pub slug: String,
    #[serde(default)]
    pub entries: Vec<Value>,
}

/// Named data-object records (reference/lookup data).
pub struct DataObjectStore<'a, S: KeyValueStore> {
    store: &'a mut S,
}

impl<'a, S: KeyValueStore> DataObjectStore<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    fn object_key(slug: &str) -> String {
        format!("{DATA_OBJECT_PREFIX}{slug}")
    }

    pub fn get(&self, slug: &str) -> Option<DataObject> {
        self.store
            .get(&Self::object_key(slug))
            .and_then(|v| serde_json::from_value(v).ok())
    }

    pub fn set(&mut self, object: &DataObject) -> Result<()> {
        self.store.set(
            &Self::object_key(&object.slug),
            serde_json::to_value(object)?,
        )
    }

    pub fn delete(&mut self, slug: &str) -> Result<bool> {
        self.store.delete(&Self::object_key(slug))
    }

    pub fn slugs(&self) -> Vec<String> {
        self.store
            .keys_with_prefix(DATA_OBJECT_PREFIX)
            .into_iter()
            .map(|k| k[DATA_OBJECT_PREFIX.len()..].to_string())
            .collect()
    }
}
