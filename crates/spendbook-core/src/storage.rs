use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError, RwLock},
};

use once_cell::sync::Lazy;
use spendbook_domain::Expense;

use crate::CoreError;

/// Key under which key/value backends keep the expense document.
pub const DEFAULT_DOCUMENT_KEY: &str = "expenses";

/// Abstraction over persistence backends capable of holding the expense document.
pub trait ExpenseStorage: Send + Sync {
    /// Reads the whole collection. A missing document is initialized to an empty one.
    fn load(&self) -> Result<Vec<Expense>, CoreError>;

    /// Replaces the whole collection. Either the new document is fully stored or the
    /// previous one remains.
    fn save(&self, expenses: &[Expense]) -> Result<(), CoreError>;

    /// Lock held by the store for the duration of a read-modify-write cycle. Handles
    /// that point at the same location must hand out the same lock.
    fn write_lock(&self) -> Arc<Mutex<()>>;

    /// Human-readable description of where the data lives, for logs.
    fn location(&self) -> String;
}

static LOCATION_LOCKS: Lazy<Mutex<HashMap<String, Arc<Mutex<()>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Returns the process-wide write lock registered for `location`.
pub fn location_lock(location: &str) -> Arc<Mutex<()>> {
    let mut locks = LOCATION_LOCKS
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    locks.entry(location.to_string()).or_default().clone()
}

/// Parses a persisted expense document. Malformed data is an error, never an empty list.
pub fn decode_document(data: &str) -> Result<Vec<Expense>, CoreError> {
    serde_json::from_str(data)
        .map_err(|err| CoreError::Serde(format!("corrupt expense document: {err}")))
}

pub fn encode_document(expenses: &[Expense]) -> Result<String, CoreError> {
    serde_json::to_string_pretty(expenses).map_err(|err| CoreError::Serde(err.to_string()))
}

/// Volatile backend keeping the collection in process memory. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    expenses: Arc<RwLock<Vec<Expense>>>,
    lock: Arc<Mutex<()>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExpenseStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<Expense>, CoreError> {
        let guard = self
            .expenses
            .read()
            .map_err(|_| CoreError::Storage("memory storage poisoned".into()))?;
        Ok(guard.clone())
    }

    fn save(&self, expenses: &[Expense]) -> Result<(), CoreError> {
        let mut guard = self
            .expenses
            .write()
            .map_err(|_| CoreError::Storage("memory storage poisoned".into()))?;
        *guard = expenses.to_vec();
        Ok(())
    }

    fn write_lock(&self) -> Arc<Mutex<()>> {
        self.lock.clone()
    }

    fn location(&self) -> String {
        "memory".into()
    }
}

/// String key/value store in the shape of browser local storage.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, CoreError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), CoreError>;

    /// Write lock for `key`. Every handle onto the same underlying store must return
    /// the same lock for the same key.
    fn key_lock(&self, key: &str) -> Arc<Mutex<()>>;
}

/// In-process [`KeyValueStore`]. Clones share the same items and key locks.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    items: Arc<RwLock<HashMap<String, String>>>,
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, CoreError> {
        let items = self
            .items
            .read()
            .map_err(|_| CoreError::Storage("key/value store poisoned".into()))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut items = self
            .items
            .write()
            .map_err(|_| CoreError::Storage("key/value store poisoned".into()))?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn key_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(key.to_string()).or_default().clone()
    }
}

/// Keeps the expense document as a single JSON string inside a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct KeyValueStorage<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> KeyValueStorage<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_DOCUMENT_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }
}

impl<S: KeyValueStore> ExpenseStorage for KeyValueStorage<S> {
    fn load(&self) -> Result<Vec<Expense>, CoreError> {
        match self.store.get_item(&self.key)? {
            Some(data) => decode_document(&data),
            None => {
                tracing::debug!(key = %self.key, "initializing empty expense document");
                self.store.set_item(&self.key, &encode_document(&[])?)?;
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, expenses: &[Expense]) -> Result<(), CoreError> {
        let data = encode_document(expenses)?;
        self.store.set_item(&self.key, &data)
    }

    fn write_lock(&self) -> Arc<Mutex<()>> {
        self.store.key_lock(&self.key)
    }

    fn location(&self) -> String {
        format!("key:{}", self.key)
    }
}
