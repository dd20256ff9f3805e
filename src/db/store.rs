use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Mutex;

use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// The single record holding the user profile
    UserData,
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageKey::UserData => write!(f, "userData"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Write to {key} failed: {message}")]
    WriteFailed { key: String, message: String },

    #[error("Storage writer is not running")]
    WriterClosed,
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Durable string key-value storage
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the raw value stored under `key`, `None` when nothing is stored
    async fn get(&self, key: &StorageKey) -> StorageResult<Option<String>>;

    /// Replaces the value stored under `key`
    async fn set(&self, key: &StorageKey, value: String) -> StorageResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Volatile store kept in process memory
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `value` under `key`
    pub fn with_value(key: &StorageKey, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.insert(key, value.into());
        store
    }

    fn insert(&self, key: &StorageKey, value: String) {
        let mut values = self
            .values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        values.insert(key.to_string(), value);
    }

    /// Synchronous read, used when inspecting the store from tests
    pub fn peek(&self, key: &StorageKey) -> Option<String> {
        let values = self
            .values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        values.get(&key.to_string()).cloned()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &StorageKey) -> StorageResult<Option<String>> {
        Ok(self.peek(key))
    }

    async fn set(&self, key: &StorageKey, value: String) -> StorageResult<()> {
        self.insert(key, value);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
