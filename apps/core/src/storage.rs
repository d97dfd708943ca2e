use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encoding error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Minimal persisted key-value capability the recent-search history needs.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.values
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

pub struct SqliteStore {
    db: Connection,
}

impl SqliteStore {
    pub fn open_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    pub fn open_file(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::with_connection(Connection::open(path)?)
    }

    pub fn with_connection(db: Connection) -> Result<Self, StoreError> {
        db.execute(
            "CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )?;
        Ok(Self { db })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .db
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.db.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.db.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

/// All keys in one JSON object file, rewritten on every change.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, values: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // The file on disk is always a complete old or new snapshot.
        let staging = self.path.with_extension("json.tmp");
        std::fs::write(&staging, serde_json::to_string(values)?)?;
        std::fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());
        self.save(&values)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.load()?;
        if values.remove(key).is_some() {
            self.save(&values)?;
        }
        Ok(())
    }
}

/// Boundary where storage failures stop. The first error is logged and the
/// store turns into an empty no-op store for the rest of its life.
pub struct ResilientStore {
    inner: Option<Box<dyn KeyValueStore>>,
    degraded: Cell<bool>,
}

impl ResilientStore {
    pub fn new(inner: Box<dyn KeyValueStore>) -> Self {
        Self {
            inner: Some(inner),
            degraded: Cell::new(false),
        }
    }

    /// Store that was never available, e.g. storage disabled by the host.
    pub fn unavailable() -> Self {
        Self {
            inner: None,
            degraded: Cell::new(true),
        }
    }

    pub fn memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    /// Wraps the outcome of opening a backend, degrading if it failed.
    pub fn open_or_noop<S, E>(opened: Result<S, E>) -> Self
    where
        S: KeyValueStore + 'static,
        E: std::fmt::Display,
    {
        match opened {
            Ok(store) => Self::new(Box::new(store)),
            Err(error) => {
                log::warn!("history storage unavailable, continuing without it: {error}");
                Self::unavailable()
            }
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.get()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let inner = self.active()?;
        match inner.get(key) {
            Ok(value) => value,
            Err(error) => {
                self.degrade("get", &error);
                None
            }
        }
    }

    pub fn set(&self, key: &str, value: &str) {
        if let Some(inner) = self.active() {
            if let Err(error) = inner.set(key, value) {
                self.degrade("set", &error);
            }
        }
    }

    pub fn remove(&self, key: &str) {
        if let Some(inner) = self.active() {
            if let Err(error) = inner.remove(key) {
                self.degrade("remove", &error);
            }
        }
    }

    fn active(&self) -> Option<&dyn KeyValueStore> {
        if self.degraded.get() {
            return None;
        }
        self.inner.as_deref()
    }

    fn degrade(&self, operation: &str, error: &StoreError) {
        log::warn!("history storage {operation} failed, disabling history: {error}");
        self.degraded.set(true);
    }
}
