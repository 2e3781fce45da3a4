use crate::db;
use crate::error::StoreError;
use crate::logger;
use crossbeam_channel::{Receiver, Sender};
use rusqlite::Connection;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;

/// Durable string-keyed storage for serialized values.
pub trait Storage: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            conn: db::init_db(path)?,
        })
    }
}

impl Storage for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(db::kv::get_value(&self.conn, key)?)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        Ok(db::kv::set_value(&self.conn, key, value)?)
    }
}

/// In-process storage. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
    read_only: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects every write, like a full or disabled store.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let storage = Self::new();
        {
            let mut map = storage.lock();
            for (key, value) in entries {
                map.insert(key.into(), value.into());
            }
        }
        storage
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.raw(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A value that can live under a storage key.
pub trait StoredValue: Serialize + DeserializeOwned + Clone {
    /// Repair a freshly deserialized value. The default keeps it as is.
    fn sanitize(self) -> Self {
        self
    }
}

/// Read `key`, falling back to `default` when it is missing or unreadable.
pub fn load<T: StoredValue>(storage: &dyn Storage, key: &str, default: T) -> T {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return default,
        Err(e) => {
            logger::log(&format!("Failed to read {}: {}", key, e));
            return default;
        }
    };

    match serde_json::from_str::<T>(&raw) {
        Ok(value) => value.sanitize(),
        Err(e) => {
            logger::log(&format!("Discarding unreadable value for {}: {}", key, e));
            default
        }
    }
}

enum StoreOp {
    Set { key: String, value: String },
    Flush(Sender<()>),
}

/// Sending side of the background writer. Cheap to clone.
#[derive(Clone)]
pub struct StoreHandle {
    tx: Sender<StoreOp>,
}

impl StoreHandle {
    /// Move `storage` onto a writer thread and return a handle to it.
    pub fn spawn(storage: Box<dyn Storage>) -> std::io::Result<Self> {
        let (tx, rx) = crossbeam_channel::unbounded();
        thread::Builder::new()
            .name("smarty-stars::store_writer".to_string())
            .spawn(move || run_writer(storage, rx))?;
        Ok(Self { tx })
    }

    /// Serialize `value` now and queue the write. Failures are logged and dropped.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                logger::log(&format!("Failed to serialize {}: {}", key, StoreError::from(e)));
                return;
            }
        };

        let op = StoreOp::Set {
            key: key.to_string(),
            value: json,
        };
        if self.tx.send(op).is_err() {
            logger::log(&format!("Dropped write for {}: {}", key, StoreError::WriterGone));
        }
    }

    /// Block until every write queued so far has been applied.
    pub fn flush(&self) {
        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        if self.tx.send(StoreOp::Flush(done_tx)).is_ok() {
            let _ = done_rx.recv();
        }
    }
}

fn run_writer(mut storage: Box<dyn Storage>, rx: Receiver<StoreOp>) {
    while let Ok(op) = rx.recv() {
        match op {
            StoreOp::Set { key, value } => {
                if let Err(e) = storage.set(&key, &value) {
                    logger::log(&format!("Failed to write {}: {}", key, e));
                }
            }
            StoreOp::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    logger::log("Store writer channel disconnected, exiting");
}

/// A value mirrored to storage: every change is written through.
pub struct Persisted<T: StoredValue> {
    key: &'static str,
    value: T,
    store: StoreHandle,
}

impl<T: StoredValue> Persisted<T> {
    pub fn new(key: &'static str, value: T, store: StoreHandle) -> Self {
        Self { key, value, store }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn set(&mut self, value: T) {
        self.value = value;
        self.store.save(self.key, &self.value);
    }

    pub fn update<F>(&mut self, f: F)
    where
        F: FnOnce(&mut T),
    {
        f(&mut self.value);
        self.store.save(self.key, &self.value);
    }
}
