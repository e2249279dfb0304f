//! Persistent key-value storage backing the session.
//!
//! The file store keeps session artifacts in `${SIGNET_HOME}/store.json` with
//! restricted permissions (0600). Every mutation is written through to disk;
//! reads never touch the filesystem after construction.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};

use crate::config::paths;

/// Storage keys for session artifacts.
///
/// Values are stored as strings; boolean flags as their textual serialization.
pub mod keys {
    /// Bearer token for the active session.
    pub const AUTH_TOKEN: &str = "AUTH_TOKEN";
    /// Whether the session should be re-validated on next startup.
    pub const KEEP_SIGNED: &str = "KEEP_SIGNED";
    /// Whether credentials are cached for login prefill.
    pub const REMEMBER_ME: &str = "REMEMBER_ME";
    /// Encoded remember-me email.
    pub const USER_EMAIL: &str = "USER_EMAIL";
    /// Encoded remember-me password.
    pub const USER_PASSWORD: &str = "USER_PASSWORD";
}

/// Synchronous key-value store. Reads and writes never suspend.
pub trait Store: Send + Sync {
    /// Returns the stored value for `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, overwriting any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Deletes the entry for `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// File-backed store persisted as a flat JSON object.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Opens the store at the default location (`${SIGNET_HOME}/store.json`).
    pub fn open() -> Result<Self> {
        Self::open_at(paths::store_path())
    }

    /// Opens the store at a specific path. A missing file yields an empty store.
    pub fn open_at(path: PathBuf) -> Result<Self> {
        let entries = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read store from {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse store from {}", path.display()))?
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(entries).context("Failed to serialize store")?;

        // Write with restricted permissions
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, contents)
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        Ok(())
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().expect("store lock poisoned").get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().expect("store lock poisoned");
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().expect("store lock poisoned");
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().expect("store lock poisoned").get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .expect("store lock poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().expect("store lock poisoned").remove(key);
        Ok(())
    }
}
