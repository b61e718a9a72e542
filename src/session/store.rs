// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable session persistence.
//!
//! The session lives in two entries of a string key/value store: the raw
//! bearer token and the JSON user snapshot. They are written on login, read
//! back at startup and removed on logout.

use super::Session;
use crate::error::{ClientError, Result};
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Key of the bearer token entry.
pub const TOKEN_KEY: &str = "authToken";
/// Key of the user snapshot entry.
pub const USER_KEY: &str = "currentUser";

/// Minimal durable string store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// What a [`FileStore`] found on disk.
enum Contents {
    Entries(BTreeMap<String, String>),
    /// The file exists but does not hold a JSON string map.
    Corrupt(String),
}

/// Store backed by a single JSON object file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file. Only I/O failures are errors.
    fn load(&self) -> Result<Contents> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Contents::Entries(BTreeMap::new()))
            }
            Err(e) => return Err(ClientError::Storage(e.to_string())),
        };
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Contents::Entries(BTreeMap::new()));
        }
        Ok(match serde_json::from_slice(&raw) {
            Ok(entries) => Contents::Entries(entries),
            Err(e) => Contents::Corrupt(e.to_string()),
        })
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        match self.load()? {
            Contents::Entries(entries) => Ok(entries),
            Contents::Corrupt(e) => Err(ClientError::Storage(e)),
        }
    }

    /// Entries to build the next write on. A corrupt file is replaced rather
    /// than blocking login; an unreadable one is left alone.
    fn read_for_update(&self) -> Result<BTreeMap<String, String>> {
        match self.load()? {
            Contents::Entries(entries) => Ok(entries),
            Contents::Corrupt(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Replacing corrupt session file"
                );
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ClientError::Storage(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| ClientError::Storage(e.to_string()))?;

        // Write-then-rename so a crash never leaves a truncated file.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).map_err(|e| ClientError::Storage(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| ClientError::Storage(e.to_string()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_for_update()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut entries = self.read_for_update()?;
        if entries.remove(key).is_some() || self.path.exists() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// Reads and writes the [`Session`] through a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct SessionStore<K> {
    kv: K,
}

impl<K: KeyValueStore> SessionStore<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    /// Load the persisted session.
    ///
    /// Never fails: a missing, unreadable or malformed entry yields an empty
    /// session.
    pub fn restore(&self) -> Session {
        let token = match self.kv.get(TOKEN_KEY) {
            Ok(Some(token)) if !token.trim().is_empty() => token,
            Ok(_) => return Session::empty(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored token");
                return Session::empty();
            }
        };

        let raw = match self.kv.get(USER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Session::empty(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored user");
                return Session::empty();
            }
        };

        let parsed = serde_json::from_str(&raw)
            .and_then(|snapshot| Session::from_snapshot(token, snapshot));
        match parsed {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Stored user snapshot is malformed");
                Session::empty()
            }
        }
    }

    /// Write both entries. An empty session clears them instead.
    pub fn persist(&mut self, session: &Session) -> Result<()> {
        let (Some(token), Some(snapshot)) = (session.token(), session.snapshot()) else {
            return self.clear();
        };
        let user_json =
            serde_json::to_string(snapshot).map_err(|e| ClientError::Storage(e.to_string()))?;
        self.kv.set(TOKEN_KEY, token)?;
        self.kv.set(USER_KEY, &user_json)
    }

    /// Remove both entries. Both removals are attempted even if one fails.
    pub fn clear(&mut self) -> Result<()> {
        let token = self.kv.remove(TOKEN_KEY);
        let user = self.kv.remove(USER_KEY);
        token.and(user)
    }
}
