//! Key-value media the record store persists through.
//!
//! A backend stores one opaque document per key and must replace it
//! atomically: a reader sees either the old document or the new one.

use crate::error::PersistenceError;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Durable key-value storage for whole collections.
pub trait StorageBackend {
    /// Read the document stored under `key`, or `None` if there is none.
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Replace the document stored under `key`.
    fn write(&mut self, key: &str, contents: &str) -> Result<(), PersistenceError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Open (creating if needed) a data directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| PersistenceError::Unavailable {
            key: dir.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Get the file path for a key.
    pub fn file_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn temp_file_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".{}.json.tmp", key))
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let file = self.file_for(key);
        if !file.exists() {
            debug!(key, "no stored collection");
            return Ok(None);
        }

        let content = fs::read_to_string(&file).map_err(|e| match e.kind() {
            // not UTF-8: the bytes are there but unreadable as a collection
            io::ErrorKind::InvalidData => PersistenceError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            },
            _ => PersistenceError::Unavailable {
                key: key.to_string(),
                reason: e.to_string(),
            },
        })?;
        debug!(key, bytes = content.len(), "read collection");
        Ok(Some(content))
    }

    fn write(&mut self, key: &str, contents: &str) -> Result<(), PersistenceError> {
        let write_failed = |e: io::Error| PersistenceError::WriteFailed {
            key: key.to_string(),
            reason: e.to_string(),
        };

        // rename within one directory replaces the target atomically
        let temp = self.temp_file_for(key);
        fs::write(&temp, contents).map_err(write_failed)?;
        fs::rename(&temp, self.file_for(key)).map_err(write_failed)?;

        debug!(key, bytes = contents.len(), "wrote collection");
        Ok(())
    }
}

/// Volatile backend for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw document, e.g. data written by another client.
    pub fn with_entry(mut self, key: impl Into<String>, contents: impl Into<String>) -> Self {
        self.entries.insert(key.into(), contents.into());
        self
    }

    /// Raw document currently stored under `key`.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, contents: &str) -> Result<(), PersistenceError> {
        self.entries.insert(key.to_string(), contents.to_string());
        Ok(())
    }
}

/// Memory backend that refuses writes to one key.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FailingBackend {
    pub inner: MemoryBackend,
    pub fail_key: String,
}

#[cfg(test)]
impl FailingBackend {
    pub fn failing_on(key: &str) -> Self {
        Self {
            inner: MemoryBackend::new(),
            fail_key: key.to_string(),
        }
    }
}

#[cfg(test)]
impl StorageBackend for FailingBackend {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.inner.read(key)
    }

    fn write(&mut self, key: &str, contents: &str) -> Result<(), PersistenceError> {
        if key == self.fail_key {
            return Err(PersistenceError::WriteFailed {
                key: key.to_string(),
                reason: "medium is read-only".to_string(),
            });
        }
        self.inner.write(key, contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_backend_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = FileBackend::open(dir.path()).unwrap();

        assert!(backend.read("scans").unwrap().is_none());
        backend.write("scans", "[]").unwrap();
        assert_eq!(backend.read("scans").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("scans.json").exists());
    }

    #[test]
    fn test_file_backend_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = FileBackend::open(dir.path()).unwrap();
        backend.write("patients", "[1]").unwrap();
        backend.write("patients", "[1,2]").unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["patients.json".to_string()]);
        assert_eq!(backend.read("patients").unwrap().as_deref(), Some("[1,2]"));
    }

    #[test]
    fn test_file_backend_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let backend = FileBackend::open(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(backend.file_for("scans"), nested.join("scans.json"));
    }

    #[test]
    fn test_non_utf8_file_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();
        fs::write(backend.file_for("scans"), [0xff, 0xfe, b'[', b']']).unwrap();

        assert!(matches!(
            backend.read("scans"),
            Err(PersistenceError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_memory_backend_keys_are_independent() {
        let mut backend = MemoryBackend::new();
        backend.write("patients", "[]").unwrap();
        assert!(backend.read("scans").unwrap().is_none());
        assert_eq!(backend.raw("patients"), Some("[]"));
    }
}
