//! Patient and scan record persistence.
//!
//! Provides a JSON record store over a pluggable key-value backend.

mod backend;
mod record_store;

#[cfg(test)]
pub(crate) use backend::FailingBackend;
pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use record_store::{Collection, LoadPolicy, RecordStore, PATIENTS_KEY, SCANS_KEY};
