//! Error types for scandesk.
//!
//! Uses `thiserror` for ergonomic error definitions.

use crate::workflow::ScanStatus;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which collection a missing record was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Patient,
    Scan,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Patient => write!(f, "patient"),
            Self::Scan => write!(f, "scan"),
        }
    }
}

/// Input rejected before anything is written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("required field '{0}' is missing or empty")]
    MissingField(&'static str),

    #[error("a scan needs at least one image file")]
    NoImageFiles,

    #[error("unknown scan type: {0}")]
    UnknownScanType(String),

    #[error("unknown scan status: {0}")]
    UnknownStatus(String),
}

/// Failures of the durable medium behind the record store.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("storage for '{key}' is unavailable: {reason}")]
    Unavailable { key: String, reason: String },

    #[error("stored '{key}' collection is unreadable: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("failed to write '{key}' collection: {reason}")]
    WriteFailed { key: String, reason: String },

    #[error("serialization error")]
    Serialize(#[from] serde_json::Error),

    #[error("rollback of '{key}' failed after an aborted intake: {reason}")]
    RollbackFailed { key: String, reason: String },
}

/// Main error type for record store and workflow operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("validation failed")]
    Validation(#[from] ValidationError),

    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: String },

    #[error("ambiguous {kind} prefix '{prefix}': {matches} matches")]
    AmbiguousPrefix {
        kind: RecordKind,
        prefix: String,
        matches: usize,
    },

    #[error("illegal status transition: {from} -> {to}")]
    InvalidTransition { from: ScanStatus, to: ScanStatus },

    #[error("scan {id} was modified concurrently (expected version {expected}, found {found})")]
    Conflict {
        id: String,
        expected: u64,
        found: u64,
    },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl StoreError {
    pub(crate) fn not_found(kind: RecordKind, id: impl fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// Result type alias for record store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine a home directory for configuration")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings format: {0}")]
    InvalidFormat(String),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors surfaced by command-line handlers.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read image file {path}: {reason}")]
    Ingest { path: PathBuf, reason: String },

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<ValidationError> for CliError {
    fn from(e: ValidationError) -> Self {
        Self::Store(StoreError::Validation(e))
    }
}

impl From<PersistenceError> for CliError {
    fn from(e: PersistenceError) -> Self {
        Self::Store(StoreError::Persistence(e))
    }
}

/// Result type alias for CLI handlers.
pub type CliResult<T> = Result<T, CliError>;
