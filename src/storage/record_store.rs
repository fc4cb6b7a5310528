//! JSON record store for patients and scans.
//!
//! Each collection is one JSON array under its own backend key. Every
//! operation is a synchronous read-modify-write of the whole collection, and
//! callers only ever receive owned copies.

use super::backend::{FileBackend, MemoryBackend, StorageBackend};
use crate::error::{PersistenceError, RecordKind, StoreError, StoreResult};
use crate::model::{NewPatient, NewScan, Patient, ScanRecord};
use crate::types::{PatientId, ScanId};
use crate::workflow::{self, ScanStatus};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// Backend key of the patient collection.
pub const PATIENTS_KEY: &str = "patients";
/// Backend key of the scan collection.
pub const SCANS_KEY: &str = "scans";

/// The two persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Collection {
    Patients,
    Scans,
}

impl Collection {
    pub fn key(self) -> &'static str {
        match self {
            Self::Patients => PATIENTS_KEY,
            Self::Scans => SCANS_KEY,
        }
    }
}

/// What to do when a stored collection cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoadPolicy {
    /// Surface `PersistenceError::Corrupt` and leave the data alone.
    #[default]
    #[serde(rename = "fail")]
    Strict,
    /// Log a warning and act as if the collection were empty. The next write
    /// overwrites the unreadable data.
    #[serde(rename = "reset-empty")]
    TreatAsEmpty,
}

/// Durable store of patients and scan records.
pub struct RecordStore<B = FileBackend> {
    backend: B,
    policy: LoadPolicy,
}

impl RecordStore<FileBackend> {
    /// Open a file-backed store in `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        Ok(Self::new(FileBackend::open(dir)?))
    }
}

impl RecordStore<MemoryBackend> {
    /// Create an empty store that lives only as long as the value.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }
}

impl<B: StorageBackend> RecordStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            policy: LoadPolicy::default(),
        }
    }

    pub fn with_load_policy(mut self, policy: LoadPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn load_policy(&self) -> LoadPolicy {
        self.policy
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Create a patient. Duplicates by name or phone are not detected.
    pub fn create_patient(&mut self, input: NewPatient) -> StoreResult<Patient> {
        let patient = input.into_patient()?;

        let mut patients = self.load_patients()?;
        patients.push(patient.clone());
        self.save_patients(&patients)?;

        info!(patient = %patient.id, "created patient");
        Ok(patient)
    }

    /// Create a pending scan for an existing patient.
    pub fn create_scan_record(&mut self, input: NewScan) -> StoreResult<ScanRecord> {
        input.validate()?;

        let patient = self.get_patient(&input.patient_id)?;
        let record = input.into_record(&patient.name)?;

        let mut scans = self.load_scans()?;
        scans.push(record.clone());
        self.save_scans(&scans)?;

        info!(
            scan = %record.id,
            patient = %record.patient_id,
            scan_type = %record.scan_type,
            files = record.file_count(),
            "created scan record"
        );
        Ok(record)
    }

    /// Overwrite a scan's status without checking the transition.
    ///
    /// Backward moves are accepted and logged. Use
    /// [`transition_scan_status`](Self::transition_scan_status) unless a
    /// regression is really intended.
    pub fn update_scan_status(&mut self, id: &ScanId, status: ScanStatus) -> StoreResult<ScanRecord> {
        self.write_status(id, status, |current| {
            if !workflow::can_transition(current.status, status) {
                warn!(scan = %id, from = %current.status, to = %status, "moving scan backward");
            }
            Ok(())
        })
    }

    /// Move a scan to `status`, rejecting illegal transitions.
    pub fn transition_scan_status(
        &mut self,
        id: &ScanId,
        status: ScanStatus,
    ) -> StoreResult<ScanRecord> {
        self.write_status(id, status, |current| {
            workflow::transition(current.status, status).map(|_| ())
        })
    }

    /// Strict transition that also requires the record to still be at
    /// `expected_version`.
    pub fn update_scan_status_versioned(
        &mut self,
        id: &ScanId,
        expected_version: u64,
        status: ScanStatus,
    ) -> StoreResult<ScanRecord> {
        self.write_status(id, status, |current| {
            if current.version != expected_version {
                return Err(StoreError::Conflict {
                    id: id.to_string(),
                    expected: expected_version,
                    found: current.version,
                });
            }
            workflow::transition(current.status, status).map(|_| ())
        })
    }

    fn write_status(
        &mut self,
        id: &ScanId,
        status: ScanStatus,
        check: impl FnOnce(&ScanRecord) -> StoreResult<()>,
    ) -> StoreResult<ScanRecord> {
        let mut scans = self.load_scans()?;
        let record = scans
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| StoreError::not_found(RecordKind::Scan, id))?;

        check(record)?;

        let from = record.status;
        record.status = status;
        record.version += 1;
        let updated = record.clone();

        self.save_scans(&scans)?;

        info!(scan = %id, %from, to = %status, version = updated.version, "updated scan status");
        Ok(updated)
    }

    /// Snapshot of all patients in creation order.
    pub fn list_patients(&self) -> StoreResult<Vec<Patient>> {
        self.load_patients()
    }

    /// Snapshot of all scan records in creation order.
    pub fn list_scan_records(&self) -> StoreResult<Vec<ScanRecord>> {
        self.load_scans()
    }

    pub fn get_patient(&self, id: &PatientId) -> StoreResult<Patient> {
        self.load_patients()?
            .into_iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| StoreError::not_found(RecordKind::Patient, id))
    }

    pub fn get_scan(&self, id: &ScanId) -> StoreResult<ScanRecord> {
        self.load_scans()?
            .into_iter()
            .find(|s| &s.id == id)
            .ok_or_else(|| StoreError::not_found(RecordKind::Scan, id))
    }

    /// Find a scan by full ID or unique prefix.
    pub fn find_scan_by_prefix(&self, prefix: &str) -> StoreResult<ScanRecord> {
        let prefix = non_empty_prefix(prefix, RecordKind::Scan)?;
        match_prefix(self.load_scans()?, prefix, RecordKind::Scan, |s| {
            (s.id.as_str(), s.id.matches_prefix(prefix))
        })
    }

    /// Find a patient by full ID or unique prefix.
    pub fn find_patient_by_prefix(&self, prefix: &str) -> StoreResult<Patient> {
        let prefix = non_empty_prefix(prefix, RecordKind::Patient)?;
        match_prefix(self.load_patients()?, prefix, RecordKind::Patient, |p| {
            (p.id.as_str(), p.id.matches_prefix(prefix))
        })
    }

    /// Replace a collection with an empty one. This discards its history.
    pub fn reset(&mut self, collection: Collection) -> StoreResult<()> {
        self.write_collection::<serde_json::Value>(collection.key(), &[])?;
        warn!(collection = collection.key(), "collection reset");
        Ok(())
    }

    pub(crate) fn load_patients(&self) -> StoreResult<Vec<Patient>> {
        self.read_collection(PATIENTS_KEY)
    }

    pub(crate) fn load_scans(&self) -> StoreResult<Vec<ScanRecord>> {
        self.read_collection(SCANS_KEY)
    }

    pub(crate) fn save_patients(&mut self, patients: &[Patient]) -> StoreResult<()> {
        self.write_collection(PATIENTS_KEY, patients)
    }

    pub(crate) fn save_scans(&mut self, scans: &[ScanRecord]) -> StoreResult<()> {
        self.write_collection(SCANS_KEY, scans)
    }

    fn read_collection<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Vec<T>> {
        let loaded = self.backend.read(key).and_then(|content| match content {
            None => Ok(Vec::new()),
            Some(content) => {
                serde_json::from_str(&content).map_err(|e| PersistenceError::Corrupt {
                    key: key.to_string(),
                    reason: e.to_string(),
                })
            }
        });

        match (loaded, self.policy) {
            (Err(PersistenceError::Corrupt { reason, .. }), LoadPolicy::TreatAsEmpty) => {
                warn!(key, error = %reason, "discarding unreadable collection");
                Ok(Vec::new())
            }
            (loaded, _) => Ok(loaded?),
        }
    }

    fn write_collection<T: Serialize>(&mut self, key: &str, items: &[T]) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(items).map_err(PersistenceError::from)?;
        self.backend.write(key, &content)?;
        Ok(())
    }
}

/// Trimmed lookup prefix. A blank prefix names no record.
fn non_empty_prefix(prefix: &str, kind: RecordKind) -> StoreResult<&str> {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return Err(StoreError::not_found(kind, "\"\""));
    }
    Ok(prefix)
}

/// Pick the single item whose ID starts with `prefix`. An exact match wins
/// over longer IDs sharing the prefix.
fn match_prefix<T>(
    items: Vec<T>,
    prefix: &str,
    kind: RecordKind,
    id_of: impl Fn(&T) -> (&str, bool),
) -> StoreResult<T> {
    let mut matches: Vec<T> = items.into_iter().filter(|item| id_of(item).1).collect();

    if let Some(pos) = matches.iter().position(|item| id_of(item).0 == prefix) {
        return Ok(matches.swap_remove(pos));
    }

    match matches.len() {
        0 => Err(StoreError::not_found(kind, prefix)),
        1 => Ok(matches.remove(0)),
        n => Err(StoreError::AmbiguousPrefix {
            kind,
            prefix: prefix.to_string(),
            matches: n,
        }),
    }
}
