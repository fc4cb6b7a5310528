//! Dentist-side review: choose how strictly status changes are checked.

use super::ScanStatus;
use crate::error::StoreResult;
use crate::model::ScanRecord;
use crate::storage::{RecordStore, StorageBackend};
use crate::types::ScanId;
use serde::{Deserialize, Serialize};

/// How a review applies a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReviewPolicy {
    /// Only forward transitions (or no change) are accepted.
    #[default]
    Strict,
    /// Any target status is written, including regressions.
    Permissive,
}

impl<B: StorageBackend> RecordStore<B> {
    /// Apply a reviewer's status decision under `policy`.
    ///
    /// With `expected_version` set the write only succeeds if nobody changed
    /// the record since it was read. Version checks always use the strict
    /// transition rules.
    pub fn review(
        &mut self,
        id: &ScanId,
        status: ScanStatus,
        policy: ReviewPolicy,
        expected_version: Option<u64>,
    ) -> StoreResult<ScanRecord> {
        match (expected_version, policy) {
            (Some(version), _) => self.update_scan_status_versioned(id, version, status),
            (None, ReviewPolicy::Strict) => self.transition_scan_status(id, status),
            (None, ReviewPolicy::Permissive) => self.update_scan_status(id, status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::model::{ImageFile, NewPatient, NewScan};
    use crate::storage::MemoryBackend;
    use crate::types::ScanType;

    fn approved_scan() -> (RecordStore<MemoryBackend>, ScanId) {
        let mut store = RecordStore::in_memory();
        let patient = store
            .create_patient(NewPatient::new("Jane Doe", "555-1000"))
            .unwrap();
        let scan = store
            .create_scan_record(NewScan::new(
                patient.id,
                ScanType::Extraoral,
                vec![ImageFile::new("a.png", 1, "image/png", "data:image/png;base64,")],
            ))
            .unwrap();
        store
            .review(&scan.id, ScanStatus::Approved, ReviewPolicy::Strict, None)
            .unwrap();
        (store, scan.id)
    }

    #[test]
    fn test_strict_review_blocks_regression() {
        let (mut store, id) = approved_scan();
        let err = store
            .review(&id, ScanStatus::Pending, ReviewPolicy::Strict, None)
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidTransition { .. }));
    }

    #[test]
    fn test_permissive_review_forces_regression() {
        let (mut store, id) = approved_scan();
        let record = store
            .review(&id, ScanStatus::Reviewed, ReviewPolicy::Permissive, None)
            .unwrap();
        assert_eq!(record.status, ScanStatus::Reviewed);
    }

    #[test]
    fn test_versioned_review_ignores_permissive_policy() {
        let (mut store, id) = approved_scan();
        let err = store
            .review(&id, ScanStatus::Pending, ReviewPolicy::Permissive, Some(1))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidTransition { .. }));
    }
}
