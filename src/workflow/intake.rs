//! Technician-side intake: register or reuse a patient, then submit a scan.
//!
//! The two writes form one logical unit. All input is validated before the
//! first write, and if the scan cannot be stored after a new patient was
//! written, the patient collection is restored to its previous snapshot so no
//! orphan patient is left behind.

use crate::error::{PersistenceError, RecordKind, StoreError, StoreResult, ValidationError};
use crate::model::{Actor, ImageFile, NewPatient, NewScan, Patient, ScanRecord};
use crate::storage::{RecordStore, StorageBackend, PATIENTS_KEY};
use crate::types::{PatientId, ScanType};
use tracing::{error, info};

/// Which patient a scan is filed under.
#[derive(Debug, Clone)]
pub enum PatientRef {
    /// A patient already in the store.
    Existing(PatientId),
    /// Register a new patient as part of the intake.
    New(NewPatient),
}

/// A complete intake submission.
#[derive(Debug, Clone)]
pub struct IntakeRequest {
    pub patient: PatientRef,
    pub scan_type: ScanType,
    pub image_files: Vec<ImageFile>,
    pub notes: Option<String>,
    pub submitted_by: Actor,
}

/// Outcome of a successful intake.
#[derive(Debug, Clone)]
pub struct IntakeReceipt {
    pub patient: Patient,
    pub scan: ScanRecord,
    /// Whether `patient` was created by this intake.
    pub patient_created: bool,
}

impl IntakeRequest {
    pub fn new(patient: PatientRef, scan_type: ScanType, image_files: Vec<ImageFile>) -> Self {
        Self {
            patient,
            scan_type,
            image_files,
            notes: None,
            submitted_by: Actor::anonymous(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn submitted_by(mut self, actor: Actor) -> Self {
        self.submitted_by = actor;
        self
    }

    /// Check everything that can be checked without touching storage.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let PatientRef::New(input) = &self.patient {
            input.validate()?;
        }
        if self.image_files.is_empty() {
            return Err(ValidationError::NoImageFiles);
        }
        Ok(())
    }

    /// Run the intake against `store`.
    pub fn submit<B: StorageBackend>(self, store: &mut RecordStore<B>) -> StoreResult<IntakeReceipt> {
        self.validate()?;

        // load both snapshots up front so an unreadable scan collection fails
        // before the patient write
        let mut patients = store.load_patients()?;
        let mut scans = store.load_scans()?;

        let (patient, previous_patients) = match self.patient {
            PatientRef::Existing(id) => {
                let patient = patients
                    .iter()
                    .find(|p| p.id == id)
                    .cloned()
                    .ok_or_else(|| StoreError::not_found(RecordKind::Patient, &id))?;
                (patient, None)
            }
            PatientRef::New(input) => {
                let patient = input.into_patient()?;
                let previous = patients.clone();
                patients.push(patient.clone());
                store.save_patients(&patients)?;
                (patient, Some(previous))
            }
        };

        let new_scan = NewScan {
            patient_id: patient.id.clone(),
            scan_type: self.scan_type,
            image_files: self.image_files,
            notes: self.notes,
            submitted_by: self.submitted_by,
        };

        let scan = match new_scan
            .into_record(&patient.name)
            .map_err(StoreError::from)
            .and_then(|scan| {
                scans.push(scan.clone());
                store.save_scans(&scans).map(|_| scan)
            }) {
            Ok(scan) => scan,
            Err(e) => {
                if let Some(previous) = &previous_patients {
                    rollback_patient(store, previous, &patient, &e)?;
                }
                return Err(e);
            }
        };

        let patient_created = previous_patients.is_some();
        info!(
            scan = %scan.id,
            patient = %patient.id,
            patient_created,
            technician = %scan.technician_id,
            "intake complete"
        );

        Ok(IntakeReceipt {
            patient,
            scan,
            patient_created,
        })
    }
}

fn rollback_patient<B: StorageBackend>(
    store: &mut RecordStore<B>,
    previous: &[Patient],
    patient: &Patient,
    cause: &StoreError,
) -> StoreResult<()> {
    match store.save_patients(previous) {
        Ok(()) => {
            info!(patient = %patient.id, "rolled back patient after failed intake");
            Ok(())
        }
        Err(rollback) => {
            error!(
                patient = %patient.id,
                error = %rollback,
                cause = %cause,
                "could not roll back patient"
            );
            Err(PersistenceError::RollbackFailed {
                key: PATIENTS_KEY.to_string(),
                reason: format!("{} (intake failed with: {})", rollback, cause),
            }
            .into())
        }
    }
}
