//! # scandesk - Dental Scan Intake and Review
//!
//! scandesk keeps the patient and scan records behind a dental imaging
//! workflow: technicians submit scans for a patient, dentists review and
//! approve them.
//!
//! ## Features
//!
//! - **Record Store**: Durable JSON collections of patients and scans, written
//!   whole and atomically on every change
//! - **Review Workflow**: `pending -> reviewed -> approved`, with a strict
//!   transition path, an explicit force path and optimistic versioning
//! - **Intake**: Register-or-reuse a patient and submit a scan as one unit,
//!   with rollback if the second write fails
//! - **Queries**: Search, status counts, unique patients and per-technician
//!   recent uploads
//!
//! ## Example Usage
//!
//! ```rust
//! use scandesk::model::{ImageFile, NewPatient};
//! use scandesk::query;
//! use scandesk::storage::RecordStore;
//! use scandesk::types::ScanType;
//! use scandesk::workflow::{IntakeRequest, PatientRef, ScanStatus};
//!
//! let mut store = RecordStore::in_memory();
//! let receipt = IntakeRequest::new(
//!     PatientRef::New(NewPatient::new("Jane Doe", "555-1000")),
//!     ScanType::Panoramic,
//!     vec![ImageFile::new("pano.png", 2048, "image/png", "data:image/png;base64,AAAA")],
//! )
//! .submit(&mut store)?;
//!
//! store.transition_scan_status(&receipt.scan.id, ScanStatus::Approved)?;
//!
//! let all = store.list_scan_records()?;
//! assert_eq!(query::count_by_status(&all, ScanStatus::Approved), 1);
//! # Ok::<(), scandesk::StoreError>(())
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`types`] - Identifiers and the scan type enumeration
//! - [`model`] - Patients, scan records and the acting user
//! - [`storage`] - The record store and its backends
//! - [`workflow`] - Status state machine, intake and review
//! - [`query`] - Search and aggregation over snapshots
//! - [`config`] - Paths and settings
//! - [`error`] - Error types
//! - [`cli`] / [`output`] - The command-line front end

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod query;
pub mod storage;
pub mod types;
pub mod workflow;

// Re-export commonly used types
pub use error::{CliError, PersistenceError, StoreError, ValidationError};
pub use model::{Actor, ImageFile, NewPatient, NewScan, Patient, ScanRecord};
pub use storage::RecordStore;
pub use types::{PatientId, ScanId, ScanType};
pub use workflow::{IntakeRequest, PatientRef, ScanStatus};
