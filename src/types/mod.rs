//! Core type definitions using newtype patterns for type safety.
//!
//! Identifiers for the three record kinds are distinct types, and the scan
//! modality is a closed enumeration, so a stray string never reaches storage.

mod ids;
mod scan_type;

pub use ids::{FileId, IdError, PatientId, ScanId};
pub use scan_type::ScanType;
