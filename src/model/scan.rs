//! Scan records and their image files.

use super::{empty_as_none, non_blank, Actor};
use crate::error::ValidationError;
use crate::types::{FileId, PatientId, ScanId, ScanType};
use crate::workflow::ScanStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Descriptor of one uploaded image. The bytes live in `data_url`; the core
/// never decodes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFile {
    pub id: FileId,
    /// Original file name.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME type, e.g. `image/png`.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Self-describing `data:` URL carrying the image.
    pub data_url: String,
    /// Preview URL. Same as `data_url` unless a caller supplies one.
    pub thumbnail_url: String,
}

impl ImageFile {
    /// Create a file descriptor, using the data URL as its thumbnail.
    pub fn new(
        name: impl Into<String>,
        size: u64,
        mime_type: impl Into<String>,
        data_url: impl Into<String>,
    ) -> Self {
        let data_url = data_url.into();
        Self {
            id: FileId::new(),
            name: name.into(),
            size,
            mime_type: mime_type.into(),
            thumbnail_url: data_url.clone(),
            data_url,
        }
    }
}

/// A persisted scan record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    /// Unique identifier for this scan.
    pub id: ScanId,
    /// Patient the scan belongs to.
    pub patient_id: PatientId,
    /// Patient's name at intake time.
    pub patient_name: String,
    pub scan_type: ScanType,
    /// When the scan was submitted.
    pub upload_date: DateTime<Utc>,
    /// Display name of the submitting technician.
    pub uploaded_by: String,
    /// Identifier of the submitting technician.
    pub technician_id: String,
    /// Uploaded images, in submission order.
    pub image_files: Vec<ImageFile>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
    pub status: ScanStatus,
    /// Bumped on every status write.
    #[serde(default)]
    pub version: u64,
}

impl ScanRecord {
    pub fn file_count(&self) -> usize {
        self.image_files.len()
    }

    /// Total size of all image files in bytes.
    pub fn total_size(&self) -> u64 {
        self.image_files.iter().map(|f| f.size).sum()
    }

    /// Get a short summary of the scan.
    pub fn summary(&self) -> String {
        format!(
            "{} - {} ({} files) [{}]",
            self.patient_name,
            self.scan_type.label(),
            self.file_count(),
            self.status
        )
    }
}

/// Input for creating a scan record.
#[derive(Debug, Clone)]
pub struct NewScan {
    pub patient_id: PatientId,
    pub scan_type: ScanType,
    pub image_files: Vec<ImageFile>,
    pub notes: Option<String>,
    pub submitted_by: Actor,
}

impl NewScan {
    pub fn new(patient_id: PatientId, scan_type: ScanType, image_files: Vec<ImageFile>) -> Self {
        Self {
            patient_id,
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

    /// Check the scan carries at least one file.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.image_files.is_empty() {
            return Err(ValidationError::NoImageFiles);
        }
        Ok(())
    }

    /// Validate and build a pending record for the named patient.
    pub(crate) fn into_record(self, patient_name: &str) -> Result<ScanRecord, ValidationError> {
        self.validate()?;
        Ok(ScanRecord {
            id: ScanId::new(),
            patient_id: self.patient_id,
            patient_name: patient_name.to_string(),
            scan_type: self.scan_type,
            upload_date: Utc::now(),
            uploaded_by: self.submitted_by.name,
            technician_id: self.submitted_by.id,
            image_files: self.image_files,
            notes: non_blank(self.notes),
            status: ScanStatus::Pending,
            version: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;

    fn png(name: &str) -> ImageFile {
        ImageFile::new(name, 1024, "image/png", "data:image/png;base64,AAAA")
    }

    #[test]
    fn test_new_scan_requires_files() {
        let scan = NewScan::new(PatientId::new(), ScanType::Panoramic, vec![]);
        assert_eq!(scan.validate(), Err(ValidationError::NoImageFiles));
    }

    #[test]
    fn test_into_record_starts_pending() {
        let actor = Actor::new("tech-1", "Sam", Role::Technician);
        let record = NewScan::new(PatientId::new(), ScanType::Cbct, vec![png("a.png")])
            .with_notes("upper arch")
            .submitted_by(actor)
            .into_record("Jane Doe")
            .unwrap();

        assert_eq!(record.status, ScanStatus::Pending);
        assert_eq!(record.version, 0);
        assert_eq!(record.patient_name, "Jane Doe");
        assert_eq!(record.technician_id, "tech-1");
        assert_eq!(record.uploaded_by, "Sam");
        assert_eq!(record.notes.as_deref(), Some("upper arch"));
    }

    #[test]
    fn test_anonymous_submitter_defaults() {
        let record = NewScan::new(PatientId::new(), ScanType::Intraoral, vec![png("a.png")])
            .into_record("X")
            .unwrap();
        assert_eq!(record.uploaded_by, "Unknown");
        assert_eq!(record.technician_id, "");
    }

    #[test]
    fn test_legacy_scan_json_loads() {
        let json = r#"{
            "id": "scan_1718000000000",
            "patientId": "patient_1718000000000",
            "patientName": "Jane Doe",
            "scanType": "panoramic",
            "uploadDate": "2024-06-10T08:15:00.000Z",
            "uploadedBy": "Sam",
            "technicianId": "tech-1",
            "imageFiles": [{
                "id": "file_1718000000000_0",
                "name": "pano.jpg",
                "size": 2048,
                "type": "image/jpeg",
                "dataUrl": "data:image/jpeg;base64,AAAA",
                "thumbnailUrl": "data:image/jpeg;base64,AAAA"
            }],
            "notes": "",
            "status": "pending"
        }"#;
        let record: ScanRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.scan_type, ScanType::Panoramic);
        assert_eq!(record.image_files[0].mime_type, "image/jpeg");
        assert_eq!(record.notes, None);
        assert_eq!(record.version, 0);
        assert_eq!(record.total_size(), 2048);
    }
}
