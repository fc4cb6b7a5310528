//! CSV output formatting.
//!
//! One row per scan. Image bytes are left out; only the file count and total
//! size are exported.

use crate::model::{Patient, ScanRecord};
use crate::query::DashboardSummary;
use std::io::{self, Write};

const HEADER: [&str; 11] = [
    "id",
    "patient_id",
    "patient_name",
    "scan_type",
    "upload_date",
    "uploaded_by",
    "technician_id",
    "files",
    "total_bytes",
    "status",
    "notes",
];

/// Write scan records as CSV to `writer`.
pub fn write_csv<W: Write>(records: &[ScanRecord], writer: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(HEADER)?;

    for record in records {
        wtr.write_record([
            record.id.as_str(),
            record.patient_id.as_str(),
            record.patient_name.as_str(),
            record.scan_type.as_str(),
            record.upload_date.to_rfc3339().as_str(),
            record.uploaded_by.as_str(),
            record.technician_id.as_str(),
            record.file_count().to_string().as_str(),
            record.total_size().to_string().as_str(),
            record.status.as_str(),
            record.notes.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Render scan records as a CSV string.
pub fn to_csv_string(records: &[ScanRecord]) -> csv::Result<String> {
    let mut buf = Vec::new();
    write_csv(records, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Print results in CSV format.
pub fn print_csv(records: &[ScanRecord]) -> io::Result<()> {
    let stdout = io::stdout();
    write_csv(records, stdout.lock()).map_err(io::Error::from)
}

/// Print patients in CSV format.
pub fn print_patients_csv(patients: &[Patient]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    wtr.write_record(["id", "name", "phone_number", "email", "date_of_birth"])?;
    for patient in patients {
        wtr.write_record([
            patient.id.as_str(),
            patient.name.as_str(),
            patient.phone_number.as_str(),
            patient.email.as_deref().unwrap_or(""),
            patient
                .date_of_birth
                .map(|d| d.to_string())
                .unwrap_or_default()
                .as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Print dashboard figures as a single CSV row.
pub fn print_summary_csv(summary: &DashboardSummary) -> io::Result<()> {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    wtr.write_record(["total_scans", "unique_patients", "pending", "reviewed", "approved"])?;
    wtr.write_record(
        [
            summary.total_scans,
            summary.unique_patients,
            summary.pending,
            summary.reviewed,
            summary.approved,
        ]
        .map(|n| n.to_string()),
    )?;

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImageFile, NewPatient, NewScan};
    use crate::storage::RecordStore;
    use crate::types::ScanType;

    #[test]
    fn test_csv_has_header_and_row() {
        let mut store = RecordStore::in_memory();
        let patient = store
            .create_patient(NewPatient::new("Doe, Jane", "555-1000"))
            .unwrap();
        store
            .create_scan_record(
                NewScan::new(
                    patient.id,
                    ScanType::Panoramic,
                    vec![
                        ImageFile::new("a.png", 100, "image/png", "data:,"),
                        ImageFile::new("b.png", 50, "image/png", "data:,"),
                    ],
                )
                .with_notes("check molars"),
            )
            .unwrap();

        let csv = to_csv_string(&store.list_scan_records().unwrap()).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("id,patient_id,patient_name"));
        assert!(lines[1].contains("\"Doe, Jane\""));
        assert!(lines[1].contains(",panoramic,"));
        assert!(lines[1].contains(",2,150,pending,check molars"));
    }
}
