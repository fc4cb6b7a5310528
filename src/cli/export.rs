//! Export subcommand implementation.
//!
//! Handles `scandesk export` for writing scan records to a file or stdout.

use super::{OutputFormat, Session};
use crate::error::{CliError, CliResult};
use crate::model::ScanRecord;
use crate::output;
use crate::query;
use crate::workflow::ScanStatus;
use clap::Parser;
use std::fs;
use std::path::PathBuf;

/// Export scan records.
#[derive(Parser, Debug)]
pub struct ExportCommand {
    /// Export only this scan (ID or prefix)
    #[arg(value_name = "SCAN_ID")]
    pub scan_id: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Output file path (prints to stdout if not specified)
    #[arg(short = 'o', long = "output")]
    pub output_file: Option<PathBuf>,

    /// Export only scans with this status
    #[arg(long, value_enum, conflicts_with = "scan_id")]
    pub status: Option<ScanStatus>,

    /// Drop embedded image data from JSON output
    #[arg(long)]
    pub without_images: bool,
}

impl ExportCommand {
    /// Execute the export command.
    pub fn execute(&self, session: Session) -> CliResult<()> {
        let mut records = match &self.scan_id {
            Some(prefix) => vec![session.store.find_scan_by_prefix(prefix)?],
            None => session.store.list_scan_records()?,
        };
        if let Some(status) = self.status {
            records = query::filter_by_status(&records, status);
        }
        if self.without_images {
            strip_image_data(&mut records);
        }

        let content = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&records)
                .map_err(|e| CliError::Other(e.to_string()))?,
            OutputFormat::Csv => {
                output::to_csv_string(&records).map_err(|e| CliError::Other(e.to_string()))?
            }
            OutputFormat::Plain => generate_plain(&records),
        };

        // Write to file or stdout
        if let Some(ref path) = self.output_file {
            fs::write(path, &content)
                .map_err(|e| CliError::Other(format!("failed to write file: {}", e)))?;

            if !session.quiet {
                output::print_success(&format!(
                    "Exported {} scan(s) to {}",
                    records.len(),
                    path.display()
                ));
            }
        } else {
            println!("{}", content);
        }

        Ok(())
    }
}

fn strip_image_data(records: &mut [ScanRecord]) {
    for file in records.iter_mut().flat_map(|r| r.image_files.iter_mut()) {
        file.data_url.clear();
        file.thumbnail_url.clear();
    }
}

/// Generate plain text output.
fn generate_plain(records: &[ScanRecord]) -> String {
    let mut output = String::new();

    output.push_str(&format!("Scan Export: {} record(s)\n", records.len()));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    for record in records {
        output.push('\n');
        output.push_str(&format!("Scan:         {}\n", record.id));
        output.push_str(&format!("Patient:      {} ({})\n", record.patient_name, record.patient_id));
        output.push_str(&format!("Scan Type:    {}\n", record.scan_type.label()));
        output.push_str(&format!("Uploaded:     {}\n", record.upload_date));
        output.push_str(&format!(
            "Uploaded By:  {} ({})\n",
            record.uploaded_by, record.technician_id
        ));
        output.push_str(&format!("Status:       {}\n", record.status));
        if let Some(notes) = &record.notes {
            output.push_str(&format!("Notes:        {}\n", notes));
        }
        output.push_str(&format!("Files:        {}\n", record.file_count()));
        for file in &record.image_files {
            output.push_str(&format!(
                "  - {} ({}, {} bytes)\n",
                file.name, file.mime_type, file.size
            ));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImageFile, NewPatient, NewScan};
    use crate::storage::RecordStore;
    use crate::types::ScanType;

    fn records() -> Vec<ScanRecord> {
        let mut store = RecordStore::in_memory();
        let patient = store
            .create_patient(NewPatient::new("Jane Doe", "555-1000"))
            .unwrap();
        store
            .create_scan_record(NewScan::new(
                patient.id,
                ScanType::Cbct,
                vec![ImageFile::new("vol.png", 9, "image/png", "data:image/png;base64,AAAA")],
            ))
            .unwrap();
        store.list_scan_records().unwrap()
    }

    #[test]
    fn test_strip_image_data() {
        let mut records = records();
        strip_image_data(&mut records);
        assert!(records[0].image_files[0].data_url.is_empty());
        assert_eq!(records[0].image_files[0].name, "vol.png");
    }

    #[test]
    fn test_generate_plain_lists_files() {
        let text = generate_plain(&records());
        assert!(text.starts_with("Scan Export: 1 record(s)"));
        assert!(text.contains("Patient:      Jane Doe"));
        assert!(text.contains("  - vol.png (image/png, 9 bytes)"));
    }
}
