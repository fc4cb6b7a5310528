//! Intake subcommand implementation.
//!
//! Handles `scandesk intake` for technicians submitting new scans.

use super::ingest::load_images;
use super::{OutputFormat, Session};
use crate::error::CliResult;
use crate::model::NewPatient;
use crate::output;
use crate::types::ScanType;
use crate::workflow::{IntakeRequest, PatientRef};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Submit a new scan for review.
#[derive(Parser, Debug)]
pub struct IntakeCommand {
    /// Image files making up the scan
    #[arg(value_name = "FILES", required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// File the scan under an existing patient (ID or prefix)
    #[arg(long, conflicts_with_all = ["name", "phone", "email", "dob"])]
    pub patient_id: Option<String>,

    /// Patient's full name
    #[arg(long, required_unless_present = "patient_id")]
    pub name: Option<String>,

    /// Patient's phone number
    #[arg(long, required_unless_present = "patient_id")]
    pub phone: Option<String>,

    /// Patient's email address
    #[arg(long)]
    pub email: Option<String>,

    /// Patient's date of birth (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub dob: Option<NaiveDate>,

    /// Scan type
    #[arg(short = 's', long = "scan-type", value_enum, default_value = "intraoral")]
    pub scan_type: ScanType,

    /// Additional scan information
    #[arg(short, long)]
    pub notes: Option<String>,

    /// Output format for the created record
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

impl IntakeCommand {
    /// Execute the intake command.
    pub fn execute(self, mut session: Session) -> CliResult<()> {
        let format = session.format_or_default(self.format);

        let patient = match &self.patient_id {
            Some(prefix) => PatientRef::Existing(session.store.find_patient_by_prefix(prefix)?.id),
            None => {
                let mut input = NewPatient::new(
                    self.name.clone().unwrap_or_default(),
                    self.phone.clone().unwrap_or_default(),
                );
                input.email = self.email.clone();
                input.date_of_birth = self.dob;
                PatientRef::New(input)
            }
        };

        let ingest = load_images(&self.files)?;
        for path in &ingest.skipped {
            output::print_warning(&format!(
                "skipping {}: only image files can be uploaded",
                path.display()
            ));
        }

        let mut request = IntakeRequest::new(patient, self.scan_type, ingest.files)
            .submitted_by(session.actor_or_anonymous());
        if let Some(notes) = self.notes {
            request = request.with_notes(notes);
        }

        let receipt = request.submit(&mut session.store)?;

        match format {
            OutputFormat::Plain => {
                if !session.quiet {
                    if receipt.patient_created {
                        output::print_info(&format!(
                            "Registered patient {} ({})",
                            receipt.patient.name,
                            receipt.patient.id.short()
                        ));
                    }
                    output::print_success(&format!(
                        "Scan {} submitted: {}",
                        receipt.scan.id.short(),
                        receipt.scan.summary()
                    ));
                }
            }
            OutputFormat::Json => output::print_json(&receipt.scan)?,
            OutputFormat::Csv => output::print_csv(std::slice::from_ref(&receipt.scan))?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_new_patient_requires_name_and_phone() {
        assert!(Cli::try_parse_from(["scandesk", "intake", "a.png", "--name", "Jane"]).is_err());
        assert!(Cli::try_parse_from([
            "scandesk", "intake", "a.png", "--name", "Jane", "--phone", "555"
        ])
        .is_ok());
    }

    #[test]
    fn test_existing_patient_conflicts_with_details() {
        assert!(Cli::try_parse_from([
            "scandesk",
            "intake",
            "a.png",
            "--patient-id",
            "abc",
            "--name",
            "Jane"
        ])
        .is_err());

        let cli = Cli::try_parse_from(["scandesk", "intake", "a.png", "b.png", "--patient-id", "abc"])
            .unwrap();
        match cli.command {
            Commands::Intake(cmd) => {
                assert_eq!(cmd.files.len(), 2);
                assert_eq!(cmd.patient_id.as_deref(), Some("abc"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_scan_type_and_dob_parse() {
        let cli = Cli::try_parse_from([
            "scandesk", "intake", "a.png", "--name", "J", "--phone", "1", "-s", "cbct", "--dob",
            "1990-04-12",
        ])
        .unwrap();
        match cli.command {
            Commands::Intake(cmd) => {
                assert_eq!(cmd.scan_type, crate::types::ScanType::Cbct);
                assert!(cmd.dob.is_some());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
