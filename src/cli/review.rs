//! Review subcommand implementation.
//!
//! Handles `scandesk review <scan-id> <status>` for dentists.

use super::{OutputFormat, Session};
use crate::error::CliResult;
use crate::output;
use crate::workflow::{ReviewPolicy, ScanStatus};
use clap::Parser;

/// Change the review status of a scan.
#[derive(Parser, Debug)]
pub struct ReviewCommand {
    /// Scan ID or prefix
    #[arg(value_name = "SCAN_ID")]
    pub scan_id: String,

    /// New status
    #[arg(value_name = "STATUS", value_enum)]
    pub status: ScanStatus,

    /// Allow moving a scan backward (e.g. approved -> pending)
    #[arg(long)]
    pub force: bool,

    /// Only apply if the scan is still at this version
    #[arg(long, value_name = "VERSION")]
    pub expect_version: Option<u64>,

    /// Output format for the updated record
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

impl ReviewCommand {
    /// Execute the review command.
    pub fn execute(self, mut session: Session) -> CliResult<()> {
        let format = session.format_or_default(self.format);
        let policy = if self.force {
            ReviewPolicy::Permissive
        } else {
            session.settings.review_policy
        };

        // backward moves under the permissive policy are logged by the store
        let current = session.store.find_scan_by_prefix(&self.scan_id)?;
        let updated = session
            .store
            .review(&current.id, self.status, policy, self.expect_version)?;

        match format {
            OutputFormat::Plain => {
                if !session.quiet {
                    output::print_success(&format!(
                        "Scan {} for {} is now {}",
                        updated.id.short(),
                        updated.patient_name,
                        output::status_style(updated.status).apply_to(updated.status)
                    ));
                }
            }
            OutputFormat::Json => output::print_json(&updated)?,
            OutputFormat::Csv => output::print_csv(std::slice::from_ref(&updated))?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppSettings;
    use crate::model::{ImageFile, NewPatient, NewScan};
    use crate::storage::RecordStore;
    use crate::types::ScanType;
    use std::path::Path;

    fn session(dir: &Path) -> Session {
        Session {
            store: RecordStore::open(dir).unwrap(),
            settings: AppSettings::default(),
            records_dir: dir.to_path_buf(),
            actor: None,
            quiet: true,
        }
    }

    fn command(scan_id: &str, status: ScanStatus, force: bool) -> ReviewCommand {
        ReviewCommand {
            scan_id: scan_id.to_string(),
            status,
            force,
            expect_version: None,
            format: Some(OutputFormat::Plain),
        }
    }

    #[test]
    fn test_forced_review_moves_scan_backward() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = RecordStore::open(dir.path()).unwrap();
        let patient = store
            .create_patient(NewPatient::new("Jane Doe", "555-1000"))
            .unwrap();
        let scan = store
            .create_scan_record(NewScan::new(
                patient.id,
                ScanType::Panoramic,
                vec![ImageFile::new("a.png", 1, "image/png", "data:,")],
            ))
            .unwrap();
        let prefix = scan.id.short().to_string();

        command(&prefix, ScanStatus::Approved, false)
            .execute(session(dir.path()))
            .unwrap();
        assert!(command(&prefix, ScanStatus::Pending, false)
            .execute(session(dir.path()))
            .is_err());

        command(&prefix, ScanStatus::Pending, true)
            .execute(session(dir.path()))
            .unwrap();
        let stored = RecordStore::open(dir.path()).unwrap().get_scan(&scan.id).unwrap();
        assert_eq!(stored.status, ScanStatus::Pending);
        assert_eq!(stored.version, 2);
    }

    #[test]
    fn test_blank_scan_id_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = command("", ScanStatus::Approved, false)
            .execute(session(dir.path()))
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::CliError::Store(crate::error::StoreError::NotFound { .. })
        ));
    }
}
