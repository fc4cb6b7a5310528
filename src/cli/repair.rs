//! Repair subcommand implementation.
//!
//! Checks whether each stored collection can be read and, when asked
//! explicitly, resets unreadable ones to empty.

use super::Session;
use crate::error::{CliError, CliResult, StoreError};
use crate::output;
use crate::storage::{Collection, RecordStore};
use clap::Parser;

/// Check stored collections and reset unreadable ones.
#[derive(Parser, Debug)]
pub struct RepairCommand {
    /// Collection to reset (checks all when omitted)
    #[arg(long, value_enum, value_name = "COLLECTION")]
    pub reset: Option<Collection>,

    /// Confirm the reset; the collection's contents are discarded
    #[arg(short = 'y', long)]
    pub yes: bool,
}

impl RepairCommand {
    pub fn execute(self, session: Session) -> CliResult<()> {
        if let Some(collection) = self.reset {
            if !self.yes {
                return Err(CliError::Other(format!(
                    "resetting '{}' discards its contents; re-run with --yes to confirm",
                    collection.key()
                )));
            }

            let mut store = session.store;
            store.reset(collection)?;
            if !session.quiet {
                output::print_success(&format!("Reset '{}' to an empty collection", collection.key()));
            }
            return Ok(());
        }

        // always check with the strict policy so corruption is not masked
        let store = RecordStore::open(&session.records_dir)?;
        let mut unreadable = 0;

        for collection in [Collection::Patients, Collection::Scans] {
            let result = match collection {
                Collection::Patients => store.list_patients().map(|p| p.len()),
                Collection::Scans => store.list_scan_records().map(|s| s.len()),
            };

            match result {
                Ok(count) => {
                    if !session.quiet {
                        output::print_success(&format!(
                            "'{}' is readable ({} record(s))",
                            collection.key(),
                            count
                        ));
                    }
                }
                Err(StoreError::Persistence(e)) => {
                    unreadable += 1;
                    output::print_error(&e.to_string());
                    output::print_info(&format!(
                        "run `scandesk repair --reset {} --yes` to start it over",
                        collection.key()
                    ));
                }
                Err(e) => return Err(e.into()),
            }
        }

        if unreadable > 0 {
            return Err(CliError::Other(format!(
                "{} collection(s) could not be read",
                unreadable
            )));
        }
        Ok(())
    }
}
