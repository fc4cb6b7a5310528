//! Read-only subcommands backing the two dashboards.

use super::{OutputFormat, Session};
use crate::error::{CliError, CliResult};
use crate::output;
use crate::query::{self, DashboardSummary, TechnicianSummary};
use crate::workflow::ScanStatus;
use clap::Parser;

/// List, search and filter scans.
#[derive(Parser, Debug)]
pub struct ScansCommand {
    /// Only scans with this status
    #[arg(long, value_enum)]
    pub status: Option<ScanStatus>,

    /// Search by patient name or scan type
    #[arg(short = 'S', long, value_name = "TERM")]
    pub search: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

impl ScansCommand {
    pub fn execute(self, session: Session) -> CliResult<()> {
        let format = session.format_or_default(self.format);
        let all = session.store.list_scan_records()?;

        let term = self.search.as_deref().unwrap_or("");
        let mut records = query::search(&all, term);
        if let Some(status) = self.status {
            records = query::filter_by_status(&records, status);
        }

        let empty_message = if term.is_empty() && self.status.is_none() {
            "No scans available. Scans appear here once technicians upload them."
        } else {
            "No scans match your search."
        };
        output::print_records(&records, format, empty_message)?;
        Ok(())
    }
}

/// Show a single scan.
#[derive(Parser, Debug)]
pub struct ShowCommand {
    /// Scan ID or prefix
    #[arg(value_name = "SCAN_ID")]
    pub scan_id: String,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

impl ShowCommand {
    pub fn execute(self, session: Session) -> CliResult<()> {
        let format = session.format_or_default(self.format);
        let record = session.store.find_scan_by_prefix(&self.scan_id)?;

        match format {
            OutputFormat::Plain => output::print_scan_detail(&record)?,
            OutputFormat::Json => output::print_json(&record)?,
            OutputFormat::Csv => output::print_csv(std::slice::from_ref(&record))?,
        }
        Ok(())
    }
}

/// Show a technician's most recent uploads.
#[derive(Parser, Debug)]
pub struct RecentCommand {
    /// Technician ID (defaults to the acting user)
    #[arg(short, long, value_name = "ID")]
    pub technician: Option<String>,

    /// Number of uploads to show
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

impl RecentCommand {
    pub fn execute(self, session: Session) -> CliResult<()> {
        let format = session.format_or_default(self.format);
        let technician = self
            .technician
            .clone()
            .or_else(|| session.actor.as_ref().map(|a| a.id.clone()))
            .ok_or_else(|| {
                CliError::Other("no technician given: pass --technician or --actor-id".to_string())
            })?;
        let limit = self.count.unwrap_or(session.settings.recent_limit);

        let records = session.store.list_scan_records()?;
        let summary = TechnicianSummary::for_technician(&records, &technician, limit);

        match format {
            OutputFormat::Plain => output::print_technician_summary(&summary)?,
            OutputFormat::Json => output::print_json(&summary)?,
            OutputFormat::Csv => output::print_csv(&summary.recent)?,
        }
        Ok(())
    }
}

/// Show dashboard statistics.
#[derive(Parser, Debug)]
pub struct StatsCommand {
    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

impl StatsCommand {
    pub fn execute(self, session: Session) -> CliResult<()> {
        let format = session.format_or_default(self.format);
        let records = session.store.list_scan_records()?;
        let summary = DashboardSummary::from_records(&records);

        match format {
            OutputFormat::Plain => output::print_summary(&summary)?,
            OutputFormat::Json => output::print_json(&summary)?,
            OutputFormat::Csv => output::print_summary_csv(&summary)?,
        }
        Ok(())
    }
}

/// List registered patients.
#[derive(Parser, Debug)]
pub struct PatientsCommand {
    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

impl PatientsCommand {
    pub fn execute(self, session: Session) -> CliResult<()> {
        let format = session.format_or_default(self.format);
        let patients = session.store.list_patients()?;

        match format {
            OutputFormat::Plain => output::print_patients(&patients)?,
            OutputFormat::Json => output::print_json(&patients)?,
            OutputFormat::Csv => output::print_patients_csv(&patients)?,
        }
        Ok(())
    }
}
