//! CLI subcommand definitions and handlers.
//!
//! Implements a git-like subcommand architecture:
//! - `scandesk intake <files>...` - Register a scan (and patient if new)
//! - `scandesk scans` - List, search and filter scans
//! - `scandesk show <scan-id>` - Show one scan
//! - `scandesk review <scan-id> <status>` - Move a scan through review
//! - `scandesk recent` - A technician's latest uploads
//! - `scandesk stats` - Dashboard figures
//! - `scandesk patients` - List patients
//! - `scandesk export` - Export scan records
//! - `scandesk repair` - Check or reset stored collections

mod export;
mod ingest;
mod intake;
mod repair;
mod review;
mod scans;

pub use export::ExportCommand;
pub use ingest::{load_images, mime_for_path, IngestOutcome};
pub use intake::IntakeCommand;
pub use repair::RepairCommand;
pub use review::ReviewCommand;
pub use scans::{PatientsCommand, RecentCommand, ScansCommand, ShowCommand, StatsCommand};

use crate::config::{AppSettings, Paths};
use crate::error::CliResult;
use crate::model::{Actor, Role};
use crate::storage::RecordStore;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::debug;

/// scandesk - dental scan intake and review.
///
/// Technicians submit scans for a patient; dentists review and approve
/// them. Records are kept in JSON files under the user's data directory.
#[derive(Parser, Debug)]
#[command(name = "scandesk")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Dental scan intake and review", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to custom configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the record collections
    #[arg(long, global = true, value_name = "DIR", env = "SCANDESK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Identifier of the acting user
    #[arg(long, global = true, value_name = "ID", env = "SCANDESK_ACTOR_ID")]
    pub actor_id: Option<String>,

    /// Display name of the acting user
    #[arg(long, global = true, value_name = "NAME", env = "SCANDESK_ACTOR_NAME")]
    pub actor_name: Option<String>,

    /// Role of the acting user
    #[arg(long, global = true, value_enum, default_value = "technician", env = "SCANDESK_ROLE")]
    pub role: Role,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit a new scan for review
    #[command(alias = "i")]
    Intake(IntakeCommand),

    /// List, search and filter scans
    #[command(alias = "ls")]
    Scans(ScansCommand),

    /// Show a single scan
    Show(ShowCommand),

    /// Change the review status of a scan
    #[command(alias = "r")]
    Review(ReviewCommand),

    /// Show a technician's most recent uploads
    Recent(RecentCommand),

    /// Show dashboard statistics
    Stats(StatsCommand),

    /// List registered patients
    #[command(alias = "p")]
    Patients(PatientsCommand),

    /// Export scan records
    #[command(alias = "e")]
    Export(ExportCommand),

    /// Check stored collections and reset unreadable ones
    Repair(RepairCommand),
}

impl Commands {
    /// Subcommand name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Intake(_) => "intake",
            Self::Scans(_) => "scans",
            Self::Show(_) => "show",
            Self::Review(_) => "review",
            Self::Recent(_) => "recent",
            Self::Stats(_) => "stats",
            Self::Patients(_) => "patients",
            Self::Export(_) => "export",
            Self::Repair(_) => "repair",
        }
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    Plain,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Plain
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Everything a handler needs: the opened store, settings and caller identity.
pub struct Session {
    pub store: RecordStore,
    pub settings: AppSettings,
    pub records_dir: PathBuf,
    pub actor: Option<Actor>,
    pub quiet: bool,
}

impl Session {
    /// Output format to use when a command doesn't specify one.
    pub fn format_or_default(&self, format: Option<OutputFormat>) -> OutputFormat {
        format.unwrap_or_else(|| {
            OutputFormat::from_str(&self.settings.default_output_format, true).unwrap_or_default()
        })
    }

    /// The acting user, or the anonymous stand-in.
    pub fn actor_or_anonymous(&self) -> Actor {
        self.actor.clone().unwrap_or_else(Actor::anonymous)
    }
}

impl Cli {
    /// Build the caller identity from the global options.
    pub fn actor(&self) -> Option<Actor> {
        if self.actor_id.is_none() && self.actor_name.is_none() {
            return None;
        }
        Some(Actor::new(
            self.actor_id.clone().unwrap_or_default(),
            self.actor_name.clone().unwrap_or_else(|| "Unknown".to_string()),
            self.role,
        ))
    }

    /// Load settings, open the store and run the selected subcommand.
    pub fn execute(self) -> CliResult<()> {
        let paths = Paths::discover()?;
        let mut settings = match &self.config {
            Some(path) => AppSettings::load_from(path)?,
            None => AppSettings::load(&paths)?,
        };
        if let Some(dir) = &self.data_dir {
            settings.data_dir = Some(dir.clone());
        }

        let records_dir = settings.records_dir(&paths);
        debug!(dir = %records_dir.display(), policy = ?settings.on_corrupt, "opening record store");
        let store = RecordStore::open(&records_dir)?.with_load_policy(settings.on_corrupt);

        let session = Session {
            store,
            settings,
            records_dir,
            actor: self.actor(),
            quiet: self.quiet,
        };

        match self.command {
            Commands::Intake(cmd) => cmd.execute(session),
            Commands::Scans(cmd) => cmd.execute(session),
            Commands::Show(cmd) => cmd.execute(session),
            Commands::Review(cmd) => cmd.execute(session),
            Commands::Recent(cmd) => cmd.execute(session),
            Commands::Stats(cmd) => cmd.execute(session),
            Commands::Patients(cmd) => cmd.execute(session),
            Commands::Export(cmd) => cmd.execute(session),
            Commands::Repair(cmd) => cmd.execute(session),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_actor_options() {
        let cli = Cli::try_parse_from([
            "scandesk",
            "--actor-id",
            "tech-7",
            "--actor-name",
            "Riley",
            "stats",
        ])
        .unwrap();
        let actor = cli.actor().unwrap();
        assert_eq!(actor.id, "tech-7");
        assert_eq!(actor.name, "Riley");
        assert_eq!(actor.role, Role::Technician);
    }

    #[test]
    fn test_review_subcommand_parses() {
        let cli = Cli::try_parse_from(["scandesk", "review", "abc123", "approved", "--force"])
            .unwrap();
        assert!(matches!(cli.command, Commands::Review(_)));
    }

    #[test]
    fn test_command_name_matches_subcommand() {
        let cli = Cli::try_parse_from(["scandesk", "ls", "--status", "pending"]).unwrap();
        assert_eq!(cli.command.name(), "scans");

        let cli = Cli::try_parse_from(["scandesk", "repair"]).unwrap();
        assert_eq!(cli.command.name(), "repair");

        let names: Vec<_> = Cli::command()
            .get_subcommands()
            .map(|s| s.get_name().to_string())
            .collect();
        assert!(names.iter().any(|n| n == "scans"));
        assert!(names.iter().any(|n| n == "repair"));
    }
}
