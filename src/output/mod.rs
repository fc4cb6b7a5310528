//! Output formatting module.
//!
//! Provides formatters for plain text, JSON, and CSV output of records.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::{print_csv, print_patients_csv, print_summary_csv, to_csv_string, write_csv};
pub use json_format::print_json;
pub use plain::{
    print_error, print_info, print_patients, print_scan_detail, print_scans, print_success,
    print_summary, print_technician_summary, print_warning, status_label, status_style,
};

use crate::cli::OutputFormat;
use crate::model::ScanRecord;
use std::io;

/// Format and print scan records according to the specified format.
pub fn print_records(records: &[ScanRecord], format: OutputFormat, empty_message: &str) -> io::Result<()> {
    match format {
        OutputFormat::Plain => plain::print_scans(records, empty_message),
        OutputFormat::Json => json_format::print_json(records),
        OutputFormat::Csv => csv_format::print_csv(records),
    }
}
