//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use crate::model::{Patient, ScanRecord};
use crate::query::{DashboardSummary, TechnicianSummary};
use crate::workflow::ScanStatus;
use console::{style, Style};
use std::io::{self, Write};

const RULE: &str = "───────────────────────────────────────────────────────────────────────";
const DOUBLE_RULE: &str = "═══════════════════════════════════════════════════════════════════════";

/// Badge colour for a status.
pub fn status_style(status: ScanStatus) -> Style {
    match status {
        ScanStatus::Pending => Style::new().yellow(),
        ScanStatus::Reviewed => Style::new().cyan(),
        ScanStatus::Approved => Style::new().green().bold(),
    }
}

/// Status with its first letter capitalised, as shown on badges.
pub fn status_label(status: ScanStatus) -> String {
    let s = status.as_str();
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Print a table of scan records.
pub fn print_scans(records: &[ScanRecord], empty_message: &str) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out)?;
    if records.is_empty() {
        writeln!(out, "  {}", style(empty_message).dim())?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "  {}", style(RULE).dim())?;
    writeln!(
        out,
        "  {:<10}  {:<22}  {:<10}  {:<10}  {:>5}  {}",
        style("ID").bold(),
        style("PATIENT").bold(),
        style("TYPE").bold(),
        style("UPLOADED").bold(),
        style("FILES").bold(),
        style("STATUS").bold()
    )?;
    writeln!(out, "  {}", style(RULE).dim())?;

    for record in records {
        writeln!(
            out,
            "  {:<10}  {:<22}  {:<10}  {:<10}  {:>5}  {}",
            style(record.id.short()).dim(),
            truncate_string(&record.patient_name, 22),
            record.scan_type.label(),
            record.upload_date.format("%Y-%m-%d"),
            record.file_count(),
            status_style(record.status).apply_to(status_label(record.status))
        )?;
        if let Some(notes) = &record.notes {
            writeln!(out, "  {:<10}  {}", "", style(truncate_string(notes, 56)).dim())?;
        }
    }

    writeln!(out, "  {}", style(RULE).dim())?;
    writeln!(out, "  {} record(s)", records.len())?;
    writeln!(out)?;
    Ok(())
}

/// Print everything known about one scan.
pub fn print_scan_detail(record: &ScanRecord) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out)?;
    writeln!(out, "{}", style(DOUBLE_RULE).cyan())?;
    writeln!(out, "  {} {}", style("Scan").cyan().bold(), record.id)?;
    writeln!(out, "{}", style(DOUBLE_RULE).cyan())?;
    writeln!(out)?;
    writeln!(
        out,
        "  {} {} ({})",
        style("Patient:").bold(),
        record.patient_name,
        style(&record.patient_id).dim()
    )?;
    writeln!(out, "  {} {}", style("Scan Type:").bold(), record.scan_type.label())?;
    writeln!(
        out,
        "  {} {}",
        style("Uploaded:").bold(),
        record.upload_date.format("%Y-%m-%d %H:%M UTC")
    )?;
    writeln!(
        out,
        "  {} {} ({})",
        style("Uploaded By:").bold(),
        record.uploaded_by,
        style(&record.technician_id).dim()
    )?;
    writeln!(
        out,
        "  {} {}  {}",
        style("Status:").bold(),
        status_style(record.status).apply_to(status_label(record.status)),
        style(format!("v{}", record.version)).dim()
    )?;
    if let Some(notes) = &record.notes {
        writeln!(out, "  {} {}", style("Notes:").bold(), notes)?;
    }
    writeln!(out)?;

    writeln!(
        out,
        "  {} {} file(s), {} bytes",
        style("Images:").bold(),
        record.file_count(),
        record.total_size()
    )?;
    for file in &record.image_files {
        writeln!(
            out,
            "    {} {:<30} {:<12} {:>10} bytes",
            style("•").dim(),
            truncate_string(&file.name, 30),
            file.mime_type,
            file.size
        )?;
    }
    writeln!(out)?;
    Ok(())
}

/// Print a table of patients.
pub fn print_patients(patients: &[Patient]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out)?;
    if patients.is_empty() {
        writeln!(out, "  {}", style("No patients registered.").dim())?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(
        out,
        "  {:<10}  {:<24}  {:<16}  {:<26}  {}",
        style("ID").bold(),
        style("NAME").bold(),
        style("PHONE").bold(),
        style("EMAIL").bold(),
        style("BORN").bold()
    )?;
    writeln!(out, "  {}", style(RULE).dim())?;
    for patient in patients {
        writeln!(
            out,
            "  {:<10}  {:<24}  {:<16}  {:<26}  {}",
            style(patient.id.short()).dim(),
            truncate_string(&patient.name, 24),
            patient.phone_number,
            truncate_string(patient.email.as_deref().unwrap_or("-"), 26),
            patient
                .date_of_birth
                .map_or_else(|| "-".to_string(), |d| d.to_string())
        )?;
    }
    writeln!(out)?;
    Ok(())
}

/// Print the dentist dashboard figures.
pub fn print_summary(summary: &DashboardSummary) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out)?;
    writeln!(out, "  {} {}", style("Total Scans:").bold(), summary.total_scans)?;
    writeln!(out, "  {} {}", style("Patients:").bold(), summary.unique_patients)?;
    writeln!(
        out,
        "  {} {}",
        style("Pending Review:").bold(),
        status_style(ScanStatus::Pending).apply_to(summary.pending)
    )?;
    writeln!(
        out,
        "  {} {}",
        style("Reviewed:").bold(),
        status_style(ScanStatus::Reviewed).apply_to(summary.reviewed)
    )?;
    writeln!(
        out,
        "  {} {}",
        style("Approved:").bold(),
        status_style(ScanStatus::Approved).apply_to(summary.approved)
    )?;
    writeln!(out)?;
    Ok(())
}

/// Print a technician's recent uploads.
pub fn print_technician_summary(summary: &TechnicianSummary) -> io::Result<()> {
    println!();
    println!(
        "  {} {}   {} {}",
        style("Recent Uploads:").bold(),
        summary.recent.len(),
        style("Pending Review:").bold(),
        status_style(ScanStatus::Pending).apply_to(summary.pending)
    );
    print_scans(&summary.recent, "No uploads yet.")
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Truncate a string to a maximum number of characters, adding ellipsis if
/// truncated.
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("Zoë Ängström", 6), "Zoë...");
    }

    #[test]
    fn test_status_label() {
        assert_eq!(status_label(ScanStatus::Pending), "Pending");
        assert_eq!(status_label(ScanStatus::Approved), "Approved");
    }
}
