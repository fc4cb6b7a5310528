//! Search and aggregation over scan snapshots.
//!
//! Everything here is a pure function of its input slice and is cheap enough
//! to recompute on every read.

use crate::model::ScanRecord;
use crate::workflow::ScanStatus;
use serde::Serialize;
use std::collections::HashSet;

/// Default length of a technician's recent-uploads list.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Records whose patient name or scan type contains `term`, ignoring case.
///
/// An empty term matches everything. Original order is preserved.
pub fn search(records: &[ScanRecord], term: &str) -> Vec<ScanRecord> {
    let needle = term.to_lowercase();
    records
        .iter()
        .filter(|r| {
            needle.is_empty()
                || r.patient_name.to_lowercase().contains(&needle)
                || r.scan_type.as_str().contains(&needle)
        })
        .cloned()
        .collect()
}

pub fn count_by_status(records: &[ScanRecord], status: ScanStatus) -> usize {
    records.iter().filter(|r| r.status == status).count()
}

pub fn filter_by_status(records: &[ScanRecord], status: ScanStatus) -> Vec<ScanRecord> {
    records.iter().filter(|r| r.status == status).cloned().collect()
}

/// Number of distinct patients referenced by `records`.
pub fn unique_patient_count(records: &[ScanRecord]) -> usize {
    records
        .iter()
        .map(|r| &r.patient_id)
        .collect::<HashSet<_>>()
        .len()
}

/// A technician's submissions, most recent upload first, at most `limit`.
///
/// Records with equal timestamps keep reverse insertion order, so the later
/// submission still comes first.
pub fn recent_for_technician(
    records: &[ScanRecord],
    technician_id: &str,
    limit: usize,
) -> Vec<ScanRecord> {
    let mut mine: Vec<ScanRecord> = records
        .iter()
        .rev()
        .filter(|r| r.technician_id == technician_id)
        .cloned()
        .collect();
    mine.sort_by(|a, b| b.upload_date.cmp(&a.upload_date));
    mine.truncate(limit);
    mine
}

/// Figures shown on the dentist dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DashboardSummary {
    pub total_scans: usize,
    pub unique_patients: usize,
    pub pending: usize,
    pub reviewed: usize,
    pub approved: usize,
}

impl DashboardSummary {
    pub fn from_records(records: &[ScanRecord]) -> Self {
        Self {
            total_scans: records.len(),
            unique_patients: unique_patient_count(records),
            pending: count_by_status(records, ScanStatus::Pending),
            reviewed: count_by_status(records, ScanStatus::Reviewed),
            approved: count_by_status(records, ScanStatus::Approved),
        }
    }
}

/// Figures shown on a technician's dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct TechnicianSummary {
    pub technician_id: String,
    /// Recent uploads, most recent first.
    pub recent: Vec<ScanRecord>,
    /// Pending scans among `recent`.
    pub pending: usize,
}

impl TechnicianSummary {
    pub fn for_technician(records: &[ScanRecord], technician_id: &str, limit: usize) -> Self {
        let recent = recent_for_technician(records, technician_id, limit);
        let pending = count_by_status(&recent, ScanStatus::Pending);
        Self {
            technician_id: technician_id.to_string(),
            recent,
            pending,
        }
    }
}
