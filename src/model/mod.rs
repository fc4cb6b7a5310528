//! Entity model: patients, scan records and the acting user.
//!
//! Persisted field names are camelCase, matching the collections the
//! browser client wrote, so existing data loads unchanged.

mod actor;
mod patient;
mod scan;

pub use actor::{Actor, Role};
pub use patient::{NewPatient, Patient};
pub use scan::{ImageFile, NewScan, ScanRecord};

use serde::{Deserialize, Deserializer};

/// Trim `value`, mapping blank strings to `None`.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Deserialize an optional string where `""` means absent.
pub(crate) fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(non_blank(Option::<String>::deserialize(deserializer)?))
}
