//! Opaque identifiers for patients, scans and image files.
//!
//! Each identifier is a newtype over its string form so that a patient ID can
//! never be passed where a scan ID is expected. Fresh IDs are a kind prefix
//! followed by a UUID v4 (`scan_6f1c...`). Any non-empty string is accepted
//! when parsing, which keeps collections written by older clients loadable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Error type for identifier parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("identifier cannot be empty")]
    Empty,
}

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Prefix used for freshly generated identifiers.
            pub const PREFIX: &'static str = $prefix;

            /// Generate a new random identifier.
            pub fn new() -> Self {
                Self(format!("{}_{}", Self::PREFIX, Uuid::new_v4().simple()))
            }

            /// Get the full string form.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Get a short representation (first 8 characters after the prefix).
            pub fn short(&self) -> &str {
                let body = self
                    .0
                    .strip_prefix(Self::PREFIX)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .unwrap_or(&self.0);
                body.get(..8).unwrap_or(body)
            }

            /// Whether `prefix` matches either the full ID or its short body.
            pub fn matches_prefix(&self, prefix: &str) -> bool {
                self.0.starts_with(prefix)
                    || self
                        .0
                        .strip_prefix(Self::PREFIX)
                        .and_then(|rest| rest.strip_prefix('_'))
                        .map_or(false, |body| body.starts_with(prefix))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                if s.is_empty() {
                    return Err(IdError::Empty);
                }
                Ok(Self(s.to_string()))
            }
        }
    };
}

opaque_id!(
    /// Identifies a patient. Many scans may share one.
    PatientId,
    "patient"
);

opaque_id!(
    /// Identifies a scan record.
    ScanId,
    "scan"
);

opaque_id!(
    /// Identifies one image file within a scan.
    FileId,
    "file"
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_id_generation_is_unique() {
        let ids: HashSet<ScanId> = (0..1000).map(|_| ScanId::new()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_id_carries_prefix() {
        let id = PatientId::new();
        assert!(id.as_str().starts_with("patient_"));
        assert_eq!(id.short().len(), 8);
    }

    #[test]
    fn test_legacy_ids_parse() {
        let id: ScanId = "scan_1718000000000".parse().unwrap();
        assert_eq!(id.as_str(), "scan_1718000000000");
        assert_eq!(id.short(), "17180000");
        assert!(id.matches_prefix("1718"));
        assert!(id.matches_prefix("scan_17"));
    }

    #[test]
    fn test_empty_id_rejected() {
        assert_eq!("  ".parse::<FileId>(), Err(IdError::Empty));
    }

    #[test]
    fn test_short_of_unprefixed_id() {
        let id: PatientId = "abc".parse().unwrap();
        assert_eq!(id.short(), "abc");
    }
}
