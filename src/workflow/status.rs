//! Review status of a scan and its transition table.

use crate::error::{StoreError, StoreResult, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Review status of a scan record.
///
/// Variants are declared in workflow order, so `Ord` follows the progression
/// `pending < reviewed < approved`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    /// Submitted by a technician, awaiting review.
    Pending,
    /// Looked at by a dentist.
    Reviewed,
    /// Signed off. Terminal.
    Approved,
}

impl ScanStatus {
    /// Every status in workflow order.
    pub const ALL: [ScanStatus; 3] = [Self::Pending, Self::Reviewed, Self::Approved];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
            Self::Approved => "approved",
        }
    }

    /// The following status in the progression, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Reviewed),
            Self::Reviewed => Some(Self::Approved),
            Self::Approved => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

impl Default for ScanStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "reviewed" => Ok(Self::Reviewed),
            "approved" => Ok(Self::Approved),
            _ => Err(ValidationError::UnknownStatus(s.to_string())),
        }
    }
}

/// Whether moving from `current` to `next` is legal.
///
/// A record may stay where it is or move forward, skipping `reviewed` if the
/// dentist approves directly. Moving backward is never legal.
pub fn can_transition(current: ScanStatus, next: ScanStatus) -> bool {
    next >= current
}

/// Strict transition: returns the target status or `InvalidTransition`.
pub fn transition(current: ScanStatus, next: ScanStatus) -> StoreResult<ScanStatus> {
    if can_transition(current, next) {
        Ok(next)
    } else {
        Err(StoreError::InvalidTransition {
            from: current,
            to: next,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(can_transition(ScanStatus::Pending, ScanStatus::Reviewed));
        assert!(can_transition(ScanStatus::Reviewed, ScanStatus::Approved));
        assert!(can_transition(ScanStatus::Pending, ScanStatus::Approved));
    }

    #[test]
    fn test_staying_put_allowed() {
        for status in ScanStatus::ALL {
            assert!(can_transition(status, status));
        }
    }

    #[test]
    fn test_backward_transitions_rejected() {
        assert!(!can_transition(ScanStatus::Approved, ScanStatus::Pending));
        assert!(!can_transition(ScanStatus::Approved, ScanStatus::Reviewed));
        assert!(!can_transition(ScanStatus::Reviewed, ScanStatus::Pending));

        let err = transition(ScanStatus::Approved, ScanStatus::Pending).unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidTransition {
                from: ScanStatus::Approved,
                to: ScanStatus::Pending
            }
        ));
    }

    #[test]
    fn test_next_and_terminal() {
        assert_eq!(ScanStatus::Pending.next(), Some(ScanStatus::Reviewed));
        assert_eq!(ScanStatus::Reviewed.next(), Some(ScanStatus::Approved));
        assert!(ScanStatus::Approved.is_terminal());
        assert!(!ScanStatus::Pending.is_terminal());
    }

    #[test]
    fn test_status_parse_and_serde() {
        assert_eq!("Approved".parse::<ScanStatus>().unwrap(), ScanStatus::Approved);
        assert!("rejected".parse::<ScanStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&ScanStatus::Reviewed).unwrap(),
            "\"reviewed\""
        );
    }
}
