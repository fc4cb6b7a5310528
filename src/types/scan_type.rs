//! Imaging modality of a scan.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Available scan types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScanType {
    /// Intraoral camera or sensor images (default).
    Intraoral,
    /// Extraoral photographs.
    Extraoral,
    /// Panoramic radiograph.
    Panoramic,
    /// Cone beam computed tomography.
    Cbct,
}

impl ScanType {
    /// All scan types in display order.
    pub const ALL: [ScanType; 4] = [
        Self::Intraoral,
        Self::Extraoral,
        Self::Panoramic,
        Self::Cbct,
    ];

    /// Lowercase identifier, as stored and searched.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Intraoral => "intraoral",
            Self::Extraoral => "extraoral",
            Self::Panoramic => "panoramic",
            Self::Cbct => "cbct",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Intraoral => "Intraoral",
            Self::Extraoral => "Extraoral",
            Self::Panoramic => "Panoramic",
            Self::Cbct => "CBCT",
        }
    }
}

impl Default for ScanType {
    fn default() -> Self {
        Self::Intraoral
    }
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "intraoral" => Ok(Self::Intraoral),
            "extraoral" => Ok(Self::Extraoral),
            "panoramic" | "pano" => Ok(Self::Panoramic),
            "cbct" => Ok(Self::Cbct),
            _ => Err(ValidationError::UnknownScanType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_type_from_str() {
        assert_eq!("intraoral".parse::<ScanType>().unwrap(), ScanType::Intraoral);
        assert_eq!("CBCT".parse::<ScanType>().unwrap(), ScanType::Cbct);
        assert_eq!(" Panoramic ".parse::<ScanType>().unwrap(), ScanType::Panoramic);
    }

    #[test]
    fn test_unknown_scan_type_is_validation_error() {
        assert_eq!(
            "ultrasound".parse::<ScanType>(),
            Err(ValidationError::UnknownScanType("ultrasound".to_string()))
        );
    }

    #[test]
    fn test_scan_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ScanType::Cbct).unwrap(), "\"cbct\"");
        let parsed: ScanType = serde_json::from_str("\"extraoral\"").unwrap();
        assert_eq!(parsed, ScanType::Extraoral);
    }
}
