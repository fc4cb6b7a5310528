//! The acting user, as supplied by the session layer.
//!
//! The core never checks credentials. An `Actor` is recorded on the scans it
//! submits and nothing more.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of the acting user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Technician,
    Dentist,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Technician => write!(f, "technician"),
            Self::Dentist => write!(f, "dentist"),
        }
    }
}

/// Identity of the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
        }
    }

    /// Stand-in used when no session is available.
    pub fn anonymous() -> Self {
        Self::new("", "Unknown", Role::Technician)
    }
}

impl Default for Actor {
    fn default() -> Self {
        Self::anonymous()
    }
}
