//! Configuration management for scandesk.
//!
//! Provides XDG-compliant paths and persisted application settings.

mod settings;

pub use settings::{AppSettings, Paths};
