//! Review workflow.
//!
//! A scan moves `pending -> reviewed -> approved` and never backward under
//! the strict rules. Intake creates records in `pending`; review moves them
//! along.

mod intake;
mod review;
mod status;

pub use intake::{IntakeReceipt, IntakeRequest, PatientRef};
pub use review::ReviewPolicy;
pub use status::{can_transition, transition, ScanStatus};
