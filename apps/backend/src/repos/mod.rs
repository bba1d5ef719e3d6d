//! Collaborator traits used by the workflow, with their SeaORM implementations.
//!
//! In-process implementations live in `infra::memory`.

pub mod players;
pub mod reports;
pub mod runs;

pub use players::{PlayerStore, SeaPlayerStore};
pub use reports::{ReportEntry, ReportStore, SeaReportStore};
pub use runs::{RunStore, SeaRunStore};
