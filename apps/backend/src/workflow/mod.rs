//! Durable, idempotent workflows around the pure game rules.

pub mod error;
pub mod locks;
pub mod retry;
pub mod run;
pub mod runner;

pub use error::WorkflowError;
pub use locks::PlayerLocks;
pub use retry::RetryPolicy;
pub use run::{Checkpoint, WorkflowKind, WorkflowOutcome, WorkflowRun, WorkflowState};
pub use runner::WorkflowRunner;
