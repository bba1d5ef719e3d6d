pub mod player_states;
pub mod report_entries;
pub mod workflow_runs;

pub use player_states::Entity as PlayerStates;
pub use report_entries::Entity as ReportEntries;
pub use workflow_runs::Entity as WorkflowRuns;
