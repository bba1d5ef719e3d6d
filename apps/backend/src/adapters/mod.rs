//! SeaORM adapters. Functions here return `DbErr`; `repos` maps errors and
//! converts rows into domain values.

pub mod player_states_sea;
pub mod report_entries_sea;
pub mod workflow_runs_sea;
