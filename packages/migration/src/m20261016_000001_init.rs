use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden, Clone, Copy)]
enum PlayerStates {
    Table,
    Id,
    Position,
    PreviousPosition,
    IsFinished,
    NeedsReport,
    ConsecutiveSixes,
    PositionBeforeStreak,
    Message,
    Email,
    Version,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ReportEntries {
    Table,
    EventId,
    PlayerId,
    PlanNumber,
    ReportText,
    CreatedAt,
}

#[derive(Iden)]
enum WorkflowRuns {
    Table,
    Id,
    Kind,
    PlayerId,
    State,
    Completed,
    Attempts,
    Checkpoint,
    LastError,
    CreatedAt,
    UpdatedAt,
}

/// Board cells are numbered 1..=72.
fn cell(col: PlayerStates) -> ColumnDef {
    let mut def = ColumnDef::new(col);
    def.integer()
        .not_null()
        .check(Expr::col(col).between(1, 72));
    def
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // player_states
        manager
            .create_table(
                Table::create()
                    .table(PlayerStates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlayerStates::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(cell(PlayerStates::Position))
                    .col(cell(PlayerStates::PreviousPosition))
                    .col(
                        ColumnDef::new(PlayerStates::IsFinished)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(PlayerStates::NeedsReport)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PlayerStates::ConsecutiveSixes)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(PlayerStates::ConsecutiveSixes).between(0, 2)),
                    )
                    .col(cell(PlayerStates::PositionBeforeStreak))
                    .col(ColumnDef::new(PlayerStates::Message).text().null())
                    .col(ColumnDef::new(PlayerStates::Email).string_len(254).null())
                    .col(
                        ColumnDef::new(PlayerStates::Version)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PlayerStates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PlayerStates::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // report_entries
        manager
            .create_table(
                Table::create()
                    .table(ReportEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReportEntries::EventId)
                            .string_len(128)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ReportEntries::PlayerId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReportEntries::PlanNumber)
                            .integer()
                            .not_null()
                            .check(Expr::col(ReportEntries::PlanNumber).between(1, 72)),
                    )
                    .col(ColumnDef::new(ReportEntries::ReportText).text().not_null())
                    .col(
                        ColumnDef::new(ReportEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_report_entries_player")
                            .from(ReportEntries::Table, ReportEntries::PlayerId)
                            .to(PlayerStates::Table, PlayerStates::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_report_entries_player_created")
                    .table(ReportEntries::Table)
                    .col(ReportEntries::PlayerId)
                    .col(ReportEntries::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // workflow_runs
        manager
            .create_table(
                Table::create()
                    .table(WorkflowRuns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WorkflowRuns::Id)
                            .string_len(128)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WorkflowRuns::Kind).string_len(16).not_null())
                    .col(
                        ColumnDef::new(WorkflowRuns::PlayerId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(WorkflowRuns::State).string_len(32).not_null())
                    .col(
                        ColumnDef::new(WorkflowRuns::Completed)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkflowRuns::Attempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(WorkflowRuns::Checkpoint).text().not_null())
                    .col(ColumnDef::new(WorkflowRuns::LastError).text().null())
                    .col(
                        ColumnDef::new(WorkflowRuns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkflowRuns::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_workflow_runs_player_state")
                    .table(WorkflowRuns::Table)
                    .col(WorkflowRuns::PlayerId)
                    .col(WorkflowRuns::State)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // drop in reverse order + drop index before table
        manager
            .drop_index(
                Index::drop()
                    .name("ix_workflow_runs_player_state")
                    .table(WorkflowRuns::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(WorkflowRuns::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ix_report_entries_player_created")
                    .table(ReportEntries::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(ReportEntries::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(PlayerStates::Table).to_owned())
            .await?;

        Ok(())
    }
}
