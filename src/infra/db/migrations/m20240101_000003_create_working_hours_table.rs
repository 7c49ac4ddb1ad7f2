//! Migration: Create working_hours table (one row per weekday).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WorkingHours::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WorkingHours::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WorkingHours::DayOfWeek)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(WorkingHours::StartMin).integer().not_null())
                    .col(ColumnDef::new(WorkingHours::EndMin).integer().not_null())
                    .check(Expr::col(WorkingHours::DayOfWeek).between(0, 6))
                    .check(
                        Expr::col(WorkingHours::StartMin)
                            .gte(0)
                            .and(Expr::col(WorkingHours::EndMin).lte(1440))
                            .and(
                                Expr::col(WorkingHours::StartMin)
                                    .lt(Expr::col(WorkingHours::EndMin)),
                            ),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkingHours::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum WorkingHours {
    Table,
    Id,
    DayOfWeek,
    StartMin,
    EndMin,
}
