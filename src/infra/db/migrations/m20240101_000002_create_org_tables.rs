//! Migration: Create org_units and divisions tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrgUnits::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(OrgUnits::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(OrgUnits::Name)
                            .string_len(128)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(OrgUnits::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Divisions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Divisions::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Divisions::Name)
                            .string_len(128)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Divisions::OuId).uuid().null())
                    .col(
                        ColumnDef::new(Divisions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    // Deleting an OU leaves its divisions unassigned
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_divisions_ou_id")
                            .from(Divisions::Table, Divisions::OuId)
                            .to(OrgUnits::Table, OrgUnits::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_divisions_ou_id")
                    .table(Divisions::Table)
                    .col(Divisions::OuId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Divisions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(OrgUnits::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum OrgUnits {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(Iden)]
enum Divisions {
    Table,
    Id,
    Name,
    OuId,
    CreatedAt,
}
