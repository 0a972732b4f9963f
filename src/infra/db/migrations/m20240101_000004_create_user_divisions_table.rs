//! Migration: Create user_divisions grant table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserDivisions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserDivisions::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserDivisions::DivisionId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(UserDivisions::UserId)
                            .col(UserDivisions::DivisionId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_divisions_user_id")
                            .from(UserDivisions::Table, UserDivisions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_divisions_division_id")
                            .from(UserDivisions::Table, UserDivisions::DivisionId)
                            .to(Divisions::Table, Divisions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserDivisions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserDivisions {
    Table,
    UserId,
    DivisionId,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Divisions {
    Table,
    Id,
}
