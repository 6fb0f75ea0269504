use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create system_access table (one row per system user)
        manager
            .create_table(
                Table::create()
                    .table(SystemAccess::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SystemAccess::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(SystemAccess::UserId).string().not_null().unique_key())
                    .col(ColumnDef::new(SystemAccess::AssignerId).string().not_null())
                    .col(ColumnDef::new(SystemAccess::Grants).string().not_null())
                    .col(ColumnDef::new(SystemAccess::SuspendedAt).big_integer())
                    .col(ColumnDef::new(SystemAccess::ExpiresAt).big_integer())
                    .col(ColumnDef::new(SystemAccess::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(SystemAccess::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_system_access_user_id")
                            .from(SystemAccess::Table, SystemAccess::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SystemAccess::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum SystemAccess {
    Table,
    Id,
    UserId,
    AssignerId,
    Grants,
    SuspendedAt,
    ExpiresAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
