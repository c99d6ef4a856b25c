use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_tables::Profiles;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 一次性登录码（魔法链接 / 回调交换） ====================
        manager
            .create_table(
                Table::create()
                    .table(AuthCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuthCodes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AuthCodes::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(AuthCodes::UserId).big_integer().not_null())
                    .col(ColumnDef::new(AuthCodes::ExpiresAt).big_integer().not_null())
                    .col(ColumnDef::new(AuthCodes::ConsumedAt).big_integer().null())
                    .col(ColumnDef::new(AuthCodes::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(AuthCodes::Table, AuthCodes::UserId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_auth_codes_user_id")
                    .table(AuthCodes::Table)
                    .col(AuthCodes::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuthCodes::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum AuthCodes {
    #[sea_orm(iden = "auth_codes")]
    Table,
    Id,
    Code,
    UserId,
    ExpiresAt,
    ConsumedAt,
    CreatedAt,
}
