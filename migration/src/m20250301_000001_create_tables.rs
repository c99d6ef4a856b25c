use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户资料表
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profiles::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Profiles::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Profiles::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Profiles::FullName).string().null())
                    .col(ColumnDef::new(Profiles::AvatarUrl).string().null())
                    .col(
                        ColumnDef::new(Profiles::Role)
                            .string()
                            .not_null()
                            .default("student"),
                    )
                    .col(ColumnDef::new(Profiles::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Profiles::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Profiles::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建教程表
        manager
            .create_table(
                Table::create()
                    .table(Tutorials::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tutorials::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tutorials::Title).string().not_null())
                    .col(ColumnDef::new(Tutorials::Category).string().not_null())
                    .col(ColumnDef::new(Tutorials::VideoUrl).string().not_null())
                    .col(
                        ColumnDef::new(Tutorials::OrderIndex)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Tutorials::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建作业提交表
        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Submissions::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Submissions::LessonId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::FilePath).string().not_null())
                    .col(
                        ColumnDef::new(Submissions::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::UserId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::LessonId)
                            .to(Tutorials::Table, Tutorials::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建评分表（每个提交至多一条评分）
        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reviews::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Reviews::SubmissionId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Reviews::Reviewer).big_integer().not_null())
                    .col(ColumnDef::new(Reviews::Score).integer().not_null())
                    .col(ColumnDef::new(Reviews::Feedback).text().not_null())
                    .col(ColumnDef::new(Reviews::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Reviews::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Reviews::Table, Reviews::SubmissionId)
                            .to(Submissions::Table, Submissions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Reviews::Table, Reviews::Reviewer)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建比赛表
        manager
            .create_table(
                Table::create()
                    .table(Competitions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Competitions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Competitions::Title).string().not_null())
                    .col(ColumnDef::new(Competitions::Body).text().not_null())
                    .col(
                        ColumnDef::new(Competitions::StartAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Competitions::EndAt).big_integer().not_null())
                    .col(ColumnDef::new(Competitions::Awards).text().not_null())
                    .col(
                        ColumnDef::new(Competitions::Published)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Competitions::CreatedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Competitions::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Competitions::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Competitions::Table, Competitions::CreatedBy)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建海报表
        manager
            .create_table(
                Table::create()
                    .table(Posters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Posters::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Posters::Title).string().not_null())
                    .col(ColumnDef::new(Posters::Description).text().not_null())
                    .col(ColumnDef::new(Posters::ImageUrl).string().not_null())
                    .col(
                        ColumnDef::new(Posters::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Posters::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Posters::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_submissions_user_id")
                    .table(Submissions::Table)
                    .col(Submissions::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_submissions_lesson_id")
                    .table(Submissions::Table)
                    .col(Submissions::LessonId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tutorials_category_order")
                    .table(Tutorials::Table)
                    .col(Tutorials::Category)
                    .col(Tutorials::OrderIndex)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_competitions_published_start_at")
                    .table(Competitions::Table)
                    .col(Competitions::Published)
                    .col(Competitions::StartAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(Posters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Competitions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Reviews::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Submissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tutorials::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Profiles {
    #[sea_orm(iden = "profiles")]
    Table,
    Id,
    Email,
    PasswordHash,
    FullName,
    AvatarUrl,
    Role,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tutorials {
    #[sea_orm(iden = "tutorials")]
    Table,
    Id,
    Title,
    Category,
    VideoUrl,
    OrderIndex,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Submissions {
    #[sea_orm(iden = "submissions")]
    Table,
    Id,
    UserId,
    LessonId,
    FilePath,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Reviews {
    #[sea_orm(iden = "reviews")]
    Table,
    Id,
    SubmissionId,
    Reviewer,
    Score,
    Feedback,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Competitions {
    #[sea_orm(iden = "competitions")]
    Table,
    Id,
    Title,
    Body,
    StartAt,
    EndAt,
    Awards,
    Published,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Posters {
    #[sea_orm(iden = "posters")]
    Table,
    Id,
    Title,
    Description,
    ImageUrl,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
