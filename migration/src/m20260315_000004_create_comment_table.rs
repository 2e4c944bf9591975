use sea_orm_migration::prelude::*;

/// Creates the `comment` table. `parent_id` carries no foreign key on purpose:
/// deleting a parent leaves replies orphaned, which is accepted behavior.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Comment {
    Table,
    Id,
    GameId,
    UserId,
    ParentId,
    Content,
    IsApproved,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Game {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Comment::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Comment::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Comment::GameId).uuid().not_null())
                    .col(ColumnDef::new(Comment::UserId).uuid().not_null())
                    .col(ColumnDef::new(Comment::ParentId).uuid().null())
                    .col(
                        ColumnDef::new(Comment::Content)
                            .string_len(1000)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Comment::IsApproved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Comment::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Comment::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_game_id")
                            .from(Comment::Table, Comment::GameId)
                            .to(Game::Table, Game::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_user_id")
                            .from(Comment::Table, Comment::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comment_game_approved")
                    .table(Comment::Table)
                    .col(Comment::GameId)
                    .col(Comment::IsApproved)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Comment::Table).to_owned())
            .await
    }
}
