use sea_orm_migration::prelude::*;

/// Creates the `rating` table with a unique (game, user) index.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Rating {
    Table,
    Id,
    GameId,
    UserId,
    #[sea_orm(iden = "rating")]
    Value,
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
                    .table(Rating::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Rating::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Rating::GameId).uuid().not_null())
                    .col(ColumnDef::new(Rating::UserId).uuid().not_null())
                    .col(ColumnDef::new(Rating::Value).integer().not_null())
                    .col(
                        ColumnDef::new(Rating::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Rating::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_game_id")
                            .from(Rating::Table, Rating::GameId)
                            .to(Game::Table, Game::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_user_id")
                            .from(Rating::Table, Rating::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Uniqueness is the race-safety backstop for concurrent submissions
        manager
            .create_index(
                Index::create()
                    .name("idx_rating_game_user")
                    .table(Rating::Table)
                    .col(Rating::GameId)
                    .col(Rating::UserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rating::Table).to_owned())
            .await
    }
}
