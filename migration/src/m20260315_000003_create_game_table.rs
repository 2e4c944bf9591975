use sea_orm_migration::prelude::*;

/// Creates the `game` table for catalog entries.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Game {
    Table,
    Id,
    DeveloperId,
    Title,
    Description,
    ShortDescription,
    Genre,
    Price,
    ReleaseDate,
    CoverImageUrl,
    TrailerUrl,
    GameUrl,
    Status,
    ViewsCount,
    CreatedAt,
    UpdatedAt,
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
                    .table(Game::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Game::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Game::DeveloperId).uuid().not_null())
                    .col(ColumnDef::new(Game::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Game::Description).text().not_null())
                    .col(
                        ColumnDef::new(Game::ShortDescription)
                            .string_len(500)
                            .null(),
                    )
                    .col(ColumnDef::new(Game::Genre).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Game::Price)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Game::ReleaseDate).date().null())
                    .col(ColumnDef::new(Game::CoverImageUrl).string_len(500).null())
                    .col(ColumnDef::new(Game::TrailerUrl).string_len(500).null())
                    .col(ColumnDef::new(Game::GameUrl).string_len(500).null())
                    .col(
                        ColumnDef::new(Game::Status)
                            .string_len(20)
                            .not_null()
                            .default("draft"),
                    )
                    .col(
                        ColumnDef::new(Game::ViewsCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Game::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Game::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_developer_id")
                            .from(Game::Table, Game::DeveloperId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_game_status")
                    .table(Game::Table)
                    .col(Game::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Game::Table).to_owned())
            .await
    }
}
