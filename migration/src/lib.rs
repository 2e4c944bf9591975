pub use sea_orm_migration::prelude::*;

mod m20260315_000001_create_user_table;
mod m20260315_000002_create_genre_table;
mod m20260315_000003_create_game_table;
mod m20260315_000004_create_comment_table;
mod m20260315_000005_create_rating_table;
mod m20260315_000006_create_favorite_table;
mod m20260315_000007_seed_genres;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260315_000001_create_user_table::Migration),
            Box::new(m20260315_000002_create_genre_table::Migration),
            Box::new(m20260315_000003_create_game_table::Migration),
            Box::new(m20260315_000004_create_comment_table::Migration),
            Box::new(m20260315_000005_create_rating_table::Migration),
            Box::new(m20260315_000006_create_favorite_table::Migration),
            Box::new(m20260315_000007_seed_genres::Migration),
        ]
    }
}
