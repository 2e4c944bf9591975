use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Convert a UUID string (with dashes) to an `SQLite` hex-blob literal.
///
/// `SeaORM` stores UUID columns as 16-byte BLOBs in `SQLite`, so raw SQL
/// inserts must use `X'...'` notation to match the format.
fn uuid_blob(uuid_str: &str) -> String {
    let hex: String = uuid_str.chars().filter(|c| *c != '-').collect();
    format!("X'{hex}'")
}

/// A single genre definition.
struct Genre {
    id: &'static str,
    name: &'static str,
}

#[rustfmt::skip]
const GENRES: &[Genre] = &[
    Genre { id: "01000000-0000-4000-8000-000000000001", name: "Action" },
    Genre { id: "01000000-0000-4000-8000-000000000002", name: "Adventure" },
    Genre { id: "01000000-0000-4000-8000-000000000003", name: "RPG" },
    Genre { id: "01000000-0000-4000-8000-000000000004", name: "Strategy" },
    Genre { id: "01000000-0000-4000-8000-000000000005", name: "Racing" },
    Genre { id: "01000000-0000-4000-8000-000000000006", name: "Puzzle" },
    Genre { id: "01000000-0000-4000-8000-000000000007", name: "Simulation" },
    Genre { id: "01000000-0000-4000-8000-000000000008", name: "Sports" },
    Genre { id: "01000000-0000-4000-8000-000000000009", name: "Platformer" },
    Genre { id: "01000000-0000-4000-8000-000000000010", name: "Horror" },
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = manager.get_database_backend();

        for genre in GENRES {
            let sql = if backend == sea_orm::DatabaseBackend::Postgres {
                format!(
                    "INSERT INTO genre (id, name) VALUES ('{id}', '{name}') \
                     ON CONFLICT (id) DO NOTHING",
                    id = genre.id,
                    name = genre.name,
                )
            } else {
                format!(
                    "INSERT OR IGNORE INTO genre (id, name) VALUES ({id_blob}, '{name}')",
                    id_blob = uuid_blob(genre.id),
                    name = genre.name,
                )
            };
            db.execute(sea_orm::Statement::from_string(backend, sql))
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(Query::delete().from_table(GenreIden::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum GenreIden {
    #[sea_orm(iden = "genre")]
    Table,
}
