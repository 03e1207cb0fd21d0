pub mod models;
pub mod queries;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;

pub use queries::Queries;

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = if is_memory_url(database_url) {
            memory_pool_options().connect_with(options).await?
        } else {
            SqlitePoolOptions::new().connect_with(options).await?
        };
        Ok(Database { pool })
    }

    pub async fn new_in_memory() -> Result<Self, sqlx::Error> {
        let pool = memory_pool_options().connect("sqlite::memory:").await?;
        let database = Database { pool };
        database.run_migrations().await?;
        Ok(database)
    }

    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::raw_sql(include_str!("../../migrations/001_content_schema.sql"))
            .execute(&self.pool)
            .await?;

        sqlx::raw_sql(include_str!("../../migrations/002_submissions.sql"))
            .execute(&self.pool)
            .await?;

        info!("Database schema is up to date");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn is_memory_url(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Every connection to an in-memory URL opens its own empty database, so
/// the pool holds exactly one and never recycles it.
fn memory_pool_options() -> SqlitePoolOptions {
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::AdminTable;

    #[test]
    fn test_memory_urls() {
        assert!(is_memory_url("sqlite::memory:"));
        assert!(is_memory_url("sqlite://file:site?mode=memory&cache=shared"));
        assert!(!is_memory_url("sqlite://site.db"));
    }

    #[tokio::test]
    async fn test_memory_url_keeps_migrated_schema() {
        let database = Database::new("sqlite::memory:").await.unwrap();
        database.run_migrations().await.unwrap();

        let reads: Vec<_> = (0..8)
            .map(|_| {
                let database = database.clone();
                tokio::spawn(async move {
                    Queries::list_rows(database.pool(), AdminTable::Services).await
                })
            })
            .collect();

        for read in reads {
            assert!(read.await.unwrap().unwrap().is_empty());
        }
    }
}
