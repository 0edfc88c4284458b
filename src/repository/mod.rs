//! Repository layer for database operations

pub mod books;
pub mod lending;
pub mod schema;
pub mod students;

use std::{path::Path, time::Duration};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Executor, Pool, Sqlite,
};

use crate::{config::DatabaseConfig, error::{AppError, AppResult}};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Sqlite>,
    pub books: books::BooksRepository,
    pub students: students::StudentsRepository,
    pub lending: lending::LendingRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            students: students::StudentsRepository::new(pool.clone()),
            lending: lending::LendingRepository::new(pool.clone()),
            pool,
        }
    }

    /// Open the store, creating and seeding it when the file does not exist yet
    pub async fn open(config: &DatabaseConfig) -> AppResult<Self> {
        let path = Path::new(&config.path);
        let fresh = !path.exists();

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_millis(config.busy_timeout_ms));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_with(options)
            .await?;

        if fresh {
            tracing::info!("Creating new store at {}", config.path);
            if let Err(e) = initialize(&pool, config.init_script.as_deref()).await {
                pool.close().await;
                remove_store(&config.path);
                return Err(e);
            }
        } else {
            apply_schema(&pool).await?;
        }

        Ok(Self::new(pool))
    }

    /// Wait for in-flight statements and close every connection
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("Store closed");
    }
}

/// Seed a new store, then apply the built-in schema on top of it
async fn initialize(pool: &Pool<Sqlite>, init_script: Option<&str>) -> AppResult<()> {
    seed(pool, init_script).await?;
    apply_schema(pool).await
}

async fn apply_schema(pool: &Pool<Sqlite>) -> AppResult<()> {
    pool.execute(schema::SCHEMA).await?;
    tracing::debug!("Schema applied");
    Ok(())
}

/// Run the deployment's seed script against a new store
async fn seed(pool: &Pool<Sqlite>, init_script: Option<&str>) -> AppResult<()> {
    let Some(script) = init_script else {
        return Ok(());
    };

    let sql = tokio::fs::read_to_string(script)
        .await
        .map_err(|e| AppError::Internal(format!("failed to read seed script {}: {}", script, e)))?;

    pool.execute(sql.as_str()).await?;

    tracing::info!("Seeded store from {}", script);
    Ok(())
}

/// Delete a half-initialized store so the next start seeds it again
fn remove_store(path: &str) {
    for file in [path.to_string(), format!("{}-wal", path), format!("{}-shm", path)] {
        if let Err(e) = std::fs::remove_file(&file) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Could not remove {}: {}", file, e);
            }
        }
    }
}
