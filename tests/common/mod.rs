//! Shared setup for integration tests

#![allow(dead_code)]

use std::{path::PathBuf, time::Duration};

use librarysystem::{config::DatabaseConfig, repository::Repository};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteConnection},
    Connection,
};
use tempfile::TempDir;

/// A store in its own temporary directory; the directory lives as long as this value
pub struct TestStore {
    pub dir: TempDir,
    pub repository: Repository,
}

impl TestStore {
    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("library.db")
    }

    /// A plain connection to the same file, standing in for another process
    pub async fn outside_connection(&self) -> SqliteConnection {
        let options = SqliteConnectOptions::new()
            .filename(self.db_path())
            .busy_timeout(Duration::from_secs(5));
        SqliteConnection::connect_with(&options)
            .await
            .expect("Failed to open second connection")
    }
}

pub fn database_config(dir: &TempDir, init_script: Option<String>) -> DatabaseConfig {
    DatabaseConfig {
        path: dir.path().join("library.db").to_string_lossy().into_owned(),
        init_script,
        ..DatabaseConfig::default()
    }
}

/// Open a fresh store holding exactly the given books and students, nothing lent
pub async fn store_with(books: &[(i64, &str)], students: &[(i64, &str)]) -> TestStore {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let repository = Repository::open(&database_config(&dir, None))
        .await
        .expect("Failed to open store");

    for &(id, name) in students {
        sqlx::query("INSERT INTO student (id, name) VALUES (?, ?)")
            .bind(id)
            .bind(name)
            .execute(&repository.pool)
            .await
            .expect("Failed to insert student");
    }

    for &(id, name) in books {
        sqlx::query("INSERT INTO book (id, name) VALUES (?, ?)")
            .bind(id)
            .bind(name)
            .execute(&repository.pool)
            .await
            .expect("Failed to insert book");
    }

    TestStore { dir, repository }
}

/// Three books and three students
pub async fn small_library() -> TestStore {
    store_with(
        &[(1, "Go"), (2, "Rust"), (3, "SICP")],
        &[(1, "Alice"), (2, "Bob"), (3, "Carol")],
    )
    .await
}
