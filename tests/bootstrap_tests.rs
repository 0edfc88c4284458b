//! Store creation and seeding

mod common;

use std::path::Path;

use librarysystem::{repository::Repository, ErrorKind, Library, services::lending::LendingService};

use common::database_config;

const SEED: &str = r#"
CREATE TABLE student (id INTEGER NOT NULL PRIMARY KEY, name TEXT NOT NULL);
CREATE TABLE book (
    id INTEGER NOT NULL PRIMARY KEY,
    name TEXT NOT NULL,
    borrowed_by INTEGER DEFAULT NULL REFERENCES student(id)
);
INSERT INTO student (id, name) VALUES (1, 'Alice'), (2, 'Bob');
INSERT INTO book (id, name) VALUES (1, 'Go'), (2, 'Rust');
"#;

#[tokio::test]
async fn test_fresh_store_is_seeded_once() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("init.sql");
    std::fs::write(&script, SEED).unwrap();
    let config = database_config(&dir, Some(script.to_string_lossy().into_owned()));

    let repository = Repository::open(&config).await.expect("Failed to open store");
    let library = LendingService::new(repository.clone());
    assert_eq!(library.list_books().await.unwrap().len(), 2);
    assert_eq!(library.list_students().await.unwrap().len(), 2);
    library.borrow_book(2, 1).await.unwrap();
    repository.close().await;

    // Reopening an existing store must not run the seed again
    let repository = Repository::open(&config).await.expect("Failed to reopen store");
    let library = LendingService::new(repository);
    let book = library.find_book_by_id(2).await.unwrap();
    assert_eq!(book.borrower.unwrap().name, "Alice");
}

#[tokio::test]
async fn test_store_without_seed_gets_schema() {
    let dir = tempfile::tempdir().unwrap();
    let repository = Repository::open(&database_config(&dir, None)).await.unwrap();
    let library = LendingService::new(repository);

    assert!(library.list_books().await.unwrap().is_empty());
    assert!(library.list_students().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_broken_seed_leaves_no_store_behind() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("init.sql");
    std::fs::write(&script, "CREATE TABLE student (id INTEGER PRIMARY KEY;").unwrap();
    let config = database_config(&dir, Some(script.to_string_lossy().into_owned()));

    let err = Repository::open(&config).await.err().expect("seed should fail");
    assert_eq!(err.kind(), ErrorKind::StorageFault);
    assert!(!Path::new(&config.path).exists());
}

#[tokio::test]
async fn test_seed_that_breaks_the_schema_leaves_no_store_behind() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("init.sql");
    // Seeds fine, but the borrower index has no column to go on
    std::fs::write(
        &script,
        "CREATE TABLE book (id INTEGER NOT NULL PRIMARY KEY, name TEXT NOT NULL);\n\
         INSERT INTO book (id, name) VALUES (1, 'Go');\n",
    )
    .unwrap();
    let config = database_config(&dir, Some(script.to_string_lossy().into_owned()));

    let err = Repository::open(&config).await.err().expect("schema should fail");
    assert_eq!(err.kind(), ErrorKind::StorageFault);
    assert!(!Path::new(&config.path).exists());

    // Once the script is fixed, the next start seeds from scratch
    std::fs::write(&script, SEED).unwrap();
    let repository = Repository::open(&config).await.expect("Failed to open store");
    let library = LendingService::new(repository);
    assert_eq!(library.list_books().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_seed_with_shared_borrower_leaves_no_store_behind() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("init.sql");
    let seed = format!("{SEED}UPDATE book SET borrowed_by = 1;\n");
    std::fs::write(&script, seed).unwrap();
    let config = database_config(&dir, Some(script.to_string_lossy().into_owned()));

    let err = Repository::open(&config).await.err().expect("unique borrower index should fail");
    assert_eq!(err.kind(), ErrorKind::StorageFault);
    assert!(!Path::new(&config.path).exists());
}

#[tokio::test]
async fn test_missing_seed_script_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = database_config(&dir, Some(dir.path().join("nope.sql").to_string_lossy().into_owned()));

    assert!(Repository::open(&config).await.is_err());
    assert!(!Path::new(&config.path).exists());
}
