//! Built-in schema, applied on every start after any seed script

/// `borrowed_by` is the lending link: NULL when the book is on the shelf.
/// The partial unique index keeps a student from being recorded on two books.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS student (
    id INTEGER NOT NULL PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS book (
    id INTEGER NOT NULL PRIMARY KEY,
    name TEXT NOT NULL,
    borrowed_by INTEGER DEFAULT NULL REFERENCES student(id)
);

CREATE UNIQUE INDEX IF NOT EXISTS book_borrowed_by
    ON book (borrowed_by)
    WHERE borrowed_by IS NOT NULL;
"#;
