//! Books repository for database operations

use sqlx::{Executor, FromRow, Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookId, BookWithBorrower, Student},
};

const SELECT_BOOKS: &str = r#"
    SELECT b.id, b.name, s.id AS borrower_id, s.name AS borrower_name
    FROM book b
    LEFT JOIN student s ON s.id = b.borrowed_by
"#;

/// One row of the book/student outer join
#[derive(Debug, FromRow)]
struct BookJoinRow {
    id: BookId,
    name: String,
    borrower_id: Option<i64>,
    borrower_name: Option<String>,
}

impl From<BookJoinRow> for BookWithBorrower {
    fn from(row: BookJoinRow) -> Self {
        Self {
            book: Book {
                id: row.id,
                name: row.name,
            },
            borrower: Student::from_nullable(row.borrower_id, row.borrower_name),
        }
    }
}

/// Look up one book and its borrower in a single statement.
///
/// Generic over the executor so the lending path can run it inside its transaction.
pub(crate) async fn fetch_by_id<'e, E>(executor: E, id: BookId) -> AppResult<Option<BookWithBorrower>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, BookJoinRow>(&format!("{} WHERE b.id = ?", SELECT_BOOKS))
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row.map(Into::into))
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Sqlite>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get book by ID, with its current borrower
    pub async fn get_by_id(&self, id: BookId) -> AppResult<BookWithBorrower> {
        fetch_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::NoSuchBook(id))
    }

    /// List all books with their current borrowers, ordered by id
    pub async fn list(&self) -> AppResult<Vec<BookWithBorrower>> {
        let rows = sqlx::query_as::<_, BookJoinRow>(&format!("{} ORDER BY b.id", SELECT_BOOKS))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
