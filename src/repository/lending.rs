//! Lending link writes

use sqlx::{pool::PoolConnection, sqlite::SqliteConnection, Executor, Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::{BookId, StudentId},
};

#[derive(Clone)]
pub struct LendingRepository {
    pool: Pool<Sqlite>,
}

impl LendingRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Start the transaction a lending check-then-act runs in.
    ///
    /// The transaction holds the database write lock from its first statement,
    /// so nothing can commit between the checks and the write. A writer in
    /// another process makes this wait up to the configured busy timeout.
    pub async fn begin(&self) -> AppResult<WriteTransaction> {
        let mut conn = self.pool.acquire().await?;
        (&mut *conn).execute("BEGIN IMMEDIATE").await?;
        Ok(WriteTransaction { conn: Some(conn) })
    }
}

/// A pooled connection inside `BEGIN IMMEDIATE`.
///
/// Dropped without `commit` or `rollback`, the connection leaves the pool and
/// closes, which rolls the transaction back.
pub struct WriteTransaction {
    conn: Option<PoolConnection<Sqlite>>,
}

impl WriteTransaction {
    pub fn conn(&mut self) -> AppResult<&mut SqliteConnection> {
        match self.conn.as_mut() {
            Some(conn) => Ok(&mut **conn),
            None => Err(AppError::Internal("write transaction already finished".to_string())),
        }
    }

    pub async fn commit(self) -> AppResult<()> {
        self.finish("COMMIT").await
    }

    pub async fn rollback(self) -> AppResult<()> {
        self.finish("ROLLBACK").await
    }

    async fn finish(mut self, statement: &str) -> AppResult<()> {
        let Some(mut conn) = self.conn.take() else {
            return Err(AppError::Internal("write transaction already finished".to_string()));
        };

        if let Err(e) = (&mut *conn).execute(statement).await {
            // The transaction may still be open; never hand it back to the pool
            drop(conn.detach());
            return Err(e.into());
        }
        Ok(())
    }
}

impl Drop for WriteTransaction {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            tracing::debug!("Write transaction dropped unfinished, closing its connection");
            drop(conn.detach());
        }
    }
}

/// Set or clear the borrower of a book in one conditional statement.
///
/// Linking only applies to a free book and a student who holds nothing;
/// unlinking only applies to a lent book. Returns whether a row changed.
pub(crate) async fn set_borrower(
    conn: &mut SqliteConnection,
    book_id: BookId,
    borrower: Option<StudentId>,
) -> AppResult<bool> {
    let result = match borrower {
        Some(student_id) => {
            sqlx::query(
                r#"
                UPDATE book SET borrowed_by = ?1
                WHERE id = ?2
                  AND borrowed_by IS NULL
                  AND EXISTS (SELECT 1 FROM student WHERE id = ?1)
                  AND NOT EXISTS (SELECT 1 FROM book WHERE borrowed_by = ?1)
                "#,
            )
            .bind(student_id)
            .bind(book_id)
            .execute(&mut *conn)
            .await?
        }
        None => {
            sqlx::query("UPDATE book SET borrowed_by = NULL WHERE id = ? AND borrowed_by IS NOT NULL")
                .bind(book_id)
                .execute(&mut *conn)
                .await?
        }
    };

    Ok(result.rows_affected() == 1)
}
