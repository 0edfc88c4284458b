//! Students repository for database operations

use sqlx::{Executor, FromRow, Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::{Book, Student, StudentId, StudentWithBorrowed},
};

const SELECT_STUDENTS: &str = r#"
    SELECT s.id, s.name, b.id AS book_id, b.name AS book_name
    FROM student s
    LEFT JOIN book b ON b.borrowed_by = s.id
"#;

#[derive(Debug, FromRow)]
struct StudentJoinRow {
    id: StudentId,
    name: String,
    book_id: Option<i64>,
    book_name: Option<String>,
}

impl From<StudentJoinRow> for StudentWithBorrowed {
    fn from(row: StudentJoinRow) -> Self {
        Self {
            student: Student {
                id: row.id,
                name: row.name,
            },
            borrowed: Book::from_nullable(row.book_id, row.book_name),
        }
    }
}

/// Look up one student and the book they hold in a single statement
pub(crate) async fn fetch_by_id<'e, E>(
    executor: E,
    id: StudentId,
) -> AppResult<Option<StudentWithBorrowed>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, StudentJoinRow>(&format!("{} WHERE s.id = ?", SELECT_STUDENTS))
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row.map(Into::into))
}

#[derive(Clone)]
pub struct StudentsRepository {
    pool: Pool<Sqlite>,
}

impl StudentsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get student by ID, with the book they currently hold
    pub async fn get_by_id(&self, id: StudentId) -> AppResult<StudentWithBorrowed> {
        fetch_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::NoSuchStudent(id))
    }

    /// List all students with their held books, ordered by id
    pub async fn list(&self) -> AppResult<Vec<StudentWithBorrowed>> {
        let rows = sqlx::query_as::<_, StudentJoinRow>(&format!(
            "{} ORDER BY s.id",
            SELECT_STUDENTS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
