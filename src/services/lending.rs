//! Lending service: the only place lending state is mutated

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::sqlite::SqliteConnection;
use tokio::sync::Mutex;

use super::Library;
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookId, BookWithBorrower, Student, StudentId, StudentWithBorrowed},
    repository::{
        books,
        lending::{self, WriteTransaction},
        students, Repository,
    },
};

#[derive(Clone)]
pub struct LendingService {
    repository: Repository,
    /// Held across every check-then-act so two writers never interleave
    write_lock: Arc<Mutex<()>>,
}

impl LendingService {
    pub fn new(repository: Repository) -> Self {
        Self {
            repository,
            write_lock: Arc::new(Mutex::new(())),
        }
    }
}

/// Decide whether a borrow may proceed given the current state of both sides.
///
/// The order of checks fixes which error a caller sees when several apply.
pub(crate) fn check_borrow(
    book_id: BookId,
    student_id: StudentId,
    book: Option<BookWithBorrower>,
    student: Option<StudentWithBorrowed>,
) -> AppResult<(Book, Student)> {
    let book = book.ok_or(AppError::NoSuchBook(book_id))?;
    let student = student.ok_or(AppError::NoSuchStudent(student_id))?;

    if let Some(borrower) = book.borrower {
        return Err(AppError::BookAlreadyBorrowed {
            book: book.book,
            borrower,
        });
    }

    if let Some(borrowed) = student.borrowed {
        return Err(AppError::StudentAlreadyBorrowed {
            student: student.student,
            borrowed,
        });
    }

    Ok((book.book, student.student))
}

pub(crate) fn check_release(book_id: BookId, book: Option<BookWithBorrower>) -> AppResult<Student> {
    let book = book.ok_or(AppError::NoSuchBook(book_id))?;
    book.borrower.ok_or(AppError::BookNotBorrowed(book_id))
}

async fn lend(
    conn: &mut SqliteConnection,
    book_id: BookId,
    student_id: StudentId,
) -> AppResult<(Book, Student)> {
    let book = books::fetch_by_id(&mut *conn, book_id).await?;
    let student = students::fetch_by_id(&mut *conn, student_id).await?;
    let (book, student) = check_borrow(book_id, student_id, book, student)?;

    // The write lock is held, so the row still matches what was checked
    if !lending::set_borrower(conn, book.id, Some(student.id)).await? {
        return Err(AppError::Internal(format!(
            "borrow of book {} by student {} matched no row",
            book_id, student_id
        )));
    }
    Ok((book, student))
}

async fn take_back(conn: &mut SqliteConnection, book_id: BookId) -> AppResult<Student> {
    let book = books::fetch_by_id(&mut *conn, book_id).await?;
    let borrower = check_release(book_id, book)?;

    if !lending::set_borrower(conn, book_id, None).await? {
        return Err(AppError::Internal(format!(
            "release of book {} matched no row",
            book_id
        )));
    }
    Ok(borrower)
}

/// Roll back after a rejected or failed mutation, keeping the original error
async fn abandon(tx: WriteTransaction, err: AppError, action: &str) -> AppError {
    if err.is_domain() {
        tracing::debug!("{} rejected: {}", action, err);
    }
    if let Err(e) = tx.rollback().await {
        tracing::warn!("Rollback after {} failed: {}", action, e);
    }
    err
}

#[async_trait]
impl Library for LendingService {
    async fn find_book_by_id(&self, id: BookId) -> AppResult<BookWithBorrower> {
        self.repository.books.get_by_id(id).await
    }

    async fn find_student_by_id(&self, id: StudentId) -> AppResult<StudentWithBorrowed> {
        self.repository.students.get_by_id(id).await
    }

    async fn list_books(&self) -> AppResult<Vec<BookWithBorrower>> {
        self.repository.books.list().await
    }

    async fn list_students(&self) -> AppResult<Vec<StudentWithBorrowed>> {
        self.repository.students.list().await
    }

    async fn borrow_book(&self, book_id: BookId, student_id: StudentId) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.repository.lending.begin().await?;

        let outcome = lend(tx.conn()?, book_id, student_id).await;
        let (book, student) = match outcome {
            Ok(pair) => pair,
            Err(e) => {
                let action = format!("Borrow of book {} by student {}", book_id, student_id);
                return Err(abandon(tx, e, &action).await);
            }
        };

        tx.commit().await?;
        tracing::info!("Book {} lent to student {}", book, student);
        Ok(())
    }

    async fn release_book(&self, book_id: BookId) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.repository.lending.begin().await?;

        let outcome = take_back(tx.conn()?, book_id).await;
        let borrower = match outcome {
            Ok(borrower) => borrower,
            Err(e) => {
                let action = format!("Release of book {}", book_id);
                return Err(abandon(tx, e, &action).await);
            }
        };

        tx.commit().await?;
        tracing::info!("Book {} returned by student {}", book_id, borrower);
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn go() -> Book {
        Book::new(1, "Go")
    }

    fn alice() -> Student {
        Student::new(1, "Alice")
    }

    fn free_book() -> Option<BookWithBorrower> {
        Some(BookWithBorrower { book: go(), borrower: None })
    }

    fn free_student() -> Option<StudentWithBorrowed> {
        Some(StudentWithBorrowed { student: alice(), borrowed: None })
    }

    #[test]
    fn test_missing_book_wins_over_missing_student() {
        let err = check_borrow(9, 8, None, None).unwrap_err();
        assert!(matches!(err, AppError::NoSuchBook(9)));
    }

    #[test]
    fn test_missing_student() {
        let err = check_borrow(1, 8, free_book(), None).unwrap_err();
        assert!(matches!(err, AppError::NoSuchStudent(8)));
    }

    #[test]
    fn test_book_conflict_wins_over_student_conflict() {
        let bob = Student::new(2, "Bob");
        let book = Some(BookWithBorrower { book: go(), borrower: Some(bob.clone()) });
        let student = Some(StudentWithBorrowed {
            student: alice(),
            borrowed: Some(Book::new(2, "Rust")),
        });

        match check_borrow(1, 1, book, student).unwrap_err() {
            AppError::BookAlreadyBorrowed { book, borrower } => {
                assert_eq!(book, go());
                assert_eq!(borrower, bob);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_student_conflict() {
        let student = Some(StudentWithBorrowed {
            student: alice(),
            borrowed: Some(Book::new(2, "Rust")),
        });

        match check_borrow(1, 1, free_book(), student).unwrap_err() {
            AppError::StudentAlreadyBorrowed { student, borrowed } => {
                assert_eq!(student, alice());
                assert_eq!(borrowed, Book::new(2, "Rust"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_borrow_allowed() {
        let (book, student) = check_borrow(1, 1, free_book(), free_student()).unwrap();
        assert_eq!(book, go());
        assert_eq!(student, alice());
    }

    #[test]
    fn test_release_checks() {
        assert!(matches!(check_release(5, None), Err(AppError::NoSuchBook(5))));
        assert!(matches!(check_release(1, free_book()), Err(AppError::BookNotBorrowed(1))));

        let lent = Some(BookWithBorrower { book: go(), borrower: Some(alice()) });
        assert_eq!(check_release(1, lent).unwrap(), alice());
    }
}
