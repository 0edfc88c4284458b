//! Business logic services

pub mod lending;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{BookId, BookWithBorrower, StudentId, StudentWithBorrowed},
    repository::Repository,
};

/// The lending operations the front ends are allowed to call
#[async_trait]
pub trait Library: Send + Sync {
    /// Look up a book and, if it is lent, its borrower
    async fn find_book_by_id(&self, id: BookId) -> AppResult<BookWithBorrower>;

    /// Look up a student and, if they hold one, their book
    async fn find_student_by_id(&self, id: StudentId) -> AppResult<StudentWithBorrowed>;

    async fn list_books(&self) -> AppResult<Vec<BookWithBorrower>>;

    async fn list_students(&self) -> AppResult<Vec<StudentWithBorrowed>>;

    /// Lend a book to a student.
    ///
    /// Checks run in a fixed order: book exists, student exists, book is free,
    /// student holds nothing. The store is untouched when any check fails.
    async fn borrow_book(&self, book_id: BookId, student_id: StudentId) -> AppResult<()>;

    /// Take a book back from whoever holds it
    async fn release_book(&self, book_id: BookId) -> AppResult<()>;
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub lending: lending::LendingService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            lending: lending::LendingService::new(repository),
        }
    }
}
