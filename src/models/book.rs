//! Book model and its joined borrower view

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::student::Student;

pub type BookId = i64;

/// Book row from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: BookId,
    pub name: String,
}

impl Book {
    pub fn new(id: BookId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }

    /// Build a book from the nullable columns of an outer join.
    ///
    /// Both halves must be present; a lone id or a lone name is treated as no book.
    pub fn from_nullable(id: Option<BookId>, name: Option<String>) -> Option<Self> {
        match (id, name) {
            (Some(id), Some(name)) => Some(Self { id, name }),
            _ => None,
        }
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.id)
    }
}

/// A book together with the student currently holding it, if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookWithBorrower {
    pub book: Book,
    pub borrower: Option<Student>,
}

impl BookWithBorrower {
    pub fn is_borrowed(&self) -> bool {
        self.borrower.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Book::new(1, "Go").to_string(), "Go(1)");
        assert_eq!(Book::new(42, "The Rust Book").to_string(), "The Rust Book(42)");
    }

    #[test]
    fn test_from_nullable() {
        assert_eq!(
            Book::from_nullable(Some(3), Some("SICP".to_string())),
            Some(Book::new(3, "SICP"))
        );
        assert_eq!(Book::from_nullable(None, None), None);
        assert_eq!(Book::from_nullable(Some(3), None), None);
        assert_eq!(Book::from_nullable(None, Some("SICP".to_string())), None);
    }
}
