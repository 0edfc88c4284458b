//! Presentation rows derived from lending views

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{BookId, BookWithBorrower, StudentId, StudentWithBorrowed};

/// Shown in place of a counterpart when nothing is attached
pub const NONE: &str = "none";

/// What a row offers to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum NextAction {
    LendOut,
    Return,
}

impl NextAction {
    pub fn as_str(self) -> &'static str {
        match self {
            NextAction::LendOut => "lend-out",
            NextAction::Return => "return",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BookRow {
    pub id: BookId,
    pub name: String,
    /// `<name>(<id>)` of the borrower, or `none`
    pub borrower: String,
    pub next_action: NextAction,
    /// Form target for the return action
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StudentRow {
    pub id: StudentId,
    pub name: String,
    /// `<name>(<id>)` of the held book, or `none`
    pub borrowed: String,
    pub next_action: NextAction,
    /// Form target for the return action
    pub href: Option<String>,
}

fn release_href(book_id: BookId) -> String {
    format!("/release?book={}", book_id)
}

pub fn book_row(view: &BookWithBorrower) -> BookRow {
    let (borrower, next_action, href) = match &view.borrower {
        Some(student) => (student.to_string(), NextAction::Return, Some(release_href(view.book.id))),
        None => (NONE.to_string(), NextAction::LendOut, None),
    };

    BookRow {
        id: view.book.id,
        name: view.book.name.clone(),
        borrower,
        next_action,
        href,
    }
}

pub fn student_row(view: &StudentWithBorrowed) -> StudentRow {
    let (borrowed, next_action, href) = match &view.borrowed {
        Some(book) => (book.to_string(), NextAction::Return, Some(release_href(book.id))),
        None => (NONE.to_string(), NextAction::LendOut, None),
    };

    StudentRow {
        id: view.student.id,
        name: view.student.name.clone(),
        borrowed,
        next_action,
        href,
    }
}

pub fn book_rows(views: &[BookWithBorrower]) -> Vec<BookRow> {
    views.iter().map(book_row).collect()
}

pub fn student_rows(views: &[StudentWithBorrowed]) -> Vec<StudentRow> {
    views.iter().map(student_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Book, Student};

    #[test]
    fn test_lent_book_row() {
        let view = BookWithBorrower {
            book: Book::new(1, "Go"),
            borrower: Some(Student::new(1, "Alice")),
        };

        let row = book_row(&view);
        assert_eq!(row.id, 1);
        assert_eq!(row.name, "Go");
        assert_eq!(row.borrower, "Alice(1)");
        assert_eq!(row.next_action, NextAction::Return);
        assert_eq!(row.href.as_deref(), Some("/release?book=1"));
    }

    #[test]
    fn test_free_rows() {
        let book = BookWithBorrower { book: Book::new(2, "Rust"), borrower: None };
        let row = book_row(&book);
        assert_eq!(row.borrower, "none");
        assert_eq!(row.next_action, NextAction::LendOut);
        assert_eq!(row.href, None);

        let student = StudentWithBorrowed { student: Student::new(3, "Carol"), borrowed: None };
        let row = student_row(&student);
        assert_eq!(row.borrowed, "none");
        assert_eq!(row.next_action, NextAction::LendOut);
        assert_eq!(row.href, None);
    }

    #[test]
    fn test_student_row_links_to_held_book() {
        let view = StudentWithBorrowed {
            student: Student::new(1, "Alice"),
            borrowed: Some(Book::new(4, "SICP")),
        };

        let rows = student_rows(&[view]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].borrowed, "SICP(4)");
        assert_eq!(rows[0].href.as_deref(), Some("/release?book=4"));
    }

    #[test]
    fn test_next_action_labels() {
        assert_eq!(NextAction::Return.as_str(), "return");
        assert_eq!(
            serde_json::to_string(&NextAction::LendOut).unwrap(),
            "\"lend-out\""
        );
    }
}
