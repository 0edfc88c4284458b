//! Student model and its joined borrowed-book view

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::book::Book;

pub type StudentId = i64;

/// Student row from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
}

impl Student {
    pub fn new(id: StudentId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }

    /// Same contract as [`Book::from_nullable`]
    pub fn from_nullable(id: Option<StudentId>, name: Option<String>) -> Option<Self> {
        match (id, name) {
            (Some(id), Some(name)) => Some(Self { id, name }),
            _ => None,
        }
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.id)
    }
}

/// A student together with the book they currently hold, if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StudentWithBorrowed {
    pub student: Student,
    pub borrowed: Option<Book>,
}

impl StudentWithBorrowed {
    pub fn holds_book(&self) -> bool {
        self.borrowed.is_some()
    }
}
