//! Error types for the library system

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::models::{Book, BookId, Student, StudentId};

/// Numeric error codes carried in JSON error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    DbFailure = 3,
    NoSuchBook = 4,
    NoSuchStudent = 5,
    BookAlreadyBorrowed = 6,
    StudentAlreadyBorrowed = 7,
    BookNotBorrowed = 8,
    BadValue = 18,
}

/// Coarse error category, used by the front ends to pick a status or message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller named a book or student that does not exist
    NotFound,
    /// The mutation would break a lending invariant in the current state
    Conflict,
    /// The caller's input could not be turned into an operation
    Invalid,
    /// The store itself failed
    StorageFault,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("no such book: {0}")]
    NoSuchBook(BookId),

    #[error("no such student: {0}")]
    NoSuchStudent(StudentId),

    #[error("book {book} is already borrowed by {borrower}")]
    BookAlreadyBorrowed { book: Book, borrower: Student },

    #[error("student {student} has already borrowed book {borrowed}")]
    StudentAlreadyBorrowed { student: Student, borrowed: Book },

    #[error("book {0} is not borrowed")]
    BookNotBorrowed(BookId),

    #[error("{0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NoSuchBook(_) | AppError::NoSuchStudent(_) => ErrorKind::NotFound,
            AppError::BookAlreadyBorrowed { .. }
            | AppError::StudentAlreadyBorrowed { .. }
            | AppError::BookNotBorrowed(_) => ErrorKind::Conflict,
            AppError::BadRequest(_) => ErrorKind::Invalid,
            AppError::Database(_) | AppError::Internal(_) => ErrorKind::StorageFault,
        }
    }

    /// True for valid-but-rejected requests, false when the system is broken
    pub fn is_domain(&self) -> bool {
        matches!(self.kind(), ErrorKind::NotFound | ErrorKind::Conflict)
    }

    fn code(&self) -> ErrorCode {
        match self {
            AppError::NoSuchBook(_) => ErrorCode::NoSuchBook,
            AppError::NoSuchStudent(_) => ErrorCode::NoSuchStudent,
            AppError::BookAlreadyBorrowed { .. } => ErrorCode::BookAlreadyBorrowed,
            AppError::StudentAlreadyBorrowed { .. } => ErrorCode::StudentAlreadyBorrowed,
            AppError::BookNotBorrowed(_) => ErrorCode::BookNotBorrowed,
            AppError::BadRequest(_) => ErrorCode::BadValue,
            AppError::Database(_) => ErrorCode::DbFailure,
            AppError::Internal(_) => ErrorCode::Failure,
        }
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message) = match self.kind() {
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ErrorKind::Conflict => (StatusCode::CONFLICT, self.to_string()),
            ErrorKind::Invalid => (StatusCode::BAD_REQUEST, self.to_string()),
            ErrorKind::StorageFault => {
                tracing::error!("Storage fault: {:?}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(AppError::NoSuchBook(7).to_string(), "no such book: 7");
        assert_eq!(AppError::NoSuchStudent(2).to_string(), "no such student: 2");
        assert_eq!(AppError::BookNotBorrowed(1).to_string(), "book 1 is not borrowed");

        let err = AppError::BookAlreadyBorrowed {
            book: Book::new(1, "Go"),
            borrower: Student::new(1, "Alice"),
        };
        assert_eq!(err.to_string(), "book Go(1) is already borrowed by Alice(1)");

        let err = AppError::StudentAlreadyBorrowed {
            student: Student::new(1, "Alice"),
            borrowed: Book::new(1, "Go"),
        };
        assert_eq!(err.to_string(), "student Alice(1) has already borrowed book Go(1)");
    }

    #[test]
    fn test_kinds() {
        assert_eq!(AppError::NoSuchBook(1).kind(), ErrorKind::NotFound);
        assert_eq!(AppError::BookNotBorrowed(1).kind(), ErrorKind::Conflict);
        assert_eq!(AppError::BadRequest("x".into()).kind(), ErrorKind::Invalid);
        assert_eq!(
            AppError::Database(sqlx::Error::PoolTimedOut).kind(),
            ErrorKind::StorageFault
        );
        assert!(AppError::NoSuchStudent(1).is_domain());
        assert!(!AppError::Internal("boom".into()).is_domain());
    }

    #[test]
    fn test_storage_fault_response_hides_details() {
        let response = AppError::Internal("disk on fire".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = AppError::NoSuchBook(9).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::BookNotBorrowed(9).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
