//! Data models for the library system

pub mod book;
pub mod student;

// Re-export commonly used types
pub use book::{Book, BookId, BookWithBorrower};
pub use student::{Student, StudentId, StudentWithBorrowed};
