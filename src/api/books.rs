//! Book endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::{BookId, BookWithBorrower},
    projections::{book_rows, BookRow},
    services::Library,
};

/// List all books with their current borrowers
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = Vec<BookRow>)
    )
)]
pub async fn list_books(State(state): State<crate::AppState>) -> AppResult<Json<Vec<BookRow>>> {
    let books = state.services.lending.list_books().await?;
    Ok(Json(book_rows(&books)))
}

/// Get a book and its borrower
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookWithBorrower),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<BookId>,
) -> AppResult<Json<BookWithBorrower>> {
    let book = state.services.lending.find_book_by_id(id).await?;
    Ok(Json(book))
}
