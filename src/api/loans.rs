//! Lending endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{BookId, BookWithBorrower, StudentId},
    services::Library,
};

/// Borrow request
#[derive(Deserialize, ToSchema)]
pub struct BorrowRequest {
    /// Book to lend out
    pub book_id: BookId,
    /// Student receiving the book
    pub student_id: StudentId,
}

/// State of the book after a borrow or release
#[derive(Serialize, ToSchema)]
pub struct LendingResponse {
    /// Status message
    pub message: String,
    pub book: BookWithBorrower,
}

/// Lend a book to a student
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = BorrowRequest,
    responses(
        (status = 201, description = "Book lent", body = LendingResponse),
        (status = 404, description = "Book or student not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Book already lent or student already holds a book", body = crate::error::ErrorResponse)
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    Json(request): Json<BorrowRequest>,
) -> AppResult<(StatusCode, Json<LendingResponse>)> {
    let lending = &state.services.lending;
    lending.borrow_book(request.book_id, request.student_id).await?;
    let book = lending.find_book_by_id(request.book_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(LendingResponse {
            message: "Book borrowed successfully".to_string(),
            book,
        }),
    ))
}

/// Take a book back
#[utoipa::path(
    post,
    path = "/books/{id}/release",
    tag = "loans",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = LendingResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Book is not lent", body = crate::error::ErrorResponse)
    )
)]
pub async fn release_book(
    State(state): State<crate::AppState>,
    Path(book_id): Path<BookId>,
) -> AppResult<Json<LendingResponse>> {
    let lending = &state.services.lending;
    lending.release_book(book_id).await?;
    let book = lending.find_book_by_id(book_id).await?;

    Ok(Json(LendingResponse {
        message: "Book returned successfully".to_string(),
        book,
    }))
}
