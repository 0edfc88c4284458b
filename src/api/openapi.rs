//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, loans, students};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library System API",
        version = "0.1.0",
        description = "Book lending between students, one book per student"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        // Books
        books::list_books,
        books::get_book,
        // Students
        students::list_students,
        students::get_student,
        // Loans
        loans::borrow_book,
        loans::release_book,
    ),
    components(
        schemas(
            crate::models::Book,
            crate::models::Student,
            crate::models::BookWithBorrower,
            crate::models::StudentWithBorrowed,
            crate::projections::BookRow,
            crate::projections::StudentRow,
            crate::projections::NextAction,
            loans::BorrowRequest,
            loans::LendingResponse,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Books and their borrowers"),
        (name = "students", description = "Students and their books"),
        (name = "loans", description = "Borrowing and returning")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
