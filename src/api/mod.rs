//! HTTP handlers: JSON API, HTML views and static files

pub mod books;
pub mod health;
pub mod loans;
pub mod openapi;
pub mod pages;
pub mod students;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Books
        .route("/books", get(books::list_books))
        .route("/books/:id", get(books::get_book))
        .route("/books/:id/release", post(loans::release_book))
        // Students
        .route("/students", get(students::list_students))
        .route("/students/:id", get(students::get_student))
        // Loans
        .route("/loans", post(loans::borrow_book))
        .with_state(state.clone());

    let pages = Router::new()
        .route("/listbooks", get(pages::list_books))
        .route("/liststudents", get(pages::list_students))
        .route("/release", post(pages::release))
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .route_service("/", ServeFile::new(&state.config.web.index))
        .nest_service("/static", ServeDir::new(&state.config.web.static_dir))
        .merge(pages)
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
