//! Student endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::{StudentId, StudentWithBorrowed},
    projections::{student_rows, StudentRow},
    services::Library,
};

/// List all students with the books they hold
#[utoipa::path(
    get,
    path = "/students",
    tag = "students",
    responses(
        (status = 200, description = "All students", body = Vec<StudentRow>)
    )
)]
pub async fn list_students(State(state): State<crate::AppState>) -> AppResult<Json<Vec<StudentRow>>> {
    let students = state.services.lending.list_students().await?;
    Ok(Json(student_rows(&students)))
}

/// Get a student and the book they hold
#[utoipa::path(
    get,
    path = "/students/{id}",
    tag = "students",
    params(
        ("id" = i64, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student details", body = StudentWithBorrowed),
        (status = 404, description = "Student not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_student(
    State(state): State<crate::AppState>,
    Path(id): Path<StudentId>,
) -> AppResult<Json<StudentWithBorrowed>> {
    let student = state.services.lending.find_student_by_id(id).await?;
    Ok(Json(student))
}
