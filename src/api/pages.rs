//! HTML views of the lending state

use axum::{
    extract::{Query, State},
    http::{header::REFERER, HeaderMap},
    response::Redirect,
};
use maud::{html, Markup, DOCTYPE};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::BookId,
    projections::{book_rows, student_rows, NextAction},
    services::Library,
};

fn layout(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (title) }
                link rel="stylesheet" href="/static/style.css";
            }
            body {
                nav {
                    a href="/" { "home" } " "
                    a href="/listbooks" { "books" } " "
                    a href="/liststudents" { "students" }
                }
                h1 { (title) }
                (body)
            }
        }
    }
}

fn action(next_action: NextAction, href: Option<&str>) -> Markup {
    html! {
        @match href {
            Some(href) => {
                form method="POST" action=(href) {
                    button { (next_action.as_str()) }
                }
            }
            None => {
                span class="action" { (next_action.as_str()) }
            }
        }
    }
}

pub async fn list_books(State(state): State<crate::AppState>) -> AppResult<Markup> {
    let rows = book_rows(&state.services.lending.list_books().await?);

    Ok(layout("Books", html! {
        p { (rows.len()) " books" }
        table {
            thead { tr {
                th { "ID" }
                th { "Name" }
                th { "Borrower" }
                th { "Action" }
            } }
            tbody {
                @for row in &rows {
                    tr {
                        td { (row.id) }
                        td { (row.name) }
                        td { (row.borrower) }
                        td { (action(row.next_action, row.href.as_deref())) }
                    }
                }
            }
        }
    }))
}

pub async fn list_students(State(state): State<crate::AppState>) -> AppResult<Markup> {
    let rows = student_rows(&state.services.lending.list_students().await?);

    Ok(layout("Students", html! {
        p { (rows.len()) " students" }
        table {
            thead { tr {
                th { "ID" }
                th { "Name" }
                th { "Book" }
                th { "Action" }
            } }
            tbody {
                @for row in &rows {
                    tr {
                        td { (row.id) }
                        td { (row.name) }
                        td { (row.borrowed) }
                        td { (action(row.next_action, row.href.as_deref())) }
                    }
                }
            }
        }
    }))
}

#[derive(Debug, Deserialize)]
pub struct ReleaseParams {
    pub book: BookId,
}

/// The list page a form was submitted from
fn back_to(headers: &HeaderMap) -> Redirect {
    let from_students = headers
        .get(REFERER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|referer| referer.contains("/liststudents"));

    Redirect::to(if from_students { "/liststudents" } else { "/listbooks" })
}

/// Return form target; goes back to the list the form was on.
///
/// A rejected return (the book was already returned elsewhere) still goes
/// back, so the refreshed list shows the current state.
pub async fn release(
    State(state): State<crate::AppState>,
    headers: HeaderMap,
    Query(params): Query<ReleaseParams>,
) -> AppResult<Redirect> {
    match state.services.lending.release_book(params.book).await {
        Ok(()) => {}
        Err(e) if e.is_domain() => {
            tracing::info!("Return of book {} from the web view rejected: {}", params.book, e);
        }
        Err(e) => return Err(e),
    }

    Ok(back_to(&headers))
}
