//! Library System
//!
//! Lends books to students, at most one book per student and one student per
//! book, over a SQLite store. Driven from an interactive shell and a small web view.

use std::sync::Arc;

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod projections;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult, ErrorKind};
pub use services::Library;

/// Application state shared across all handlers and the shell
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    pub fn new(config: AppConfig, repository: repository::Repository) -> Self {
        Self {
            config: Arc::new(config),
            services: Arc::new(services::Services::new(repository)),
        }
    }
}
