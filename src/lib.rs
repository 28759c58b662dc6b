//! Library loan management server
//!
//! Tracks books, members and the loans between them over a REST JSON API,
//! enforcing borrowing rules and charging fines for late returns.

use std::sync::Arc;

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    pub fn new(config: AppConfig, repository: repository::Repository, clock: Arc<dyn clock::Clock>) -> Self {
        let services = services::Services::new(repository, config.loans.clone(), clock);
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }
}
