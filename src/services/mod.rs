//! Business logic services

pub mod books;
pub mod loans;
pub mod users;

use std::sync::Arc;

use crate::{clock::Clock, config::LoansConfig, error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    repository: Repository,
    pub users: users::UsersService,
    pub books: books::BooksService,
    pub loans: loans::LoansService,
}

impl Services {
    /// Create all services with the given repository, borrowing rules and clock
    pub fn new(repository: Repository, loans_config: LoansConfig, clock: Arc<dyn Clock>) -> Self {
        let users = users::UsersService::new(repository.clone(), loans_config.clone());
        let books = books::BooksService::new(repository.clone());
        let loans = loans::LoansService::new(
            repository.clone(),
            users.clone(),
            books.clone(),
            loans_config,
            clock,
        );

        Self {
            repository,
            users,
            books,
            loans,
        }
    }

    /// Check that the storage backend is reachable
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
