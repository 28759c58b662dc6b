//! User registry

use uuid::Uuid;

use crate::{
    config::LoansConfig,
    error::{AppError, AppResult},
    models::user::{CreateUser, User},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: LoansConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: LoansConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new member; the document id must not be in use
    pub async fn register(&self, user: CreateUser) -> AppResult<User> {
        if self.find_by_document_id(&user.document_id).await?.is_some() {
            return Err(AppError::UserAlreadyExists);
        }

        let user = User::new(user);
        self.repository.users.insert(&user).await?;

        tracing::info!("Registered user {}", user.id);
        Ok(user)
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<User> {
        self.repository
            .users
            .get_by_id(id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub async fn find_by_document_id(&self, document_id: &str) -> AppResult<Option<User>> {
        self.repository.users.get_by_document_id(document_id).await
    }

    /// Loans counted against the borrowing limit.
    ///
    /// Returned loans are included unless `count_returned_loans` is disabled.
    pub async fn active_loan_count(&self, id: Uuid) -> AppResult<usize> {
        self.get_by_id(id).await?;

        let loans = self.repository.loans.get_by_user(id).await?;
        let count = if self.config.count_returned_loans {
            loans.len()
        } else {
            loans.iter().filter(|loan| loan.is_open()).count()
        };

        Ok(count)
    }

    pub async fn can_borrow(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.active_loan_count(id).await? < self.config.user_loan_limit)
    }
}
