//! Repository layer for persistence
//!
//! Each entity has a small store trait: insert, find by id and find by one
//! indexed field. Two backends implement them: PostgreSQL and an in-memory
//! store. Both enforce the same uniqueness rules (document id per user, one
//! open loan per book) at insert time.

pub mod books;
pub mod loans;
pub mod memory;
pub mod users;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Book, Loan, User},
};

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `UserAlreadyExists` when the document id is taken
    async fn insert(&self, user: &User) -> AppResult<()>;
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn get_by_document_id(&self, document_id: &str) -> AppResult<Option<User>>;
}

#[async_trait]
pub trait BookStore: Send + Sync {
    async fn insert(&self, book: &Book) -> AppResult<()>;
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Book>>;
}

#[async_trait]
pub trait LoanStore: Send + Sync {
    /// Fails with `BookNotAvailable` when the book already has an open loan
    async fn insert(&self, loan: &Loan) -> AppResult<()>;
    /// Overwrites return date and fine; fails with `LoanNotFound` for an unknown id
    async fn update(&self, loan: &Loan) -> AppResult<()>;
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Loan>>;
    /// Loans of a user in insertion order
    async fn get_by_user(&self, user_id: Uuid) -> AppResult<Vec<Loan>>;
    /// Loans of a book in insertion order
    async fn get_by_book(&self, book_id: Uuid) -> AppResult<Vec<Loan>>;
}

/// Main repository struct holding one store per entity
#[derive(Clone)]
pub struct Repository {
    /// Set for the PostgreSQL backend
    pub pool: Option<Pool<Postgres>>,
    pub users: Arc<dyn UserStore>,
    pub books: Arc<dyn BookStore>,
    pub loans: Arc<dyn LoanStore>,
}

impl Repository {
    /// Create a repository backed by PostgreSQL
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self {
            users: Arc::new(users::UsersRepository::new(pool.clone())),
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            loans: Arc::new(loans::LoansRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Create a repository kept in process memory
    pub fn in_memory() -> Self {
        let store = Arc::new(memory::MemoryStore::new());
        Self {
            pool: None,
            users: store.clone(),
            books: store.clone(),
            loans: store,
        }
    }

    /// Check that the backing store answers
    pub async fn ping(&self) -> AppResult<()> {
        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }
}
