//! In-memory store
//!
//! Keeps every entity in an `IndexMap` behind a `tokio` `RwLock`, so listings
//! come back in insertion order. Uniqueness checks run under the write lock,
//! which makes them atomic with the insert.

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Book, Loan, User},
};

use super::{BookStore, LoanStore, UserStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<IndexMap<Uuid, User>>,
    books: RwLock<IndexMap<Uuid, Book>>,
    loans: RwLock<IndexMap<Uuid, Loan>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: &User) -> AppResult<()> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.document_id == user.document_id) {
            return Err(AppError::UserAlreadyExists);
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn get_by_document_id(&self, document_id: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.document_id == document_id).cloned())
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn insert(&self, book: &Book) -> AppResult<()> {
        self.books.write().await.insert(book.id, book.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        Ok(self.books.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl LoanStore for MemoryStore {
    async fn insert(&self, loan: &Loan) -> AppResult<()> {
        let mut loans = self.loans.write().await;
        if loan.is_open()
            && loans
                .values()
                .any(|l| l.book_id == loan.book_id && l.is_open())
        {
            return Err(AppError::BookNotAvailable);
        }
        loans.insert(loan.id, loan.clone());
        Ok(())
    }

    async fn update(&self, loan: &Loan) -> AppResult<()> {
        let mut loans = self.loans.write().await;
        let stored = loans.get_mut(&loan.id).ok_or(AppError::LoanNotFound)?;
        stored.returned_date = loan.returned_date;
        stored.fine = loan.fine.clone();
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Loan>> {
        Ok(self.loans.read().await.get(&id).cloned())
    }

    async fn get_by_user(&self, user_id: Uuid) -> AppResult<Vec<Loan>> {
        let loans = self.loans.read().await;
        Ok(loans.values().filter(|l| l.user_id == user_id).cloned().collect())
    }

    async fn get_by_book(&self, book_id: Uuid) -> AppResult<Vec<Loan>> {
        let loans = self.loans.read().await;
        Ok(loans.values().filter(|l| l.book_id == book_id).cloned().collect())
    }
}
