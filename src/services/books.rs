//! Book registry

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, CreateBook},
        loan::{self, Loan},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn register(&self, book: CreateBook) -> AppResult<Book> {
        let book = Book::new(book);
        self.repository.books.insert(&book).await?;

        tracing::info!("Registered book {} ({})", book.id, book.title);
        Ok(book)
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Book> {
        self.repository
            .books
            .get_by_id(id)
            .await?
            .ok_or(AppError::BookNotFound)
    }

    /// The open loan holding this book, if any
    pub async fn current_loan(&self, id: Uuid) -> AppResult<Option<Loan>> {
        self.get_by_id(id).await?;

        let loans = self.repository.loans.get_by_book(id).await?;
        Ok(loan::current_loan(&loans).cloned())
    }

    pub async fn is_available(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.current_loan(id).await?.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn clean_code() -> CreateBook {
        CreateBook {
            title: "Clean Code".to_string(),
            author: "Uncle Bob".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_and_find() {
        let service = BooksService::new(Repository::in_memory());
        let book = service.register(clean_code()).await.unwrap();

        assert_eq!(service.get_by_id(book.id).await.unwrap(), book);
        assert!(service.is_available(book.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_book() {
        let service = BooksService::new(Repository::in_memory());
        let id = Uuid::new_v4();

        assert!(matches!(service.get_by_id(id).await, Err(AppError::BookNotFound)));
        assert!(matches!(service.current_loan(id).await, Err(AppError::BookNotFound)));
        assert!(matches!(service.is_available(id).await, Err(AppError::BookNotFound)));
    }

    #[tokio::test]
    async fn test_availability_follows_open_loan() {
        let repository = Repository::in_memory();
        let service = BooksService::new(repository.clone());
        let book = service.register(clean_code()).await.unwrap();

        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut loan = Loan::open(Uuid::new_v4(), book.id, today, 15);
        repository.loans.insert(&loan).await.unwrap();

        assert_eq!(service.current_loan(book.id).await.unwrap(), Some(loan.clone()));
        assert!(!service.is_available(book.id).await.unwrap());

        loan.returned_date = Some(today);
        repository.loans.update(&loan).await.unwrap();

        assert_eq!(service.current_loan(book.id).await.unwrap(), None);
        assert!(service.is_available(book.id).await.unwrap());
    }
}
