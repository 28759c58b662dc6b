//! Loan engine
//!
//! Issues loans, closes them when books come back and takes fine payments.
//! Mutating operations run one at a time behind `gate`, so the checks made
//! before a write still hold when the write happens. The store's own
//! uniqueness rules cover writers living in other processes.

use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    clock::Clock,
    config::LoansConfig,
    error::{AppError, AppResult},
    models::loan::Loan,
    repository::Repository,
};

use super::{books::BooksService, users::UsersService};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    users: UsersService,
    books: BooksService,
    config: LoansConfig,
    clock: Arc<dyn Clock>,
    gate: Arc<Mutex<()>>,
}

impl LoansService {
    pub fn new(
        repository: Repository,
        users: UsersService,
        books: BooksService,
        config: LoansConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            users,
            books,
            config,
            clock,
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// Lend a book to a user.
    ///
    /// The loan limit is checked before availability, so a user at the limit
    /// gets `LoanLimitExceeded` even for a book that is already out.
    pub async fn create_loan(&self, user_id: Uuid, book_id: Uuid) -> AppResult<Loan> {
        let _guard = self.gate.lock().await;

        let user = self.users.get_by_id(user_id).await?;
        let book = self.books.get_by_id(book_id).await?;

        if !self.users.can_borrow(user.id).await? {
            return Err(AppError::LoanLimitExceeded);
        }
        if !self.books.is_available(book.id).await? {
            return Err(AppError::BookNotAvailable);
        }

        let loan = Loan::open(
            user.id,
            book.id,
            self.clock.today(),
            self.config.loan_period_days,
        );
        self.repository.loans.insert(&loan).await?;

        tracing::info!(
            "Loan {} issued: book {} to user {}, due {}",
            loan.id,
            book.id,
            user.id,
            loan.due_date
        );
        Ok(loan)
    }

    /// Close the open loan of a book, charging a fine when it is late.
    ///
    /// An unknown book is `BookNotFound`; a known book without an open loan
    /// is `BookNotBorrowed`.
    pub async fn return_book(&self, book_id: Uuid) -> AppResult<Loan> {
        let _guard = self.gate.lock().await;

        let mut loan = self
            .books
            .current_loan(book_id)
            .await?
            .ok_or(AppError::BookNotBorrowed)?;

        loan.close(self.clock.today(), self.config.fine_per_day)?;
        self.repository.loans.update(&loan).await?;

        match &loan.fine {
            Some(fine) => tracing::info!(
                "Loan {} closed late, fine of {} charged",
                loan.id,
                fine.value
            ),
            None => tracing::info!("Loan {} closed on time", loan.id),
        }
        Ok(loan)
    }

    /// Get all loans of a user, open and closed
    pub async fn get_user_loans(&self, user_id: Uuid) -> AppResult<Vec<Loan>> {
        self.users.get_by_id(user_id).await?;
        self.repository.loans.get_by_user(user_id).await
    }

    pub async fn get_by_id(&self, loan_id: Uuid) -> AppResult<Loan> {
        self.repository
            .loans
            .get_by_id(loan_id)
            .await?
            .ok_or(AppError::LoanNotFound)
    }

    /// Mark the open fine of a closed loan as paid
    pub async fn pay_fine(&self, loan_id: Uuid) -> AppResult<Loan> {
        let _guard = self.gate.lock().await;

        let mut loan = self.get_by_id(loan_id).await?;
        loan.pay_fine()?;
        self.repository.loans.update(&loan).await?;

        tracing::info!("Fine paid for loan {}", loan.id);
        Ok(loan)
    }
}
