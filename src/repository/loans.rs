//! Loans repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::loan::{Loan, LoanRow},
};

use super::LoanStore;

const LOAN_COLUMNS: &str =
    "id, user_id, book_id, issued_date, due_date, returned_date, fine_value, fine_status";

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn fetch_where(&self, column: &str, value: Uuid) -> AppResult<Vec<Loan>> {
        let rows = sqlx::query_as::<_, LoanRow>(&format!(
            "SELECT {} FROM loans WHERE {} = $1 ORDER BY created_at, id",
            LOAN_COLUMNS, column
        ))
        .bind(value)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Loan::try_from).collect()
    }
}

#[async_trait]
impl LoanStore for LoansRepository {
    async fn insert(&self, loan: &Loan) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO loans (id, user_id, book_id, issued_date, due_date, returned_date, fine_value, fine_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(loan.id)
        .bind(loan.user_id)
        .bind(loan.book_id)
        .bind(loan.issued_date)
        .bind(loan.due_date)
        .bind(loan.returned_date)
        .bind(loan.fine.as_ref().map(|f| f.value))
        .bind(loan.fine.as_ref().map(|f| f.status.as_str()))
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            // loans_open_book_key: another open loan won the race
            sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::BookNotAvailable,
            e => AppError::Database(e),
        })?;

        Ok(())
    }

    async fn update(&self, loan: &Loan) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE loans SET returned_date = $1, fine_value = $2, fine_status = $3 WHERE id = $4",
        )
        .bind(loan.returned_date)
        .bind(loan.fine.as_ref().map(|f| f.value))
        .bind(loan.fine.as_ref().map(|f| f.status.as_str()))
        .bind(loan.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::LoanNotFound);
        }

        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Loan>> {
        let row = sqlx::query_as::<_, LoanRow>(&format!(
            "SELECT {} FROM loans WHERE id = $1",
            LOAN_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Loan::try_from).transpose()
    }

    async fn get_by_user(&self, user_id: Uuid) -> AppResult<Vec<Loan>> {
        self.fetch_where("user_id", user_id).await
    }

    async fn get_by_book(&self, book_id: Uuid) -> AppResult<Vec<Loan>> {
        self.fetch_where("book_id", book_id).await
    }
}
