//! Loan model and the rules that move a loan through its lifecycle
//!
//! A loan is created open, closed exactly once when the book comes back, and
//! after that only its fine may change (from `OPEN` to `PAID`). Everything in
//! here is pure: the loan service looks records up, calls these rules and
//! persists the outcome.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult, FineRejection};

/// Fine payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FineStatus {
    Open,
    Paid,
}

impl FineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FineStatus::Open => "OPEN",
            FineStatus::Paid => "PAID",
        }
    }
}

impl std::str::FromStr for FineStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(FineStatus::Open),
            "PAID" => Ok(FineStatus::Paid),
            other => Err(AppError::Internal(format!("Unknown fine status: {}", other))),
        }
    }
}

/// Fine charged on a late return
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Fine {
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub value: Decimal,
    pub status: FineStatus,
}

/// Position of a loan in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanState {
    Open,
    ClosedNoFine,
    ClosedFineOpen,
    ClosedFinePaid,
}

/// Loan of one book to one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Loan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub issued_date: NaiveDate,
    pub due_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returned_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fine: Option<Fine>,
}

impl Loan {
    /// New open loan issued `today`
    pub fn open(user_id: Uuid, book_id: Uuid, today: NaiveDate, loan_period_days: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            book_id,
            issued_date: today,
            due_date: today + Duration::days(loan_period_days),
            returned_date: None,
            fine: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.returned_date.is_none()
    }

    pub fn state(&self) -> LoanState {
        match (&self.returned_date, &self.fine) {
            (None, _) => LoanState::Open,
            (Some(_), None) => LoanState::ClosedNoFine,
            (Some(_), Some(fine)) => match fine.status {
                FineStatus::Open => LoanState::ClosedFineOpen,
                FineStatus::Paid => LoanState::ClosedFinePaid,
            },
        }
    }

    /// Record the return and charge a fine when the book is late
    pub fn close(&mut self, today: NaiveDate, fine_per_day: Decimal) -> AppResult<()> {
        if !self.is_open() {
            return Err(AppError::BookNotBorrowed);
        }

        self.returned_date = Some(today);
        self.fine = fine_for(overdue_days(self.due_date, today), fine_per_day);
        Ok(())
    }

    /// Settle an open fine. Only a closed loan with an unpaid fine qualifies.
    pub fn pay_fine(&mut self) -> AppResult<()> {
        match self.state() {
            LoanState::ClosedFineOpen => {
                if let Some(fine) = self.fine.as_mut() {
                    fine.status = FineStatus::Paid;
                }
                Ok(())
            }
            LoanState::Open => Err(AppError::FinePaymentRejected(FineRejection::LoanOpen)),
            LoanState::ClosedNoFine => Err(AppError::FinePaymentRejected(FineRejection::NoFine)),
            LoanState::ClosedFinePaid => {
                Err(AppError::FinePaymentRejected(FineRejection::AlreadyPaid))
            }
        }
    }
}

/// Whole days between due date and `today`; zero or negative when on time
pub fn overdue_days(due_date: NaiveDate, today: NaiveDate) -> i64 {
    (today - due_date).num_days()
}

pub fn fine_for(overdue_days: i64, fine_per_day: Decimal) -> Option<Fine> {
    (overdue_days > 0).then(|| Fine {
        value: Decimal::from(overdue_days) * fine_per_day,
        status: FineStatus::Open,
    })
}

/// The loan that currently holds a book, if any
pub fn current_loan(loans: &[Loan]) -> Option<&Loan> {
    loans.iter().find(|loan| loan.is_open())
}

/// Loan row as stored in the database, fine flattened into two columns
#[derive(Debug, FromRow)]
pub struct LoanRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub issued_date: NaiveDate,
    pub due_date: NaiveDate,
    pub returned_date: Option<NaiveDate>,
    pub fine_value: Option<Decimal>,
    pub fine_status: Option<String>,
}

impl TryFrom<LoanRow> for Loan {
    type Error = AppError;

    fn try_from(row: LoanRow) -> Result<Self, Self::Error> {
        let fine = match (row.fine_value, row.fine_status) {
            (Some(value), Some(status)) => Some(Fine {
                value,
                status: status.parse()?,
            }),
            (None, None) => None,
            _ => {
                return Err(AppError::Internal(format!(
                    "Loan {} has an incomplete fine",
                    row.id
                )))
            }
        };

        Ok(Loan {
            id: row.id,
            user_id: row.user_id,
            book_id: row.book_id,
            issued_date: row.issued_date,
            due_date: row.due_date,
            returned_date: row.returned_date,
            fine,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rate() -> Decimal {
        Decimal::new(2, 0)
    }

    fn loan_with(returned: bool, fine: Option<FineStatus>) -> Loan {
        let mut loan = Loan::open(Uuid::new_v4(), Uuid::new_v4(), date(2024, 1, 1), 15);
        if returned {
            loan.returned_date = Some(date(2024, 2, 1));
        }
        loan.fine = fine.map(|status| Fine {
            value: Decimal::new(10, 0),
            status,
        });
        loan
    }

    #[test]
    fn test_open_sets_due_date() {
        let loan = Loan::open(Uuid::new_v4(), Uuid::new_v4(), date(2024, 2, 20), 15);
        assert_eq!(loan.issued_date, date(2024, 2, 20));
        assert_eq!(loan.due_date, date(2024, 3, 6));
        assert_eq!(loan.state(), LoanState::Open);
        assert!(loan.fine.is_none());
    }

    #[test]
    fn test_overdue_days() {
        let due = date(2024, 3, 1);
        assert_eq!(overdue_days(due, date(2024, 2, 25)), -5);
        assert_eq!(overdue_days(due, due), 0);
        assert_eq!(overdue_days(due, date(2024, 3, 28)), 27);
    }

    #[test]
    fn test_fine_for() {
        assert_eq!(fine_for(0, rate()), None);
        assert_eq!(fine_for(-3, rate()), None);
        assert_eq!(
            fine_for(1, rate()),
            Some(Fine {
                value: Decimal::new(2, 0),
                status: FineStatus::Open
            })
        );
        assert_eq!(fine_for(60, rate()).unwrap().value, Decimal::new(120, 0));
    }

    #[test]
    fn test_close_on_time_has_no_fine() {
        let mut loan = Loan::open(Uuid::new_v4(), Uuid::new_v4(), date(2024, 1, 1), 15);
        loan.close(date(2024, 1, 16), rate()).unwrap();

        assert_eq!(loan.returned_date, Some(date(2024, 1, 16)));
        assert_eq!(loan.fine, None);
        assert_eq!(loan.state(), LoanState::ClosedNoFine);
    }

    #[test]
    fn test_close_late_charges_fine() {
        let mut loan = Loan::open(Uuid::new_v4(), Uuid::new_v4(), date(2024, 1, 1), 15);
        loan.close(date(2024, 2, 12), rate()).unwrap();

        let fine = loan.fine.clone().unwrap();
        assert_eq!(fine.value, Decimal::new(54, 0));
        assert_eq!(fine.status, FineStatus::Open);
        assert_eq!(loan.state(), LoanState::ClosedFineOpen);
    }

    #[test]
    fn test_close_twice_is_rejected() {
        let mut loan = Loan::open(Uuid::new_v4(), Uuid::new_v4(), date(2024, 1, 1), 15);
        loan.close(date(2024, 1, 5), rate()).unwrap();

        assert!(matches!(
            loan.close(date(2024, 3, 5), rate()),
            Err(AppError::BookNotBorrowed)
        ));
        assert_eq!(loan.returned_date, Some(date(2024, 1, 5)));
        assert_eq!(loan.fine, None);
    }

    #[test]
    fn test_pay_fine_only_for_closed_loan_with_open_fine() {
        let mut loan = loan_with(true, Some(FineStatus::Open));
        loan.pay_fine().unwrap();
        assert_eq!(loan.state(), LoanState::ClosedFinePaid);

        let rejected = [
            (loan_with(false, None), FineRejection::LoanOpen),
            (loan_with(false, Some(FineStatus::Open)), FineRejection::LoanOpen),
            (loan_with(false, Some(FineStatus::Paid)), FineRejection::LoanOpen),
            (loan_with(true, None), FineRejection::NoFine),
            (loan_with(true, Some(FineStatus::Paid)), FineRejection::AlreadyPaid),
        ];

        for (mut loan, cause) in rejected {
            let before = loan.clone();
            match loan.pay_fine() {
                Err(AppError::FinePaymentRejected(reason)) => assert_eq!(reason, cause),
                other => panic!("expected rejection, got {:?}", other),
            }
            assert_eq!(loan, before);
        }
    }

    #[test]
    fn test_current_loan() {
        let closed = loan_with(true, None);
        let open = loan_with(false, None);

        assert_eq!(current_loan(&[]), None);
        assert_eq!(current_loan(&[closed.clone()]), None);
        assert_eq!(current_loan(&[closed, open.clone()]), Some(&open));
    }

    #[test]
    fn test_serialization() {
        let mut loan = Loan::open(Uuid::new_v4(), Uuid::new_v4(), date(2024, 1, 1), 15);
        let json = serde_json::to_value(&loan).unwrap();
        assert_eq!(json["issued_date"], "2024-01-01");
        assert_eq!(json["due_date"], "2024-01-16");
        assert!(json.get("returned_date").is_none());
        assert!(json.get("fine").is_none());

        loan.close(date(2024, 2, 12), rate()).unwrap();
        let json = serde_json::to_value(&loan).unwrap();
        assert_eq!(json["returned_date"], "2024-02-12");
        assert_eq!(json["fine"]["value"], 54.0);
        assert_eq!(json["fine"]["status"], "OPEN");
    }

    #[test]
    fn test_row_conversion() {
        let row = LoanRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            book_id: Uuid::new_v4(),
            issued_date: date(2024, 1, 1),
            due_date: date(2024, 1, 16),
            returned_date: Some(date(2024, 1, 20)),
            fine_value: Some(Decimal::new(8, 0)),
            fine_status: Some("PAID".to_string()),
        };
        let loan = Loan::try_from(row).unwrap();
        assert_eq!(loan.state(), LoanState::ClosedFinePaid);

        let broken = LoanRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            book_id: Uuid::new_v4(),
            issued_date: date(2024, 1, 1),
            due_date: date(2024, 1, 16),
            returned_date: Some(date(2024, 1, 20)),
            fine_value: Some(Decimal::new(8, 0)),
            fine_status: None,
        };
        assert!(matches!(Loan::try_from(broken), Err(AppError::Internal(_))));
    }
}
