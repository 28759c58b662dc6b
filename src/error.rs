//! Error types for the library server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Why a fine payment was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FineRejection {
    LoanOpen,
    NoFine,
    AlreadyPaid,
}

impl std::fmt::Display for FineRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            FineRejection::LoanOpen => "loan is still open",
            FineRejection::NoFine => "loan has no fine",
            FineRejection::AlreadyPaid => "fine is already paid",
        };
        f.write_str(reason)
    }
}

/// Error families, each rendered with a single HTTP status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    BadRequest,
    Forbidden,
    Infrastructure,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::Infrastructure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("User not found")]
    UserNotFound,

    #[error("Book not found")]
    BookNotFound,

    #[error("Loan not found")]
    LoanNotFound,

    #[error("Book is already borrowed")]
    BookNotAvailable,

    #[error("Book is not currently borrowed")]
    BookNotBorrowed,

    #[error("There is already a user with the informed document id")]
    UserAlreadyExists,

    #[error("Could not pay fine: {0}")]
    FinePaymentRejected(FineRejection),

    #[error("User has reached the limit of loans")]
    LoanLimitExceeded,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::UserNotFound | AppError::BookNotFound | AppError::LoanNotFound => {
                ErrorKind::NotFound
            }
            AppError::BookNotAvailable
            | AppError::BookNotBorrowed
            | AppError::UserAlreadyExists
            | AppError::FinePaymentRejected(_) => ErrorKind::BadRequest,
            AppError::LoanLimitExceeded => ErrorKind::Forbidden,
            AppError::Database(_) | AppError::Internal(_) => ErrorKind::Infrastructure,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            _ => {
                tracing::warn!("Returning HTTP {} with error message: {}", kind.status(), self);
                self.to_string()
            }
        };

        (kind.status(), message).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
