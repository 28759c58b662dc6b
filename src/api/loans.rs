//! Loan management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{error::AppResult, models::loan::Loan};

/// Create loan request
#[derive(Deserialize, ToSchema)]
pub struct CreateLoanRequest {
    /// Borrowing user
    pub user_id: Uuid,
    /// Book to lend
    pub book_id: Uuid,
}

/// Create a new loan (borrow a book)
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = CreateLoanRequest,
    responses(
        (status = 201, description = "Loan created", body = Loan),
        (status = 400, description = "Book is already borrowed", body = String, content_type = "text/plain"),
        (status = 403, description = "User reached the loan limit", body = String, content_type = "text/plain"),
        (status = 404, description = "User or book not found", body = String, content_type = "text/plain")
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateLoanRequest>,
) -> AppResult<(StatusCode, Json<Loan>)> {
    let loan = state
        .services
        .loans
        .create_loan(request.user_id, request.book_id)
        .await?;

    Ok((StatusCode::CREATED, Json(loan)))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/loans/{book_id}",
    tag = "loans",
    params(
        ("book_id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Loan closed, with fine when late", body = Loan),
        (status = 400, description = "Book is not currently borrowed", body = String, content_type = "text/plain"),
        (status = 404, description = "Book not found", body = String, content_type = "text/plain")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    Path(book_id): Path<Uuid>,
) -> AppResult<Json<Loan>> {
    let loan = state.services.loans.return_book(book_id).await?;
    Ok(Json(loan))
}

/// Get all loans of a user
#[utoipa::path(
    get,
    path = "/loans/users/{user_id}",
    tag = "loans",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User's loans", body = Vec<Loan>),
        (status = 404, description = "User not found", body = String, content_type = "text/plain")
    )
)]
pub async fn get_user_loans(
    State(state): State<crate::AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Vec<Loan>>> {
    let loans = state.services.loans.get_user_loans(user_id).await?;
    Ok(Json(loans))
}

/// Pay the fine of a returned loan
#[utoipa::path(
    post,
    path = "/loans/payments/{loan_id}",
    tag = "loans",
    params(
        ("loan_id" = Uuid, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Fine paid", body = Loan),
        (status = 400, description = "Payment rejected", body = String, content_type = "text/plain"),
        (status = 404, description = "Loan not found", body = String, content_type = "text/plain")
    )
)]
pub async fn pay_fine(
    State(state): State<crate::AppState>,
    Path(loan_id): Path<Uuid>,
) -> AppResult<Json<Loan>> {
    let loan = state.services.loans.pay_fine(loan_id).await?;
    Ok(Json(loan))
}
