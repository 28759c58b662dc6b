//! User (member) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Registered library member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Identity document number, unique across members
    pub document_id: String,
}

/// Create user request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUser {
    pub name: String,
    pub document_id: String,
}

impl User {
    pub fn new(user: CreateUser) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: user.name,
            document_id: user.document_id,
        }
    }
}
