//! Domain service for accounts: registration, login and profile edits.

use crate::domain::{AccessContext, UserId};
use crate::models::user::{NewUser, ProfileUpdate, User};
use thiserror::Error;

/// Errors specific to account operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already registered")]
    EmailTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait AccountService: Send + Sync {
    /// Creates a plain `user` account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::EmailTaken`] for a duplicate email and
    /// [`AuthError::Validation`] for malformed input.
    async fn register(&self, new_user: NewUser) -> Result<User, AuthError>;

    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown email or a
    /// wrong password, without distinguishing the two.
    async fn login(&self, email: &str, password: &str) -> Result<User, AuthError>;

    async fn get_user(&self, id: UserId) -> Result<User, AuthError>;

    /// Edits the caller's own profile.
    async fn update_profile(
        &self,
        ctx: &AccessContext,
        update: ProfileUpdate,
    ) -> Result<User, AuthError>;
}
