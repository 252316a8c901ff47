//! Error taxonomy shared by every content operation.
//!
//! Validation and authorization variants are produced before the store is
//! touched. [`ContentError::Storage`] means the enclosing transaction was rolled
//! back and no partial effect is visible.

use crate::domain::{RatingId, RecipeId, UserId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Invalid score {0}: must be between 1 and 5")]
    InvalidScore(i32),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Recipe not found: {0}")]
    RecipeNotFound(RecipeId),

    #[error("Rating not found: {0}")]
    RatingNotFound(RatingId),

    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Users cannot follow themselves")]
    SelfFollow,

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ContentError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<sea_orm::DbErr> for ContentError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<anyhow::Error> for ContentError {
    fn from(err: anyhow::Error) -> Self {
        Self::Storage(format!("{err:#}"))
    }
}
