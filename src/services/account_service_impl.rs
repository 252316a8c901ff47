//! `SeaORM` implementation of the `AccountService` trait.

use crate::config::SecurityConfig;
use crate::db::Store;
use crate::domain::{AccessContext, Role, UserId};
use crate::models::user::{NewUser, ProfileUpdate, User};
use crate::services::account_service::{AccountService, AuthError};
use crate::services::credentials::Credentials;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

const MAX_NAME_LEN: usize = 100;

pub struct SeaOrmAccountService {
    store: Store,
    credentials: Arc<dyn Credentials>,
    security: SecurityConfig,
}

impl SeaOrmAccountService {
    #[must_use]
    pub fn new(store: Store, credentials: Arc<dyn Credentials>, security: SecurityConfig) -> Self {
        Self {
            store,
            credentials,
            security,
        }
    }
}

/// Lowercased, trimmed email with a minimal shape check.
pub fn normalize_email(raw: &str) -> Result<String, AuthError> {
    let email = raw.trim().to_lowercase();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));

    if valid {
        Ok(email)
    } else {
        Err(AuthError::Validation("A valid email address is required".to_string()))
    }
}

fn validate_name(name: &str) -> Result<String, AuthError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AuthError::Validation("Name is required".to_string()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AuthError::Validation(format!(
            "Name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

#[async_trait]
impl AccountService for SeaOrmAccountService {
    async fn register(&self, new_user: NewUser) -> Result<User, AuthError> {
        let email = normalize_email(&new_user.email)?;
        let name = validate_name(&new_user.name)?;

        if new_user.password.chars().count() < self.security.min_password_length {
            return Err(AuthError::Validation(format!(
                "Password must be at least {} characters",
                self.security.min_password_length
            )));
        }

        let hash = self.credentials.hash(&new_user.password).await?;

        let user = self
            .store
            .create_user(&email, &name, &hash, Role::User)
            .await?
            .ok_or(AuthError::EmailTaken)?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = normalize_email(email).map_err(|_| AuthError::InvalidCredentials)?;

        let Some((user, hash)) = self.store.get_user_with_password(&email).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        if !self.credentials.verify(password, &hash).await? {
            warn!(user_id = %user.id, "Failed login attempt");
            return Err(AuthError::InvalidCredentials);
        }

        info!(user_id = %user.id, "User logged in");
        Ok(user)
    }

    async fn get_user(&self, id: UserId) -> Result<User, AuthError> {
        self.store
            .get_user(id.value())
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    async fn update_profile(
        &self,
        ctx: &AccessContext,
        mut update: ProfileUpdate,
    ) -> Result<User, AuthError> {
        let user_id = ctx.user_id().ok_or(AuthError::Unauthorized)?;

        if let Some(name) = &update.name {
            update.name = Some(validate_name(name)?);
        }

        self.store
            .update_user_profile(user_id.value(), &update)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_normalized() {
        assert_eq!(normalize_email("  Cook@Example.COM ").unwrap(), "cook@example.com");
        assert!(normalize_email("no-at-sign").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("cook@localhost").is_err());
    }

    #[test]
    fn names_are_trimmed_and_bounded() {
        assert_eq!(validate_name("  Ada ").unwrap(), "Ada");
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(MAX_NAME_LEN + 1)).is_err());
    }
}
