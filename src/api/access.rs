//! Session-backed resolution of the caller's [`AccessContext`].
//!
//! The session holds the user id and a cached role. A missing role is
//! re-fetched from the store; a user that no longer exists resolves to
//! anonymous.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::sync::Arc;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use super::ApiError;
use crate::db::Store;
use crate::domain::{AccessContext, Role, UserId};
use crate::models::user::User;
use crate::state::SharedState;

pub const USER_ID_KEY: &str = "user_id";
pub const ROLE_KEY: &str = "role";

/// Cookie session layer with a one-hour inactivity expiry.
#[must_use]
pub fn session_layer() -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(60)))
}

pub async fn resolve(session: &Session, store: &Store) -> Result<AccessContext, ApiError> {
    let user_id = session
        .get::<i32>(USER_ID_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;

    let Some(user_id) = user_id.map(UserId::new) else {
        return Ok(AccessContext::Anonymous);
    };

    // An unreadable cached role is treated like a missing one.
    let cached = session.get::<Role>(ROLE_KEY).await.ok().flatten();

    let role = match cached {
        Some(role) => Some(role),
        None => {
            let fetched = store.get_user_role(user_id.value()).await?;
            if let Some(role) = fetched {
                session
                    .insert(ROLE_KEY, role)
                    .await
                    .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;
            }
            fetched
        }
    };

    Ok(AccessContext::from_parts(Some(user_id), role))
}

/// Binds a freshly authenticated user to the session under a new id.
pub async fn establish(session: &Session, user: &User) -> Result<(), ApiError> {
    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;
    session
        .insert(USER_ID_KEY, user.id.value())
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;
    session
        .insert(ROLE_KEY, user.role)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    tracing::debug!(user_id = %user.id, role = user.role.as_str(), "Session established");
    Ok(())
}

pub async fn clear(session: &Session) -> Result<(), ApiError> {
    session
        .flush()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to clear session: {e}")))
}

/// Drops only the cached role, forcing the next request to re-fetch it.
pub async fn forget_role(session: &Session) -> Result<(), ApiError> {
    session
        .remove::<Role>(ROLE_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;
    Ok(())
}

impl FromRequestParts<Arc<SharedState>> for AccessContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<SharedState>,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| ApiError::internal(msg))?;

        resolve(&session, &state.store).await
    }
}
