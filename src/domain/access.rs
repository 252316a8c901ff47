//! Caller identity passed explicitly into every engine operation.
//!
//! The HTTP boundary resolves one [`AccessContext`] per request (see
//! `crate::api::access`); services never look at session state themselves.

use super::{RecipeStatus, Role, UserId};
use crate::services::ContentError;
use serde::Serialize;

/// Who is calling, and with which role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccessContext {
    /// No session, or a session whose role could not be resolved.
    #[default]
    Anonymous,
    Authenticated { user_id: UserId, role: Role },
    /// Local operator tooling. Admin rights, but no user identity, so it can
    /// moderate but cannot author, rate, like or follow.
    Operator,
}

/// Which moderation states a viewer may observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Published,
    Everything,
}

impl Visibility {
    #[must_use]
    pub fn admits(self, status: RecipeStatus) -> bool {
        match self {
            Self::Published => status == RecipeStatus::Active,
            Self::Everything => true,
        }
    }
}

impl AccessContext {
    #[must_use]
    pub const fn authenticated(user_id: UserId, role: Role) -> Self {
        Self::Authenticated { user_id, role }
    }

    /// Builds a context from a possibly-missing role; a missing role is
    /// anonymous, never a privileged default.
    #[must_use]
    pub const fn from_parts(user_id: Option<UserId>, role: Option<Role>) -> Self {
        match (user_id, role) {
            (Some(user_id), Some(role)) => Self::Authenticated { user_id, role },
            _ => Self::Anonymous,
        }
    }

    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Authenticated { user_id, .. } => Some(*user_id),
            Self::Anonymous | Self::Operator => None,
        }
    }

    #[must_use]
    pub const fn role(&self) -> Option<Role> {
        match self {
            Self::Authenticated { role, .. } => Some(*role),
            Self::Operator => Some(Role::Admin),
            Self::Anonymous => None,
        }
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role(), Some(Role::Admin))
    }

    #[must_use]
    pub const fn visibility(&self) -> Visibility {
        if self.is_admin() {
            Visibility::Everything
        } else {
            Visibility::Published
        }
    }

    /// The acting user for operations that create rows on someone's behalf.
    pub fn require_user(&self) -> Result<UserId, ContentError> {
        self.user_id().ok_or(ContentError::Forbidden)
    }

    pub fn require_admin(&self) -> Result<(), ContentError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ContentError::Forbidden)
        }
    }
}
