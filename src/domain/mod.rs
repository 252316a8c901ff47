//! Domain primitives for the content engine.
//!
//! Newtype identifiers keep user, recipe and rating keys from being mixed up
//! at call sites; the enums shared with storage are re-exported from the
//! entity definitions.

pub mod access;
pub mod paging;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use crate::entities::recipes::{Difficulty, RecipeStatus};
pub use crate::entities::users::Role;
pub use access::{AccessContext, Visibility};
pub use paging::{Page, PageWindow};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn value(&self) -> i32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

entity_id!(
    /// Primary key of a user account.
    ///
    /// ```rust
    /// use potluck::domain::UserId;
    ///
    /// let id = UserId::new(7);
    /// assert_eq!(id.value(), 7);
    /// assert_eq!(id.to_string(), "7");
    /// ```
    UserId
);

entity_id!(
    /// Primary key of a recipe.
    RecipeId
);

entity_id!(
    /// Primary key of a single rating row.
    RatingId
);

/// A validated rating score in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Score(u8);

impl Score {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 5;

    /// Returns `None` for anything outside `1..=5`.
    #[must_use]
    pub fn new(raw: i32) -> Option<Self> {
        if (Self::MIN..=Self::MAX).contains(&raw) {
            u8::try_from(raw).ok().map(Self)
        } else {
            None
        }
    }

    #[must_use]
    pub fn value(&self) -> i32 {
        i32::from(self.0)
    }
}

/// Current time in the fixed-width RFC 3339 form used for every timestamp
/// column, so lexical order matches chronological order.
#[must_use]
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
