//! Domain service for the social graph: likes, follows and profile pages.
//!
//! Every mutation is idempotent. Repeating a like or follow, or removing one
//! that does not exist, succeeds and reports the current state.

use crate::domain::{AccessContext, RecipeId, UserId};
use crate::models::social::{FollowStatus, LikeStatus};
use crate::models::user::Profile;
use crate::services::ContentError;

#[async_trait::async_trait]
pub trait SocialService: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ContentError::SelfFollow`] when `target` is the caller.
    async fn follow(&self, ctx: &AccessContext, target: UserId)
    -> Result<FollowStatus, ContentError>;

    async fn unfollow(
        &self,
        ctx: &AccessContext,
        target: UserId,
    ) -> Result<FollowStatus, ContentError>;

    /// Requires the recipe to be visible to the caller.
    async fn like(&self, ctx: &AccessContext, recipe: RecipeId)
    -> Result<LikeStatus, ContentError>;

    async fn unlike(
        &self,
        ctx: &AccessContext,
        recipe: RecipeId,
    ) -> Result<LikeStatus, ContentError>;

    /// A user's profile with one page of the recipes the viewer may see.
    async fn fetch_profile(
        &self,
        ctx: &AccessContext,
        user: UserId,
        page: u64,
    ) -> Result<Profile, ContentError>;
}
