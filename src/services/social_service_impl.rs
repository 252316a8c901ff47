//! `SeaORM` implementation of the `SocialService` trait.

use crate::db::Store;
use crate::domain::{AccessContext, RecipeId, UserId};
use crate::models::feed::{ContentFilter, FeedScope};
use crate::models::social::{FollowStatus, LikeStatus};
use crate::models::user::Profile;
use crate::services::{ContentError, FeedService, SocialService};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

pub struct SeaOrmSocialService {
    store: Store,
    feed: Arc<dyn FeedService>,
}

impl SeaOrmSocialService {
    #[must_use]
    pub fn new(store: Store, feed: Arc<dyn FeedService>) -> Self {
        Self { store, feed }
    }

    /// Follower and target, after the self-follow and existence checks.
    async fn follow_pair(
        &self,
        ctx: &AccessContext,
        target: UserId,
    ) -> Result<(UserId, UserId), ContentError> {
        let follower = ctx.require_user()?;
        if follower == target {
            return Err(ContentError::SelfFollow);
        }
        if !self.store.user_exists(target.value()).await? {
            return Err(ContentError::UserNotFound(target));
        }
        Ok((follower, target))
    }
}

#[async_trait]
impl SocialService for SeaOrmSocialService {
    async fn follow(
        &self,
        ctx: &AccessContext,
        target: UserId,
    ) -> Result<FollowStatus, ContentError> {
        let (follower, target) = self.follow_pair(ctx, target).await?;

        let created = self
            .store
            .add_follow(follower.value(), target.value())
            .await?;
        debug!(follower = %follower, followed = %target, created, "Follow");

        Ok(FollowStatus {
            following: true,
            followers: self.store.follower_count(target.value()).await?,
        })
    }

    async fn unfollow(
        &self,
        ctx: &AccessContext,
        target: UserId,
    ) -> Result<FollowStatus, ContentError> {
        let (follower, target) = self.follow_pair(ctx, target).await?;

        let removed = self
            .store
            .remove_follow(follower.value(), target.value())
            .await?;
        debug!(follower = %follower, followed = %target, removed, "Unfollow");

        Ok(FollowStatus {
            following: false,
            followers: self.store.follower_count(target.value()).await?,
        })
    }

    async fn like(&self, ctx: &AccessContext, recipe: RecipeId) -> Result<LikeStatus, ContentError> {
        let liker = ctx.require_user()?;

        let created = self
            .store
            .add_like(liker.value(), recipe.value(), ctx.visibility())
            .await?
            .ok_or(ContentError::RecipeNotFound(recipe))?;
        debug!(user_id = %liker, recipe_id = %recipe, created, "Like");

        Ok(LikeStatus {
            liked: true,
            likes: self.store.like_count(recipe.value()).await?,
        })
    }

    async fn unlike(
        &self,
        ctx: &AccessContext,
        recipe: RecipeId,
    ) -> Result<LikeStatus, ContentError> {
        let liker = ctx.require_user()?;

        let removed = self
            .store
            .remove_like(liker.value(), recipe.value(), ctx.visibility())
            .await?
            .ok_or(ContentError::RecipeNotFound(recipe))?;
        debug!(user_id = %liker, recipe_id = %recipe, removed, "Unlike");

        Ok(LikeStatus {
            liked: false,
            likes: self.store.like_count(recipe.value()).await?,
        })
    }

    async fn fetch_profile(
        &self,
        ctx: &AccessContext,
        user: UserId,
        page: u64,
    ) -> Result<Profile, ContentError> {
        let profile_user = self
            .store
            .get_user(user.value())
            .await?
            .ok_or(ContentError::UserNotFound(user))?;

        let viewer = ctx.user_id();
        let viewer_follows = match viewer {
            Some(viewer) if viewer != user => {
                self.store.is_following(viewer.value(), user.value()).await?
            }
            _ => false,
        };

        let filter = ContentFilter {
            author: Some(user),
            scope: FeedScope::All,
            ..ContentFilter::default()
        };
        let recipes = self.feed.query_content(ctx, &filter, page, None).await?;

        Ok(Profile {
            id: profile_user.id,
            name: profile_user.name,
            surname: profile_user.surname,
            about_me: profile_user.about_me,
            profile_img_path: profile_user.profile_img_path,
            role: profile_user.role,
            rating_avg: profile_user.rating_avg,
            date_registered: profile_user.date_registered,
            followers: self.store.follower_count(user.value()).await?,
            following: self.store.following_count(user.value()).await?,
            viewer_follows,
            is_self: viewer == Some(user),
            recipes,
        })
    }
}
