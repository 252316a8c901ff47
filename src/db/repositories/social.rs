use anyhow::{Context, Result};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use std::collections::HashSet;

use crate::domain::{RecipeStatus, Visibility, timestamp_now};
use crate::entities::{followers, likes, recipes};

/// Like and follow edges.
///
/// Both are sets keyed by their composite primary key; inserts go through
/// `ON CONFLICT DO NOTHING` so concurrent duplicates collapse into one row.
pub struct SocialRepository {
    conn: DatabaseConnection,
}

impl SocialRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Returns `None` when the recipe is missing or not visible, otherwise
    /// whether a new like row was created.
    pub async fn like(
        &self,
        user_id: i32,
        recipe_id: i32,
        visibility: Visibility,
    ) -> Result<Option<bool>> {
        let txn = self.conn.begin().await?;

        if !recipe_admits(&txn, recipe_id, visibility).await? {
            txn.rollback().await?;
            return Ok(None);
        }

        let model = likes::ActiveModel {
            user_id: Set(user_id),
            recipe_id: Set(recipe_id),
            created_at: Set(timestamp_now()),
        };

        let inserted = likes::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([likes::Column::UserId, likes::Column::RecipeId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .context("Failed to insert like")?;

        txn.commit().await?;
        Ok(Some(inserted > 0))
    }

    /// Returns `None` when the recipe is missing or not visible, otherwise
    /// whether a like row was removed.
    pub async fn unlike(
        &self,
        user_id: i32,
        recipe_id: i32,
        visibility: Visibility,
    ) -> Result<Option<bool>> {
        let txn = self.conn.begin().await?;

        if !recipe_admits(&txn, recipe_id, visibility).await? {
            txn.rollback().await?;
            return Ok(None);
        }

        let result = likes::Entity::delete_many()
            .filter(likes::Column::UserId.eq(user_id))
            .filter(likes::Column::RecipeId.eq(recipe_id))
            .exec(&txn)
            .await
            .context("Failed to delete like")?;

        txn.commit().await?;
        Ok(Some(result.rows_affected > 0))
    }

    pub async fn like_count(&self, recipe_id: i32) -> Result<u64> {
        let count = likes::Entity::find()
            .filter(likes::Column::RecipeId.eq(recipe_id))
            .count(&self.conn)
            .await?;

        Ok(count)
    }

    pub async fn has_liked(&self, user_id: i32, recipe_id: i32) -> Result<bool> {
        let found = likes::Entity::find_by_id((user_id, recipe_id))
            .one(&self.conn)
            .await?;

        Ok(found.is_some())
    }

    /// Subset of `recipe_ids` the user has liked.
    pub async fn liked_among(&self, user_id: i32, recipe_ids: &[i32]) -> Result<HashSet<i32>> {
        if recipe_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let liked: Vec<i32> = likes::Entity::find()
            .select_only()
            .column(likes::Column::RecipeId)
            .filter(likes::Column::UserId.eq(user_id))
            .filter(likes::Column::RecipeId.is_in(recipe_ids.iter().copied()))
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(liked.into_iter().collect())
    }

    /// Returns `true` if a new follow edge was created.
    pub async fn follow(&self, follower_id: i32, followed_id: i32) -> Result<bool> {
        let model = followers::ActiveModel {
            follower_id: Set(follower_id),
            followed_id: Set(followed_id),
            created_at: Set(timestamp_now()),
        };

        let inserted = followers::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    followers::Column::FollowerId,
                    followers::Column::FollowedId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to insert follow edge")?;

        Ok(inserted > 0)
    }

    pub async fn unfollow(&self, follower_id: i32, followed_id: i32) -> Result<bool> {
        let result = followers::Entity::delete_many()
            .filter(followers::Column::FollowerId.eq(follower_id))
            .filter(followers::Column::FollowedId.eq(followed_id))
            .exec(&self.conn)
            .await
            .context("Failed to delete follow edge")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn is_following(&self, follower_id: i32, followed_id: i32) -> Result<bool> {
        let found = followers::Entity::find_by_id((follower_id, followed_id))
            .one(&self.conn)
            .await?;

        Ok(found.is_some())
    }

    pub async fn follower_count(&self, user_id: i32) -> Result<u64> {
        let count = followers::Entity::find()
            .filter(followers::Column::FollowedId.eq(user_id))
            .count(&self.conn)
            .await?;

        Ok(count)
    }

    pub async fn following_count(&self, user_id: i32) -> Result<u64> {
        let count = followers::Entity::find()
            .filter(followers::Column::FollowerId.eq(user_id))
            .count(&self.conn)
            .await?;

        Ok(count)
    }
}

async fn recipe_admits(
    txn: &DatabaseTransaction,
    recipe_id: i32,
    visibility: Visibility,
) -> Result<bool> {
    let status = recipes::Entity::find_by_id(recipe_id)
        .select_only()
        .column(recipes::Column::Status)
        .into_tuple::<RecipeStatus>()
        .one(txn)
        .await?;

    Ok(status.is_some_and(|status| visibility.admits(status)))
}
