use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::aggregate::{self, RecipeAggregate};
use crate::domain::{Visibility, timestamp_now};
use crate::entities::{prelude::*, ratings, users};

#[derive(Debug, Clone)]
pub struct RatingChange {
    pub rating_id: i32,
    pub recipe_id: i32,
    pub author_id: i32,
    pub recipe: RecipeAggregate,
    pub author_rating_avg: Option<f64>,
}

pub struct RatingRepository {
    conn: DatabaseConnection,
}

impl RatingRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts a rating and recomputes both aggregates in one transaction.
    /// Returns `None` when the recipe is missing or not visible.
    pub async fn record(
        &self,
        recipe_id: i32,
        user_id: i32,
        score: i32,
        comment: Option<String>,
        visibility: Visibility,
    ) -> Result<Option<RatingChange>> {
        let txn = self.conn.begin().await?;

        let recipe = Recipes::find_by_id(recipe_id).one(&txn).await?;
        let Some(recipe) = recipe.filter(|r| visibility.admits(r.status)) else {
            txn.rollback().await?;
            return Ok(None);
        };

        let model = ratings::ActiveModel {
            recipe_id: Set(recipe_id),
            user_id: Set(user_id),
            score: Set(score),
            comment: Set(comment),
            created_at: Set(timestamp_now()),
            ..Default::default()
        };
        let rating_id = Ratings::insert(model)
            .exec(&txn)
            .await
            .context("Failed to insert rating")?
            .last_insert_id;

        let recipe_aggregate = aggregate::recompute_recipe(&txn, recipe_id).await?;
        let author_rating_avg = aggregate::recompute_author(&txn, recipe.author_id).await?;

        txn.commit().await?;

        Ok(Some(RatingChange {
            rating_id,
            recipe_id,
            author_id: recipe.author_id,
            recipe: recipe_aggregate,
            author_rating_avg,
        }))
    }

    /// Deletes a rating and recomputes both aggregates in one transaction.
    pub async fn delete(&self, rating_id: i32) -> Result<Option<RatingChange>> {
        let txn = self.conn.begin().await?;

        let Some(rating) = Ratings::find_by_id(rating_id).one(&txn).await? else {
            txn.rollback().await?;
            return Ok(None);
        };

        Ratings::delete_by_id(rating_id)
            .exec(&txn)
            .await
            .context("Failed to delete rating")?;

        let recipe_aggregate = aggregate::recompute_recipe(&txn, rating.recipe_id).await?;

        let recipe = Recipes::find_by_id(rating.recipe_id)
            .one(&txn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Rating {rating_id} points at a missing recipe"))?;
        let author_rating_avg = aggregate::recompute_author(&txn, recipe.author_id).await?;

        txn.commit().await?;

        Ok(Some(RatingChange {
            rating_id,
            recipe_id: rating.recipe_id,
            author_id: recipe.author_id,
            recipe: recipe_aggregate,
            author_rating_avg,
        }))
    }

    /// Ratings on a recipe with their authors, newest first.
    pub async fn list_for_recipe(
        &self,
        recipe_id: i32,
    ) -> Result<Vec<(ratings::Model, Option<users::Model>)>> {
        let rows = Ratings::find()
            .filter(ratings::Column::RecipeId.eq(recipe_id))
            .order_by_desc(ratings::Column::CreatedAt)
            .order_by_desc(ratings::Column::Id)
            .find_also_related(Users)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    /// Rebuilds every aggregate in one transaction.
    pub async fn recompute_all(&self) -> Result<(usize, usize)> {
        let txn = self.conn.begin().await?;
        let touched = aggregate::recompute_all(&txn).await?;
        txn.commit().await?;
        Ok(touched)
    }
}
