//! `SeaORM` implementation of the `RatingService` trait.

use crate::db::Store;
use crate::domain::{AccessContext, RatingId, RecipeId, Score};
use crate::services::{ContentError, RatingService};
use async_trait::async_trait;
use tracing::info;

const MAX_COMMENT_LEN: usize = 2000;

pub struct SeaOrmRatingService {
    store: Store,
}

impl SeaOrmRatingService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

/// Blank comments are stored as no comment.
fn normalize_comment(comment: Option<String>) -> Result<Option<String>, ContentError> {
    let Some(comment) = comment else {
        return Ok(None);
    };

    let trimmed = comment.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_COMMENT_LEN {
        return Err(ContentError::invalid(format!(
            "Comment must be at most {MAX_COMMENT_LEN} characters"
        )));
    }

    Ok(Some(trimmed.to_string()))
}

#[async_trait]
impl RatingService for SeaOrmRatingService {
    async fn record_rating(
        &self,
        ctx: &AccessContext,
        recipe_id: RecipeId,
        score: i32,
        comment: Option<String>,
    ) -> Result<RatingId, ContentError> {
        let score = Score::new(score).ok_or(ContentError::InvalidScore(score))?;
        let comment = normalize_comment(comment)?;
        let rater = ctx.require_user()?;

        let change = self
            .store
            .record_rating(
                recipe_id.value(),
                rater.value(),
                score.value(),
                comment,
                ctx.visibility(),
            )
            .await?
            .ok_or(ContentError::RecipeNotFound(recipe_id))?;

        metrics::counter!("potluck_ratings_recorded_total").increment(1);
        info!(
            rating_id = change.rating_id,
            recipe_id = %recipe_id,
            user_id = %rater,
            score = score.value(),
            recipe_avg = ?change.recipe.rating_avg,
            author_avg = ?change.author_rating_avg,
            "Rating recorded"
        );

        Ok(RatingId::new(change.rating_id))
    }

    async fn delete_rating(
        &self,
        ctx: &AccessContext,
        rating_id: RatingId,
    ) -> Result<(), ContentError> {
        ctx.require_admin()?;

        let change = self
            .store
            .delete_rating(rating_id.value())
            .await?
            .ok_or(ContentError::RatingNotFound(rating_id))?;

        metrics::counter!("potluck_ratings_deleted_total").increment(1);
        info!(
            rating_id = %rating_id,
            recipe_id = change.recipe_id,
            author_id = change.author_id,
            recipe_avg = ?change.recipe.rating_avg,
            author_avg = ?change.author_rating_avg,
            "Rating deleted"
        );

        Ok(())
    }

    async fn recompute_all(&self, ctx: &AccessContext) -> Result<(usize, usize), ContentError> {
        ctx.require_admin()?;

        let (recipes, users) = self.store.recompute_all_aggregates().await?;
        info!(recipes, users, "Recomputed all rating aggregates");

        Ok((recipes, users))
    }
}
