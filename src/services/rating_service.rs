//! Domain service for ratings and the aggregates derived from them.

use crate::domain::{AccessContext, RatingId, RecipeId};
use crate::services::ContentError;

#[async_trait::async_trait]
pub trait RatingService: Send + Sync {
    /// Records a 1..=5 score from the caller and recomputes the recipe and
    /// author averages in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::InvalidScore`] before any write when the score
    /// is out of range, and [`ContentError::RecipeNotFound`] when the recipe is
    /// missing or not visible to the caller.
    async fn record_rating(
        &self,
        ctx: &AccessContext,
        recipe_id: RecipeId,
        score: i32,
        comment: Option<String>,
    ) -> Result<RatingId, ContentError>;

    /// Deletes one rating row (admin only) and recomputes both averages.
    async fn delete_rating(&self, ctx: &AccessContext, rating_id: RatingId)
    -> Result<(), ContentError>;

    /// Rebuilds every recipe and author average from the rating rows.
    /// Returns `(recipes, users)` recomputed.
    async fn recompute_all(&self, ctx: &AccessContext) -> Result<(usize, usize), ContentError>;
}
