//! `SeaORM` implementation of the `ModerationService` trait.

use crate::db::Store;
use crate::domain::{AccessContext, Page, RatingId, RecipeId, RecipeStatus, UserId};
use crate::models::feed::{ContentFilter, FeedScope};
use crate::models::recipe::{NewRecipe, RecipeDetail, RecipeSummary, Review};
use crate::services::{ContentError, FeedService, ModerationService};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

const MAX_TITLE_LEN: usize = 200;

pub struct SeaOrmModerationService {
    store: Store,
    feed: Arc<dyn FeedService>,
}

impl SeaOrmModerationService {
    #[must_use]
    pub fn new(store: Store, feed: Arc<dyn FeedService>) -> Self {
        Self { store, feed }
    }
}

/// Rejects submissions that could not be rendered as a recipe.
pub fn validate_submission(recipe: &NewRecipe) -> Result<(), ContentError> {
    let title = recipe.title.trim();
    if title.is_empty() {
        return Err(ContentError::invalid("Title is required"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ContentError::invalid(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    if recipe.category.trim().is_empty() {
        return Err(ContentError::invalid("Category is required"));
    }
    if recipe.prep_minutes < 0 {
        return Err(ContentError::invalid("Preparation time cannot be negative"));
    }

    let optional = [
        ("Cooking time", recipe.cook_minutes),
        ("Servings", recipe.servings),
        ("Calories", recipe.calories),
    ];
    for (label, value) in optional {
        if value.is_some_and(|v| v < 0) {
            return Err(ContentError::invalid(format!("{label} cannot be negative")));
        }
    }

    if recipe.ingredients.is_empty() {
        return Err(ContentError::invalid("At least one ingredient is required"));
    }
    if recipe.ingredients.iter().any(|line| line.name.trim().is_empty()) {
        return Err(ContentError::invalid("Ingredient names cannot be empty"));
    }

    Ok(())
}

#[async_trait]
impl ModerationService for SeaOrmModerationService {
    async fn submit_recipe(
        &self,
        ctx: &AccessContext,
        recipe: NewRecipe,
    ) -> Result<RecipeId, ContentError> {
        validate_submission(&recipe)?;
        let author = ctx.require_user()?;

        if !self.store.user_exists(author.value()).await? {
            return Err(ContentError::UserNotFound(author));
        }

        let status = if ctx.is_admin() {
            RecipeStatus::Active
        } else {
            RecipeStatus::Inactive
        };

        let id = self
            .store
            .insert_recipe(author.value(), &recipe, status)
            .await?;

        metrics::counter!("potluck_recipes_submitted_total").increment(1);
        info!(recipe_id = id, author_id = %author, status = ?status, "Recipe submitted");

        Ok(RecipeId::new(id))
    }

    async fn activate_recipe(
        &self,
        ctx: &AccessContext,
        id: RecipeId,
    ) -> Result<bool, ContentError> {
        ctx.require_admin()?;

        let changed = self
            .store
            .activate_recipe(id.value())
            .await?
            .ok_or(ContentError::RecipeNotFound(id))?;

        if changed {
            metrics::counter!("potluck_recipes_activated_total").increment(1);
            info!(recipe_id = %id, "Recipe activated");
        }

        Ok(changed)
    }

    async fn activate_all_recipes(&self, ctx: &AccessContext) -> Result<u64, ContentError> {
        ctx.require_admin()?;

        let count = self.store.activate_all_recipes().await?;

        metrics::counter!("potluck_recipes_activated_total").increment(count);
        info!(count, "Activated all pending recipes");

        Ok(count)
    }

    async fn remove_recipe(&self, ctx: &AccessContext, id: RecipeId) -> Result<(), ContentError> {
        ctx.require_admin()?;

        let removed = self
            .store
            .remove_recipe(id.value())
            .await?
            .ok_or(ContentError::RecipeNotFound(id))?;

        metrics::counter!("potluck_recipes_removed_total").increment(1);
        warn!(
            recipe_id = %id,
            author_id = removed.author_id,
            ratings_removed = removed.ratings_removed,
            author_rating_avg = ?removed.author_rating_avg,
            "Recipe removed"
        );

        Ok(())
    }

    async fn fetch_recipe_detail(
        &self,
        ctx: &AccessContext,
        id: RecipeId,
    ) -> Result<RecipeDetail, ContentError> {
        let (recipe, author) = self
            .store
            .get_recipe(id.value())
            .await?
            .filter(|(recipe, _)| ctx.visibility().admits(recipe.status))
            .ok_or(ContentError::RecipeNotFound(id))?;

        let ingredients = self.store.get_recipe_ingredients(recipe.id).await?;
        let tags = self.store.get_recipe_tags(recipe.id).await?;
        let likes = self.store.like_count(recipe.id).await?;
        let liked = match ctx.user_id() {
            Some(viewer) => self.store.has_liked(viewer.value(), recipe.id).await?,
            None => false,
        };

        let reviews = self
            .store
            .list_ratings(recipe.id)
            .await?
            .into_iter()
            .map(|(rating, rater)| Review {
                id: RatingId::new(rating.id),
                user_id: UserId::new(rating.user_id),
                user_name: rater.map(|u| u.name).unwrap_or_default(),
                score: rating.score,
                comment: rating.comment,
                created_at: rating.created_at,
            })
            .collect();

        Ok(RecipeDetail {
            id,
            title: recipe.title,
            description: recipe.description,
            category: recipe.category,
            difficulty: recipe.difficulty,
            prep_minutes: recipe.prep_minutes,
            cook_minutes: recipe.cook_minutes,
            servings: recipe.servings,
            calories: recipe.calories,
            image_path: recipe.image_path,
            author_id: UserId::new(recipe.author_id),
            author_name: author.map(|a| a.name).unwrap_or_default(),
            status: recipe.status,
            rating_avg: recipe.rating_avg,
            rating_count: recipe.rating_count,
            published_at: recipe.published_at,
            ingredients,
            tags,
            likes,
            liked,
            reviews,
        })
    }

    async fn pending_queue(
        &self,
        ctx: &AccessContext,
        page: u64,
    ) -> Result<Page<RecipeSummary>, ContentError> {
        ctx.require_admin()?;

        let filter = ContentFilter {
            scope: FeedScope::Pending,
            ..ContentFilter::default()
        };
        self.feed.query_content(ctx, &filter, page, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Difficulty;
    use crate::models::recipe::IngredientLine;

    fn submission() -> NewRecipe {
        NewRecipe {
            title: "Pancakes".to_string(),
            description: None,
            category: "Breakfast".to_string(),
            difficulty: Difficulty::Easy,
            prep_minutes: 15,
            cook_minutes: Some(10),
            servings: Some(4),
            calories: None,
            image_path: None,
            ingredients: vec![IngredientLine {
                name: "Flour".to_string(),
                quantity: Some("200 g".to_string()),
            }],
            tags: vec![],
        }
    }

    #[test]
    fn complete_submission_passes() {
        assert!(validate_submission(&submission()).is_ok());
    }

    #[test]
    fn incomplete_submissions_are_rejected() {
        let mut blank_title = submission();
        blank_title.title = "  ".to_string();
        assert!(matches!(
            validate_submission(&blank_title),
            Err(ContentError::InvalidInput(_))
        ));

        let mut negative = submission();
        negative.servings = Some(-1);
        assert!(validate_submission(&negative).is_err());

        let mut no_ingredients = submission();
        no_ingredients.ingredients.clear();
        assert!(validate_submission(&no_ingredients).is_err());
    }
}
