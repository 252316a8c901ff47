//! Domain service for the recipe lifecycle.
//!
//! A recipe is submitted `inactive` (or `active` when an admin submits it),
//! moves to `active` through moderation, and can be removed from any state.
//! Removal deletes the row and everything attached to it.

use crate::domain::{AccessContext, Page, RecipeId};
use crate::models::recipe::{NewRecipe, RecipeDetail, RecipeSummary};
use crate::services::ContentError;

#[async_trait::async_trait]
pub trait ModerationService: Send + Sync {
    /// Creates a recipe authored by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::InvalidInput`] for an incomplete submission and
    /// [`ContentError::Forbidden`] for callers without a user identity.
    async fn submit_recipe(
        &self,
        ctx: &AccessContext,
        recipe: NewRecipe,
    ) -> Result<RecipeId, ContentError>;

    /// Publishes a pending recipe. Returns `false` if it was already active.
    async fn activate_recipe(&self, ctx: &AccessContext, id: RecipeId)
    -> Result<bool, ContentError>;

    /// Publishes every pending recipe and returns how many were published.
    async fn activate_all_recipes(&self, ctx: &AccessContext) -> Result<u64, ContentError>;

    async fn remove_recipe(&self, ctx: &AccessContext, id: RecipeId) -> Result<(), ContentError>;

    /// Full recipe page. Non-active recipes are reported as not found to
    /// anyone but an admin.
    async fn fetch_recipe_detail(
        &self,
        ctx: &AccessContext,
        id: RecipeId,
    ) -> Result<RecipeDetail, ContentError>;

    /// Admin listing of recipes waiting for moderation, newest first.
    async fn pending_queue(
        &self,
        ctx: &AccessContext,
        page: u64,
    ) -> Result<Page<RecipeSummary>, ContentError>;
}
