//! `SeaORM` implementation of the `FeedService` trait.

use crate::config::FeedConfig;
use crate::db::{RecipeRow, Store};
use crate::domain::{AccessContext, Page, RecipeId, UserId};
use crate::models::feed::{ContentFilter, FeedScope};
use crate::models::recipe::{RecipeSuggestion, RecipeSummary};
use crate::services::{ContentError, FeedService};
use async_trait::async_trait;
use std::collections::HashSet;

pub struct SeaOrmFeedService {
    store: Store,
    config: FeedConfig,
}

impl SeaOrmFeedService {
    #[must_use]
    pub const fn new(store: Store, config: FeedConfig) -> Self {
        Self { store, config }
    }

    fn clamp_page_size(&self, requested: Option<u64>) -> u64 {
        requested
            .unwrap_or(self.config.page_size)
            .clamp(1, self.config.max_page_size.max(1))
    }
}

/// Non-admins only ever see the published feed.
#[must_use]
pub const fn effective_scope(ctx: &AccessContext, requested: FeedScope) -> FeedScope {
    if ctx.is_admin() {
        requested
    } else {
        FeedScope::Published
    }
}

pub(crate) fn summarize(rows: Vec<RecipeRow>, liked: &HashSet<i32>) -> Vec<RecipeSummary> {
    rows.into_iter()
        .map(|(recipe, author)| RecipeSummary {
            id: RecipeId::new(recipe.id),
            liked: liked.contains(&recipe.id),
            title: recipe.title,
            category: recipe.category,
            difficulty: recipe.difficulty,
            prep_minutes: recipe.prep_minutes,
            image_path: recipe.image_path,
            author_id: UserId::new(recipe.author_id),
            author_name: author.map(|a| a.name).unwrap_or_default(),
            rating_avg: recipe.rating_avg,
            rating_count: recipe.rating_count,
            status: recipe.status,
            published_at: recipe.published_at,
        })
        .collect()
}

#[async_trait]
impl FeedService for SeaOrmFeedService {
    async fn query_content(
        &self,
        ctx: &AccessContext,
        filter: &ContentFilter,
        page: u64,
        page_size: Option<u64>,
    ) -> Result<Page<RecipeSummary>, ContentError> {
        let scope = effective_scope(ctx, filter.scope);
        let page_size = self.clamp_page_size(page_size);

        let (rows, window) = self
            .store
            .query_recipes(filter, scope, page, page_size)
            .await?;

        let liked = match ctx.user_id() {
            Some(viewer) => {
                let ids: Vec<i32> = rows.iter().map(|(recipe, _)| recipe.id).collect();
                self.store.liked_among(viewer.value(), &ids).await?
            }
            None => HashSet::new(),
        };

        Ok(window.into_page(summarize(rows, &liked)))
    }

    async fn suggest(
        &self,
        ctx: &AccessContext,
        text: &str,
        limit: Option<u64>,
    ) -> Result<Vec<RecipeSuggestion>, ContentError> {
        let filter = ContentFilter::with_text(text);
        if filter.text.is_none() {
            return Ok(Vec::new());
        }

        let limit = limit
            .unwrap_or(self.config.suggestion_limit)
            .clamp(1, self.config.max_suggestion_limit.max(1));
        let scope = effective_scope(ctx, FeedScope::All);

        let rows = self.store.suggest_recipes(&filter, scope, limit).await?;

        Ok(rows
            .into_iter()
            .map(|(id, title)| RecipeSuggestion {
                id: RecipeId::new(id),
                title,
            })
            .collect())
    }
}
