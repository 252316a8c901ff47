//! Domain service for the feed, search and search-box suggestions.

use crate::domain::{AccessContext, Page};
use crate::models::feed::ContentFilter;
use crate::models::recipe::{RecipeSuggestion, RecipeSummary};
use crate::services::ContentError;

/// Read side of the content graph. Visibility comes from the caller's
/// [`AccessContext`], never from the filter alone.
#[async_trait::async_trait]
pub trait FeedService: Send + Sync {
    /// One page of recipes matching every supplied filter, newest first.
    ///
    /// A non-admin asking for pending or all recipes silently gets the
    /// published feed. `page_size` falls back to the configured default and
    /// is capped at the configured maximum.
    async fn query_content(
        &self,
        ctx: &AccessContext,
        filter: &ContentFilter,
        page: u64,
        page_size: Option<u64>,
    ) -> Result<Page<RecipeSummary>, ContentError>;

    /// Titles of visible recipes matching `text`. Blank text yields nothing.
    async fn suggest(
        &self,
        ctx: &AccessContext,
        text: &str,
        limit: Option<u64>,
    ) -> Result<Vec<RecipeSuggestion>, ContentError>;
}
