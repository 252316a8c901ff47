use super::print_recipe_page;
use crate::cli::FeedArgs;
use crate::config::Config;
use crate::domain::AccessContext;
use crate::models::feed::{ContentFilter, FeedParams};
use crate::state::SharedState;

pub async fn cmd_feed(config: &Config, args: FeedArgs) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;

    let params = FeedParams {
        category: args.category,
        difficulty: args.difficulty,
        max_prep: args.max_prep,
        q: args.query,
        author: args.author,
        scope: args.scope,
        page: args.page,
        page_size: args.page_size,
    };
    let filter = ContentFilter::from_params(&params);

    let page = state
        .feed_service
        .query_content(&AccessContext::Operator, &filter, params.page(), params.page_size())
        .await?;

    print_recipe_page(&page);
    Ok(())
}
