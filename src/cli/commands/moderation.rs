//! Moderation command handlers

use super::print_recipe_page;
use crate::config::Config;
use crate::domain::{AccessContext, RecipeId};
use crate::services::ContentError;
use crate::state::SharedState;

const OPERATOR: AccessContext = AccessContext::Operator;

pub async fn cmd_pending(config: &Config, page: u64) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;

    let queue = state.moderation_service.pending_queue(&OPERATOR, page).await?;

    println!("Moderation queue");
    print_recipe_page(&queue);
    Ok(())
}

pub async fn cmd_activate(config: &Config, id: i32) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;

    match state
        .moderation_service
        .activate_recipe(&OPERATOR, RecipeId::new(id))
        .await
    {
        Ok(true) => println!("✓ Recipe {id} published"),
        Ok(false) => println!("Recipe {id} is already published."),
        Err(ContentError::RecipeNotFound(_)) => println!("Recipe {id} not found."),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

pub async fn cmd_activate_all(config: &Config) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;

    let count = state
        .moderation_service
        .activate_all_recipes(&OPERATOR)
        .await?;

    println!("✓ Published {count} pending recipe(s)");
    Ok(())
}

pub async fn cmd_remove(config: &Config, id: i32, yes: bool) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;
    let recipe_id = RecipeId::new(id);

    let detail = match state
        .moderation_service
        .fetch_recipe_detail(&OPERATOR, recipe_id)
        .await
    {
        Ok(detail) => detail,
        Err(ContentError::RecipeNotFound(_)) => {
            println!("Recipe {id} not found.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if !yes {
        println!(
            "Remove '{}' (ID: {}) by {} with {} rating(s)?",
            detail.title, id, detail.author_name, detail.rating_count
        );
        println!("Enter 'y' to confirm, anything else to cancel:");

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    state
        .moderation_service
        .remove_recipe(&OPERATOR, recipe_id)
        .await?;

    println!("✓ Removed: {}", detail.title);
    Ok(())
}
