mod feed;
mod init;
mod moderation;
mod recompute;
mod user;

pub use feed::cmd_feed;
pub use init::cmd_init;
pub use moderation::{cmd_activate, cmd_activate_all, cmd_pending, cmd_remove};
pub use recompute::cmd_recompute;
pub use user::cmd_add_user;

use crate::domain::Page;
use crate::models::recipe::RecipeSummary;

fn print_recipe_page(page: &Page<RecipeSummary>) {
    if page.items.is_empty() {
        println!("No recipes found.");
    }

    for recipe in &page.items {
        let rating = recipe
            .rating_avg
            .map_or_else(|| "unrated".to_string(), |avg| format!("{avg:.2} ({})", recipe.rating_count));

        println!("[{}] {} ({:?})", recipe.id, recipe.title, recipe.status);
        println!(
            "  by {} | {} | {:?} | {} min | {}",
            recipe.author_name, recipe.category, recipe.difficulty, recipe.prep_minutes, rating
        );
    }

    println!("{:-<70}", "");
    println!(
        "Page {}/{} ({} total)",
        page.page, page.total_pages, page.total_count
    );
}
