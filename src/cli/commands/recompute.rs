use crate::config::Config;
use crate::domain::AccessContext;
use crate::state::SharedState;

pub async fn cmd_recompute(config: &Config) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;

    let (recipes, users) = state
        .rating_service
        .recompute_all(&AccessContext::Operator)
        .await?;

    println!("✓ Recomputed averages for {recipes} recipe(s) and {users} user(s)");
    Ok(())
}
