#![allow(dead_code)]

use potluck::config::Config;
use potluck::db::Store;
use potluck::domain::{AccessContext, Difficulty, RecipeId, Role, UserId};
use potluck::models::recipe::{IngredientLine, NewRecipe};
use potluck::state::SharedState;
use sea_orm::{ConnectionTrait, Statement};
use std::path::PathBuf;

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    // Cheapest argon2 parameters the crate accepts.
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config
}

/// In-memory store on a single pooled connection, so every query sees the
/// same database.
pub async fn memory_state() -> SharedState {
    let store = Store::with_pool_options("sqlite::memory:", 1, 1)
        .await
        .expect("Failed to open in-memory store");
    SharedState::with_store(test_config(), store)
}

/// File-backed store with a real pool, for tests that need concurrent
/// connections. Returns the path so the caller can remove it.
pub async fn file_state() -> (SharedState, PathBuf) {
    let path = std::env::temp_dir().join(format!("potluck-test-{}.db", uuid::Uuid::new_v4()));
    let url = format!("sqlite:{}", path.display());

    let mut config = test_config();
    config.general.database_path.clone_from(&url);

    let store = Store::with_pool_options(&url, 5, 1)
        .await
        .expect("Failed to open file store");
    (SharedState::with_store(config, store), path)
}

pub fn remove_db_file(path: &PathBuf) {
    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.clone().into_os_string();
        file.push(suffix);
        std::fs::remove_file(file).ok();
    }
}

pub async fn add_user(state: &SharedState, name: &str, role: Role) -> AccessContext {
    let email = format!("{}@example.com", name.to_lowercase());
    let user = state
        .store
        .create_user(&email, name, "not-a-real-hash", role)
        .await
        .unwrap()
        .expect("email should be unique in tests");
    AccessContext::authenticated(user.id, role)
}

pub fn uid(ctx: &AccessContext) -> UserId {
    ctx.user_id().expect("context has a user")
}

pub fn recipe(title: &str, category: &str, difficulty: Difficulty, prep: i32) -> NewRecipe {
    NewRecipe {
        title: title.to_string(),
        description: Some(format!("How to make {title}")),
        category: category.to_string(),
        difficulty,
        prep_minutes: prep,
        cook_minutes: Some(10),
        servings: Some(2),
        calories: None,
        image_path: None,
        ingredients: vec![
            IngredientLine {
                name: "Salt".to_string(),
                quantity: Some("1 pinch".to_string()),
            },
            IngredientLine {
                name: "Water".to_string(),
                quantity: None,
            },
        ],
        tags: vec!["test".to_string()],
    }
}

pub fn recipe_with_ingredients(title: &str, ingredients: &[&str]) -> NewRecipe {
    let mut new = recipe(title, "Dinner", Difficulty::Medium, 20);
    new.ingredients = ingredients
        .iter()
        .map(|name| IngredientLine {
            name: (*name).to_string(),
            quantity: None,
        })
        .collect();
    new
}

/// Submits as `author` and publishes through the operator.
pub async fn publish(state: &SharedState, author: &AccessContext, new: NewRecipe) -> RecipeId {
    let id = state
        .moderation_service
        .submit_recipe(author, new)
        .await
        .unwrap();
    state
        .moderation_service
        .activate_recipe(&AccessContext::Operator, id)
        .await
        .unwrap();
    id
}

pub async fn submit(state: &SharedState, author: &AccessContext, new: NewRecipe) -> RecipeId {
    state
        .moderation_service
        .submit_recipe(author, new)
        .await
        .unwrap()
}

pub async fn user_rating_avg(state: &SharedState, user: UserId) -> Option<f64> {
    state
        .store
        .get_user(user.value())
        .await
        .unwrap()
        .unwrap()
        .rating_avg
}

pub async fn recipe_aggregate(state: &SharedState, id: RecipeId) -> (Option<f64>, i32) {
    let (recipe, _) = state.store.get_recipe(id.value()).await.unwrap().unwrap();
    (recipe.rating_avg, recipe.rating_count)
}

pub async fn count_rows(state: &SharedState, sql: &str) -> i64 {
    let backend = state.store.conn.get_database_backend();
    let row = state
        .store
        .conn
        .query_one(Statement::from_string(backend, sql.to_string()))
        .await
        .unwrap()
        .unwrap();
    row.try_get_by_index::<i64>(0).unwrap()
}

pub async fn exec(state: &SharedState, sql: &str) {
    let backend = state.store.conn.get_database_backend();
    state
        .store
        .conn
        .execute(Statement::from_string(backend, sql.to_string()))
        .await
        .unwrap();
}

pub fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("expected an average, got none");
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
