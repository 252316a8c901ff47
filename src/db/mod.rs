use crate::domain::{PageWindow, RecipeStatus, Role, Visibility};
use crate::entities::{ratings, users};
use crate::models::feed::{ContentFilter, FeedScope};
use crate::models::recipe::{IngredientLine, NewRecipe};
use crate::models::user::{ProfileUpdate, User};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::rating::RatingChange;
pub use repositories::recipe::{RecipeRow, RemovedRecipe};

/// Database handle shared by every service.
///
/// SQLite allows one writer at a time, and a deferred transaction that reads
/// before it writes fails with `SQLITE_BUSY` instead of waiting when another
/// connection holds the write lock. Every mutating call therefore takes
/// `write_lock` first, so writers queue in-process while readers proceed.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
    write_lock: Arc<Mutex<()>>,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:").trim_start_matches("//");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self {
            conn,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    async fn writer(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn recipe_repo(&self) -> repositories::recipe::RecipeRepository {
        repositories::recipe::RecipeRepository::new(self.conn.clone())
    }

    fn rating_repo(&self) -> repositories::rating::RatingRepository {
        repositories::rating::RatingRepository::new(self.conn.clone())
    }

    fn social_repo(&self) -> repositories::social::SocialRepository {
        repositories::social::SocialRepository::new(self.conn.clone())
    }

    // Users

    pub async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Option<User>> {
        let _writer = self.writer().await;
        self.user_repo()
            .create(email, name, password_hash, role)
            .await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_with_password(&self, email: &str) -> Result<Option<(User, String)>> {
        self.user_repo().get_by_email_with_password(email).await
    }

    pub async fn get_user_role(&self, id: i32) -> Result<Option<Role>> {
        self.user_repo().get_role(id).await
    }

    pub async fn user_exists(&self, id: i32) -> Result<bool> {
        self.user_repo().exists(id).await
    }

    pub async fn set_user_role(&self, id: i32, role: Role) -> Result<bool> {
        let _writer = self.writer().await;
        self.user_repo().set_role(id, role).await
    }

    pub async fn update_user_profile(
        &self,
        id: i32,
        update: &ProfileUpdate,
    ) -> Result<Option<User>> {
        let _writer = self.writer().await;
        self.user_repo().update_profile(id, update).await
    }

    // Recipes

    pub async fn insert_recipe(
        &self,
        author_id: i32,
        recipe: &NewRecipe,
        status: RecipeStatus,
    ) -> Result<i32> {
        let _writer = self.writer().await;
        self.recipe_repo().insert(author_id, recipe, status).await
    }

    pub async fn get_recipe(&self, id: i32) -> Result<Option<RecipeRow>> {
        self.recipe_repo().get(id).await
    }

    pub async fn get_recipe_ingredients(&self, recipe_id: i32) -> Result<Vec<IngredientLine>> {
        self.recipe_repo().ingredients(recipe_id).await
    }

    pub async fn get_recipe_tags(&self, recipe_id: i32) -> Result<Vec<String>> {
        self.recipe_repo().tags(recipe_id).await
    }

    pub async fn query_recipes(
        &self,
        filter: &ContentFilter,
        scope: FeedScope,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<RecipeRow>, PageWindow)> {
        self.recipe_repo()
            .query(filter, scope, page, page_size)
            .await
    }

    pub async fn suggest_recipes(
        &self,
        filter: &ContentFilter,
        scope: FeedScope,
        limit: u64,
    ) -> Result<Vec<(i32, String)>> {
        self.recipe_repo().suggestions(filter, scope, limit).await
    }

    pub async fn activate_recipe(&self, id: i32) -> Result<Option<bool>> {
        let _writer = self.writer().await;
        self.recipe_repo().activate(id).await
    }

    pub async fn activate_all_recipes(&self) -> Result<u64> {
        let _writer = self.writer().await;
        self.recipe_repo().activate_all().await
    }

    pub async fn remove_recipe(&self, id: i32) -> Result<Option<RemovedRecipe>> {
        let _writer = self.writer().await;
        self.recipe_repo().remove(id).await
    }

    // Ratings

    pub async fn record_rating(
        &self,
        recipe_id: i32,
        user_id: i32,
        score: i32,
        comment: Option<String>,
        visibility: Visibility,
    ) -> Result<Option<RatingChange>> {
        let _writer = self.writer().await;
        self.rating_repo()
            .record(recipe_id, user_id, score, comment, visibility)
            .await
    }

    pub async fn delete_rating(&self, rating_id: i32) -> Result<Option<RatingChange>> {
        let _writer = self.writer().await;
        self.rating_repo().delete(rating_id).await
    }

    pub async fn list_ratings(
        &self,
        recipe_id: i32,
    ) -> Result<Vec<(ratings::Model, Option<users::Model>)>> {
        self.rating_repo().list_for_recipe(recipe_id).await
    }

    pub async fn recompute_all_aggregates(&self) -> Result<(usize, usize)> {
        let _writer = self.writer().await;
        self.rating_repo().recompute_all().await
    }

    // Likes and follows

    pub async fn add_like(
        &self,
        user_id: i32,
        recipe_id: i32,
        visibility: Visibility,
    ) -> Result<Option<bool>> {
        let _writer = self.writer().await;
        self.social_repo().like(user_id, recipe_id, visibility).await
    }

    pub async fn remove_like(
        &self,
        user_id: i32,
        recipe_id: i32,
        visibility: Visibility,
    ) -> Result<Option<bool>> {
        let _writer = self.writer().await;
        self.social_repo()
            .unlike(user_id, recipe_id, visibility)
            .await
    }

    pub async fn like_count(&self, recipe_id: i32) -> Result<u64> {
        self.social_repo().like_count(recipe_id).await
    }

    pub async fn has_liked(&self, user_id: i32, recipe_id: i32) -> Result<bool> {
        self.social_repo().has_liked(user_id, recipe_id).await
    }

    pub async fn liked_among(&self, user_id: i32, recipe_ids: &[i32]) -> Result<HashSet<i32>> {
        self.social_repo().liked_among(user_id, recipe_ids).await
    }

    pub async fn add_follow(&self, follower_id: i32, followed_id: i32) -> Result<bool> {
        let _writer = self.writer().await;
        self.social_repo().follow(follower_id, followed_id).await
    }

    pub async fn remove_follow(&self, follower_id: i32, followed_id: i32) -> Result<bool> {
        let _writer = self.writer().await;
        self.social_repo().unfollow(follower_id, followed_id).await
    }

    pub async fn is_following(&self, follower_id: i32, followed_id: i32) -> Result<bool> {
        self.social_repo()
            .is_following(follower_id, followed_id)
            .await
    }

    pub async fn follower_count(&self, user_id: i32) -> Result<u64> {
        self.social_repo().follower_count(user_id).await
    }

    pub async fn following_count(&self, user_id: i32) -> Result<u64> {
        self.social_repo().following_count(user_id).await
    }
}
