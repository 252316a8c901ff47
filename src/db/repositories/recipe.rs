use anyhow::{Context, Result};
use sea_orm::sea_query::{Expr, LikeExpr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::debug;

use super::aggregate;
use crate::domain::{PageWindow, RecipeStatus, timestamp_now};
use crate::entities::{ingredients, likes, prelude::*, ratings, recipes, tags, users};
use crate::models::feed::{ContentFilter, FeedScope, fold_case, like_pattern};
use crate::models::recipe::{IngredientLine, NewRecipe};

/// A recipe row joined with its author.
pub type RecipeRow = (recipes::Model, Option<users::Model>);

#[derive(Debug, Clone)]
pub struct RemovedRecipe {
    pub author_id: i32,
    pub ratings_removed: u64,
    pub author_rating_avg: Option<f64>,
}

pub struct RecipeRepository {
    conn: DatabaseConnection,
}

impl RecipeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts the recipe with its ingredients and tags as one unit.
    pub async fn insert(
        &self,
        author_id: i32,
        recipe: &NewRecipe,
        status: RecipeStatus,
    ) -> Result<i32> {
        let txn = self.conn.begin().await?;

        let model = recipes::ActiveModel {
            author_id: Set(author_id),
            title: Set(recipe.title.trim().to_string()),
            title_folded: Set(fold_case(&recipe.title)),
            description: Set(recipe.description.clone()),
            category: Set(recipe.category.trim().to_string()),
            category_folded: Set(fold_case(&recipe.category)),
            difficulty: Set(recipe.difficulty),
            prep_minutes: Set(recipe.prep_minutes),
            cook_minutes: Set(recipe.cook_minutes),
            servings: Set(recipe.servings),
            calories: Set(recipe.calories),
            image_path: Set(recipe.image_path.clone()),
            status: Set(status),
            rating_avg: Set(None),
            rating_count: Set(0),
            published_at: Set(timestamp_now()),
            ..Default::default()
        };
        let recipe_id = Recipes::insert(model).exec(&txn).await?.last_insert_id;

        let lines: Vec<ingredients::ActiveModel> = recipe
            .ingredients
            .iter()
            .zip(0..)
            .map(|(line, position)| ingredients::ActiveModel {
                recipe_id: Set(recipe_id),
                position: Set(position),
                name: Set(line.name.trim().to_string()),
                name_folded: Set(fold_case(&line.name)),
                quantity: Set(line.quantity.clone()),
                ..Default::default()
            })
            .collect();
        if !lines.is_empty() {
            Ingredients::insert_many(lines)
                .exec_without_returning(&txn)
                .await?;
        }

        let tag_rows: Vec<tags::ActiveModel> = recipe
            .normalized_tags()
            .into_iter()
            .map(|name| tags::ActiveModel {
                recipe_id: Set(recipe_id),
                name: Set(name),
            })
            .collect();
        if !tag_rows.is_empty() {
            Tags::insert_many(tag_rows)
                .exec_without_returning(&txn)
                .await?;
        }

        // An admin submission is published immediately and counts toward the
        // author's average from the start.
        if status == RecipeStatus::Active {
            aggregate::recompute_author(&txn, author_id).await?;
        }

        txn.commit().await?;
        Ok(recipe_id)
    }

    pub async fn get(&self, id: i32) -> Result<Option<RecipeRow>> {
        let row = Recipes::find_by_id(id)
            .find_also_related(Users)
            .one(&self.conn)
            .await
            .context("Failed to query recipe")?;

        Ok(row)
    }

    pub async fn ingredients(&self, recipe_id: i32) -> Result<Vec<IngredientLine>> {
        let rows = Ingredients::find()
            .filter(ingredients::Column::RecipeId.eq(recipe_id))
            .order_by_asc(ingredients::Column::Position)
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| IngredientLine {
                name: row.name,
                quantity: row.quantity,
            })
            .collect())
    }

    pub async fn tags(&self, recipe_id: i32) -> Result<Vec<String>> {
        let names: Vec<String> = Tags::find()
            .select_only()
            .column(tags::Column::Name)
            .filter(tags::Column::RecipeId.eq(recipe_id))
            .order_by_asc(tags::Column::Name)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(names)
    }

    /// One page of matching recipes, newest first, with the window computed
    /// from the same snapshot as the rows.
    pub async fn query(
        &self,
        filter: &ContentFilter,
        scope: FeedScope,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<RecipeRow>, PageWindow)> {
        let condition = filter_condition(filter, scope);
        let txn = self.conn.begin().await?;

        let total = Recipes::find()
            .filter(condition.clone())
            .count(&txn)
            .await
            .context("Failed to count recipes")?;
        let window = PageWindow::new(total, page, page_size);

        let rows = if window.is_in_range() {
            Recipes::find()
                .filter(condition)
                .order_by_desc(recipes::Column::PublishedAt)
                .order_by_desc(recipes::Column::Id)
                .find_also_related(Users)
                .offset(window.offset())
                .limit(window.page_size)
                .all(&txn)
                .await
                .context("Failed to query recipes")?
        } else {
            Vec::new()
        };

        txn.commit().await?;
        Ok((rows, window))
    }

    /// `(id, title)` pairs for the search box.
    pub async fn suggestions(
        &self,
        filter: &ContentFilter,
        scope: FeedScope,
        limit: u64,
    ) -> Result<Vec<(i32, String)>> {
        let rows: Vec<(i32, String)> = Recipes::find()
            .select_only()
            .column(recipes::Column::Id)
            .column(recipes::Column::Title)
            .filter(filter_condition(filter, scope))
            .order_by_desc(recipes::Column::PublishedAt)
            .order_by_desc(recipes::Column::Id)
            .limit(limit)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    /// Returns `None` if the recipe does not exist, `Some(false)` if it was
    /// already active.
    pub async fn activate(&self, id: i32) -> Result<Option<bool>> {
        let txn = self.conn.begin().await?;

        let Some(recipe) = Recipes::find_by_id(id).one(&txn).await? else {
            txn.rollback().await?;
            return Ok(None);
        };

        if recipe.status == RecipeStatus::Active {
            txn.rollback().await?;
            return Ok(Some(false));
        }

        let author_id = recipe.author_id;
        let mut active: recipes::ActiveModel = recipe.into();
        active.status = Set(RecipeStatus::Active);
        active.published_at = Set(timestamp_now());
        active.update(&txn).await?;

        aggregate::recompute_author(&txn, author_id).await?;

        txn.commit().await?;
        Ok(Some(true))
    }

    /// Publishes every pending recipe. Returns how many changed state.
    pub async fn activate_all(&self) -> Result<u64> {
        let txn = self.conn.begin().await?;

        let authors: Vec<i32> = Recipes::find()
            .select_only()
            .column(recipes::Column::AuthorId)
            .distinct()
            .filter(recipes::Column::Status.eq(RecipeStatus::Inactive))
            .into_tuple()
            .all(&txn)
            .await?;

        let result = Recipes::update_many()
            .col_expr(recipes::Column::Status, Expr::value(RecipeStatus::Active))
            .col_expr(recipes::Column::PublishedAt, Expr::value(timestamp_now()))
            .filter(recipes::Column::Status.eq(RecipeStatus::Inactive))
            .exec(&txn)
            .await?;

        for author_id in authors {
            aggregate::recompute_author(&txn, author_id).await?;
        }

        txn.commit().await?;
        Ok(result.rows_affected)
    }

    /// Deletes the recipe and everything hanging off it, then recomputes the
    /// author's average, all in one transaction.
    pub async fn remove(&self, id: i32) -> Result<Option<RemovedRecipe>> {
        let txn = self.conn.begin().await?;

        let Some(recipe) = Recipes::find_by_id(id).one(&txn).await? else {
            txn.rollback().await?;
            return Ok(None);
        };

        Ingredients::delete_many()
            .filter(ingredients::Column::RecipeId.eq(id))
            .exec(&txn)
            .await?;
        Tags::delete_many()
            .filter(tags::Column::RecipeId.eq(id))
            .exec(&txn)
            .await?;
        let ratings_removed = Ratings::delete_many()
            .filter(ratings::Column::RecipeId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;
        Likes::delete_many()
            .filter(likes::Column::RecipeId.eq(id))
            .exec(&txn)
            .await?;
        Recipes::delete_by_id(id).exec(&txn).await?;

        let author_rating_avg = aggregate::recompute_author(&txn, recipe.author_id).await?;

        txn.commit().await?;
        debug!(recipe_id = id, ratings_removed, "Recipe rows deleted");

        Ok(Some(RemovedRecipe {
            author_id: recipe.author_id,
            ratings_removed,
            author_rating_avg,
        }))
    }
}

fn filter_condition(filter: &ContentFilter, scope: FeedScope) -> Condition {
    let mut condition = Condition::all();

    match scope {
        FeedScope::Published => {
            condition = condition.add(recipes::Column::Status.eq(RecipeStatus::Active));
        }
        FeedScope::Pending => {
            condition = condition.add(recipes::Column::Status.eq(RecipeStatus::Inactive));
        }
        FeedScope::All => {}
    }

    if let Some(category) = &filter.category {
        condition = condition.add(recipes::Column::CategoryFolded.eq(fold_case(category)));
    }

    if let Some(difficulty) = filter.difficulty {
        condition = condition.add(recipes::Column::Difficulty.eq(difficulty));
    }

    if let Some(max_prep) = filter.max_prep_minutes {
        condition = condition.add(recipes::Column::PrepMinutes.lte(max_prep));
    }

    if let Some(author) = filter.author {
        condition = condition.add(recipes::Column::AuthorId.eq(author.value()));
    }

    if let Some(text) = &filter.text {
        let pattern = like_pattern(text);
        let like = || LikeExpr::new(pattern.clone()).escape('\\');

        let by_ingredient = Query::select()
            .column(ingredients::Column::RecipeId)
            .from(Ingredients)
            .and_where(Expr::col((Ingredients, ingredients::Column::NameFolded)).like(like()))
            .to_owned();

        condition = condition.add(
            Condition::any()
                .add(recipes::Column::TitleFolded.like(like()))
                .add(recipes::Column::CategoryFolded.like(like()))
                .add(recipes::Column::Id.in_subquery(by_ingredient)),
        );
    }

    condition
}
