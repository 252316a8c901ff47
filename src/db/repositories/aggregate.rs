//! Derived rating aggregates.
//!
//! Every function here recomputes from the surviving rating rows and writes
//! the result back; nothing is patched incrementally. They take any
//! [`ConnectionTrait`] so callers run them inside their own transaction.

use crate::domain::RecipeStatus;
use crate::entities::{prelude::*, ratings, recipes, users};
use anyhow::Result;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, JoinType, QueryFilter, QuerySelect, RelationTrait,
};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecipeAggregate {
    pub rating_avg: Option<f64>,
    pub rating_count: i32,
}

/// Arithmetic mean, or `None` for an empty set (never zero).
#[must_use]
pub fn mean_score(scores: &[i32]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }

    let sum: i64 = scores.iter().copied().map(i64::from).sum();
    #[allow(clippy::cast_precision_loss)]
    Some(sum as f64 / scores.len() as f64)
}

pub async fn recompute_recipe<C: ConnectionTrait>(db: &C, recipe_id: i32) -> Result<RecipeAggregate> {
    let scores: Vec<i32> = Ratings::find()
        .select_only()
        .column(ratings::Column::Score)
        .filter(ratings::Column::RecipeId.eq(recipe_id))
        .into_tuple()
        .all(db)
        .await?;

    let aggregate = RecipeAggregate {
        rating_avg: mean_score(&scores),
        rating_count: i32::try_from(scores.len()).unwrap_or(i32::MAX),
    };

    Recipes::update_many()
        .col_expr(recipes::Column::RatingAvg, Expr::value(aggregate.rating_avg))
        .col_expr(
            recipes::Column::RatingCount,
            Expr::value(aggregate.rating_count),
        )
        .filter(recipes::Column::Id.eq(recipe_id))
        .exec(db)
        .await?;

    metrics::counter!("potluck_aggregate_recomputes_total", "target" => "recipe").increment(1);
    debug!(
        recipe_id,
        rating_avg = ?aggregate.rating_avg,
        rating_count = aggregate.rating_count,
        "Recomputed recipe aggregate"
    );

    Ok(aggregate)
}

/// Author average over every rating row on the author's active recipes.
pub async fn recompute_author<C: ConnectionTrait>(db: &C, author_id: i32) -> Result<Option<f64>> {
    let scores: Vec<i32> = Ratings::find()
        .select_only()
        .column(ratings::Column::Score)
        .join(JoinType::InnerJoin, ratings::Relation::Recipe.def())
        .filter(recipes::Column::AuthorId.eq(author_id))
        .filter(recipes::Column::Status.eq(RecipeStatus::Active))
        .into_tuple()
        .all(db)
        .await?;

    let rating_avg = mean_score(&scores);

    Users::update_many()
        .col_expr(users::Column::RatingAvg, Expr::value(rating_avg))
        .filter(users::Column::Id.eq(author_id))
        .exec(db)
        .await?;

    metrics::counter!("potluck_aggregate_recomputes_total", "target" => "author").increment(1);
    debug!(author_id, rating_avg = ?rating_avg, "Recomputed author aggregate");

    Ok(rating_avg)
}

/// Rebuilds every recipe and user aggregate. Returns `(recipes, users)`
/// touched.
pub async fn recompute_all<C: ConnectionTrait>(db: &C) -> Result<(usize, usize)> {
    let recipe_ids: Vec<i32> = Recipes::find()
        .select_only()
        .column(recipes::Column::Id)
        .into_tuple()
        .all(db)
        .await?;

    for recipe_id in &recipe_ids {
        recompute_recipe(db, *recipe_id).await?;
    }

    let user_ids: Vec<i32> = Users::find()
        .select_only()
        .column(users::Column::Id)
        .into_tuple()
        .all(db)
        .await?;

    for user_id in &user_ids {
        recompute_author(db, *user_id).await?;
    }

    Ok((recipe_ids.len(), user_ids.len()))
}
