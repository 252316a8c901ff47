mod common;

use common::*;
use potluck::domain::{AccessContext, Difficulty, RatingId, RecipeId, Role, UserId};
use potluck::state::SharedState;
use potluck::services::ContentError;

const FAIL_AUTHOR_UPDATE: &str = "CREATE TRIGGER fail_author_update BEFORE UPDATE OF rating_avg ON users \
     BEGIN SELECT RAISE(ABORT, 'injected failure'); END;";

#[tokio::test]
async fn test_rating_updates_recipe_and_author_averages() {
    let state = memory_state().await;
    let author = add_user(&state, "Author", Role::User).await;
    let rater = add_user(&state, "Rater", Role::User).await;
    let other = add_user(&state, "Other", Role::User).await;

    let recipe = publish(&state, &author, recipe("Soup", "Dinner", Difficulty::Easy, 10)).await;

    state
        .rating_service
        .record_rating(&rater, recipe, 5, Some("Great".to_string()))
        .await
        .unwrap();
    state
        .rating_service
        .record_rating(&other, recipe, 2, None)
        .await
        .unwrap();

    let (avg, count) = recipe_aggregate(&state, recipe).await;
    assert_close(avg, 3.5);
    assert_eq!(count, 2);
    assert_close(user_rating_avg(&state, uid(&author)).await, 3.5);
}

#[tokio::test]
async fn test_same_user_may_rate_twice() {
    let state = memory_state().await;
    let author = add_user(&state, "Author", Role::User).await;
    let rater = add_user(&state, "Rater", Role::User).await;
    let recipe = publish(&state, &author, recipe("Stew", "Dinner", Difficulty::Easy, 10)).await;

    for score in [4, 5] {
        state
            .rating_service
            .record_rating(&rater, recipe, score, None)
            .await
            .unwrap();
    }

    let (avg, count) = recipe_aggregate(&state, recipe).await;
    assert_close(avg, 4.5);
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_out_of_range_score_is_rejected_without_writes() {
    let state = memory_state().await;
    let author = add_user(&state, "Author", Role::User).await;
    let rater = add_user(&state, "Rater", Role::User).await;
    let recipe = publish(&state, &author, recipe("Pie", "Dessert", Difficulty::Easy, 10)).await;

    for score in [0, 6, -1] {
        let err = state
            .rating_service
            .record_rating(&rater, recipe, score, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::InvalidScore(s) if s == score));
    }

    assert_eq!(count_rows(&state, "SELECT COUNT(*) FROM ratings").await, 0);
    assert_eq!(recipe_aggregate(&state, recipe).await, (None, 0));
}

#[tokio::test]
async fn test_deleting_last_rating_yields_null_and_keeps_recipe_active() {
    let state = memory_state().await;
    let admin = add_user(&state, "Admin", Role::Admin).await;
    let author = add_user(&state, "Author", Role::User).await;
    let rater = add_user(&state, "Rater", Role::User).await;
    let recipe = publish(&state, &author, recipe("Tart", "Dessert", Difficulty::Medium, 30)).await;

    let first = state
        .rating_service
        .record_rating(&rater, recipe, 4, None)
        .await
        .unwrap();
    let second = state
        .rating_service
        .record_rating(&rater, recipe, 2, None)
        .await
        .unwrap();

    state.rating_service.delete_rating(&admin, first).await.unwrap();
    let (avg, count) = recipe_aggregate(&state, recipe).await;
    assert_close(avg, 2.0);
    assert_eq!(count, 1);

    state.rating_service.delete_rating(&admin, second).await.unwrap();
    assert_eq!(recipe_aggregate(&state, recipe).await, (None, 0));
    assert_eq!(user_rating_avg(&state, uid(&author)).await, None);

    // Still published and still visible to anyone.
    let detail = state
        .moderation_service
        .fetch_recipe_detail(&AccessContext::Anonymous, recipe)
        .await
        .unwrap();
    assert_eq!(detail.rating_avg, None);
}

#[tokio::test]
async fn test_delete_rating_requires_admin_and_existing_row() {
    let state = memory_state().await;
    let author = add_user(&state, "Author", Role::User).await;
    let rater = add_user(&state, "Rater", Role::User).await;
    let recipe = publish(&state, &author, recipe("Cake", "Dessert", Difficulty::Easy, 5)).await;
    let rating = state
        .rating_service
        .record_rating(&rater, recipe, 5, None)
        .await
        .unwrap();

    let err = state
        .rating_service
        .delete_rating(&rater, rating)
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::Forbidden));

    let err = state
        .rating_service
        .delete_rating(&AccessContext::Operator, RatingId::new(9999))
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::RatingNotFound(_)));

    assert_eq!(count_rows(&state, "SELECT COUNT(*) FROM ratings").await, 1);
}

#[tokio::test]
async fn test_author_average_covers_only_active_recipes() {
    let state = memory_state().await;
    let admin = add_user(&state, "Admin", Role::Admin).await;
    let author = add_user(&state, "Author", Role::User).await;
    let rater = add_user(&state, "Rater", Role::User).await;

    let active = publish(&state, &author, recipe("Bread", "Baking", Difficulty::Medium, 60)).await;
    let pending = submit(&state, &author, recipe("Rolls", "Baking", Difficulty::Medium, 45)).await;

    state
        .rating_service
        .record_rating(&rater, active, 5, None)
        .await
        .unwrap();
    // Admins can see, and therefore rate, pending recipes.
    state
        .rating_service
        .record_rating(&admin, pending, 1, None)
        .await
        .unwrap();

    assert_close(user_rating_avg(&state, uid(&author)).await, 5.0);
    let (pending_avg, _) = recipe_aggregate(&state, pending).await;
    assert_close(pending_avg, 1.0);

    state
        .moderation_service
        .activate_recipe(&admin, pending)
        .await
        .unwrap();
    assert_close(user_rating_avg(&state, uid(&author)).await, 3.0);
}

#[tokio::test]
async fn test_rating_hidden_or_missing_recipe_is_not_found() {
    let state = memory_state().await;
    let author = add_user(&state, "Author", Role::User).await;
    let rater = add_user(&state, "Rater", Role::User).await;
    let pending = submit(&state, &author, recipe("Secret", "Dinner", Difficulty::Easy, 5)).await;

    let err = state
        .rating_service
        .record_rating(&rater, pending, 4, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::RecipeNotFound(id) if id == pending));

    let err = state
        .rating_service
        .record_rating(&AccessContext::Anonymous, pending, 4, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::Forbidden));

    assert_eq!(count_rows(&state, "SELECT COUNT(*) FROM ratings").await, 0);
}

#[tokio::test]
async fn test_removing_recipe_clears_author_average() {
    let state = memory_state().await;
    let admin = add_user(&state, "Admin", Role::Admin).await;
    let author = add_user(&state, "Author", Role::User).await;
    let rater = add_user(&state, "Rater", Role::User).await;
    let recipe = publish(&state, &author, recipe("Only", "Dinner", Difficulty::Easy, 5)).await;

    state
        .rating_service
        .record_rating(&rater, recipe, 4, None)
        .await
        .unwrap();
    assert_close(user_rating_avg(&state, uid(&author)).await, 4.0);

    state
        .moderation_service
        .remove_recipe(&admin, recipe)
        .await
        .unwrap();

    assert_eq!(user_rating_avg(&state, uid(&author)).await, None);
    assert_eq!(count_rows(&state, "SELECT COUNT(*) FROM ratings").await, 0);
}

#[tokio::test]
async fn test_recompute_all_matches_source_rows() {
    let state = memory_state().await;
    let author = add_user(&state, "Author", Role::User).await;
    let rater = add_user(&state, "Rater", Role::User).await;
    let a = publish(&state, &author, recipe("A", "Dinner", Difficulty::Easy, 5)).await;
    let b = publish(&state, &author, recipe("B", "Dinner", Difficulty::Easy, 5)).await;

    for (recipe, score) in [(a, 5), (a, 4), (b, 1)] {
        state
            .rating_service
            .record_rating(&rater, recipe, score, None)
            .await
            .unwrap();
    }

    // Corrupt the derived columns behind the engine's back.
    exec(&state, "UPDATE recipes SET rating_avg = 0, rating_count = 99").await;
    exec(&state, "UPDATE users SET rating_avg = 0").await;

    let err = state
        .rating_service
        .recompute_all(&rater)
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::Forbidden));

    let (recipes, users) = state
        .rating_service
        .recompute_all(&AccessContext::Operator)
        .await
        .unwrap();
    assert_eq!(recipes, 2);
    assert_eq!(users, 2);

    let (a_avg, a_count) = recipe_aggregate(&state, a).await;
    assert_close(a_avg, 4.5);
    assert_eq!(a_count, 2);
    let (b_avg, b_count) = recipe_aggregate(&state, b).await;
    assert_close(b_avg, 1.0);
    assert_eq!(b_count, 1);
    assert_close(user_rating_avg(&state, uid(&author)).await, 10.0 / 3.0);
    assert_eq!(user_rating_avg(&state, uid(&rater)).await, None);
}

#[tokio::test]
async fn test_failed_author_recompute_rolls_back_rating() {
    let state = memory_state().await;
    let author = add_user(&state, "Author", Role::User).await;
    let rater = add_user(&state, "Rater", Role::User).await;
    let recipe = publish(&state, &author, recipe("Fragile", "Dinner", Difficulty::Easy, 5)).await;

    exec(&state, FAIL_AUTHOR_UPDATE).await;

    let err = state
        .rating_service
        .record_rating(&rater, recipe, 5, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::Storage(_)));

    assert_eq!(count_rows(&state, "SELECT COUNT(*) FROM ratings").await, 0);
    assert_eq!(recipe_aggregate(&state, recipe).await, (None, 0));
}

#[tokio::test]
async fn test_failed_author_recompute_rolls_back_removal() {
    let state = memory_state().await;
    let admin = add_user(&state, "Admin", Role::Admin).await;
    let author = add_user(&state, "Author", Role::User).await;
    let rater = add_user(&state, "Rater", Role::User).await;
    let recipe = publish(&state, &author, recipe("Sturdy", "Dinner", Difficulty::Easy, 5)).await;
    state
        .rating_service
        .record_rating(&rater, recipe, 3, None)
        .await
        .unwrap();

    exec(&state, FAIL_AUTHOR_UPDATE).await;

    let err = state
        .moderation_service
        .remove_recipe(&admin, recipe)
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::Storage(_)));

    let detail = state
        .moderation_service
        .fetch_recipe_detail(&admin, recipe)
        .await
        .unwrap();
    assert_eq!(detail.ingredients.len(), 2);
    assert_eq!(detail.reviews.len(), 1);
    assert_close(user_rating_avg(&state, uid(&author)).await, 3.0);
}

/// Aggregates as stored, then as rebuilt from the rating rows.
async fn stored_and_recomputed(
    state: &SharedState,
    recipe: RecipeId,
    author: UserId,
) -> ((Option<f64>, i32, Option<f64>), (Option<f64>, i32, Option<f64>)) {
    let (avg, count) = recipe_aggregate(state, recipe).await;
    let stored = (avg, count, user_rating_avg(state, author).await);

    state
        .rating_service
        .recompute_all(&AccessContext::Operator)
        .await
        .unwrap();

    let (avg, count) = recipe_aggregate(state, recipe).await;
    let rebuilt = (avg, count, user_rating_avg(state, author).await);
    (stored, rebuilt)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_ratings_on_one_recipe_all_commit() {
    let (state, path) = file_state().await;
    let author = add_user(&state, "Author", Role::User).await;
    let recipe = publish(&state, &author, recipe("Busy", "Dinner", Difficulty::Easy, 5)).await;

    let mut raters = Vec::new();
    for n in 0..8 {
        raters.push(add_user(&state, &format!("Rater{n}"), Role::User).await);
    }

    let mut tasks = tokio::task::JoinSet::new();
    for (n, rater) in (0..).zip(raters) {
        let state = state.clone();
        let score = n % 5 + 1;
        tasks.spawn(async move {
            state
                .rating_service
                .record_rating(&rater, recipe, score, None)
                .await
        });
    }

    while let Some(joined) = tasks.join_next().await {
        joined.unwrap().unwrap();
    }

    assert_eq!(count_rows(&state, "SELECT COUNT(*) FROM ratings").await, 8);

    // Scores 1,2,3,4,5,1,2,3.
    let (stored, rebuilt) = stored_and_recomputed(&state, recipe, uid(&author)).await;
    assert_eq!(stored.1, 8);
    assert_close(stored.0, 21.0 / 8.0);
    assert_close(stored.2, 21.0 / 8.0);
    assert_eq!(stored, rebuilt);

    state.store.conn.clone().close().await.ok();
    remove_db_file(&path);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_ratings_racing_removal_leave_consistent_aggregates() {
    let (state, path) = file_state().await;
    let author = add_user(&state, "Author", Role::User).await;
    let fan = add_user(&state, "Fan", Role::User).await;
    let keep = publish(&state, &author, recipe("Keep", "Dinner", Difficulty::Easy, 5)).await;
    let doomed = publish(&state, &author, recipe("Doomed", "Dinner", Difficulty::Easy, 5)).await;

    state
        .rating_service
        .record_rating(&fan, keep, 5, None)
        .await
        .unwrap();

    let mut raters = Vec::new();
    for n in 0..8 {
        raters.push(add_user(&state, &format!("Rater{n}"), Role::User).await);
    }

    let mut tasks = tokio::task::JoinSet::new();
    for rater in raters {
        let state = state.clone();
        tasks.spawn(async move {
            state
                .rating_service
                .record_rating(&rater, doomed, 1, None)
                .await
                .map(|_| ())
        });
    }
    {
        let state = state.clone();
        tasks.spawn(async move {
            state
                .moderation_service
                .remove_recipe(&AccessContext::Operator, doomed)
                .await
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined.unwrap() {
            Ok(()) | Err(ContentError::RecipeNotFound(_)) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    let orphaned = count_rows(
        &state,
        &format!("SELECT COUNT(*) FROM ratings WHERE recipe_id = {doomed}"),
    )
    .await;
    assert_eq!(orphaned, 0);
    assert_eq!(count_rows(&state, "SELECT COUNT(*) FROM recipes").await, 1);

    let (stored, rebuilt) = stored_and_recomputed(&state, keep, uid(&author)).await;
    assert_eq!(stored.1, 1);
    assert_close(stored.2, 5.0);
    assert_eq!(stored, rebuilt);

    state.store.conn.clone().close().await.ok();
    remove_db_file(&path);
}
