mod common;

use common::*;
use potluck::domain::{AccessContext, Difficulty, RecipeId, Role, UserId};
use potluck::services::ContentError;

#[tokio::test]
async fn test_like_twice_keeps_one_row() {
    let state = memory_state().await;
    let author = add_user(&state, "Author", Role::User).await;
    let fan = add_user(&state, "Fan", Role::User).await;
    let id = publish(&state, &author, recipe("Soup", "Dinner", Difficulty::Easy, 5)).await;

    let first = state.social_service.like(&fan, id).await.unwrap();
    let second = state.social_service.like(&fan, id).await.unwrap();

    assert!(first.liked && second.liked);
    assert_eq!(second.likes, 1);
    assert_eq!(count_rows(&state, "SELECT COUNT(*) FROM likes").await, 1);
}

#[tokio::test]
async fn test_unlike_without_like_succeeds() {
    let state = memory_state().await;
    let author = add_user(&state, "Author", Role::User).await;
    let fan = add_user(&state, "Fan", Role::User).await;
    let id = publish(&state, &author, recipe("Soup", "Dinner", Difficulty::Easy, 5)).await;

    let status = state.social_service.unlike(&fan, id).await.unwrap();
    assert!(!status.liked);
    assert_eq!(status.likes, 0);

    state.social_service.like(&fan, id).await.unwrap();
    let status = state.social_service.unlike(&fan, id).await.unwrap();
    assert_eq!(status.likes, 0);
}

#[tokio::test]
async fn test_like_requires_visible_recipe_and_identity() {
    let state = memory_state().await;
    let admin = add_user(&state, "Admin", Role::Admin).await;
    let author = add_user(&state, "Author", Role::User).await;
    let fan = add_user(&state, "Fan", Role::User).await;
    let pending = submit(&state, &author, recipe("Soon", "Dinner", Difficulty::Easy, 5)).await;

    let err = state.social_service.like(&fan, pending).await.unwrap_err();
    assert!(matches!(err, ContentError::RecipeNotFound(_)));

    let err = state
        .social_service
        .unlike(&fan, RecipeId::new(777))
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::RecipeNotFound(_)));

    let err = state
        .social_service
        .like(&AccessContext::Anonymous, pending)
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::Forbidden));

    // Admins see pending recipes and may like them.
    let status = state.social_service.like(&admin, pending).await.unwrap();
    assert_eq!(status.likes, 1);
}

#[tokio::test]
async fn test_self_follow_fails_without_writing() {
    let state = memory_state().await;
    let user = add_user(&state, "Solo", Role::User).await;

    let err = state
        .social_service
        .follow(&user, uid(&user))
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::SelfFollow));

    let err = state
        .social_service
        .unfollow(&user, uid(&user))
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::SelfFollow));

    assert_eq!(count_rows(&state, "SELECT COUNT(*) FROM followers").await, 0);
}

#[tokio::test]
async fn test_follow_is_idempotent() {
    let state = memory_state().await;
    let a = add_user(&state, "Alice", Role::User).await;
    let b = add_user(&state, "Bob", Role::User).await;

    state.social_service.follow(&a, uid(&b)).await.unwrap();
    let status = state.social_service.follow(&a, uid(&b)).await.unwrap();
    assert!(status.following);
    assert_eq!(status.followers, 1);

    let status = state.social_service.unfollow(&a, uid(&b)).await.unwrap();
    assert!(!status.following);
    assert_eq!(status.followers, 0);

    let status = state.social_service.unfollow(&a, uid(&b)).await.unwrap();
    assert_eq!(status.followers, 0);
}

#[tokio::test]
async fn test_follow_unknown_user_is_not_found() {
    let state = memory_state().await;
    let a = add_user(&state, "Alice", Role::User).await;

    let err = state
        .social_service
        .follow(&a, UserId::new(404))
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::UserNotFound(_)));
}

#[tokio::test]
async fn test_profile_counts_and_visible_recipes() {
    let state = memory_state().await;
    let admin = add_user(&state, "Admin", Role::Admin).await;
    let author = add_user(&state, "Author", Role::User).await;
    let fan = add_user(&state, "Fan", Role::User).await;

    publish(&state, &author, recipe("Public", "Dinner", Difficulty::Easy, 5)).await;
    submit(&state, &author, recipe("Draft", "Dinner", Difficulty::Easy, 5)).await;
    state.social_service.follow(&fan, uid(&author)).await.unwrap();
    state.social_service.follow(&author, uid(&admin)).await.unwrap();

    let seen_by_fan = state
        .social_service
        .fetch_profile(&fan, uid(&author), 1)
        .await
        .unwrap();
    assert_eq!(seen_by_fan.name, "Author");
    assert_eq!(seen_by_fan.followers, 1);
    assert_eq!(seen_by_fan.following, 1);
    assert!(seen_by_fan.viewer_follows);
    assert!(!seen_by_fan.is_self);
    assert_eq!(seen_by_fan.recipes.total_count, 1);
    assert_eq!(seen_by_fan.recipes.items[0].title, "Public");

    // Own profile still hides the draft from a non-admin.
    let own = state
        .social_service
        .fetch_profile(&author, uid(&author), 1)
        .await
        .unwrap();
    assert!(own.is_self);
    assert!(!own.viewer_follows);
    assert_eq!(own.recipes.total_count, 1);

    let seen_by_admin = state
        .social_service
        .fetch_profile(&admin, uid(&author), 1)
        .await
        .unwrap();
    assert_eq!(seen_by_admin.recipes.total_count, 2);

    let err = state
        .social_service
        .fetch_profile(&AccessContext::Anonymous, UserId::new(999), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::UserNotFound(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_duplicate_likes_collapse_to_one_row() {
    let (state, path) = file_state().await;
    let author = add_user(&state, "Author", Role::User).await;
    let fan = add_user(&state, "Fan", Role::User).await;
    let id = publish(&state, &author, recipe("Hot", "Dinner", Difficulty::Easy, 5)).await;

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..8 {
        let state = state.clone();
        tasks.spawn(async move { state.social_service.like(&fan, id).await });
    }

    while let Some(joined) = tasks.join_next().await {
        let status = joined.unwrap().unwrap();
        assert!(status.liked);
    }

    assert_eq!(count_rows(&state, "SELECT COUNT(*) FROM likes").await, 1);

    state.store.conn.clone().close().await.ok();
    remove_db_file(&path);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_likes_racing_removal_report_not_found() {
    let (state, path) = file_state().await;
    let author = add_user(&state, "Author", Role::User).await;
    let id = publish(&state, &author, recipe("Gone", "Dinner", Difficulty::Easy, 5)).await;

    let mut fans = Vec::new();
    for n in 0..8 {
        fans.push(add_user(&state, &format!("Fan{n}"), Role::User).await);
    }

    let mut tasks = tokio::task::JoinSet::new();
    for fan in fans {
        let state = state.clone();
        tasks.spawn(async move { state.social_service.like(&fan, id).await.map(|_| ()) });
    }
    {
        let state = state.clone();
        tasks.spawn(async move {
            state
                .moderation_service
                .remove_recipe(&AccessContext::Operator, id)
                .await
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined.unwrap() {
            Ok(()) | Err(ContentError::RecipeNotFound(_)) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(count_rows(&state, "SELECT COUNT(*) FROM likes").await, 0);
    assert_eq!(count_rows(&state, "SELECT COUNT(*) FROM recipes").await, 0);

    state.store.conn.clone().close().await.ok();
    remove_db_file(&path);
}
