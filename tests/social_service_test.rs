mod common;

use mockall::predicate::eq;
use uuid::Uuid;

use social_network::domain::{Author, FollowerSet};
use social_network::errors::AppError;
use social_network::types::{Paginated, PaginationParams};
use social_network::infra::{MockFollowerRepository, MockUserRepository};
use social_network::services::{SocialGraph, SocialService};

use common::{user, TestUnitOfWork};

fn users_with(known: social_network::User) -> MockUserRepository {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_username()
        .returning(move |name| Ok((name == known.username).then(|| known.clone())));
    users
}

#[tokio::test]
async fn follow_adds_viewer_to_targets_followers() {
    let target = user("ada");
    let target_id = target.id;
    let viewer = Uuid::new_v4();

    let mut followers = MockFollowerRepository::new();
    followers
        .expect_add()
        .with(eq(target_id), eq(viewer))
        .times(1)
        .returning(|_, _| Ok(()));

    let graph = SocialGraph::new(
        TestUnitOfWork::default()
            .users(users_with(target))
            .followers(followers)
            .build(),
    );

    graph.follow(viewer, "ada").await.unwrap();
}

#[tokio::test]
async fn cannot_follow_yourself() {
    let me = user("ada");
    let my_id = me.id;

    let mut followers = MockFollowerRepository::new();
    followers.expect_add().never();

    let graph = SocialGraph::new(
        TestUnitOfWork::default()
            .users(users_with(me))
            .followers(followers)
            .build(),
    );

    let result = graph.follow(my_id, "ada").await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn following_unknown_user_is_not_found() {
    let graph = SocialGraph::new(
        TestUnitOfWork::default()
            .users(users_with(user("ada")))
            .build(),
    );

    let result = graph.follow(Uuid::new_v4(), "ghost").await;
    assert!(matches!(result, Err(AppError::NotFound)));

    let result = graph.unfollow(Uuid::new_v4(), "ghost").await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn unfollow_removes_viewer() {
    let target = user("ada");
    let target_id = target.id;
    let viewer = Uuid::new_v4();

    let mut followers = MockFollowerRepository::new();
    followers
        .expect_remove()
        .with(eq(target_id), eq(viewer))
        .times(1)
        .returning(|_, _| Ok(()));

    let graph = SocialGraph::new(
        TestUnitOfWork::default()
            .users(users_with(target))
            .followers(followers)
            .build(),
    );

    graph.unfollow(viewer, "ada").await.unwrap();
}

#[tokio::test]
async fn suggestions_ask_for_six_and_keep_authors_only() {
    let viewer = Uuid::new_v4();

    let mut users = MockUserRepository::new();
    users
        .expect_suggestions()
        .with(eq(viewer), eq(6))
        .times(1)
        .returning(|_, _| Ok(vec![user("ada"), user("grace")]));

    let graph = SocialGraph::new(TestUnitOfWork::default().users(users).build());
    let suggestions = graph.suggestions(Some(viewer)).await.unwrap();

    let names: Vec<_> = suggestions.iter().map(|a| a.username.as_str()).collect();
    assert_eq!(names, ["ada", "grace"]);

    let json = serde_json::to_value(&suggestions[0]).unwrap();
    assert!(json.get("email").is_none());
    assert!(json.get("password_hash").is_none());
}

#[tokio::test]
async fn anonymous_viewer_gets_no_suggestions() {
    let graph = SocialGraph::new(TestUnitOfWork::default().build());
    assert!(graph.suggestions(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn follow_stats_skip_membership_for_anonymous() {
    let owner = Uuid::new_v4();

    let mut followers = MockFollowerRepository::new();
    followers.expect_follower_count().returning(|_| Ok(3));
    followers.expect_following_count().returning(|_| Ok(0));
    followers.expect_is_following().never();

    let graph = SocialGraph::new(TestUnitOfWork::default().followers(followers).build());
    let stats = graph.follow_stats(owner, None).await.unwrap();

    assert_eq!(stats.follower_count, 3);
    assert_eq!(stats.following_count, 0);
    assert!(!stats.is_follower);
}

#[tokio::test]
async fn follower_sets_listing_uses_admin_page_size() {
    let owner = user("ada");
    let set = FollowerSet {
        id: Uuid::new_v4(),
        user: Author::from(&owner),
    };

    let mut followers = MockFollowerRepository::new();
    followers
        .expect_search()
        .withf(|term, params, per_page| {
            term.as_deref() == Some("ad") && params.page.as_deref() == Some("2") && *per_page == 20
        })
        .times(1)
        .returning(move |_, _, per_page| Ok(Paginated::new(vec![set.clone()], 1, per_page, 1)));

    let graph = SocialGraph::new(TestUnitOfWork::default().followers(followers).build());
    let page = graph
        .search_follower_sets(Some("ad".to_string()), PaginationParams::page(2))
        .await
        .unwrap();

    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].user.username, "ada");
    assert_eq!(page.meta.per_page, 20);
}
