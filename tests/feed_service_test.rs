//! Feed service tests: filters, engagement, suggestions and profile pages.

mod common;

use std::collections::HashMap;

use mockall::predicate::eq;
use uuid::Uuid;

use social_network::domain::{Engagement, Post, User};
use social_network::errors::AppError;
use social_network::infra::{
    MockFollowerRepository, MockPostRepository, MockUserRepository, PostFilter,
};
use social_network::services::{Feed, FeedReader, FeedService};
use social_network::types::{Paginated, PaginationParams};

use common::{post_by, user, TestUnitOfWork};

fn listing(posts: Vec<Post>) -> impl FnMut(PostFilter, PaginationParams, u64) -> social_network::AppResult<Paginated<Post>> + Send + 'static {
    move |_, params, per_page| {
        let total = posts.len() as u64;
        let page = params.resolve(total, per_page);
        Ok(Paginated::new(posts.clone(), page, per_page, total))
    }
}

fn engagement_for(viewer_likes: Vec<Uuid>) -> impl FnMut(Vec<Uuid>, Option<Uuid>) -> social_network::AppResult<HashMap<Uuid, Engagement>> + Send + 'static {
    move |ids, viewer| {
        Ok(ids
            .into_iter()
            .map(|id| {
                let liked = viewer.is_some() && viewer_likes.contains(&id);
                (
                    id,
                    Engagement {
                        like_count: u64::from(liked),
                        liked,
                        saved: false,
                    },
                )
            })
            .collect())
    }
}

#[tokio::test]
async fn anonymous_index_has_no_suggestions_or_personal_flags() {
    let author = user("ada");
    let post = post_by(&author, "hello");

    let mut posts = MockPostRepository::new();
    posts
        .expect_list()
        .withf(|filter, _, per_page| *filter == PostFilter::All && *per_page == 10)
        .returning(listing(vec![post.clone()]));
    posts
        .expect_engagement()
        .returning(engagement_for(vec![post.id]));

    let mut users = MockUserRepository::new();
    users.expect_suggestions().never();

    let reader = FeedReader::new(TestUnitOfWork::default().posts(posts).users(users).build());
    let page = reader
        .feed(Feed::Index, None, PaginationParams::default())
        .await
        .unwrap();

    assert!(page.suggestions.is_empty());
    assert_eq!(page.posts.data.len(), 1);
    assert!(!page.posts.data[0].liked);
    assert!(!page.posts.data[0].editable);
    assert_eq!(page.posts.meta.total_pages, 1);
}

#[tokio::test]
async fn signed_in_index_marks_likes_and_suggests_six() {
    let viewer = user("viewer");
    let viewer_id = viewer.id;
    let own = post_by(&viewer, "mine");
    let liked = post_by(&user("ada"), "liked");

    let mut posts = MockPostRepository::new();
    posts
        .expect_list()
        .returning(listing(vec![liked.clone(), own.clone()]));
    posts
        .expect_engagement()
        .withf(move |ids, viewer| ids.len() == 2 && *viewer == Some(viewer_id))
        .returning(engagement_for(vec![liked.id]));

    let mut users = MockUserRepository::new();
    users
        .expect_suggestions()
        .with(eq(viewer_id), eq(6))
        .times(1)
        .returning(|_, limit| Ok((0..limit).map(|i| user(&format!("u{i}"))).collect()));

    let reader = FeedReader::new(TestUnitOfWork::default().posts(posts).users(users).build());
    let page = reader
        .feed(Feed::Index, Some(viewer_id), PaginationParams::default())
        .await
        .unwrap();

    assert_eq!(page.suggestions.len(), 6);
    assert!(page.posts.data[0].liked);
    assert_eq!(page.posts.data[0].like_count, 1);
    assert!(!page.posts.data[0].editable);
    assert!(page.posts.data[1].editable);
}

#[tokio::test]
async fn following_and_saved_feeds_filter_by_viewer() {
    let viewer_id = Uuid::new_v4();

    let mut posts = MockPostRepository::new();
    posts
        .expect_list()
        .withf(move |filter, _, _| *filter == PostFilter::FollowedBy(viewer_id))
        .times(1)
        .returning(listing(Vec::new()));
    posts
        .expect_list()
        .withf(move |filter, _, _| *filter == PostFilter::SavedBy(viewer_id))
        .times(1)
        .returning(listing(Vec::new()));
    posts
        .expect_engagement()
        .returning(engagement_for(Vec::new()));

    let mut users = MockUserRepository::new();
    users.expect_suggestions().returning(|_, _| Ok(Vec::new()));

    let reader = FeedReader::new(TestUnitOfWork::default().posts(posts).users(users).build());

    let following = reader
        .feed(Feed::Following, Some(viewer_id), PaginationParams::default())
        .await
        .unwrap();
    assert!(following.posts.data.is_empty());
    assert_eq!(following.posts.meta.page, 1);

    reader
        .feed(Feed::Saved, Some(viewer_id), PaginationParams::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn personal_feeds_need_a_viewer() {
    let reader = FeedReader::new(TestUnitOfWork::default().build());

    for feed in [Feed::Following, Feed::Saved] {
        let result = reader.feed(feed, None, PaginationParams::default()).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }
}

#[tokio::test]
async fn out_of_range_page_shows_last_page() {
    let author = user("ada");
    let many: Vec<Post> = (0..25).map(|i| post_by(&author, &format!("post {i}"))).collect();

    let mut posts = MockPostRepository::new();
    posts.expect_list().returning(move |_, params, per_page| {
        let page = params.resolve(many.len() as u64, per_page);
        let start = ((page - 1) * per_page) as usize;
        let data = many.iter().skip(start).take(per_page as usize).cloned().collect();
        Ok(Paginated::new(data, page, per_page, many.len() as u64))
    });
    posts
        .expect_engagement()
        .returning(engagement_for(Vec::new()));

    let reader = FeedReader::new(TestUnitOfWork::default().posts(posts).build());
    let page = reader
        .feed(Feed::Index, None, PaginationParams::page(99))
        .await
        .unwrap();

    assert_eq!(page.posts.meta.page, 3);
    assert_eq!(page.posts.meta.total_pages, 3);
    assert_eq!(page.posts.data.len(), 5);
    assert!(!page.posts.meta.has_next);
}

#[tokio::test]
async fn profile_page_collects_counters() {
    let owner = user("ada");
    let owner_id = owner.id;
    let viewer_id = Uuid::new_v4();
    let post = post_by(&owner, "hi");
    let profile_owner = owner.clone();

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_username()
        .withf(|name| name == "ada")
        .returning(move |_| Ok(Some(profile_owner.clone())));
    users.expect_suggestions().returning(|_, _| Ok(Vec::new()));

    let mut posts = MockPostRepository::new();
    posts
        .expect_list()
        .withf(move |filter, _, _| *filter == PostFilter::CreatedBy(owner_id))
        .returning(listing(vec![post.clone()]));
    posts
        .expect_count_by_creater()
        .with(eq(owner_id))
        .returning(|_| Ok(1));
    posts
        .expect_engagement()
        .returning(engagement_for(Vec::new()));

    let mut followers = MockFollowerRepository::new();
    followers
        .expect_follower_count()
        .with(eq(owner_id))
        .returning(|_| Ok(4));
    followers
        .expect_following_count()
        .with(eq(owner_id))
        .returning(|_| Ok(2));
    followers
        .expect_is_following()
        .with(eq(owner_id), eq(viewer_id))
        .returning(|_, _| Ok(true));

    let reader = FeedReader::new(
        TestUnitOfWork::default()
            .users(users)
            .posts(posts)
            .followers(followers)
            .build(),
    );
    let page = reader
        .profile("ada", Some(viewer_id), PaginationParams::default())
        .await
        .unwrap();

    assert_eq!(page.user.username, "ada");
    assert_eq!(page.posts_count, 1);
    assert_eq!(page.follower_count, 4);
    assert_eq!(page.following_count, 2);
    assert!(page.is_follower);
    assert_eq!(page.posts.data.len(), 1);
}

#[tokio::test]
async fn unknown_profile_is_not_found() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_username().returning(|_| Ok(None::<User>));

    let reader = FeedReader::new(TestUnitOfWork::default().users(users).build());
    let result = reader
        .profile("ghost", None, PaginationParams::default())
        .await;

    assert!(matches!(result, Err(AppError::NotFound)));
}
