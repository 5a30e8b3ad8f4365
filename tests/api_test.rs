//! HTTP-level tests over the real router.
//!
//! Services run for real on top of mock repositories; Redis is replaced by a
//! mock cache, and the database handle never connects.

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use mockall::predicate::eq;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use social_network::api::{create_router, AppState};
use social_network::domain::User;
use social_network::errors::AppError;
use social_network::infra::{
    Database, MockCacheBackend, MockCommentRepository, MockPostRepository, MockUserRepository,
    PostRelation, SessionRecord,
};
use social_network::services::{Claims, Services};
use social_network::types::Paginated;
use social_network::Config;

use common::{comment_on, post_by, user, TestUnitOfWork};

const SECRET: &str = "test-secret-key-for-router-tests-32chars";
const SESSION_ID: &str = "test-session";

// =============================================================================
// Test Helpers
// =============================================================================

fn app(uow: TestUnitOfWork, cache: MockCacheBackend) -> Router {
    let config = Config::new(String::new(), String::new(), SECRET.to_string());
    let services = Services::with_unit_of_work(uow.build(), config.clone());
    let state = AppState::new(
        Arc::new(services),
        Arc::new(cache),
        Arc::new(Database::disconnected()),
        config,
    );
    create_router(state)
}

/// Cache that lets every request past the rate limiter.
fn open_cache() -> MockCacheBackend {
    let mut cache = MockCacheBackend::new();
    cache
        .expect_check_rate_limit()
        .returning(|_, _, _| Ok((1, true)));
    cache
}

/// `open_cache` plus a live session for `user`.
fn signed_in_cache(user: &User) -> MockCacheBackend {
    let mut cache = open_cache();
    let record = SessionRecord {
        user_id: user.id,
        username: user.username.clone(),
    };
    cache
        .expect_get_session()
        .with(eq(SESSION_ID))
        .returning(move |_| Ok(Some(record.clone())));
    cache
}

fn token_for(user: &User) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user.id,
        username: user.username.clone(),
        role: user.role.to_string(),
        sid: SESSION_ID.to_string(),
        exp: now + 3600,
        iat: now,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<String>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}

// =============================================================================
// Routing
// =============================================================================

#[tokio::test]
async fn root_answers_without_storage() {
    let (status, _) = send(
        app(TestUnitOfWork::default(), MockCacheBackend::new()),
        request(Method::GET, "/", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn posts_path_serves_public_reads_and_protected_writes() {
    let mut posts = MockPostRepository::new();
    posts
        .expect_list()
        .returning(|_, _, per_page| Ok(Paginated::new(Vec::new(), 1, per_page, 0)));
    posts.expect_engagement().returning(|_, _| Ok(HashMap::new()));
    posts.expect_create().never();

    let router = app(TestUnitOfWork::default().posts(posts), open_cache());

    let (status, body) = send(router.clone(), request(Method::GET, "/posts", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["suggestions"], json!([]));

    let (status, body) = send(
        router,
        request(Method::POST, "/posts", None, Some(r#"{"text":"hi"}"#.to_string())),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "UNAUTHORIZED");
}

#[tokio::test]
async fn anonymous_following_feed_is_unauthorized() {
    let (status, body) = send(
        app(TestUnitOfWork::default(), open_cache()),
        request(Method::GET, "/posts/following", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "UNAUTHORIZED");
}

#[tokio::test]
async fn revoked_session_is_unauthorized() {
    let ada = user("ada");
    let mut cache = open_cache();
    cache.expect_get_session().returning(|_| Ok(None));

    let (status, _) = send(
        app(TestUnitOfWork::default(), cache),
        request(Method::GET, "/posts/saved", Some(&token_for(&ada)), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn exhausted_rate_limit_is_too_many_requests() {
    let mut cache = MockCacheBackend::new();
    cache
        .expect_check_rate_limit()
        .returning(|_, max, _| Ok((max + 1, false)));

    let router = app(TestUnitOfWork::default(), cache);
    let response = router
        .oneshot(request(Method::GET, "/posts", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("retry-after"));
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn register_answers_created_and_records_session() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_username().returning(|_| Ok(None));
    users
        .expect_create()
        .times(1)
        .returning(|new_user| Ok(user(&new_user.username)));

    let mut cache = open_cache();
    cache
        .expect_set_session()
        .times(1)
        .returning(|_, _, _| Ok(()));

    let body = json!({
        "username": "ada",
        "email": "ada@example.com",
        "password": "SecurePass123!",
        "confirmation": "SecurePass123!"
    });
    let (status, body) = send(
        app(TestUnitOfWork::default().users(users), cache),
        request(Method::POST, "/auth/register", None, Some(body.to_string())),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["username"], "ada");
    assert_eq!(body["token_type"], "Bearer");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn logout_revokes_session() {
    let ada = user("ada");
    let mut cache = signed_in_cache(&ada);
    cache
        .expect_delete_session()
        .with(eq(SESSION_ID))
        .times(1)
        .returning(|_| Ok(()));

    let (status, _) = send(
        app(TestUnitOfWork::default(), cache),
        request(Method::POST, "/auth/logout", Some(&token_for(&ada)), None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn anonymous_logout_is_no_content() {
    let (status, _) = send(
        app(TestUnitOfWork::default(), open_cache()),
        request(Method::POST, "/auth/logout", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

// =============================================================================
// Posts and comments
// =============================================================================

#[tokio::test]
async fn like_answers_no_content() {
    let ada = user("ada");
    let post = post_by(&user("grace"), "hello");
    let post_id = post.id;

    let mut posts = MockPostRepository::new();
    posts
        .expect_find_by_id()
        .returning(move |_| Ok(Some(post.clone())));
    posts
        .expect_add_relation()
        .with(eq(PostRelation::Like), eq(post_id), eq(ada.id))
        .times(1)
        .returning(|_, _, _| Ok(()));

    let (status, _) = send(
        app(TestUnitOfWork::default().posts(posts), signed_in_cache(&ada)),
        request(
            Method::PUT,
            &format!("/posts/{post_id}/like"),
            Some(&token_for(&ada)),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn deleting_own_post_answers_no_content() {
    let ada = user("ada");
    let post = post_by(&ada, "mine");
    let post_id = post.id;

    let mut posts = MockPostRepository::new();
    posts
        .expect_find_by_id()
        .returning(move |_| Ok(Some(post.clone())));
    posts
        .expect_delete()
        .with(eq(post_id))
        .times(1)
        .returning(|_| Ok(()));

    let (status, _) = send(
        app(TestUnitOfWork::default().posts(posts), signed_in_cache(&ada)),
        request(
            Method::DELETE,
            &format!("/posts/{post_id}"),
            Some(&token_for(&ada)),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn comment_answers_created_with_one_element_list() {
    let ada = user("ada");
    let post = post_by(&user("grace"), "hello");
    let post_id = post.id;
    let stored = comment_on(&post, &ada, "nice");

    let mut comments = MockCommentRepository::new();
    comments
        .expect_create()
        .withf(move |id, _, text| *id == post_id && text == "nice")
        .times(1)
        .returning(move |_, _, _| Ok(stored.clone()));

    let (status, body) = send(
        app(
            TestUnitOfWork::default().comments(comments),
            signed_in_cache(&ada),
        ),
        request(
            Method::POST,
            &format!("/posts/{post_id}/comments"),
            Some(&token_for(&ada)),
            Some(r#"{"comment_text":"  nice  "}"#.to_string()),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["comment_content"], "nice");
}

#[tokio::test]
async fn malformed_body_gets_error_envelope() {
    let ada = user("ada");

    let (status, body) = send(
        app(TestUnitOfWork::default(), signed_in_cache(&ada)),
        request(
            Method::POST,
            "/posts",
            Some(&token_for(&ada)),
            Some("{not json".to_string()),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "BAD_REQUEST");
}

#[tokio::test]
async fn missing_comment_field_gets_error_envelope() {
    let ada = user("ada");

    let (status, body) = send(
        app(TestUnitOfWork::default(), signed_in_cache(&ada)),
        request(
            Method::POST,
            &format!("/posts/{}/comments", Uuid::new_v4()),
            Some(&token_for(&ada)),
            Some("{}".to_string()),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "BAD_REQUEST");
}

#[tokio::test]
async fn non_uuid_post_id_is_not_found() {
    let ada = user("ada");

    let (status, body) = send(
        app(TestUnitOfWork::default(), signed_in_cache(&ada)),
        request(Method::PUT, "/posts/42/like", Some(&token_for(&ada)), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NOT_FOUND");
}

// =============================================================================
// Profile settings
// =============================================================================

#[tokio::test]
async fn profile_update_survives_cache_outage() {
    let ada = user("ada");
    let updated = User {
        first_name: "Ada".to_string(),
        bio: "Analyst".to_string(),
        ..ada.clone()
    };

    let mut users = MockUserRepository::new();
    users
        .expect_update_profile()
        .with(eq(ada.id), mockall::predicate::always())
        .times(1)
        .returning(move |_, _| Ok(updated.clone()));

    let mut cache = signed_in_cache(&ada);
    cache
        .expect_invalidate_profile()
        .times(1)
        .returning(|_| Err(AppError::internal("redis unreachable")));

    let (status, body) = send(
        app(TestUnitOfWork::default().users(users), cache),
        request(
            Method::POST,
            "/profile",
            Some(&token_for(&ada)),
            Some(r#"{"first_name":"Ada","bio":"Analyst"}"#.to_string()),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["first_name"], "Ada");
    assert_eq!(body["bio"], "Analyst");
}

// =============================================================================
// Admin
// =============================================================================

#[tokio::test]
async fn admin_listing_forbidden_for_regular_users() {
    let ada = user("ada");
    let stored = ada.clone();

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(move |_| Ok(Some(stored.clone())));
    users.expect_search().never();

    let (status, body) = send(
        app(TestUnitOfWork::default().users(users), signed_in_cache(&ada)),
        request(Method::GET, "/admin/users", Some(&token_for(&ada)), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "FORBIDDEN");
}
