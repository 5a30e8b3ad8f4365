//! Shared fixtures for the service tests.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use social_network::domain::{Author, Comment, Post, User, UserRole};
use social_network::infra::{
    CommentRepository, FollowerRepository, MockCommentRepository, MockFollowerRepository,
    MockPostRepository, MockUserRepository, PostRepository, UnitOfWork, UserRepository,
};

/// Unit of Work over mock repositories. Repositories left at their default
/// have no expectations, so any call to them fails the test.
#[derive(Default)]
pub struct TestUnitOfWork {
    users: MockUserRepository,
    posts: MockPostRepository,
    comments: MockCommentRepository,
    followers: MockFollowerRepository,
}

impl TestUnitOfWork {
    pub fn users(mut self, users: MockUserRepository) -> Self {
        self.users = users;
        self
    }

    pub fn posts(mut self, posts: MockPostRepository) -> Self {
        self.posts = posts;
        self
    }

    pub fn comments(mut self, comments: MockCommentRepository) -> Self {
        self.comments = comments;
        self
    }

    pub fn followers(mut self, followers: MockFollowerRepository) -> Self {
        self.followers = followers;
        self
    }

    pub fn build(self) -> Arc<Repositories> {
        Arc::new(Repositories {
            users: Arc::new(self.users),
            posts: Arc::new(self.posts),
            comments: Arc::new(self.comments),
            followers: Arc::new(self.followers),
        })
    }
}

pub struct Repositories {
    users: Arc<MockUserRepository>,
    posts: Arc<MockPostRepository>,
    comments: Arc<MockCommentRepository>,
    followers: Arc<MockFollowerRepository>,
}

impl UnitOfWork for Repositories {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn posts(&self) -> Arc<dyn PostRepository> {
        self.posts.clone()
    }

    fn comments(&self) -> Arc<dyn CommentRepository> {
        self.comments.clone()
    }

    fn followers(&self) -> Arc<dyn FollowerRepository> {
        self.followers.clone()
    }
}

pub fn user(username: &str) -> User {
    User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: "hashed".to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        bio: String::new(),
        profile_pic: "profile_pic/no_pic.png".to_string(),
        cover: None,
        role: UserRole::User,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn post_by(creater: &User, text: &str) -> Post {
    Post {
        id: Uuid::new_v4(),
        creater: Author::from(creater),
        content_text: Some(text.to_string()),
        content_image: None,
        date_created: Utc::now(),
        comment_count: 0,
    }
}

pub fn comment_on(post: &Post, commenter: &User, text: &str) -> Comment {
    Comment {
        id: Uuid::new_v4(),
        post_id: post.id,
        commenter: Author::from(commenter),
        comment_content: text.to_string(),
        comment_time: Utc::now(),
    }
}
