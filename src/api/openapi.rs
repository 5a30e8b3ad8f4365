//! OpenAPI documentation served through Swagger UI.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    admin_handler, auth_handler, comment_handler, feed_handler, post_handler, profile_handler,
    social_handler,
};
use crate::domain::{
    Author, Comment, EditedPost, FollowerSet, ProfileSettings, PostView, UserResponse, UserRole,
};
use crate::services::{AuthSession, FeedPage, ProfilePage, TokenResponse};
use crate::types::{CommentPage, FollowerSetPage, PaginationMeta, PostPage, UserPage};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Social Network API",
        version = "0.1.0",
        description = "Posts, comments, likes, saves, follows and profiles"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        auth_handler::logout,
        feed_handler::index,
        feed_handler::following,
        feed_handler::saved,
        feed_handler::profile,
        post_handler::create_post,
        post_handler::edit_post,
        post_handler::delete_post,
        post_handler::like_post,
        post_handler::unlike_post,
        post_handler::save_post,
        post_handler::unsave_post,
        comment_handler::list_comments,
        comment_handler::add_comment,
        social_handler::follow,
        social_handler::unfollow,
        profile_handler::get_profile,
        profile_handler::update_profile,
        admin_handler::list_users,
        admin_handler::list_posts,
        admin_handler::list_comments,
        admin_handler::list_followers,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            Author,
            PostView,
            EditedPost,
            Comment,
            FollowerSet,
            ProfileSettings,
            // Pages
            PaginationMeta,
            PostPage,
            UserPage,
            CommentPage,
            FollowerSetPage,
            FeedPage,
            ProfilePage,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            AuthSession,
            TokenResponse,
            // Request bodies
            post_handler::CreatePostRequest,
            post_handler::EditPostRequest,
            comment_handler::CommentRequest,
            profile_handler::UpdateProfileRequest,
            profile_handler::UpdatedProfile,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Sign up, sign in and sign out"),
        (name = "Feeds", description = "Paginated post listings and profile pages"),
        (name = "Posts", description = "Writing posts, likes and bookmarks"),
        (name = "Comments", description = "Comments on posts"),
        (name = "Social", description = "Following other users"),
        (name = "Profile", description = "Your own profile settings"),
        (name = "Admin", description = "Searchable listings for administrators")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Session token from /auth/login; the `session` cookie works too",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/auth/register",
            "/auth/logout",
            "/posts",
            "/posts/{id}",
            "/posts/{id}/like",
            "/posts/{id}/comments",
            "/users/{username}",
            "/users/{username}/follow",
            "/profile",
            "/admin/comments",
            "/admin/followers",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
