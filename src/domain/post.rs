//! Post entity and the feed view model built from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Author;

/// A post with its creator loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub creater: Author,
    pub content_text: Option<String>,
    pub content_image: Option<String>,
    pub date_created: DateTime<Utc>,
    pub comment_count: i32,
}

impl Post {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.creater.id == user_id
    }
}

/// New post content. At least one of the two fields must be present.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub content_text: Option<String>,
    pub content_image: Option<String>,
}

/// Edit to an existing post.
///
/// The text is always replaced. The image is replaced only when
/// `image` is `Some`; `Some(None)` clears it.
#[derive(Debug, Clone)]
pub struct PostEdit {
    pub content_text: Option<String>,
    pub image: Option<Option<String>>,
}

/// Viewer-specific facts about one post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Engagement {
    pub like_count: u64,
    pub liked: bool,
    pub saved: bool,
}

/// A post as rendered in a feed.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PostView {
    pub id: Uuid,
    pub creater: Author,
    #[schema(example = "Hello, network!")]
    pub content_text: Option<String>,
    pub content_image: Option<String>,
    pub date_created: DateTime<Utc>,
    pub comment_count: i32,
    pub like_count: u64,
    /// Viewer has liked the post
    pub liked: bool,
    /// Viewer has saved the post
    pub saved: bool,
    /// Viewer created the post and may edit or delete it
    pub editable: bool,
}

impl PostView {
    pub fn new(post: Post, viewer: Option<Uuid>, engagement: Engagement) -> Self {
        let editable = viewer.is_some_and(|id| post.is_owned_by(id));
        Self {
            id: post.id,
            creater: post.creater,
            content_text: post.content_text,
            content_image: post.content_image,
            date_created: post.date_created,
            comment_count: post.comment_count,
            like_count: engagement.like_count,
            liked: engagement.liked,
            saved: engagement.saved,
            editable,
        }
    }
}

/// Result of editing a post: the content as stored after the edit.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EditedPost {
    pub success: bool,
    pub text: Option<String>,
    pub picture: Option<String>,
}

impl From<Post> for EditedPost {
    fn from(post: Post) -> Self {
        Self {
            success: true,
            text: post.content_text.filter(|t| !t.is_empty()),
            picture: post.content_image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_by(author_id: Uuid) -> Post {
        Post {
            id: Uuid::new_v4(),
            creater: Author {
                id: author_id,
                username: "ada".to_string(),
                first_name: String::new(),
                last_name: String::new(),
                profile_pic: String::new(),
            },
            content_text: Some("hello".to_string()),
            content_image: None,
            date_created: Utc::now(),
            comment_count: 2,
        }
    }

    #[test]
    fn only_creator_sees_editable() {
        let owner = Uuid::new_v4();
        let post = post_by(owner);

        assert!(PostView::new(post.clone(), Some(owner), Engagement::default()).editable);
        assert!(!PostView::new(post.clone(), Some(Uuid::new_v4()), Engagement::default()).editable);
        assert!(!PostView::new(post, None, Engagement::default()).editable);
    }

    #[test]
    fn view_carries_engagement() {
        let engagement = Engagement {
            like_count: 3,
            liked: true,
            saved: false,
        };
        let view = PostView::new(post_by(Uuid::new_v4()), None, engagement);
        assert_eq!(view.like_count, 3);
        assert!(view.liked);
        assert!(!view.saved);
        assert_eq!(view.comment_count, 2);
    }

    #[test]
    fn edited_post_drops_empty_text() {
        let mut post = post_by(Uuid::new_v4());
        post.content_text = Some(String::new());
        post.content_image = Some("posts/cat.png".to_string());

        let edited = EditedPost::from(post);
        assert!(edited.success);
        assert_eq!(edited.text, None);
        assert_eq!(edited.picture.as_deref(), Some("posts/cat.png"));
    }
}
