//! Comment entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Author;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub commenter: Author,
    #[schema(example = "Nice shot!")]
    pub comment_content: String,
    pub comment_time: DateTime<Utc>,
}
