//! `posts` table.

use sea_orm::entity::prelude::*;

use crate::domain::Post;
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub creater_id: Uuid,
    #[sea_orm(column_type = "Text", nullable)]
    pub content_text: Option<String>,
    pub content_image: Option<String>,
    pub date_created: DateTimeUtc,
    pub comment_count: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreaterId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Creater,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
    #[sea_orm(has_many = "super::post_liker::Entity")]
    Liker,
    #[sea_orm(has_many = "super::post_saver::Entity")]
    Saver,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creater.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Join a post row with its creator row, as returned by `find_also_related`.
pub fn into_domain(row: (Model, Option<super::user::Model>)) -> AppResult<Post> {
    let (post, creater) = row;
    let creater = creater.ok_or_else(|| {
        AppError::internal(format!("Post {} has no creator row", post.id))
    })?;

    Ok(Post {
        id: post.id,
        creater: creater.into(),
        content_text: post.content_text,
        content_image: post.content_image,
        date_created: post.date_created,
        comment_count: post.comment_count,
    })
}
