//! `comments` table.

use sea_orm::entity::prelude::*;

use crate::domain::Comment;
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub post_id: Uuid,
    pub commenter_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub comment_content: String,
    pub comment_time: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_delete = "Cascade"
    )]
    Post,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CommenterId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Commenter,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commenter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn into_domain(row: (Model, Option<super::user::Model>)) -> AppResult<Comment> {
    let (comment, commenter) = row;
    let commenter = commenter.ok_or_else(|| {
        AppError::internal(format!("Comment {} has no commenter row", comment.id))
    })?;

    Ok(Comment {
        id: comment.id,
        post_id: comment.post_id,
        commenter: commenter.into(),
        comment_content: comment.comment_content,
        comment_time: comment.comment_time,
    })
}
