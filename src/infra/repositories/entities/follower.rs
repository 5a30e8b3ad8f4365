//! `followers` table: one row per followed user. The users following them
//! hang off it in `follower_members`.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "followers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::follower_member::Entity")]
    Member,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::follower_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// `SELECT followers.user_id ... WHERE follower_members.user_id = $user`:
/// everyone `user_id` follows.
pub fn followed_by(user_id: Uuid) -> sea_orm::sea_query::SelectStatement {
    use sea_orm::sea_query::{Expr, Query};

    Query::select()
        .column((Entity, Column::UserId))
        .from(Entity)
        .inner_join(
            super::follower_member::Entity,
            Expr::col((
                super::follower_member::Entity,
                super::follower_member::Column::FollowerId,
            ))
            .equals((Entity, Column::Id)),
        )
        .and_where(
            Expr::col((
                super::follower_member::Entity,
                super::follower_member::Column::UserId,
            ))
            .eq(user_id),
        )
        .to_owned()
}
