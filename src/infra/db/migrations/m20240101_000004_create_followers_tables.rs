//! Migration: create the follower sets.
//!
//! `followers` holds one row per followed user and `follower_members` the
//! users in that row's set.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Followers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Followers::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Followers::UserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_followers_user")
                            .from(Followers::Table, Followers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FollowerMembers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FollowerMembers::FollowerId).uuid().not_null())
                    .col(ColumnDef::new(FollowerMembers::UserId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(FollowerMembers::FollowerId)
                            .col(FollowerMembers::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follower_members_follower")
                            .from(FollowerMembers::Table, FollowerMembers::FollowerId)
                            .to(Followers::Table, Followers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follower_members_user")
                            .from(FollowerMembers::Table, FollowerMembers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // "Who does this user follow" lookups go through user_id
        manager
            .create_index(
                Index::create()
                    .name("idx_follower_members_user")
                    .table(FollowerMembers::Table)
                    .col(FollowerMembers::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FollowerMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Followers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Followers {
    Table,
    Id,
    UserId,
}

#[derive(Iden)]
enum FollowerMembers {
    Table,
    FollowerId,
    UserId,
}
