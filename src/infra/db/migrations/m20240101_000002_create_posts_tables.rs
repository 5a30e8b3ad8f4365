//! Migration: create posts and the like/save join tables.

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
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Posts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Posts::CreaterId).uuid().not_null())
                    .col(ColumnDef::new(Posts::ContentText).text().null())
                    .col(ColumnDef::new(Posts::ContentImage).string().null())
                    .col(
                        ColumnDef::new(Posts::DateCreated)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Posts::CommentCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_creater")
                            .from(Posts::Table, Posts::CreaterId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Feeds are always read newest first, optionally per creator
        manager
            .create_index(
                Index::create()
                    .name("idx_posts_creater_date_created")
                    .table(Posts::Table)
                    .col(Posts::CreaterId)
                    .col(Posts::DateCreated)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_posts_date_created")
                    .table(Posts::Table)
                    .col(Posts::DateCreated)
                    .to_owned(),
            )
            .await?;

        for table in [PostLikers::Table, PostLikers::SaversTable] {
            manager
                .create_table(
                    Table::create()
                        .table(table)
                        .if_not_exists()
                        .col(ColumnDef::new(PostLikers::PostId).uuid().not_null())
                        .col(ColumnDef::new(PostLikers::UserId).uuid().not_null())
                        .primary_key(
                            Index::create()
                                .col(PostLikers::PostId)
                                .col(PostLikers::UserId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .from(table, PostLikers::PostId)
                                .to(Posts::Table, Posts::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .from(table, PostLikers::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [PostLikers::SaversTable, PostLikers::Table] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Posts {
    Table,
    Id,
    CreaterId,
    ContentText,
    ContentImage,
    DateCreated,
    CommentCount,
}

/// Columns shared by `post_likers` and `post_savers`.
#[derive(Iden, Clone, Copy)]
enum PostLikers {
    Table,
    #[iden = "post_savers"]
    SaversTable,
    PostId,
    UserId,
}
