// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Blogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Blogs::Uid)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Blogs::Title).string().not_null().default(""))
                    .col(ColumnDef::new(Blogs::Content).text().not_null().default(""))
                    .col(ColumnDef::new(Blogs::Tag).string().not_null().default(""))
                    .col(ColumnDef::new(Blogs::Keyword).string().not_null().default(""))
                    .col(ColumnDef::new(Blogs::Keywords).string().not_null().default(""))
                    .col(ColumnDef::new(Blogs::Description).text().not_null().default(""))
                    .col(ColumnDef::new(Blogs::Slug).string().not_null().default(""))
                    .col(ColumnDef::new(Blogs::Author).string().not_null().default(""))
                    .col(ColumnDef::new(Blogs::Avatar).string().not_null().default(""))
                    .col(ColumnDef::new(Blogs::Color).string().not_null().default(""))
                    .col(ColumnDef::new(Blogs::CardUrl).string().not_null().default(""))
                    .col(ColumnDef::new(Blogs::CoverUrl).string().not_null().default(""))
                    .col(ColumnDef::new(Blogs::OrgUrl).string().not_null().default(""))
                    .col(ColumnDef::new(Blogs::CreatedAt).string().not_null())
                    .col(ColumnDef::new(Blogs::UpdatedAt).string().not_null())
                    .col(
                        ColumnDef::new(Blogs::Published)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blogs_slug")
                    .table(Blogs::Table)
                    .col(Blogs::Slug)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Blogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Blogs {
    Table,
    Uid,
    Title,
    Content,
    Tag,
    Keyword,
    Keywords,
    Description,
    Slug,
    Author,
    Avatar,
    Color,
    CardUrl,
    CoverUrl,
    OrgUrl,
    CreatedAt,
    UpdatedAt,
    Published,
}
