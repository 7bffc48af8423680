// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blogs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub uid: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub tag: String,
    pub keyword: String,
    pub keywords: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub slug: String,
    pub author: String,
    pub avatar: String,
    pub color: String,
    pub card_url: String,
    pub cover_url: String,
    pub org_url: String,
    pub created_at: String,
    pub updated_at: String,
    pub published: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
