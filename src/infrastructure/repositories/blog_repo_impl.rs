// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::config::settings::DatabaseSettings;
use crate::domain::models::blog::BlogRecord;
use crate::domain::repositories::blog_repository::BlogRepository;
use crate::infrastructure::database::connection;
use crate::infrastructure::database::entities::blog as blog_entity;
use crate::infrastructure::repositories::unavailable_repo::UnavailableBlogRepository;
use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use std::sync::Arc;
use tracing::error;

/// 博客记录仓库实现
pub struct BlogRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl BlogRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

/// 打开博客记录仓库
///
/// 连接或迁移失败时记录错误并返回 [`UnavailableBlogRepository`]，
/// 批量任务照常运行，每条记录走降级路径并输出恢复日志
pub async fn open_blog_repository(settings: &DatabaseSettings) -> Arc<dyn BlogRepository> {
    match connection::connect_and_migrate(settings).await {
        Ok(db) => Arc::new(BlogRepositoryImpl::new(Arc::new(db))),
        Err(e) => {
            error!(
                "Blog store unreachable, records will only be logged for manual recovery: {}",
                e
            );
            Arc::new(UnavailableBlogRepository::new(e.to_string()))
        }
    }
}

impl From<blog_entity::Model> for BlogRecord {
    fn from(m: blog_entity::Model) -> Self {
        BlogRecord {
            uid: m.uid,
            title: m.title,
            content: m.content,
            tag: m.tag,
            keyword: m.keyword,
            keywords: m.keywords,
            description: m.description,
            slug: m.slug,
            author: m.author,
            avatar: m.avatar,
            color: m.color,
            card_url: m.card_url,
            cover_url: m.cover_url,
            org_url: m.org_url,
            created_at: m.created_at,
            updated_at: m.updated_at,
            published: m.published,
        }
    }
}

#[async_trait]
impl BlogRepository for BlogRepositoryImpl {
    async fn put(&self, record: &BlogRecord) -> anyhow::Result<()> {
        let record = record.clone();
        let active_model = blog_entity::ActiveModel {
            uid: Set(record.uid),
            title: Set(record.title),
            content: Set(record.content),
            tag: Set(record.tag),
            keyword: Set(record.keyword),
            keywords: Set(record.keywords),
            description: Set(record.description),
            slug: Set(record.slug),
            author: Set(record.author),
            avatar: Set(record.avatar),
            color: Set(record.color),
            card_url: Set(record.card_url),
            cover_url: Set(record.cover_url),
            org_url: Set(record.org_url),
            created_at: Set(record.created_at),
            updated_at: Set(record.updated_at),
            published: Set(record.published),
        };

        blog_entity::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(blog_entity::Column::Uid)
                    .update_columns([
                        blog_entity::Column::Title,
                        blog_entity::Column::Content,
                        blog_entity::Column::Tag,
                        blog_entity::Column::Keyword,
                        blog_entity::Column::Keywords,
                        blog_entity::Column::Description,
                        blog_entity::Column::Slug,
                        blog_entity::Column::Author,
                        blog_entity::Column::Avatar,
                        blog_entity::Column::Color,
                        blog_entity::Column::CardUrl,
                        blog_entity::Column::CoverUrl,
                        blog_entity::Column::OrgUrl,
                        blog_entity::Column::UpdatedAt,
                        blog_entity::Column::Published,
                    ])
                    .to_owned(),
            )
            .exec(self.db.as_ref())
            .await?;

        Ok(())
    }

    async fn find_by_uid(&self, uid: &str) -> anyhow::Result<Option<BlogRecord>> {
        let model = blog_entity::Entity::find_by_id(uid.to_string())
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(BlogRecord::from))
    }
}
