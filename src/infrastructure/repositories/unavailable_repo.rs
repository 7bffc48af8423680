// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::blog::BlogRecord;
use crate::domain::repositories::blog_repository::BlogRepository;
use async_trait::async_trait;

/// 记录库在启动时无法连接时使用的仓库
///
/// 每次调用都返回连接错误，写入因此走持久化的降级路径
pub struct UnavailableBlogRepository {
    reason: String,
}

impl UnavailableBlogRepository {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl BlogRepository for UnavailableBlogRepository {
    async fn put(&self, _record: &BlogRecord) -> anyhow::Result<()> {
        anyhow::bail!("blog store unavailable: {}", self.reason)
    }

    async fn find_by_uid(&self, _uid: &str) -> anyhow::Result<Option<BlogRecord>> {
        anyhow::bail!("blog store unavailable: {}", self.reason)
    }
}
