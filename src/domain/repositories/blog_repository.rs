// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::blog::BlogRecord;
use async_trait::async_trait;

/// 博客记录仓库特质
#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// 按 `uid` 插入或覆盖一条记录
    async fn put(&self, record: &BlogRecord) -> anyhow::Result<()>;

    /// 根据 `uid` 查找记录
    async fn find_by_uid(&self, uid: &str) -> anyhow::Result<Option<BlogRecord>>;
}
