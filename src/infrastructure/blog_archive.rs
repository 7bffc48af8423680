// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// 文章正文的本地镜像
///
/// 文件路径为 `{root}/{YYYY-MM-DD}/blog_{YYYYmmdd_HHMMSS}.md`
pub struct BlogArchive {
    root: PathBuf,
}

impl BlogArchive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, now: DateTime<Local>) -> PathBuf {
        self.root
            .join(now.format("%Y-%m-%d").to_string())
            .join(format!("blog_{}.md", now.format("%Y%m%d_%H%M%S")))
    }

    /// 写入文章正文，返回文件路径
    pub async fn save(&self, content: &str, now: DateTime<Local>) -> std::io::Result<PathBuf> {
        let path = self.path_for(now);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, content).await?;
        info!("Blog saved: {}", path.display());
        Ok(path)
    }
}
