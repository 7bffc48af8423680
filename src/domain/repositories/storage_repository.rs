// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use thiserror::Error;

/// 存储错误类型
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// 存储错误
    #[error("Storage error: {0}")]
    Other(String),
}

/// 写入对象时附带的属性
#[derive(Debug, Clone, Default)]
pub struct ObjectOptions {
    pub content_type: String,
    pub cache_control: Option<String>,
    /// 用户自定义元数据
    pub metadata: Vec<(String, String)>,
    /// 是否公开可读
    pub public_read: bool,
}

impl ObjectOptions {
    /// 公开可读的 PNG 图片
    pub fn public_png(cache_control: &str, generated_by: &str) -> Self {
        Self {
            content_type: "image/png".to_string(),
            cache_control: Some(cache_control.to_string()),
            metadata: vec![("generated-by".to_string(), generated_by.to_string())],
            public_read: true,
        }
    }
}

/// 存储仓库特质
///
/// 定义对象存储访问接口
#[async_trait]
pub trait StorageRepository: Send + Sync {
    /// 使用指定键保存数据到存储中
    async fn save(&self, key: &str, data: &[u8], options: &ObjectOptions)
        -> Result<(), StorageError>;

    /// 根据键从存储中检索数据
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// 检查存储中是否存在指定键
    async fn exists(&self, key: &str) -> Result<bool, StorageError>;

    /// 列出指定前缀下最多 `limit` 个键
    async fn list(&self, prefix: &str, limit: usize) -> Result<Vec<String>, StorageError>;

    /// 存储后端名称，用于诊断输出
    fn backend(&self) -> &'static str;
}
