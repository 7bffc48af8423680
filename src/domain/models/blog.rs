// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::domain::models::image_variant::VariantSuffix;

/// 博客记录
///
/// 以 `uid` 为键写入记录库；即使图片生成或写库失败也总会构造出一条记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogRecord {
    pub uid: String,
    pub title: String,
    pub content: String,
    pub tag: String,
    /// `keywords` 中的第一个关键词
    pub keyword: String,
    /// 逗号分隔的关键词列表
    pub keywords: String,
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

/// 工作流生成的文章草稿
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ArticleDraft {
    pub title: String,
    /// 正文，上游字段名为 `article`
    pub article: String,
    pub tag: String,
    pub keywords: String,
    pub description: String,
}

impl ArticleDraft {
    /// 从工作流输出的 `text` 字段解析草稿
    ///
    /// `text` 是 JSON 编码的字符串；缺失或无法解析时返回空草稿
    pub fn from_outputs(outputs: &Value) -> Self {
        let Some(text) = outputs.get("text").and_then(Value::as_str) else {
            warn!("Workflow outputs contain no text field");
            return Self::default();
        };

        match serde_json::from_str::<ArticleDraft>(text) {
            Ok(draft) => draft,
            Err(e) => {
                warn!("Failed to parse blog content: {}", e);
                Self::default()
            }
        }
    }

    /// 主关键词
    pub fn primary_keyword(&self) -> String {
        self.keywords
            .split(',')
            .next()
            .map(|k| k.trim().to_string())
            .unwrap_or_default()
    }
}

/// 博客的三种图片URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogImageUrls {
    pub card: String,
    pub cover: String,
    pub org: String,
}

impl BlogImageUrls {
    /// 按 `-card` / `-cover` / `-org` 标记归类图片URL
    pub fn classify(urls: &[String]) -> Self {
        let mut result = Self::default();
        for url in urls {
            if url.contains(&VariantSuffix::Card.marker()) {
                result.card = url.clone();
            } else if url.contains(&VariantSuffix::Cover.marker()) {
                result.cover = url.clone();
            } else if url.contains(&VariantSuffix::Org.marker()) {
                result.org = url.clone();
            }
        }
        result
    }

    pub fn is_empty(&self) -> bool {
        self.card.is_empty() && self.cover.is_empty() && self.org.is_empty()
    }

    pub fn get(&self, suffix: VariantSuffix) -> &str {
        match suffix {
            VariantSuffix::Org => &self.org,
            VariantSuffix::Card => &self.card,
            VariantSuffix::Cover => &self.cover,
        }
    }
}

/// 工作流输出中的图片任务描述
///
/// 上游可能给出裸字符串、JSON 编码的对象，或者干脆没有
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageTaskDescriptor {
    NoTask,
    RawId(String),
    Descriptor {
        task_id: String,
        status: Option<String>,
    },
}

impl ImageTaskDescriptor {
    /// 从工作流输出的 `image` 字段解码
    pub fn from_outputs(outputs: &Value) -> Self {
        match outputs.get("image") {
            None | Some(Value::Null) => Self::NoTask,
            Some(Value::String(raw)) => Self::from_raw(raw),
            Some(obj @ Value::Object(_)) => Self::from_object(obj).unwrap_or_else(|| {
                warn!("Image task object has no task_id");
                Self::NoTask
            }),
            Some(other) => {
                warn!("Unexpected image task data type: {}", other);
                Self::NoTask
            }
        }
    }

    fn from_raw(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Self::NoTask;
        }

        match serde_json::from_str::<Value>(raw) {
            Ok(value @ Value::Object(_)) => {
                Self::from_object(&value).unwrap_or_else(|| Self::RawId(raw.to_string()))
            }
            _ => Self::RawId(raw.to_string()),
        }
    }

    fn from_object(value: &Value) -> Option<Self> {
        let task_id = value.get("task_id")?.as_str()?.trim();
        if task_id.is_empty() {
            return None;
        }
        Some(Self::Descriptor {
            task_id: task_id.to_string(),
            status: value
                .get("status")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }

    pub fn task_id(&self) -> Option<&str> {
        match self {
            Self::NoTask => None,
            Self::RawId(id) => Some(id),
            Self::Descriptor { task_id, .. } => Some(task_id),
        }
    }
}

/// 持久化结果
///
/// 调用方总能继续执行；`Degraded` 表示记录未能写入，但已记录日志供人工补录
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    Stored { attempts: u32 },
    Degraded { reason: String },
}

impl PersistOutcome {
    pub fn is_clean(&self) -> bool {
        matches!(self, PersistOutcome::Stored { .. })
    }
}
