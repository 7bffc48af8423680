// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config::settings::DashScopeSettings;
use crate::domain::models::task::ImageGenerationParams;

/// 图像生成请求
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ImageRequestDto {
    #[validate(length(min = 1, message = "prompt cannot be empty"))]
    pub prompt: String,
    #[serde(default)]
    pub negative_prompt: Option<String>,
    /// 缺省时使用配置中的默认模型
    #[serde(default)]
    pub model: Option<String>,
    /// 形如 `1024*1024`
    #[serde(default)]
    pub size: Option<String>,
    #[validate(range(min = 1, max = 4, message = "n must be between 1 and 4"))]
    #[serde(default = "default_n")]
    pub n: u32,
}

fn default_n() -> u32 {
    1
}

impl ImageRequestDto {
    /// 补全默认值，转换为上游任务参数
    pub fn into_params(self, defaults: &DashScopeSettings) -> ImageGenerationParams {
        ImageGenerationParams {
            model: self
                .model
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| defaults.default_model.clone()),
            prompt: self.prompt,
            negative_prompt: self.negative_prompt.unwrap_or_default(),
            n: self.n,
            size: self
                .size
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| defaults.default_size.clone()),
        }
    }
}
