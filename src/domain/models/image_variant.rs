// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 图片规格后缀
///
/// 每张源图固定生成三种规格，文件名形如 `{id}-{suffix}.png`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantSuffix {
    /// 原图比例大图
    Org,
    /// 列表卡片
    Card,
    /// 顶部横幅
    Cover,
}

impl VariantSuffix {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariantSuffix::Org => "org",
            VariantSuffix::Card => "card",
            VariantSuffix::Cover => "cover",
        }
    }

    /// URL 中用于识别规格的标记，例如 `-card`
    pub fn marker(&self) -> String {
        format!("-{}", self.as_str())
    }
}

impl fmt::Display for VariantSuffix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 目标规格：后缀与像素尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantSpec {
    pub suffix: VariantSuffix,
    pub width: u32,
    pub height: u32,
}

impl VariantSpec {
    pub const fn new(suffix: VariantSuffix, width: u32, height: u32) -> Self {
        Self {
            suffix,
            width,
            height,
        }
    }
}

/// 标准规格：org 1600×896，card 776×435，cover 1600×300
pub const STANDARD_VARIANTS: [VariantSpec; 3] = [
    VariantSpec::new(VariantSuffix::Org, 1600, 896),
    VariantSpec::new(VariantSuffix::Card, 776, 435),
    VariantSpec::new(VariantSuffix::Cover, 1600, 300),
];

/// 生成的单个规格图片（PNG 编码）
#[derive(Debug, Clone)]
pub struct ImageVariant {
    pub suffix: VariantSuffix,
    pub width: u32,
    pub height: u32,
    pub data: Bytes,
}
