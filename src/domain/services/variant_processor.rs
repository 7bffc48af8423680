// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 图片规格处理器
//!
//! 把一张源图居中裁剪到目标宽高比，再用 Lanczos3 缩放到目标尺寸并编码为 PNG。
//! 先裁剪后缩放，从不拉伸。

use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use std::sync::Arc;
use tracing::debug;

use crate::domain::models::image_variant::{ImageVariant, VariantSpec, STANDARD_VARIANTS};
use crate::utils::errors::ImageError;

/// 源图中的裁剪区域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// 计算居中裁剪区域
///
/// 源图相对更宽时左右等量裁掉，否则（更高或相等）上下等量裁掉；
/// 任一边为 0 时返回错误
pub fn crop_box(
    src_width: u32,
    src_height: u32,
    target_width: u32,
    target_height: u32,
) -> Result<CropBox, ImageError> {
    if target_width == 0 || target_height == 0 {
        return Err(ImageError::InvalidTarget {
            width: target_width,
            height: target_height,
        });
    }
    if src_width == 0 || src_height == 0 {
        return Err(ImageError::Decode(format!(
            "source image has no pixels ({}x{})",
            src_width, src_height
        )));
    }

    let (sw, sh) = (src_width as u64, src_height as u64);
    let (tw, th) = (target_width as u64, target_height as u64);

    let area = if sw * th > tw * sh {
        let width = ((sh * tw) / th).clamp(1, sw) as u32;
        CropBox {
            x: (src_width - width) / 2,
            y: 0,
            width,
            height: src_height,
        }
    } else {
        let height = ((sw * th) / tw).clamp(1, sh) as u32;
        CropBox {
            x: 0,
            y: (src_height - height) / 2,
            width: src_width,
            height,
        }
    };
    Ok(area)
}

/// 图片规格处理器
pub struct VariantProcessor {
    targets: Vec<VariantSpec>,
}

impl VariantProcessor {
    pub fn new(targets: Vec<VariantSpec>) -> Self {
        Self { targets }
    }

    /// 使用 org / card / cover 三种标准规格
    pub fn standard() -> Self {
        Self::new(STANDARD_VARIANTS.to_vec())
    }

    pub fn targets(&self) -> &[VariantSpec] {
        &self.targets
    }

    /// 从源图字节生成全部规格
    ///
    /// 纯 CPU 计算，不应直接在异步上下文调用，异步场景使用 `produce_variants_async`
    pub fn produce_variants(&self, source: &[u8]) -> Result<Vec<ImageVariant>, ImageError> {
        let decoded =
            image::load_from_memory(source).map_err(|e| ImageError::Decode(e.to_string()))?;
        let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());
        let (src_w, src_h) = rgb.dimensions();
        debug!(
            source_width = src_w,
            source_height = src_h,
            targets = self.targets.len(),
            "Producing image variants"
        );

        let mut variants = Vec::with_capacity(self.targets.len());
        for spec in &self.targets {
            let area = crop_box(src_w, src_h, spec.width, spec.height)?;
            let resized = rgb
                .crop_imm(area.x, area.y, area.width, area.height)
                .resize_exact(spec.width, spec.height, FilterType::Lanczos3);

            variants.push(ImageVariant {
                suffix: spec.suffix,
                width: spec.width,
                height: spec.height,
                data: encode_png(&resized)?,
            });
        }

        Ok(variants)
    }

    /// 在阻塞线程池中生成全部规格
    pub async fn produce_variants_async(
        self: Arc<Self>,
        source: Bytes,
    ) -> Result<Vec<ImageVariant>, ImageError> {
        tokio::task::spawn_blocking(move || self.produce_variants(&source))
            .await
            .map_err(|e| ImageError::Encode(format!("variant task panicked: {e}")))?
    }
}

impl Default for VariantProcessor {
    fn default() -> Self {
        Self::standard()
    }
}

fn encode_png(img: &DynamicImage) -> Result<Bytes, ImageError> {
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| ImageError::Encode(e.to_string()))?;
    Ok(Bytes::from(cursor.into_inner()))
}
