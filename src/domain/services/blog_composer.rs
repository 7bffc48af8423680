// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Local};
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::info;
use uuid::Uuid;

use crate::config::settings::BlogSettings;
use crate::domain::models::blog::{ArticleDraft, BlogImageUrls, BlogRecord};
use crate::domain::services::image_naming::{date_prefix, ImageNaming};
use crate::utils::slug::generate_slug;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 根据文章草稿和图片URL组装博客记录
pub struct BlogComposer {
    settings: BlogSettings,
    naming: ImageNaming,
}

impl BlogComposer {
    pub fn new(settings: BlogSettings, naming: ImageNaming) -> Self {
        Self { settings, naming }
    }

    /// 组装一条新记录
    ///
    /// `image_urls` 中识别不到任何规格时改用降级占位URL
    pub fn compose(&self, draft: &ArticleDraft, image_urls: &[String]) -> BlogRecord {
        self.compose_with(draft, image_urls, Local::now(), &mut rand::rng())
    }

    pub fn compose_with<R: Rng + ?Sized>(
        &self,
        draft: &ArticleDraft,
        image_urls: &[String],
        now: DateTime<Local>,
        rng: &mut R,
    ) -> BlogRecord {
        let uid = Uuid::new_v4().to_string();

        let mut urls = BlogImageUrls::classify(image_urls);
        if urls.is_empty() {
            urls = self.naming.fallback_urls(&uid, &date_prefix(now));
            info!(uid = %uid, "No generated images, using fallback URLs");
        }

        let author = self
            .settings
            .authors
            .choose(rng)
            .cloned()
            .unwrap_or_default();
        let color = self
            .settings
            .colors
            .choose(rng)
            .cloned()
            .unwrap_or_default();
        let avatar = format!(
            "{}/{}.webp",
            self.settings.avatar_base_url.trim_end_matches('/'),
            author
        );
        let timestamp = now.format(TIMESTAMP_FORMAT).to_string();

        BlogRecord {
            uid,
            title: draft.title.clone(),
            content: draft.article.clone(),
            tag: draft.tag.clone(),
            keyword: draft.primary_keyword(),
            keywords: draft.keywords.clone(),
            description: draft.description.clone(),
            slug: generate_slug(&draft.title),
            author,
            avatar,
            color,
            card_url: urls.card,
            cover_url: urls.cover,
            org_url: urls.org,
            created_at: timestamp.clone(),
            updated_at: timestamp,
            published: true,
        }
    }
}
