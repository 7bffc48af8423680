// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::settings::PersistenceSettings;
use crate::domain::models::blog::{BlogRecord, PersistOutcome};
use crate::domain::repositories::blog_repository::BlogRepository;
use crate::utils::errors::PersistenceError;
use crate::utils::retry_policy::RetryPolicy;

/// 博客记录持久化服务
///
/// 写入失败时按固定间隔重试；重试耗尽后返回 `Degraded`，从不让调用方失败
pub struct BlogPersistence {
    repository: Arc<dyn BlogRepository>,
    retry: RetryPolicy,
}

impl BlogPersistence {
    pub fn new(repository: Arc<dyn BlogRepository>, max_attempts: u32, delay: Duration) -> Self {
        Self {
            repository,
            retry: RetryPolicy::fixed(max_attempts, delay),
        }
    }

    pub fn from_settings(repository: Arc<dyn BlogRepository>, settings: &PersistenceSettings) -> Self {
        Self::new(
            repository,
            settings.max_attempts,
            Duration::from_secs(settings.retry_delay_secs),
        )
    }

    /// 写入一条博客记录
    pub async fn persist(&self, record: &BlogRecord) -> PersistOutcome {
        let repository = &self.repository;
        let result = self
            .retry
            .run(
                |attempt| async move {
                    repository
                        .put(record)
                        .await
                        .map(|_| attempt)
                        .map_err(|e| PersistenceError::Database(e.to_string()))
                },
                |attempt, err| {
                    warn!(
                        uid = %record.uid,
                        "Failed to store blog (attempt {}/{}): {}",
                        attempt,
                        self.retry.max_attempts,
                        err
                    );
                    if let Ok(dump) = serde_json::to_string(record) {
                        warn!(uid = %record.uid, "Unsaved blog record: {}", dump);
                    }
                },
            )
            .await;

        match result {
            Ok(attempts) => {
                info!(uid = %record.uid, title = %record.title, attempts, "Blog stored");
                metrics::counter!("blog_persist_total", "result" => "stored").increment(1);
                PersistOutcome::Stored { attempts }
            }
            Err((err, attempts)) => {
                let exhausted = PersistenceError::Exhausted {
                    attempts,
                    last_error: err.to_string(),
                };
                error!(
                    uid = %record.uid,
                    title = %record.title,
                    card_url = %record.card_url,
                    cover_url = %record.cover_url,
                    org_url = %record.org_url,
                    "Blog record not stored, needs manual recovery: {}",
                    exhausted
                );
                metrics::counter!("blog_persist_total", "result" => "degraded").increment(1);
                PersistOutcome::Degraded {
                    reason: exhausted.to_string(),
                }
            }
        }
    }
}
