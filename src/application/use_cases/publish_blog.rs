// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::Local;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::models::blog::{ArticleDraft, BlogRecord, ImageTaskDescriptor, PersistOutcome};
use crate::domain::services::blog_composer::BlogComposer;
use crate::domain::services::blog_persistence::BlogPersistence;
use crate::domain::services::content_source::{ImageTaskTracker, WorkflowTrigger};
use crate::infrastructure::blog_archive::BlogArchive;
use crate::utils::errors::PipelineError;

/// 单篇博客的处理结果
#[derive(Debug, Clone)]
pub struct BlogRunReport {
    pub record: BlogRecord,
    pub persist: PersistOutcome,
    /// 文章正文的本地镜像路径
    pub archived: Option<PathBuf>,
}

/// 单篇博客处理流程
///
/// 触发工作流 → 等待图片 → 组装记录 → 写入记录库 → 写本地镜像。
/// 只有工作流本身失败时返回错误，图片和写库失败都会降级处理。
pub struct BlogPipeline {
    workflow: Arc<dyn WorkflowTrigger>,
    images: Arc<dyn ImageTaskTracker>,
    composer: BlogComposer,
    persistence: BlogPersistence,
    archive: Option<BlogArchive>,
}

impl BlogPipeline {
    pub fn new(
        workflow: Arc<dyn WorkflowTrigger>,
        images: Arc<dyn ImageTaskTracker>,
        composer: BlogComposer,
        persistence: BlogPersistence,
        archive: Option<BlogArchive>,
    ) -> Self {
        Self {
            workflow,
            images,
            composer,
            persistence,
            archive,
        }
    }

    pub async fn process_single_blog(&self) -> Result<BlogRunReport, PipelineError> {
        let run = self.workflow.trigger().await?;
        if !run.has_outputs() {
            return Err(PipelineError::EmptyOutputs);
        }
        let outputs = &run.outputs;
        info!(
            workflow_run_id = %run.workflow_run_id,
            "Workflow outputs: {}",
            outputs.to_string().chars().take(200).collect::<String>()
        );

        let image_urls = match ImageTaskDescriptor::from_outputs(outputs) {
            ImageTaskDescriptor::NoTask => {
                warn!("No image task in workflow outputs");
                Vec::new()
            }
            descriptor => {
                if let ImageTaskDescriptor::Descriptor {
                    status: Some(status),
                    ..
                } = &descriptor
                {
                    info!("Image task reported as {}", status);
                }
                match descriptor.task_id() {
                    Some(task_id) => self.images.wait_for_images(task_id).await,
                    None => Vec::new(),
                }
            }
        };

        let draft = ArticleDraft::from_outputs(outputs);
        let record = self.composer.compose(&draft, &image_urls);
        let persist = self.persistence.persist(&record).await;

        let archived = match (&self.archive, draft.article.is_empty()) {
            (Some(archive), false) => match archive.save(&draft.article, Local::now()).await {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!(uid = %record.uid, "Failed to write article mirror: {}", e);
                    None
                }
            },
            _ => None,
        };

        Ok(BlogRunReport {
            record,
            persist,
            archived,
        })
    }
}
