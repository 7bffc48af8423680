// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;
use tracing::info;

use blogforge::application::use_cases::publish_blog::BlogPipeline;
use blogforge::config::settings::Settings;
use blogforge::domain::services::blog_composer::BlogComposer;
use blogforge::domain::services::blog_persistence::BlogPersistence;
use blogforge::domain::services::image_naming::ImageNaming;
use blogforge::infrastructure::blog_archive::BlogArchive;
use blogforge::infrastructure::clients::image_service_client::ImageServiceClient;
use blogforge::infrastructure::clients::workflow_client::WorkflowClient;
use blogforge::infrastructure::repositories::blog_repo_impl::open_blog_repository;
use blogforge::utils::telemetry;
use blogforge::workers::BatchRunner;

/// 批量博客生成入口
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_telemetry();
    info!("Starting blog scheduler...");

    let settings = Settings::new()?;
    blogforge::infrastructure::metrics::init_metrics(&settings.metrics);

    let repository = open_blog_repository(&settings.database).await;
    let persistence = BlogPersistence::from_settings(repository, &settings.persistence);
    let workflow = Arc::new(WorkflowClient::new(&settings.workflow)?);
    let images = Arc::new(ImageServiceClient::from_settings(&settings.scheduler)?);
    let naming = ImageNaming::from_settings(&settings.storage, &settings.server.public_url_base);
    let composer = BlogComposer::new(settings.blog.clone(), naming);
    let archive = BlogArchive::new(&settings.scheduler.blog_storage_path);

    let pipeline = Arc::new(BlogPipeline::new(
        workflow,
        images,
        composer,
        persistence,
        Some(archive),
    ));
    let runner = BatchRunner::from_settings(pipeline, &settings.scheduler);

    let summary = runner.run().await;
    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        total = summary.total,
        "Scheduler finished in {:.2}s",
        summary.elapsed.as_secs_f64()
    );

    Ok(())
}
