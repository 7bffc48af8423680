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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 应用程序配置设置
///
/// 图像服务与博客调度器共用同一份配置，各自只读取需要的部分
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 图像生成服务（DashScope）配置
    pub dashscope: DashScopeSettings,
    /// 任务轮询配置
    pub polling: PollingSettings,
    /// 存储配置
    pub storage: StorageSettings,
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 工作流配置
    pub workflow: WorkflowSettings,
    /// 调度器配置
    pub scheduler: SchedulerSettings,
    /// 博客元数据配置
    pub blog: BlogSettings,
    /// 持久化重试配置
    pub persistence: PersistenceSettings,
    /// 指标导出配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
    /// 对外公开的服务地址，用于生成本地图片URL和插件清单
    pub public_url_base: String,
    /// 关闭时等待后台任务的宽限时间（秒）
    pub shutdown_grace_secs: u64,
}

/// DashScope 图像生成接口配置
#[derive(Debug, Clone, Deserialize)]
pub struct DashScopeSettings {
    pub api_key: String,
    /// API 基础地址
    pub base_url: String,
    pub default_model: String,
    pub default_size: String,
    /// 创建任务请求超时（秒）
    pub create_timeout_secs: u64,
    /// 查询任务请求超时（秒）
    pub query_timeout_secs: u64,
    /// 每个主机保留的最大空闲连接数
    pub max_idle_connections: usize,
}

/// 任务轮询配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct PollingSettings {
    /// 单个任务的最长等待时间（秒）
    pub max_wait_secs: u64,
    /// 两次状态查询之间的间隔（秒）
    pub check_interval_secs: u64,
    /// 每张结果图片的最大下载次数
    pub download_attempts: u32,
    /// 下载重试之间的等待时间（毫秒）
    pub download_backoff_ms: u64,
    /// 单次下载超时（秒）
    pub download_timeout_secs: u64,
    /// 下载建立连接的超时（秒）
    pub download_connect_timeout_secs: u64,
    /// 下载客户端每个主机保留的空闲连接数，与 DashScope 客户端的连接池互相独立
    pub download_max_idle_connections: usize,
}

impl PollingSettings {
    pub fn max_wait(&self) -> Duration {
        Duration::from_secs(self.max_wait_secs)
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    pub fn download_backoff(&self) -> Duration {
        Duration::from_millis(self.download_backoff_ms)
    }
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            max_wait_secs: 300,
            check_interval_secs: 3,
            download_attempts: 3,
            download_backoff_ms: 1000,
            download_timeout_secs: 15,
            download_connect_timeout_secs: 5,
            download_max_idle_connections: 4,
        }
    }
}

/// 存储配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// 存储类型 (local, s3)
    pub storage_type: String,
    /// 本地存储路径 (当 type=local 时使用)
    pub local_path: Option<String>,
    /// S3 存储桶名称
    pub s3_bucket: String,
    /// 对象键前缀，以 `/` 结尾
    pub s3_prefix: String,
    /// S3 区域
    pub s3_region: String,
    /// S3 访问密钥
    pub s3_access_key: Option<String>,
    /// S3 密钥
    pub s3_secret_key: Option<String>,
    /// S3 端点 (可选，用于 MinIO 等兼容服务)
    pub s3_endpoint: Option<String>,
    /// 上传对象的 Cache-Control
    pub cache_control: String,
    /// 写入对象元数据 `generated-by` 的值
    pub generated_by: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            storage_type: "s3".to_string(),
            local_path: Some("./images".to_string()),
            s3_bucket: "sparkle-web-static".to_string(),
            s3_prefix: "starrybook/image/blogs/".to_string(),
            s3_region: "ap-southeast-1".to_string(),
            s3_access_key: None,
            s3_secret_key: None,
            s3_endpoint: None,
            cache_control: "max-age=31536000".to_string(),
            generated_by: "sugar-pill-image-service".to_string(),
        }
    }
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 工作流触发配置
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowSettings {
    pub api_url: String,
    pub api_key: String,
    /// 工作流请求中的 user 字段
    pub user: String,
    pub timeout_secs: u64,
    pub max_idle_connections: usize,
}

/// 批量调度器配置
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerSettings {
    /// 一次运行生成的博客数量
    pub total_count: u32,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    /// 图像服务地址
    pub image_service_url: String,
    pub image_poll_attempts: u32,
    pub image_poll_interval_secs: u64,
    /// 本地文章镜像目录
    pub blog_storage_path: String,
}

/// 博客元数据配置
#[derive(Debug, Clone, Deserialize)]
pub struct BlogSettings {
    pub authors: Vec<String>,
    pub colors: Vec<String>,
    /// 作者头像地址前缀
    pub avatar_base_url: String,
}

impl Default for BlogSettings {
    fn default() -> Self {
        Self {
            authors: [
                "Whit", "LunaGaze", "Daisy", "Lily", "Emma", "Joy", "Mia", "AvaStar", "Maya",
                "Emily",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            colors: [
                "#A8A0F9", "#D7A0F9", "#FFE2EB", "#FFE4C1", "#DAFFF6", "#FFFD92",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            avatar_base_url:
                "https://sparkle-web-static.s3.ap-southeast-1.amazonaws.com/starrybook/image/blog-authors"
                    .to_string(),
        }
    }
}

/// 持久化重试配置
#[derive(Debug, Clone, Deserialize)]
pub struct PersistenceSettings {
    pub max_attempts: u32,
    pub retry_delay_secs: u64,
}

impl Default for PersistenceSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay_secs: 2,
        }
    }
}

/// 指标导出配置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    pub enabled: bool,
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次叠加内置默认值、`config/default`、`config/{APP_ENVIRONMENT}`
    /// 以及 `BLOGFORGE__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let blog = BlogSettings::default();
        let builder = Config::builder()
            // Server
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("server.public_url_base", "http://localhost:8000")?
            .set_default("server.shutdown_grace_secs", 30)?
            // DashScope
            .set_default("dashscope.api_key", "")?
            .set_default("dashscope.base_url", "https://dashscope.aliyuncs.com/api/v1")?
            .set_default("dashscope.default_model", "wanx2.1-t2i-turbo")?
            .set_default("dashscope.default_size", "1024*1024")?
            .set_default("dashscope.create_timeout_secs", 30)?
            .set_default("dashscope.query_timeout_secs", 10)?
            .set_default("dashscope.max_idle_connections", 8)?
            // Polling
            .set_default("polling.max_wait_secs", 300)?
            .set_default("polling.check_interval_secs", 3)?
            .set_default("polling.download_attempts", 3)?
            .set_default("polling.download_backoff_ms", 1000)?
            .set_default("polling.download_timeout_secs", 15)?
            .set_default("polling.download_connect_timeout_secs", 5)?
            .set_default("polling.download_max_idle_connections", 4)?
            // Storage
            .set_default("storage.storage_type", "s3")?
            .set_default("storage.local_path", "./images")?
            .set_default("storage.s3_bucket", "sparkle-web-static")?
            .set_default("storage.s3_prefix", "starrybook/image/blogs/")?
            .set_default("storage.s3_region", "ap-southeast-1")?
            .set_default("storage.cache_control", "max-age=31536000")?
            .set_default("storage.generated_by", "sugar-pill-image-service")?
            // Database
            .set_default("database.url", "sqlite://blogs.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Workflow
            .set_default("workflow.api_url", "")?
            .set_default("workflow.api_key", "")?
            .set_default("workflow.user", "auto-scheduler")?
            .set_default("workflow.timeout_secs", 120)?
            .set_default("workflow.max_idle_connections", 1)?
            // Scheduler
            .set_default("scheduler.total_count", 100)?
            .set_default("scheduler.min_delay_ms", 1000)?
            .set_default("scheduler.max_delay_ms", 3000)?
            .set_default("scheduler.image_service_url", "http://localhost:8000")?
            .set_default("scheduler.image_poll_attempts", 30)?
            .set_default("scheduler.image_poll_interval_secs", 5)?
            .set_default("scheduler.blog_storage_path", "./blogs")?
            // Blog
            .set_default("blog.authors", blog.authors)?
            .set_default("blog.colors", blog.colors)?
            .set_default("blog.avatar_base_url", blog.avatar_base_url)?
            // Persistence
            .set_default("persistence.max_attempts", 3)?
            .set_default("persistence.retry_delay_secs", 2)?
            // Metrics
            .set_default("metrics.enabled", true)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("BLOGFORGE")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("blog.authors")
                    .with_list_parse_key("blog.colors")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// 服务监听地址
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
