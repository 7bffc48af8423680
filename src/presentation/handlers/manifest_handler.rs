// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 描述性端点：OpenAPI 文档与插件清单

use axum::{extract::Extension, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::config::settings::Settings;

pub async fn openapi(Extension(settings): Extension<Arc<Settings>>) -> Json<Value> {
    Json(openapi_document(
        &settings.server.public_url_base,
        &settings.dashscope.default_model,
        &settings.dashscope.default_size,
    ))
}

pub async fn plugin_manifest(Extension(settings): Extension<Arc<Settings>>) -> Json<Value> {
    Json(plugin_document(&settings.server.public_url_base))
}

/// 生成两个公开接口的 OpenAPI 3.1 描述
pub fn openapi_document(public_url_base: &str, default_model: &str, default_size: &str) -> Value {
    let base = public_url_base.trim_end_matches('/');
    json!({
        "openapi": "3.1.0",
        "info": {
            "title": "blogforge_image_service",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "文生图任务提交与状态查询"
        },
        "servers": [{ "url": base }],
        "paths": {
            "/generate-image": {
                "post": {
                    "summary": "生成图像",
                    "requestBody": {
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/ImageRequest" }
                            }
                        },
                        "required": true
                    },
                    "responses": {
                        "200": {
                            "description": "任务已提交",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/ImageResponse" }
                                }
                            }
                        },
                        "400": {
                            "description": "请求参数无效",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                }
                            }
                        }
                    }
                }
            },
            "/task/{task_id}": {
                "get": {
                    "summary": "获取任务状态",
                    "parameters": [{
                        "name": "task_id",
                        "in": "path",
                        "required": true,
                        "schema": { "type": "string" }
                    }],
                    "responses": {
                        "200": {
                            "description": "任务状态",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/ImageResponse" }
                                }
                            }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "ImageRequest": {
                    "type": "object",
                    "required": ["prompt"],
                    "properties": {
                        "prompt": { "type": "string", "example": "a cat in a garden" },
                        "negative_prompt": { "type": "string", "default": "" },
                        "model": { "type": "string", "default": default_model },
                        "size": { "type": "string", "default": default_size },
                        "n": { "type": "integer", "default": 1, "minimum": 1, "maximum": 4 }
                    }
                },
                "ImageResponse": {
                    "type": "object",
                    "required": ["task_id", "status"],
                    "properties": {
                        "task_id": { "type": "string" },
                        "status": { "type": "string" },
                        "image_urls": { "type": "array", "items": { "type": "string" } },
                        "error": { "type": ["string", "null"] }
                    }
                },
                "ErrorResponse": {
                    "type": "object",
                    "required": ["error"],
                    "properties": {
                        "error": { "type": "string" }
                    }
                }
            }
        }
    })
}

/// 插件清单，指向 OpenAPI 文档地址
pub fn plugin_document(public_url_base: &str) -> Value {
    let base = public_url_base.trim_end_matches('/');
    json!({
        "schema_version": "v1",
        "name_for_human": "Blogforge Image Generator",
        "name_for_model": "blogforge_image_generator",
        "description_for_human": "根据文本描述生成博客配图",
        "description_for_model": "Generates images from a text prompt. Submit with POST /generate-image, then poll GET /task/{task_id} until the status is terminal.",
        "auth": { "type": "none" },
        "api": {
            "type": "openapi",
            "url": format!("{}/openapi.json", base)
        },
        "logo_url": format!("{}/logo.png", base),
        "legal_info_url": format!("{}/legal", base)
    })
}
