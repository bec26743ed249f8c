// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::gateway::{StatusReport, SubmitResponse, UrlValidation};
use crate::domain::models::scrape_result::ScrapeResult;
use crate::domain::models::search_result::SearchResult;

/// 网关调用错误
///
/// 只在客户端内部使用，公开方法会把它转换成各自的失败形态。
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Gateway returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("Malformed response: {0}")]
    Decode(String),
    #[error("Timeout")]
    Timeout,
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::Timeout
        } else if e.is_decode() {
            GatewayError::Decode(e.to_string())
        } else {
            GatewayError::NetworkError(e.to_string())
        }
    }
}

/// 远程抓取网关
///
/// 所有方法都不会返回错误：传输失败、非成功状态码和无法解析的响应体
/// 都被转换为该操作自身的失败形态（`success: false` 加错误信息，
/// 或空列表）。
#[async_trait]
pub trait TaskGateway: Send + Sync {
    /// 提交抓取任务
    async fn submit(
        &self,
        urls: &[String],
        prompt: &str,
        schema: Option<&serde_json::Value>,
    ) -> SubmitResponse;

    /// 查询任务状态
    async fn status(&self, task_id: &str) -> StatusReport;

    /// 获取任务结果
    async fn results(&self, task_id: &str) -> Vec<ScrapeResult>;

    /// 搜索候选URL
    async fn search(&self, query: &str, max_results: usize) -> Vec<SearchResult>;

    /// 校验URL是否可访问
    async fn validate(&self, url: &str) -> UrlValidation;
}
