// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use futures::future::join_all;
use futures::FutureExt;
use serde_json::json;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::domain::models::scrape_result::ScrapeResult;
use crate::domain::services::relevance_filter;
use crate::engines::content_extractor;
use crate::engines::reqwest_engine::{ReqwestEngine, DEFAULT_USER_AGENT};
use crate::engines::traits::{EngineError, ScrapeRequest, ScraperEngine};
use crate::engines::validators;

/// 直接抓取配置
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// 单个页面请求的总超时
    pub timeout: Duration,
    /// 标题与正文的最大字符数
    pub max_content_chars: usize,
    /// 浏览器标识
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_content_chars: 5000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// 并发直接抓取器
///
/// 不经过远程网关，直接并发请求多个页面并启发式提取主内容。
/// 单个URL的失败只体现在该URL的结果中，批量调用本身从不失败。
pub struct ConcurrentFetcher {
    engine: Arc<dyn ScraperEngine>,
    config: FetcherConfig,
}

impl ConcurrentFetcher {
    /// 使用默认的 reqwest 引擎创建抓取器
    pub fn new(config: FetcherConfig) -> Result<Self, EngineError> {
        let engine = ReqwestEngine::new(&config.user_agent)?;
        Ok(Self::with_engine(Arc::new(engine), config))
    }

    pub fn with_engine(engine: Arc<dyn ScraperEngine>, config: FetcherConfig) -> Self {
        Self { engine, config }
    }

    /// 抓取单个URL
    ///
    /// 非2xx状态码或任何传输错误都返回 `success: false` 的结果。
    pub async fn fetch_one(&self, url: &str) -> ScrapeResult {
        if let Err(e) = validators::validate_url(url) {
            warn!(url, error = %e, "Rejected URL");
            return ScrapeResult::failed(url, e.to_string());
        }

        let request = ScrapeRequest::new(url, self.config.timeout);
        let response = match self.engine.scrape(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(url, engine = self.engine.name(), error = %e, "Page fetch failed");
                return ScrapeResult::failed(url, e.to_string());
            }
        };

        if !response.is_success() {
            warn!(url, status = response.status_code, "Page returned non-success status");
            return ScrapeResult::failed(url, format!("HTTP {}", response.status_code));
        }

        let page = content_extractor::extract(&response.content, self.config.max_content_chars);
        debug!(
            url,
            status = response.status_code,
            chars = page.content.chars().count(),
            elapsed_ms = response.response_time_ms,
            "Page fetched"
        );

        ScrapeResult::ok(
            url,
            json!({
                "title": page.title,
                "content": page.content,
                "status_code": response.status_code,
            }),
        )
    }

    /// 并发抓取多个URL
    ///
    /// 返回结果与输入一一对应、顺序一致。单个抓取中的 panic
    /// 会被捕获并转换为该URL的失败结果。
    pub async fn fetch_many(&self, urls: &[String]) -> Vec<ScrapeResult> {
        let fetches = urls
            .iter()
            .map(|url| AssertUnwindSafe(self.fetch_one(url)).catch_unwind());

        let results: Vec<ScrapeResult> = join_all(fetches)
            .await
            .into_iter()
            .zip(urls)
            .map(|(outcome, url)| {
                outcome.unwrap_or_else(|panic| {
                    let message = panic_message(panic.as_ref());
                    warn!(url = %url, error = %message, "Page fetch aborted");
                    ScrapeResult::failed(url.as_str(), format!("fetch aborted: {}", message))
                })
            })
            .collect();

        let succeeded = results.iter().filter(|r| r.success).count();
        info!(
            total = results.len(),
            succeeded,
            failed = results.len() - succeeded,
            "Direct fetch batch finished"
        );
        results
    }

    /// 并发抓取并按提示词做词法相关性过滤
    ///
    /// 未提供提示词或提示词为空白时等同于 `fetch_many`，失败结果也会保留。
    /// 过滤只是关键词包含判断，不是语义匹配。
    pub async fn fetch_relevant(&self, urls: &[String], prompt: Option<&str>) -> Vec<ScrapeResult> {
        let results = self.fetch_many(urls).await;
        match prompt.filter(|p| !p.trim().is_empty()) {
            Some(prompt) => {
                let before = results.len();
                let kept = relevance_filter::filter_by_prompt(results, prompt);
                debug!(before, kept = kept.len(), "Applied keyword relevance filter");
                kept
            }
            None => results,
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
#[path = "concurrent_fetcher_test.rs"]
mod tests;
