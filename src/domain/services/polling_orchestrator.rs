// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::domain::gateway::client::TaskGateway;
use crate::domain::models::outcome::{ScrapeOutcome, TIMEOUT_MESSAGE};
use crate::domain::models::task::TaskStatus;
use crate::domain::repositories::task_repository::TaskRepository;
use crate::domain::services::task_registry::ActiveTaskRegistry;

/// 轮询配置
#[derive(Debug, Clone, PartialEq)]
pub struct PollingConfig {
    /// 两次状态查询之间的间隔
    pub interval: Duration,
    /// 最多查询次数
    pub max_attempts: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_attempts: 20,
        }
    }
}

/// 轮询编排器
///
/// 把网关的 提交/状态/结果 三个调用组合成一次等待：
///
/// * 提交失败 → `Failed`，不会进入轮询
/// * 状态为 `completed` → 获取一次结果 → `Succeeded`
/// * 网关返回 `failed` 或 `error` → `Failed`
/// * 状态查询往返超时，或查询次数耗尽 → `TimedOut`
///
/// 同一任务的状态查询严格串行。配置了任务存储时，会把生命周期写入存储；
/// 存储不可用不影响返回给调用方的结果。
pub struct PollingOrchestrator {
    gateway: Arc<dyn TaskGateway>,
    config: PollingConfig,
    store: Option<Arc<dyn TaskRepository>>,
    registry: Option<Arc<ActiveTaskRegistry>>,
}

impl PollingOrchestrator {
    pub fn new(gateway: Arc<dyn TaskGateway>, config: PollingConfig) -> Self {
        Self {
            gateway,
            config,
            store: None,
            registry: None,
        }
    }

    pub fn with_store(mut self, store: Arc<dyn TaskRepository>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_registry(mut self, registry: Arc<ActiveTaskRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// 提交抓取任务并等待其结束
    ///
    /// # 参数
    ///
    /// * `urls` - 待抓取的URL
    /// * `prompt` - 抽取提示词
    /// * `schema` - 可选的输出结构
    ///
    /// # 返回值
    ///
    /// 三种终止状态之一，从不返回错误
    pub async fn scrape(
        &self,
        urls: &[String],
        prompt: &str,
        schema: Option<&serde_json::Value>,
    ) -> ScrapeOutcome {
        let submission = self.gateway.submit(urls, prompt, schema).await;
        if !submission.success {
            let error = submission
                .error
                .unwrap_or_else(|| "Task submission failed".to_string());
            warn!(error = %error, "Gateway rejected submission");
            return ScrapeOutcome::failed(None, error);
        }

        let Some(task_id) = submission.task_id.filter(|id| !id.is_empty()) else {
            warn!("Gateway accepted submission without a task_id");
            return ScrapeOutcome::failed(None, "Gateway returned no task_id");
        };
        info!(task_id = %task_id, urls = urls.len(), "Task submitted");

        if let Some(store) = &self.store {
            if !store.create(&task_id, urls, prompt, schema).await {
                debug!(task_id = %task_id, "Task record not persisted");
            }
        }

        let _guard = self
            .registry
            .as_ref()
            .map(|registry| registry.register(&task_id, urls));

        let outcome = self.poll(&task_id).await;
        self.record_outcome(&task_id, &outcome).await;
        outcome
    }

    /// 先搜索再抓取
    ///
    /// 搜索没有命中时直接返回 `Failed("no URLs found")`，不会提交任务。
    /// 未提供提示词时根据查询生成默认提示词。
    pub async fn search_and_scrape(
        &self,
        query: &str,
        max_results: usize,
        prompt: Option<&str>,
    ) -> ScrapeOutcome {
        let hits = self.gateway.search(query, max_results).await;
        if hits.is_empty() {
            info!(query, "Search returned no URLs");
            return ScrapeOutcome::failed(None, "no URLs found");
        }

        let prompt = match prompt {
            Some(p) if !p.trim().is_empty() => p.to_string(),
            _ => default_prompt(query),
        };
        let urls: Vec<String> = hits.into_iter().map(|hit| hit.url).collect();
        debug!(query, urls = urls.len(), "Scraping search results");

        self.scrape(&urls, &prompt, None).await
    }

    async fn poll(&self, task_id: &str) -> ScrapeOutcome {
        let mut marked_running = false;

        for attempt in 1..=self.config.max_attempts {
            let report = self.gateway.status(task_id).await;

            if report.is_timed_out() {
                warn!(task_id, attempt, "Gateway did not answer status query in time");
                return ScrapeOutcome::TimedOut {
                    task_id: task_id.to_string(),
                };
            }

            if report.is_completed() {
                let results = self.gateway.results(task_id).await;
                info!(task_id, attempt, results = results.len(), "Task completed");
                return ScrapeOutcome::Succeeded {
                    task_id: task_id.to_string(),
                    results,
                };
            }

            if report.is_failed() {
                let error = report
                    .error
                    .unwrap_or_else(|| format!("Task {}", report.status));
                warn!(task_id, attempt, error = %error, "Task failed");
                return ScrapeOutcome::failed(Some(task_id.to_string()), error);
            }

            debug!(task_id, attempt, status = %report.status, "Task still in progress");
            if !marked_running && report.status == "running" {
                marked_running = true;
                if let Some(store) = &self.store {
                    store
                        .update_status(task_id, TaskStatus::Running, None, None)
                        .await;
                }
            }

            if attempt < self.config.max_attempts {
                tokio::time::sleep(self.config.interval).await;
            }
        }

        warn!(
            task_id,
            attempts = self.config.max_attempts,
            "Task did not reach a terminal state"
        );
        ScrapeOutcome::TimedOut {
            task_id: task_id.to_string(),
        }
    }

    async fn record_outcome(&self, task_id: &str, outcome: &ScrapeOutcome) {
        let Some(store) = &self.store else {
            return;
        };

        let written = match outcome {
            ScrapeOutcome::Succeeded { results, .. } => {
                store
                    .update_status(task_id, TaskStatus::Completed, Some(results.clone()), None)
                    .await
            }
            ScrapeOutcome::Failed { error, .. } => {
                store
                    .update_status(task_id, TaskStatus::Failed, None, Some(error.clone()))
                    .await
            }
            ScrapeOutcome::TimedOut { .. } => {
                store
                    .update_status(
                        task_id,
                        TaskStatus::Failed,
                        None,
                        Some(TIMEOUT_MESSAGE.to_string()),
                    )
                    .await
            }
        };

        if !written {
            debug!(task_id, "Final task state not persisted");
        }
    }
}

/// 搜索后抓取时使用的默认提示词
pub fn default_prompt(query: &str) -> String {
    format!(
        "Extract the main content and key information relevant to: {}",
        query
    )
}

#[cfg(test)]
#[path = "polling_orchestrator_test.rs"]
mod tests;
