// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::domain::models::scrape_result::ScrapeResult;
use crate::domain::models::task::{DomainError, TaskRecord, TaskStatus};
use crate::domain::repositories::task_repository::TaskRepository;
use crate::infrastructure::cache::backend::KeyValueBackend;
use crate::utils::errors::StoreError;
use crate::utils::retry_policy::RetryPolicy;

/// 任务存储配置
#[derive(Debug, Clone)]
pub struct TaskStoreConfig {
    /// 键前缀，任务键为 `{key_prefix}:{task_id}`
    pub key_prefix: String,
    /// 每次写入后重新设置的过期时间
    pub ttl: Duration,
    /// 连通性探测超时
    pub probe_timeout: Duration,
    /// 重连退避策略
    pub reconnect: RetryPolicy,
}

impl Default for TaskStoreConfig {
    fn default() -> Self {
        Self {
            key_prefix: "scraping_task".to_string(),
            ttl: Duration::from_secs(24 * 60 * 60),
            probe_timeout: Duration::from_secs(2),
            reconnect: RetryPolicy::doubling(3, Duration::from_millis(500)),
        }
    }
}

/// 任务存储
///
/// 基于键值后端的任务生命周期存储。每个操作前都会执行
/// `ensure_connection`：先做一次写入+删除哨兵键的探测，失败则按
/// 退避策略重连。重连失败时进入降级模式，所有操作返回
/// `false`/`None`/空列表；后续操作会再次尝试恢复。
pub struct TaskStore {
    backend: Arc<dyn KeyValueBackend>,
    config: TaskStoreConfig,
    degraded: AtomicBool,
}

impl TaskStore {
    pub fn new(backend: Arc<dyn KeyValueBackend>, config: TaskStoreConfig) -> Self {
        Self {
            backend,
            config,
            degraded: AtomicBool::new(false),
        }
    }

    fn task_key(&self, task_id: &str) -> String {
        format!("{}:{}", self.config.key_prefix, task_id)
    }

    // Outside the `{prefix}:*` pattern, so `list` never returns it.
    fn sentinel_key(&self) -> String {
        format!("{}__probe", self.config.key_prefix)
    }

    fn ttl_seconds(&self) -> u64 {
        self.config.ttl.as_secs().max(1)
    }

    /// 最近一次连通性检查是否失败
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::SeqCst)
    }

    /// 预热连接
    pub async fn connect(&self) -> bool {
        self.ensure_connection().await
    }

    /// 释放连接，下一次操作会重新建立
    pub async fn close(&self) {
        self.backend.close().await;
        debug!("Task store connection closed");
    }

    async fn probe(&self) -> bool {
        let key = self.sentinel_key();
        let round_trip = async {
            self.backend.set_ex(&key, "1", 5).await?;
            self.backend.del(&key).await?;
            Ok::<_, anyhow::Error>(())
        };

        match tokio::time::timeout(self.config.probe_timeout, round_trip).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                debug!(error = %e, "Task store probe failed");
                false
            }
            Err(_) => {
                debug!("Task store probe timed out");
                false
            }
        }
    }

    /// 确保后端连接可用
    ///
    /// # 返回值
    ///
    /// 连接可用返回 `true`；重连全部失败返回 `false` 并进入降级模式
    pub async fn ensure_connection(&self) -> bool {
        if self.probe().await {
            if self.degraded.swap(false, Ordering::SeqCst) {
                info!("Task store connectivity restored");
            }
            return true;
        }

        let policy = &self.config.reconnect;
        let mut attempt = 0;
        while policy.should_retry(attempt) {
            attempt += 1;
            match self.backend.reconnect().await {
                Ok(()) if self.probe().await => {
                    info!(attempt, "Task store reconnected");
                    self.degraded.store(false, Ordering::SeqCst);
                    return true;
                }
                Ok(()) => warn!(attempt, "Task store reconnected but probe still fails"),
                Err(e) => warn!(attempt, error = %e, "Task store reconnect failed"),
            }

            if policy.should_retry(attempt) {
                tokio::time::sleep(policy.calculate_backoff(attempt)).await;
            }
        }

        if !self.degraded.swap(true, Ordering::SeqCst) {
            error!(
                attempts = attempt,
                "Task store unreachable, operating in degraded mode"
            );
        }
        false
    }

    async fn write(&self, record: &TaskRecord) -> Result<(), StoreError> {
        let payload = serde_json::to_string(record)?;
        self.backend
            .set_ex(&self.task_key(&record.task_id), &payload, self.ttl_seconds())
            .await?;
        Ok(())
    }

    async fn read(&self, task_id: &str) -> Result<Option<TaskRecord>, StoreError> {
        match self.backend.get(&self.task_key(task_id)).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn try_create(
        &self,
        task_id: &str,
        urls: &[String],
        prompt: &str,
        schema: Option<&serde_json::Value>,
    ) -> Result<(), StoreError> {
        if self.read(task_id).await?.is_some() {
            return Err(StoreError::Domain(DomainError::ValidationError(format!(
                "task {} already exists",
                task_id
            ))));
        }
        let record = TaskRecord::new(task_id, urls.to_vec(), prompt, schema.cloned());
        self.write(&record).await
    }

    async fn try_update(
        &self,
        task_id: &str,
        status: TaskStatus,
        results: Option<Vec<ScrapeResult>>,
        error: Option<String>,
    ) -> Result<(), StoreError> {
        let mut record = self
            .read(task_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(task_id.to_string()))?;
        record.apply_status(status, results, error)?;
        self.write(&record).await
    }

    async fn try_list(&self, limit: usize) -> Result<Vec<TaskRecord>, StoreError> {
        let pattern = format!("{}:*", self.config.key_prefix);
        let keys = self.backend.keys(&pattern).await?;

        let mut records = Vec::with_capacity(keys.len());
        for key in keys {
            // Keys may expire between SCAN and GET.
            let Some(raw) = self.backend.get(&key).await? else {
                continue;
            };
            match serde_json::from_str::<TaskRecord>(&raw) {
                Ok(record) => records.push(record),
                Err(e) => warn!(key = %key, error = %e, "Skipping undecodable task record"),
            }
        }

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        Ok(records)
    }
}

#[async_trait]
impl TaskRepository for TaskStore {
    async fn create(
        &self,
        task_id: &str,
        urls: &[String],
        prompt: &str,
        schema: Option<&serde_json::Value>,
    ) -> bool {
        if task_id.is_empty() || !self.ensure_connection().await {
            return false;
        }
        match self.try_create(task_id, urls, prompt, schema).await {
            Ok(()) => {
                debug!(task_id, "Task record created");
                true
            }
            Err(e) => {
                warn!(task_id, error = %e, "Failed to create task record");
                false
            }
        }
    }

    async fn update_status(
        &self,
        task_id: &str,
        status: TaskStatus,
        results: Option<Vec<ScrapeResult>>,
        error: Option<String>,
    ) -> bool {
        if !self.ensure_connection().await {
            return false;
        }
        match self.try_update(task_id, status, results, error).await {
            Ok(()) => {
                debug!(task_id, %status, "Task status updated");
                true
            }
            Err(StoreError::NotFound(_)) => {
                debug!(task_id, "Status update ignored for unknown task");
                false
            }
            Err(e) => {
                warn!(task_id, %status, error = %e, "Failed to update task status");
                false
            }
        }
    }

    async fn get(&self, task_id: &str) -> Option<TaskRecord> {
        if !self.ensure_connection().await {
            return None;
        }
        match self.read(task_id).await {
            Ok(record) => record,
            Err(e) => {
                warn!(task_id, error = %e, "Failed to read task record");
                None
            }
        }
    }

    async fn delete(&self, task_id: &str) -> bool {
        if !self.ensure_connection().await {
            return false;
        }
        match self.backend.del(&self.task_key(task_id)).await {
            Ok(removed) => removed,
            Err(e) => {
                warn!(task_id, error = %e, "Failed to delete task record");
                false
            }
        }
    }

    async fn list(&self, limit: usize) -> Vec<TaskRecord> {
        if limit == 0 || !self.ensure_connection().await {
            return Vec::new();
        }
        match self.try_list(limit).await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Failed to list task records");
                Vec::new()
            }
        }
    }
}
