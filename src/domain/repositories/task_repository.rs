// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scrape_result::ScrapeResult;
use crate::domain::models::task::{TaskRecord, TaskStatus};
use async_trait::async_trait;

/// 任务仓库特质
///
/// 存储不可用是正常结果而不是错误：所有方法在后端不可达时
/// 返回 `false`、`None` 或空列表，从不返回错误或 panic。
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// 创建 `pending` 状态的任务记录，任务已存在时返回 `false`
    async fn create(
        &self,
        task_id: &str,
        urls: &[String],
        prompt: &str,
        schema: Option<&serde_json::Value>,
    ) -> bool;

    /// 更新任务状态，记录不存在或状态回退时返回 `false`
    async fn update_status(
        &self,
        task_id: &str,
        status: TaskStatus,
        results: Option<Vec<ScrapeResult>>,
        error: Option<String>,
    ) -> bool;

    /// 根据ID查找任务
    async fn get(&self, task_id: &str) -> Option<TaskRecord>;

    /// 删除任务，记录存在并被删除时返回 `true`
    async fn delete(&self, task_id: &str) -> bool;

    /// 按创建时间倒序列出最多 `limit` 条任务
    async fn list(&self, limit: usize) -> Vec<TaskRecord>;
}
