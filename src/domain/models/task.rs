// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::models::scrape_result::ScrapeResult;

/// 任务记录
///
/// 表示提交到远程网关的一个抓取任务在本地存储中的生命周期记录。
/// 记录只能由轮询路径通过状态更新进行修改，调用方不能直接改写已持久化的字段。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// 网关分配的任务ID
    pub task_id: String,
    /// 当前状态
    pub status: TaskStatus,
    /// 待抓取的URL列表
    pub urls: Vec<String>,
    /// 抽取提示词
    pub prompt: String,
    /// 可选的输出结构描述
    pub schema: Option<serde_json::Value>,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 最后更新时间
    pub updated_at: DateTime<Utc>,
    /// 抓取结果，仅在 `completed` 状态下存在
    pub results: Option<Vec<ScrapeResult>>,
    /// 错误信息，仅在 `failed` 状态下存在
    pub error: Option<String>,
}

/// 任务状态枚举
///
/// 状态只能向前转换：
/// Pending → Running → Completed/Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// 已提交，尚未观察到执行
    #[default]
    Pending,
    /// 网关正在执行
    Running,
    /// 已完成，结果可用
    Completed,
    /// 已失败
    Failed,
}

impl TaskStatus {
    fn rank(self) -> u8 {
        match self {
            TaskStatus::Pending => 0,
            TaskStatus::Running => 1,
            TaskStatus::Completed | TaskStatus::Failed => 2,
        }
    }

    /// 是否为终止状态
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    /// 判断是否允许从当前状态转换到 `next`
    ///
    /// 同一非终止状态的重复写入是允许的（用于刷新TTL），
    /// 终止状态之后不允许任何转换。
    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        next.rank() >= self.rank()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Running => write!(f, "running"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "running" => Ok(TaskStatus::Running),
            "completed" => Ok(TaskStatus::Completed),
            "failed" => Ok(TaskStatus::Failed),
            other => Err(DomainError::ValidationError(format!(
                "unknown task status: {}",
                other
            ))),
        }
    }
}

/// 领域错误类型
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    /// 无效的状态转换
    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: TaskStatus, to: TaskStatus },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl TaskRecord {
    /// 创建一个新的 `pending` 任务记录
    pub fn new(
        task_id: impl Into<String>,
        urls: Vec<String>,
        prompt: impl Into<String>,
        schema: Option<serde_json::Value>,
    ) -> Self {
        let now = Utc::now();
        Self {
            task_id: task_id.into(),
            status: TaskStatus::Pending,
            urls,
            prompt: prompt.into(),
            schema,
            created_at: now,
            updated_at: now,
            results: None,
            error: None,
        }
    }

    /// 应用一次状态更新
    ///
    /// 维持以下不变量：`results` 仅在 `completed` 时存在，
    /// `error` 仅在 `failed` 时存在。
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 更新成功
    /// * `Err(DomainError)` - 状态转换不合法
    pub fn apply_status(
        &mut self,
        status: TaskStatus,
        results: Option<Vec<ScrapeResult>>,
        error: Option<String>,
    ) -> Result<(), DomainError> {
        if !self.status.can_transition_to(status) {
            return Err(DomainError::InvalidStateTransition {
                from: self.status,
                to: status,
            });
        }

        self.status = status;
        self.updated_at = Utc::now();
        match status {
            TaskStatus::Completed => {
                self.results = Some(results.unwrap_or_default());
                self.error = None;
            }
            TaskStatus::Failed => {
                self.results = None;
                self.error = Some(error.unwrap_or_else(|| "unknown error".to_string()));
            }
            TaskStatus::Pending | TaskStatus::Running => {
                self.results = None;
                self.error = None;
            }
        }
        Ok(())
    }
}
