// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 任务提交响应
///
/// 缺少 `success` 字段的响应按失败处理。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SubmitResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmitResponse {
    pub fn accepted(task_id: impl Into<String>) -> Self {
        Self {
            success: true,
            task_id: Some(task_id.into()),
            error: None,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            task_id: None,
            error: Some(error.into()),
        }
    }
}

/// 任务状态查询响应
///
/// `status` 保留网关原始字符串，可能为
/// `pending`、`running`、`completed`、`failed` 或 `error`。
/// `timed_out` 只在本地产生：网关在超时时间内没有应答。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    #[serde(default = "unknown_status")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub timed_out: bool,
}

fn unknown_status() -> String {
    "unknown".to_string()
}

impl StatusReport {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            error: None,
            timed_out: false,
        }
    }

    /// 本地传输失败时使用的状态
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            error: Some(error.into()),
            timed_out: false,
        }
    }

    /// 状态查询往返超时，网关可能仍在处理任务
    pub fn timed_out(error: impl Into<String>) -> Self {
        Self {
            status: "timeout".to_string(),
            error: Some(error.into()),
            timed_out: true,
        }
    }

    pub fn is_completed(&self) -> bool {
        !self.timed_out && self.status == "completed"
    }

    pub fn is_failed(&self) -> bool {
        !self.timed_out && matches!(self.status.as_str(), "failed" | "error")
    }

    pub fn is_timed_out(&self) -> bool {
        self.timed_out
    }
}

/// URL可达性校验结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UrlValidation {
    #[serde(default)]
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UrlValidation {
    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            status_code: None,
            error: Some(error.into()),
        }
    }
}
