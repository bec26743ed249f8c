// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::domain::models::scrape_result::ScrapeResult;

/// 超时结果携带的固定消息
pub const TIMEOUT_MESSAGE: &str = "timeout";

/// 一次远程抓取在调用方看到的最终结果
///
/// 调用方只需区分三种终止状态：成功、网关报告失败、轮询超时。
#[derive(Debug, Clone, PartialEq)]
pub enum ScrapeOutcome {
    /// 网关完成任务并返回结果
    Succeeded {
        task_id: String,
        results: Vec<ScrapeResult>,
    },
    /// 提交被拒绝，或网关报告任务失败
    Failed {
        task_id: Option<String>,
        error: String,
    },
    /// 轮询次数耗尽仍未观察到终止状态
    TimedOut { task_id: String },
}

impl ScrapeOutcome {
    pub fn failed(task_id: Option<String>, error: impl Into<String>) -> Self {
        ScrapeOutcome::Failed {
            task_id,
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ScrapeOutcome::Succeeded { .. })
    }

    pub fn task_id(&self) -> Option<&str> {
        match self {
            ScrapeOutcome::Succeeded { task_id, .. } | ScrapeOutcome::TimedOut { task_id } => {
                Some(task_id)
            }
            ScrapeOutcome::Failed { task_id, .. } => task_id.as_deref(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ScrapeOutcome::Succeeded { .. } => None,
            ScrapeOutcome::Failed { error, .. } => Some(error),
            ScrapeOutcome::TimedOut { .. } => Some(TIMEOUT_MESSAGE),
        }
    }
}

// {success, task_id, results} | {success:false, task_id?, error, timed_out?}
impl Serialize for ScrapeOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ScrapeOutcome::Succeeded { task_id, results } => {
                let mut s = serializer.serialize_struct("ScrapeOutcome", 3)?;
                s.serialize_field("success", &true)?;
                s.serialize_field("task_id", task_id)?;
                s.serialize_field("results", results)?;
                s.end()
            }
            ScrapeOutcome::Failed { task_id, error } => {
                let mut s = serializer.serialize_struct("ScrapeOutcome", 3)?;
                s.serialize_field("success", &false)?;
                if let Some(task_id) = task_id {
                    s.serialize_field("task_id", task_id)?;
                } else {
                    s.skip_field("task_id")?;
                }
                s.serialize_field("error", error)?;
                s.end()
            }
            ScrapeOutcome::TimedOut { task_id } => {
                let mut s = serializer.serialize_struct("ScrapeOutcome", 4)?;
                s.serialize_field("success", &false)?;
                s.serialize_field("task_id", task_id)?;
                s.serialize_field("error", TIMEOUT_MESSAGE)?;
                s.serialize_field("timed_out", &true)?;
                s.end()
            }
        }
    }
}
