// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 单个URL的抓取结果
///
/// `data` 与 `error` 恰好有一个存在，由 `success` 决定。
/// 反序列化时会对不满足该约束的输入进行规范化。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawScrapeResult")]
pub struct ScrapeResult {
    /// 目标URL
    pub url: String,
    /// 是否成功
    pub success: bool,
    /// 抽取出的数据
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// 失败原因
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Deserialize)]
struct RawScrapeResult {
    #[serde(default)]
    url: String,
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

impl From<RawScrapeResult> for ScrapeResult {
    fn from(raw: RawScrapeResult) -> Self {
        if raw.success {
            Self::ok(raw.url, raw.data.unwrap_or_else(|| Value::Object(Default::default())))
        } else {
            Self::failed(
                raw.url,
                raw.error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| "unknown error".to_string()),
            )
        }
    }
}

impl ScrapeResult {
    /// 创建成功结果
    pub fn ok(url: impl Into<String>, data: Value) -> Self {
        Self {
            url: url.into(),
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// 创建失败结果
    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}
