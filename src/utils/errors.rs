// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

use crate::domain::models::task::DomainError;

/// 任务存储错误类型
///
/// 仅在存储内部流转，公开操作会将其记录日志后折叠为 `false`/`None`/空列表。
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("后端错误: {0}")]
    Backend(#[from] anyhow::Error),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("未找到任务: {0}")]
    NotFound(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}
