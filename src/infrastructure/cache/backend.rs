// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use async_trait::async_trait;

/// 键值存储后端
///
/// 任务存储所依赖的最小接口。实现负责持有底层连接，
/// `reconnect` 丢弃旧连接并建立新连接。
#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    /// 重新建立连接
    async fn reconnect(&self) -> Result<()>;

    /// 写入键值并设置过期时间（秒）
    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<()>;

    /// 读取键值
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// 删除键，返回键是否存在
    async fn del(&self, key: &str) -> Result<bool>;

    /// 列出匹配模式的所有键
    async fn keys(&self, pattern: &str) -> Result<Vec<String>>;

    /// 释放连接
    async fn close(&self);
}
