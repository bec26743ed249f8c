// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

use crate::infrastructure::cache::backend::KeyValueBackend;

const SCAN_BATCH: usize = 100;

/// Redis客户端
///
/// 持有一个跨调用复用的多路复用连接，连接在首次使用或
/// `reconnect` 时建立，`close` 后的下一次调用会重新建立。
pub struct RedisClient {
    /// Redis客户端
    client: redis::Client,
    /// 当前连接
    connection: RwLock<Option<MultiplexedConnection>>,
    /// 建立连接的超时时间
    connect_timeout: Duration,
}

impl RedisClient {
    /// 创建新的Redis客户端实例
    ///
    /// 只解析连接URL，不会立即建立连接。
    ///
    /// # 参数
    ///
    /// * `redis_url` - Redis连接URL
    /// * `connect_timeout` - 建立连接的超时时间
    ///
    /// # 返回值
    ///
    /// * `Ok(RedisClient)` - Redis客户端实例
    /// * `Err(anyhow::Error)` - URL无效
    pub fn new(redis_url: &str, connect_timeout: Duration) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self {
            client,
            connection: RwLock::new(None),
            connect_timeout,
        })
    }

    async fn open(&self) -> Result<MultiplexedConnection> {
        let con = tokio::time::timeout(
            self.connect_timeout,
            self.client.get_multiplexed_async_connection(),
        )
        .await
        .map_err(|_| anyhow!("timed out connecting to redis"))??;
        Ok(con)
    }

    async fn connection(&self) -> Result<MultiplexedConnection> {
        if let Some(con) = self.connection.read().await.as_ref() {
            return Ok(con.clone());
        }

        let mut slot = self.connection.write().await;
        if let Some(con) = slot.as_ref() {
            return Ok(con.clone());
        }
        let con = self.open().await?;
        *slot = Some(con.clone());
        Ok(con)
    }
}

#[async_trait]
impl KeyValueBackend for RedisClient {
    async fn reconnect(&self) -> Result<()> {
        let con = self.open().await?;
        *self.connection.write().await = Some(con);
        debug!("Redis connection re-established");
        Ok(())
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<()> {
        let mut con = self.connection().await?;
        con.set_ex::<_, _, ()>(key, value, ttl_seconds).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut con = self.connection().await?;
        let value: Option<String> = con.get(key).await?;
        Ok(value)
    }

    async fn del(&self, key: &str) -> Result<bool> {
        let mut con = self.connection().await?;
        let removed: i64 = con.del(key).await?;
        Ok(removed > 0)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let mut con = self.connection().await?;
        let mut keys = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut con)
                .await?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }
        Ok(keys)
    }

    async fn close(&self) {
        self.connection.write().await.take();
    }
}
