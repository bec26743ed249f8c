// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::services::polling_orchestrator::PollingConfig;
use crate::engines::concurrent_fetcher::FetcherConfig;
use crate::engines::reqwest_engine::DEFAULT_USER_AGENT;
use crate::infrastructure::gateway::http_gateway::GatewayConfig;
use crate::infrastructure::repositories::task_store::TaskStoreConfig;
use crate::utils::retry_policy::RetryPolicy;

/// 应用程序配置设置
///
/// 包含任务存储、远程网关、轮询和直接抓取的所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Redis配置
    pub redis: RedisSettings,
    /// 网关配置
    pub gateway: GatewaySettings,
    /// 轮询配置
    pub polling: PollingSettings,
    /// 直接抓取配置
    pub fetcher: FetcherSettings,
}

/// Redis配置设置
#[derive(Debug, Deserialize)]
pub struct RedisSettings {
    /// Redis连接URL
    pub url: String,
    /// 任务键前缀
    pub key_prefix: String,
    /// 任务记录过期时间（秒）
    pub ttl_seconds: u64,
    /// 连通性探测超时（毫秒）
    pub probe_timeout_ms: u64,
    /// 重连次数
    pub reconnect_attempts: u32,
    /// 重连初始退避（毫秒），之后每次翻倍
    pub reconnect_base_delay_ms: u64,
}

/// 网关配置设置
#[derive(Debug, Deserialize)]
pub struct GatewaySettings {
    /// 网关基础URL
    pub base_url: String,
    /// 请求超时（秒）
    pub timeout_secs: u64,
}

/// 轮询配置设置
#[derive(Debug, Deserialize)]
pub struct PollingSettings {
    /// 轮询间隔（秒）
    pub interval_secs: u64,
    /// 最大轮询次数
    pub max_attempts: u32,
}

/// 直接抓取配置设置
#[derive(Debug, Deserialize)]
pub struct FetcherSettings {
    /// 请求超时（秒）
    pub timeout_secs: u64,
    /// 提取文本的最大字符数
    pub max_content_chars: usize,
    /// 浏览器标识
    pub user_agent: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、`config/default`、`config/{APP_ENVIRONMENT}`
    /// 和 `SCRAPEFLOW__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("SCRAPEFLOW").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// 只包含内置默认值的配置
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<config::builder::ConfigBuilder<config::builder::DefaultState>, ConfigError>
    {
        Config::builder()
            // Redis
            .set_default("redis.url", "redis://127.0.0.1:6379/")?
            .set_default("redis.key_prefix", "scraping_task")?
            .set_default("redis.ttl_seconds", 86_400)?
            .set_default("redis.probe_timeout_ms", 2_000)?
            .set_default("redis.reconnect_attempts", 3)?
            .set_default("redis.reconnect_base_delay_ms", 500)?
            // Gateway
            .set_default("gateway.base_url", "http://localhost:8000")?
            .set_default("gateway.timeout_secs", 30)?
            // Polling
            .set_default("polling.interval_secs", 3)?
            .set_default("polling.max_attempts", 20)?
            // Direct fetcher
            .set_default("fetcher.timeout_secs", 30)?
            .set_default("fetcher.max_content_chars", 5_000)?
            .set_default("fetcher.user_agent", DEFAULT_USER_AGENT)
    }
}

impl RedisSettings {
    pub fn store_config(&self) -> TaskStoreConfig {
        TaskStoreConfig {
            key_prefix: self.key_prefix.clone(),
            ttl: Duration::from_secs(self.ttl_seconds),
            probe_timeout: Duration::from_millis(self.probe_timeout_ms),
            reconnect: RetryPolicy::doubling(
                self.reconnect_attempts,
                Duration::from_millis(self.reconnect_base_delay_ms),
            ),
        }
    }

    /// 建立连接的超时与探测超时一致
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

impl GatewaySettings {
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

impl PollingSettings {
    pub fn polling_config(&self) -> PollingConfig {
        PollingConfig {
            interval: Duration::from_secs(self.interval_secs),
            max_attempts: self.max_attempts,
        }
    }
}

impl FetcherSettings {
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            max_content_chars: self.max_content_chars,
            user_agent: self.user_agent.clone(),
        }
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
