// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含核心业务实体、网关接口、仓库接口和服务
pub mod domain;

/// 引擎模块
///
/// 实现直接模式下的页面抓取和并发批量抓取
pub mod engines;

/// 基础设施模块
///
/// 提供Redis任务存储和远程网关客户端
pub mod infrastructure;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;

pub use domain::models::outcome::ScrapeOutcome;
pub use domain::models::scrape_result::ScrapeResult;
pub use domain::models::task::{TaskRecord, TaskStatus};
pub use domain::services::polling_orchestrator::PollingOrchestrator;
pub use engines::concurrent_fetcher::ConcurrentFetcher;
pub use infrastructure::gateway::http_gateway::GatewayClient;
pub use infrastructure::repositories::task_store::TaskStore;
