// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：任务记录、抓取结果和最终结果
/// - 网关接口（gateway）：远程执行网关的抽象
/// - 仓库接口（repositories）：任务记录的持久化抽象
/// - 服务（services）：轮询编排、活跃任务注册和相关性过滤
pub mod gateway;
pub mod models;
pub mod repositories;
pub mod services;
