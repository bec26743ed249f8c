// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含与外部系统交互的具体实现：
/// - 缓存（cache）：键值存储后端接口及Redis客户端
/// - 网关（gateway）：远程执行网关的HTTP客户端
/// - 仓库实现（repositories）：基于键值后端的任务存储
///
/// 基础设施层依赖于领域层的抽象接口。
pub mod cache;
pub mod gateway;
pub mod repositories;
