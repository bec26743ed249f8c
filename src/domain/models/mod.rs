// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 任务记录（task）：远程抓取任务在本地存储中的生命周期
/// - 抓取结果（scrape_result）：单个URL的成功或失败结果
/// - 搜索结果（search_result）：网关搜索返回的命中
/// - 网关报文（gateway）：提交、状态和URL校验的响应结构
/// - 最终结果（outcome）：轮询结束后调用方看到的三种终止状态
pub mod gateway;
pub mod outcome;
pub mod scrape_result;
pub mod search_result;
pub mod task;
