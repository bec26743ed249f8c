// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// - 轮询编排（polling_orchestrator）：提交任务并轮询直到终止状态
/// - 活跃任务注册表（task_registry）：记录正在轮询的任务
/// - 相关性过滤（relevance_filter）：基于关键词的词法过滤
pub mod polling_orchestrator;
pub mod relevance_filter;
pub mod task_registry;
