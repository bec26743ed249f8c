// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理任务存储、网关、轮询和直接抓取的配置设置
pub mod settings;
