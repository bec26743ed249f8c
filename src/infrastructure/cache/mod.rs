// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 缓存模块
///
/// 提供键值存储后端接口及其Redis实现
pub mod backend;
pub mod redis_client;
