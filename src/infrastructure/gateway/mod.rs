// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 网关客户端模块
///
/// 远程执行网关的HTTP实现
pub mod http_gateway;
