// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 直接抓取引擎模块
///
/// 不经过远程网关的页面抓取、主内容提取和并发批量抓取
pub mod concurrent_fetcher;
pub mod content_extractor;
pub mod reqwest_engine;
pub mod traits;
pub mod validators;
