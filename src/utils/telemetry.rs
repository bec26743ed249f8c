// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 安装全局日志订阅器
///
/// 过滤规则来自 `RUST_LOG`，未设置时为 `info,scrapeflow=debug`。
/// 重复调用时保留已安装的订阅器。
pub fn init_telemetry() {
    let result = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,scrapeflow=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if result.is_err() {
        tracing::debug!("Global tracing subscriber already installed");
    }
}
