// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use scrapeflow::utils::telemetry;

    #[test]
    fn test_telemetry_initialization_is_idempotent() {
        telemetry::init_telemetry();
        // 第二次调用不能 panic
        telemetry::init_telemetry();

        tracing::debug!(task_id = "t1", attempt = 1, "Polling task status");
        tracing::info!(total = 3, succeeded = 2, "Direct fetch batch finished");
        tracing::warn!(error = "connection refused", "Task store reconnect failed");
    }
}
