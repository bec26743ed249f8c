// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use scrapeflow::domain::gateway::client::TaskGateway;
    use scrapeflow::infrastructure::gateway::http_gateway::{GatewayClient, GatewayConfig};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GatewayClient {
        GatewayClient::new(GatewayConfig {
            base_url: format!("{}/", server.uri()),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn urls() -> Vec<String> {
        vec!["https://a.test".to_string()]
    }

    #[tokio::test]
    async fn test_submit_posts_task_and_returns_id() {
        let server = MockServer::start().await;
        let schema = json!({"type": "object"});
        Mock::given(method("POST"))
            .and(path("/execute"))
            .and(body_json(json!({
                "urls": ["https://a.test"],
                "prompt": "get titles",
                "schema": {"type": "object"}
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"success": true, "task_id": "t1"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .submit(&urls(), "get titles", Some(&schema))
            .await;

        assert!(response.success);
        assert_eq!(response.task_id.as_deref(), Some("t1"));
        assert!(response.error.is_none());
    }

    #[tokio::test]
    async fn test_submit_passes_gateway_rejection_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/execute"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": false, "error": "quota exceeded"})),
            )
            .mount(&server)
            .await;

        let response = client_for(&server).submit(&urls(), "p", None).await;

        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("quota exceeded"));
    }

    #[tokio::test]
    async fn test_submit_http_error_becomes_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/execute"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal boom"))
            .mount(&server)
            .await;

        let response = client_for(&server).submit(&urls(), "p", None).await;

        assert!(!response.success);
        assert!(response.task_id.is_none());
        let error = response.error.unwrap();
        assert!(error.contains("500"));
        assert!(error.contains("internal boom"));
    }

    #[tokio::test]
    async fn test_submit_malformed_body_becomes_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/execute"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let response = client_for(&server).submit(&urls(), "p", None).await;

        assert!(!response.success);
        assert!(response.error.is_some());
    }

    #[tokio::test]
    async fn test_submit_unreachable_gateway_becomes_rejection() {
        let client = GatewayClient::new(GatewayConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout: Duration::from_secs(2),
        })
        .unwrap();

        let response = client.submit(&urls(), "p", None).await;

        assert!(!response.success);
        assert!(response.error.is_some());
    }

    #[tokio::test]
    async fn test_status_reports_gateway_value() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "running"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/status/t2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "failed", "error": "blocked by robots"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);

        let running = client.status("t1").await;
        assert_eq!(running.status, "running");
        assert!(!running.is_completed());
        assert!(!running.is_failed());

        let failed = client.status("t2").await;
        assert!(failed.is_failed());
        assert_eq!(failed.error.as_deref(), Some("blocked by robots"));
    }

    #[tokio::test]
    async fn test_status_transport_failure_reads_as_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status/t1"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let report = client_for(&server).status("t1").await;

        assert_eq!(report.status, "error");
        assert!(report.is_failed());
        assert!(report.error.is_some());
    }

    #[tokio::test]
    async fn test_status_timeout_is_marked_timed_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "completed"}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = GatewayClient::new(GatewayConfig {
            base_url: server.uri(),
            timeout: Duration::from_millis(200),
        })
        .unwrap();

        let report = client.status("slow").await;
        assert!(report.is_timed_out());
        assert!(!report.is_failed());
        assert!(!report.is_completed());
    }

    #[tokio::test]
    async fn test_task_id_is_sent_as_single_path_segment() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status/job%2F1%3Fx"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "running"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/results/job%2F1%3Fx"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"url": "https://a.test", "success": true, "data": {}}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);

        assert_eq!(client.status("job/1?x").await.status, "running");
        assert_eq!(client.results("job/1?x").await.len(), 1);
    }

    #[tokio::test]
    async fn test_results_decode_and_failures_become_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/results/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"url": "https://a.test", "success": true, "data": {"title": "A"}},
                {"url": "https://b.test", "success": false, "error": "HTTP 404"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/results/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_for(&server);

        let results = client.results("t1").await;
        assert_eq!(results.len(), 2);
        assert!(results[0].success);
        assert_eq!(results[0].data.as_ref().unwrap()["title"], "A");
        assert!(!results[1].success);
        assert_eq!(results[1].error.as_deref(), Some("HTTP 404"));

        assert!(client.results("missing").await.is_empty());
    }

    #[tokio::test]
    async fn test_search_unwraps_envelope_and_drops_empty_urls() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_json(json!({"query": "rust async", "max_results": 3})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {"url": "https://tokio.rs", "title": "Tokio", "description": "runtime"},
                    {"url": "", "title": "broken"},
                    {"url": "https://async.rs", "title": "async-std"}
                ]
            })))
            .mount(&server)
            .await;

        let hits = client_for(&server).search("rust async", 3).await;

        let urls: Vec<&str> = hits.iter().map(|h| h.url.as_str()).collect();
        assert_eq!(urls, vec!["https://tokio.rs", "https://async.rs"]);
        assert_eq!(hits[0].description.as_deref(), Some("runtime"));
        assert!(hits[1].description.is_none());
    }

    #[tokio::test]
    async fn test_search_failure_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        assert!(client_for(&server).search("anything", 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_validate_url_round_trip_and_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/validate-url"))
            .and(body_json(json!({"url": "https://a.test"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"valid": true, "status_code": 200})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/validate-url"))
            .and(body_json(json!({"url": "https://down.test"})))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server);

        let ok = client.validate("https://a.test").await;
        assert!(ok.valid);
        assert_eq!(ok.status_code, Some(200));

        let down = client.validate("https://down.test").await;
        assert!(!down.valid);
        assert!(down.error.is_some());
    }
}
