// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use crate::common::MemoryBackend;
    use scrapeflow::domain::models::scrape_result::ScrapeResult;
    use scrapeflow::domain::models::task::TaskStatus;
    use scrapeflow::domain::repositories::task_repository::TaskRepository;
    use scrapeflow::infrastructure::repositories::task_store::{TaskStore, TaskStoreConfig};
    use scrapeflow::utils::retry_policy::RetryPolicy;
    use serde_json::json;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use std::time::Duration;

    fn store_with(backend: Arc<MemoryBackend>) -> TaskStore {
        let config = TaskStoreConfig {
            ttl: Duration::from_secs(3_600),
            probe_timeout: Duration::from_millis(200),
            reconnect: RetryPolicy::doubling(3, Duration::from_millis(5)),
            ..TaskStoreConfig::default()
        };
        TaskStore::new(backend, config)
    }

    fn urls() -> Vec<String> {
        vec!["https://a.test".to_string(), "https://b.test".to_string()]
    }

    #[tokio::test]
    async fn test_get_after_create_returns_pending_record() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store_with(backend.clone());
        let schema = json!({"type": "object", "properties": {"title": {"type": "string"}}});

        assert!(store.create("t1", &urls(), "extract title", Some(&schema)).await);

        let record = store.get("t1").await.expect("record should exist");
        assert_eq!(record.task_id, "t1");
        assert_eq!(record.status, TaskStatus::Pending);
        assert_eq!(record.urls, urls());
        assert_eq!(record.prompt, "extract title");
        assert_eq!(record.schema, Some(schema));
        assert!(record.results.is_none());
        assert!(record.error.is_none());
        assert_eq!(backend.ttl_of("scraping_task:t1"), Some(3_600));
    }

    #[tokio::test]
    async fn test_create_refuses_duplicate_task_id() {
        let store = store_with(Arc::new(MemoryBackend::new()));

        assert!(store.create("dup", &urls(), "first", None).await);
        assert!(!store.create("dup", &[], "second", None).await);
        assert_eq!(store.get("dup").await.unwrap().prompt, "first");
    }

    #[tokio::test]
    async fn test_completed_update_stores_results_without_error() {
        let store = store_with(Arc::new(MemoryBackend::new()));
        store.create("t2", &urls(), "p", None).await;

        let results = vec![
            ScrapeResult::ok("https://a.test", json!({"title": "A"})),
            ScrapeResult::failed("https://b.test", "HTTP 500"),
        ];
        assert!(
            store
                .update_status("t2", TaskStatus::Completed, Some(results.clone()), None)
                .await
        );

        let record = store.get("t2").await.unwrap();
        assert_eq!(record.status, TaskStatus::Completed);
        assert_eq!(record.results, Some(results));
        assert!(record.error.is_none());
        assert!(record.updated_at >= record.created_at);
    }

    #[tokio::test]
    async fn test_failed_update_stores_error_only() {
        let store = store_with(Arc::new(MemoryBackend::new()));
        store.create("t3", &urls(), "p", None).await;
        store
            .update_status("t3", TaskStatus::Running, None, None)
            .await;

        assert!(
            store
                .update_status("t3", TaskStatus::Failed, None, Some("gateway crashed".into()))
                .await
        );

        let record = store.get("t3").await.unwrap();
        assert_eq!(record.status, TaskStatus::Failed);
        assert_eq!(record.error.as_deref(), Some("gateway crashed"));
        assert!(record.results.is_none());
    }

    #[tokio::test]
    async fn test_update_unknown_task_does_not_create_it() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store_with(backend.clone());

        assert!(
            !store
                .update_status("ghost", TaskStatus::Running, None, None)
                .await
        );
        assert!(store.get("ghost").await.is_none());
        assert!(backend.raw("scraping_task:ghost").is_none());
    }

    #[tokio::test]
    async fn test_reverse_transition_is_refused() {
        let store = store_with(Arc::new(MemoryBackend::new()));
        store.create("t4", &urls(), "p", None).await;
        store
            .update_status("t4", TaskStatus::Completed, Some(vec![]), None)
            .await;

        assert!(
            !store
                .update_status("t4", TaskStatus::Running, None, None)
                .await
        );
        assert_eq!(store.get("t4").await.unwrap().status, TaskStatus::Completed);
    }

    #[tokio::test]
    async fn test_every_write_reapplies_ttl() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store_with(backend.clone());
        store.create("t5", &urls(), "p", None).await;

        // Pretend the key was stored with a shorter remaining lifetime.
        let raw = backend.raw("scraping_task:t5").unwrap();
        backend.insert_raw("scraping_task:t5", &raw);
        assert_eq!(backend.ttl_of("scraping_task:t5"), Some(60));
        let writes_before = backend.writes.load(Ordering::SeqCst);

        store
            .update_status("t5", TaskStatus::Running, None, None)
            .await;
        assert_eq!(backend.ttl_of("scraping_task:t5"), Some(3_600));
        assert!(backend.writes.load(Ordering::SeqCst) > writes_before);
    }

    #[tokio::test]
    async fn test_expired_record_is_gone() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store_with(backend.clone());
        store.create("t6", &urls(), "p", None).await;

        backend.expire("scraping_task:t6");
        assert!(store.get("t6").await.is_none());
    }

    #[tokio::test]
    async fn test_delete_and_list() {
        let store = store_with(Arc::new(MemoryBackend::new()));
        for id in ["a", "b", "c"] {
            assert!(store.create(id, &urls(), "p", None).await);
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let ids: Vec<String> = store.list(10).await.into_iter().map(|r| r.task_id).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
        assert_eq!(store.list(2).await.len(), 2);
        assert!(store.list(0).await.is_empty());

        assert!(store.delete("b").await);
        assert!(!store.delete("b").await);
        assert_eq!(store.list(10).await.len(), 2);
    }

    #[tokio::test]
    async fn test_list_skips_corrupt_records() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store_with(backend.clone());
        store.create("good", &urls(), "p", None).await;
        backend.insert_raw("scraping_task:bad", "{not json");

        let records = store.list(10).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].task_id, "good");
    }

    #[tokio::test]
    async fn test_outage_degrades_and_recovery_keeps_records() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store_with(backend.clone());
        assert!(store.create("keep", &urls(), "p", None).await);

        backend.set_online(false);
        assert!(!store.create("new", &urls(), "p", None).await);
        assert!(
            !store
                .update_status("keep", TaskStatus::Running, None, None)
                .await
        );
        assert!(store.get("keep").await.is_none());
        assert!(!store.delete("keep").await);
        assert!(store.list(10).await.is_empty());
        assert!(store.is_degraded());

        backend.set_online(true);
        let record = store.get("keep").await.expect("record survives the outage");
        assert_eq!(record.status, TaskStatus::Pending);
        assert!(!store.is_degraded());
        assert!(store.get("new").await.is_none());
    }

    #[tokio::test]
    async fn test_reconnect_is_bounded() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store_with(backend.clone());

        backend.set_online(false);
        assert!(!store.ensure_connection().await);
        assert_eq!(backend.reconnects.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_connect_and_close_lifecycle() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store_with(backend.clone());

        assert!(store.connect().await);
        store.close().await;
        assert!(store.create("after-close", &urls(), "p", None).await);
        assert_eq!(backend.reconnects.load(Ordering::SeqCst), 0);
    }
}
