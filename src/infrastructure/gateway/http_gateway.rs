// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::domain::gateway::client::{GatewayError, TaskGateway};
use crate::domain::models::gateway::{StatusReport, SubmitResponse, UrlValidation};
use crate::domain::models::scrape_result::ScrapeResult;
use crate::domain::models::search_result::SearchResult;

/// 网关客户端配置
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// 网关基础URL，例如 `http://localhost:8000`
    pub base_url: String,
    /// 单次请求的总超时
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Serialize)]
struct SubmitRequest<'a> {
    urls: &'a [String],
    prompt: &'a str,
    schema: Option<&'a serde_json::Value>,
}

/// 远程网关HTTP客户端
///
/// 同一个客户端可以指向不同的网关实例，只由 `base_url` 区分。
/// 连接池由内部的 `reqwest::Client` 持有，客户端被丢弃时随之释放；
/// 每个响应体都在调用内被完整读取或丢弃。
pub struct GatewayClient {
    http: Client,
    base_url: String,
}

impl GatewayClient {
    /// 创建网关客户端
    ///
    /// # 返回值
    ///
    /// * `Ok(GatewayClient)` - 客户端实例
    /// * `Err(GatewayError)` - 基础URL无效或HTTP客户端创建失败
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let parsed = Url::parse(&config.base_url)
            .map_err(|e| GatewayError::NetworkError(format!("Invalid gateway URL: {}", e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GatewayError::NetworkError(format!(
                "Unsupported gateway scheme: {}",
                parsed.scheme()
            )));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// `{base_url}/{resource}/{task_id}`，任务ID作为单个路径段编码
    fn task_endpoint(&self, resource: &str, task_id: &str) -> Result<Url, GatewayError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| GatewayError::NetworkError(format!("Invalid gateway URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| GatewayError::NetworkError("Gateway URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push(resource)
            .push(task_id);
        Ok(url)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GatewayError> {
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(GatewayError::HttpStatus {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).chars().take(512).collect(),
            });
        }
        serde_json::from_slice(&body).map_err(|e| GatewayError::Decode(e.to_string()))
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self.http.post(self.endpoint(path)).json(body).send().await?;
        Self::decode(response).await
    }

    async fn get_task_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        task_id: &str,
    ) -> Result<T, GatewayError> {
        let url = self.task_endpoint(resource, task_id)?;
        let response = self.http.get(url).send().await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl TaskGateway for GatewayClient {
    async fn submit(
        &self,
        urls: &[String],
        prompt: &str,
        schema: Option<&serde_json::Value>,
    ) -> SubmitResponse {
        let request = SubmitRequest {
            urls,
            prompt,
            schema,
        };
        match self.post_json::<_, SubmitResponse>("execute", &request).await {
            Ok(response) => {
                debug!(
                    success = response.success,
                    task_id = ?response.task_id,
                    "Gateway accepted submission"
                );
                response
            }
            Err(e) => {
                warn!(error = %e, "Task submission failed");
                SubmitResponse::rejected(e.to_string())
            }
        }
    }

    async fn status(&self, task_id: &str) -> StatusReport {
        match self.get_task_json::<StatusReport>("status", task_id).await {
            Ok(report) => report,
            Err(GatewayError::Timeout) => {
                warn!(task_id, "Status query timed out");
                StatusReport::timed_out(GatewayError::Timeout.to_string())
            }
            Err(e) => {
                warn!(task_id, error = %e, "Status query failed");
                StatusReport::error(e.to_string())
            }
        }
    }

    async fn results(&self, task_id: &str) -> Vec<ScrapeResult> {
        match self
            .get_task_json::<Vec<ScrapeResult>>("results", task_id)
            .await
        {
            Ok(results) => results,
            Err(e) => {
                warn!(task_id, error = %e, "Fetching task results failed");
                Vec::new()
            }
        }
    }

    async fn search(&self, query: &str, max_results: usize) -> Vec<SearchResult> {
        let body = json!({ "query": query, "max_results": max_results });
        match self.post_json::<_, SearchEnvelope>("search", &body).await {
            Ok(envelope) => envelope
                .results
                .into_iter()
                .filter(|hit| !hit.url.is_empty())
                .collect(),
            Err(e) => {
                warn!(query, error = %e, "Gateway search failed");
                Vec::new()
            }
        }
    }

    async fn validate(&self, url: &str) -> UrlValidation {
        let body = json!({ "url": url });
        match self.post_json::<_, UrlValidation>("validate-url", &body).await {
            Ok(validation) => validation,
            Err(e) => {
                warn!(url, error = %e, "URL validation failed");
                UrlValidation::invalid(e.to_string())
            }
        }
    }
}
