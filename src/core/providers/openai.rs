//! OpenAI provider implementation

use crate::core::provider::{Provider, ProviderError, classify_error};
use crate::models::openai::{OpenAIChatCompletionRequest, OpenAIChatCompletionResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// OpenAI provider (supports OpenAI, Azure OpenAI and any
/// OpenAI-compatible endpoint)
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    api_version: Option<String>,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider
    ///
    /// # Arguments
    ///
    /// * `api_key` - API key
    /// * `base_url` - API base URL or Azure endpoint
    /// * `timeout` - Request timeout in seconds
    /// * `api_version` - Optional Azure API version (enables Azure mode)
    pub fn new(
        api_key: String,
        base_url: String,
        timeout: u64,
        api_version: Option<String>,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .map_err(|e| ProviderError::Unexpected(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_version,
        })
    }

    fn completions_url(&self, model: &str) -> String {
        match &self.api_version {
            Some(version) => format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                self.base_url, model, version
            ),
            None => format!("{}/chat/completions", self.base_url),
        }
    }
}

#[async_trait]
impl Provider for OpenAIProvider {
    async fn create_chat_completion(
        &self,
        request: &OpenAIChatCompletionRequest,
    ) -> Result<OpenAIChatCompletionResponse, ProviderError> {
        let url = self.completions_url(&request.model);
        debug!("Sending chat completion to {}", url);

        let mut req_builder = self
            .client
            .post(&url)
            .header("Content-Type", "application/json");

        if self.api_version.is_some() {
            // Azure uses api-key header
            req_builder = req_builder.header("api-key", &self.api_key);
        } else {
            req_builder = req_builder.bearer_auth(&self.api_key);
        }

        let response = req_builder
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::Unexpected(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::from_status(
                status.as_u16(),
                classify_error(&error_text),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::Unexpected(format!("Failed to parse response: {}", e)))
    }

    fn provider_name(&self) -> &str {
        if self.api_version.is_some() {
            "Azure OpenAI"
        } else {
            "OpenAI"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::providers::stub::{StubServer, chat_request};
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn test_standard_url() {
        let provider = OpenAIProvider::new(
            "sk-test".to_string(),
            "https://api.openai.com/v1/".to_string(),
            5,
            None,
        )
        .unwrap();
        assert_eq!(
            provider.completions_url("gpt-4o"),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_azure_url() {
        let provider = OpenAIProvider::new(
            "key".to_string(),
            "https://example.openai.azure.com".to_string(),
            5,
            Some("2024-02-01".to_string()),
        )
        .unwrap();
        assert_eq!(
            provider.completions_url("my-deployment"),
            "https://example.openai.azure.com/openai/deployments/my-deployment/chat/completions?api-version=2024-02-01"
        );
    }

    #[tokio::test]
    async fn test_bearer_auth_and_reply() {
        let server = StubServer::replying("等价").await;
        let provider =
            OpenAIProvider::new("sk-test".to_string(), server.base_url.clone(), 5, None).unwrap();

        let response = provider
            .create_chat_completion(&chat_request("gpt-4o"))
            .await
            .unwrap();
        assert_eq!(response.first_text(), Some("等价"));

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].uri, "/chat/completions");
        assert_eq!(requests[0].header("authorization"), Some("Bearer sk-test"));
        assert_eq!(requests[0].header("api-key"), None);
    }

    #[tokio::test]
    async fn test_azure_uses_api_key_header() {
        let server = StubServer::replying("不等价").await;
        let provider = OpenAIProvider::new(
            "azure-key".to_string(),
            server.base_url.clone(),
            5,
            Some("2024-02-01".to_string()),
        )
        .unwrap();

        provider
            .create_chat_completion(&chat_request("my-deployment"))
            .await
            .unwrap();

        let requests = server.requests();
        assert_eq!(
            requests[0].uri,
            "/openai/deployments/my-deployment/chat/completions?api-version=2024-02-01"
        );
        assert_eq!(requests[0].header("api-key"), Some("azure-key"));
        assert_eq!(requests[0].header("authorization"), None);
    }

    #[tokio::test]
    async fn test_error_statuses_map_to_typed_errors() {
        let cases = [
            (StatusCode::UNAUTHORIZED, "invalid_api_key"),
            (StatusCode::TOO_MANY_REQUESTS, "rate_limit_exceeded"),
            (StatusCode::BAD_REQUEST, "bad messages"),
            (StatusCode::SERVICE_UNAVAILABLE, "overloaded"),
        ];

        for (status, code) in cases {
            let server = StubServer::start(status, json!({"error": {"code": code}})).await;
            let provider =
                OpenAIProvider::new("sk-test".to_string(), server.base_url.clone(), 5, None)
                    .unwrap();

            let err = provider
                .create_chat_completion(&chat_request("gpt-4o"))
                .await
                .unwrap_err();

            match (status.as_u16(), err) {
                (401, ProviderError::Authentication(message)) => {
                    assert!(message.contains("Invalid API key"))
                }
                (429, ProviderError::RateLimit(message)) => {
                    assert!(message.contains("Rate limit exceeded"))
                }
                (400, ProviderError::BadRequest(message)) => {
                    assert!(message.contains("bad messages"))
                }
                (503, ProviderError::ApiError { status, message }) => {
                    assert_eq!(status, 503);
                    assert!(message.contains("overloaded"));
                }
                (status, other) => panic!("status {} mapped to {:?}", status, other),
            }
        }
    }

    #[tokio::test]
    async fn test_unparseable_body_is_unexpected() {
        let server = StubServer::start(StatusCode::OK, json!({"not": "a completion"})).await;
        let provider =
            OpenAIProvider::new("sk-test".to_string(), server.base_url.clone(), 5, None).unwrap();

        let err = provider
            .create_chat_completion(&chat_request("gpt-4o"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Unexpected(ref m) if m.starts_with("Failed to parse response")));
    }
}
