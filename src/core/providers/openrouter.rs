//! OpenRouter provider implementation

use crate::core::constants::defaults;
use crate::core::provider::{Provider, ProviderError, classify_error};
use crate::models::openai::{OpenAIChatCompletionRequest, OpenAIChatCompletionResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// OpenRouter provider
pub struct OpenRouterProvider {
    client: Client,
    api_key: String,
    base_url: String,
    site_url: Option<String>,
    app_name: Option<String>,
}

impl OpenRouterProvider {
    /// Create a new OpenRouter provider
    ///
    /// # Arguments
    ///
    /// * `api_key` - OpenRouter API key
    /// * `base_url` - OpenRouter API base URL (default: https://openrouter.ai/api/v1)
    /// * `timeout` - Request timeout in seconds
    /// * `site_url` - Optional site URL for OpenRouter credits
    /// * `app_name` - Optional application name
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        timeout: u64,
        site_url: Option<String>,
        app_name: Option<String>,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .map_err(|e| ProviderError::Unexpected(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = base_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| defaults::OPENROUTER_BASE_URL.to_string());

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            site_url,
            app_name,
        })
    }

    /// Classify OpenRouter errors and provide helpful messages
    fn classify_openrouter_error(error_detail: &str) -> String {
        let error_lower = error_detail.to_lowercase();

        if error_lower.contains("insufficient") && error_lower.contains("credits") {
            return "Insufficient credits. Please add credits to your OpenRouter account."
                .to_string();
        }

        classify_error(error_detail)
    }
}

#[async_trait]
impl Provider for OpenRouterProvider {
    async fn create_chat_completion(
        &self,
        request: &OpenAIChatCompletionRequest,
    ) -> Result<OpenAIChatCompletionResponse, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        tracing::info!(
            "Sending request to OpenRouter: model={}, messages={}",
            request.model,
            request.messages.len()
        );

        let mut req_builder = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .bearer_auth(&self.api_key);

        // Add OpenRouter-specific headers
        if let Some(ref site_url) = self.site_url {
            req_builder = req_builder.header("HTTP-Referer", site_url);
        }
        if let Some(ref app_name) = self.app_name {
            req_builder = req_builder.header("X-Title", app_name);
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

            if status.as_u16() == 402 {
                return Err(ProviderError::BadRequest(
                    "Insufficient credits. Please add credits to your OpenRouter account."
                        .to_string(),
                ));
            }

            return Err(ProviderError::from_status(
                status.as_u16(),
                Self::classify_openrouter_error(&error_text),
            ));
        }

        let completion: OpenAIChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Unexpected(format!("Failed to parse response: {}", e)))?;

        if let Some(usage) = &completion.usage {
            tracing::info!(
                "OpenRouter response: model={}, sent_tokens={}, received_tokens={}, total_tokens={}",
                completion.model,
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        Ok(completion)
    }

    fn provider_name(&self) -> &str {
        "OpenRouter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::providers::stub::{StubServer, chat_request};
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn test_blank_base_url_falls_back() {
        let provider =
            OpenRouterProvider::new("key".to_string(), Some("  ".to_string()), 5, None, None)
                .unwrap();
        assert_eq!(provider.base_url, "https://openrouter.ai/api/v1");
    }

    #[test]
    fn test_classify_credits() {
        let message =
            OpenRouterProvider::classify_openrouter_error("Insufficient credits on account");
        assert!(message.contains("add credits"));
    }

    #[tokio::test]
    async fn test_sends_attribution_headers() {
        let server = StubServer::replying("等价").await;
        let provider = OpenRouterProvider::new(
            "or-key".to_string(),
            Some(server.base_url.clone()),
            5,
            Some("https://example.com".to_string()),
            Some("expression-equivalence".to_string()),
        )
        .unwrap();

        let response = provider
            .create_chat_completion(&chat_request("openai/gpt-4o"))
            .await
            .unwrap();
        assert_eq!(response.first_text(), Some("等价"));

        let requests = server.requests();
        assert_eq!(requests[0].uri, "/chat/completions");
        assert_eq!(requests[0].header("authorization"), Some("Bearer or-key"));
        assert_eq!(requests[0].header("http-referer"), Some("https://example.com"));
        assert_eq!(requests[0].header("x-title"), Some("expression-equivalence"));
    }

    #[tokio::test]
    async fn test_attribution_headers_are_optional() {
        let server = StubServer::replying("等价").await;
        let provider =
            OpenRouterProvider::new("or-key".to_string(), Some(server.base_url.clone()), 5, None, None)
                .unwrap();

        provider
            .create_chat_completion(&chat_request("openai/gpt-4o"))
            .await
            .unwrap();

        let requests = server.requests();
        assert_eq!(requests[0].header("http-referer"), None);
        assert_eq!(requests[0].header("x-title"), None);
    }

    #[tokio::test]
    async fn test_payment_required_means_insufficient_credits() {
        let server = StubServer::start(
            StatusCode::PAYMENT_REQUIRED,
            json!({"error": {"message": "payment required"}}),
        )
        .await;
        let provider =
            OpenRouterProvider::new("or-key".to_string(), Some(server.base_url.clone()), 5, None, None)
                .unwrap();

        let err = provider
            .create_chat_completion(&chat_request("openai/gpt-4o"))
            .await
            .unwrap_err();
        match err {
            ProviderError::BadRequest(message) => assert!(message.contains("Insufficient credits")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_authentication() {
        let server =
            StubServer::start(StatusCode::UNAUTHORIZED, json!({"error": "unauthorized"})).await;
        let provider =
            OpenRouterProvider::new("bad".to_string(), Some(server.base_url.clone()), 5, None, None)
                .unwrap();

        let err = provider
            .create_chat_completion(&chat_request("openai/gpt-4o"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Authentication(_)));
    }
}
