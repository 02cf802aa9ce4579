//! Provider abstraction layer for OpenAI-compatible LLM APIs
//!
//! This module defines the common trait the equivalence checker talks to and
//! the factory that picks an implementation for a set of API settings.

use crate::core::config::ApiSettings;
use crate::core::providers::{OpenAIProvider, OpenRouterProvider};
use crate::models::openai::{OpenAIChatCompletionRequest, OpenAIChatCompletionResponse};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Error types for provider operations
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ProviderError {
    /// Map a non-success HTTP status and its (already classified) body
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => ProviderError::Authentication(message),
            429 => ProviderError::RateLimit(message),
            400 => ProviderError::BadRequest(message),
            _ => ProviderError::ApiError { status, message },
        }
    }
}

/// Trait for LLM API providers
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send a non-streaming chat completion request
    async fn create_chat_completion(
        &self,
        request: &OpenAIChatCompletionRequest,
    ) -> Result<OpenAIChatCompletionResponse, ProviderError>;

    /// Get the provider name
    fn provider_name(&self) -> &str;
}

/// Supported provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderType {
    #[default]
    OpenAI,
    OpenRouter,
}

impl ProviderType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Some(ProviderType::OpenAI),
            "openrouter" => Some(ProviderType::OpenRouter),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::OpenAI => "openai",
            ProviderType::OpenRouter => "openrouter",
        }
    }
}

/// Classify API error bodies and provide helpful messages
pub fn classify_error(error_detail: &str) -> String {
    let error_lower = error_detail.to_lowercase();

    if error_lower.contains("unsupported_country_region_territory")
        || error_lower.contains("country, region, or territory not supported")
    {
        return "The API is not available in your region. Consider a different base URL or an Azure OpenAI deployment.".to_string();
    }

    if error_lower.contains("invalid_api_key") || error_lower.contains("unauthorized") {
        return "Invalid API key. Please check the API key field or LLM_API_KEY.".to_string();
    }

    if error_lower.contains("rate_limit") || error_lower.contains("quota") {
        return "Rate limit exceeded. Please wait and try again, or upgrade your API plan."
            .to_string();
    }

    if error_lower.contains("model")
        && (error_lower.contains("not found") || error_lower.contains("does not exist"))
    {
        return "Model not found. Please check the model name or LLM_MODEL.".to_string();
    }

    if error_lower.contains("billing") || error_lower.contains("payment") {
        return "Billing issue. Please check your account billing status.".to_string();
    }

    error_detail.to_string()
}

/// Create the provider matching `settings`
///
/// # Errors
///
/// Returns `ProviderError::Unexpected` if the HTTP client cannot be built.
pub fn build_provider(settings: &ApiSettings) -> Result<Arc<dyn Provider>, ProviderError> {
    let provider: Arc<dyn Provider> = match settings.provider {
        ProviderType::OpenAI => Arc::new(OpenAIProvider::new(
            settings.api_key.clone(),
            settings.base_url.clone(),
            settings.request_timeout,
            settings.azure_api_version.clone(),
        )?),
        ProviderType::OpenRouter => Arc::new(OpenRouterProvider::new(
            settings.api_key.clone(),
            Some(settings.base_url.clone()),
            settings.request_timeout,
            settings.openrouter_site_url.clone(),
            settings.openrouter_app_name.clone(),
        )?),
    };
    Ok(provider)
}
