//! API endpoint handlers
//!
//! This module implements the HTTP endpoints behind the front-end page:
//! the page itself, the check endpoint, the non-secret defaults and a health
//! check.

use crate::api::page::index_page;
use crate::core::config::{ApiSettings, Config};
use crate::core::provider::{Provider, ProviderError, build_provider};
use crate::equivalence::checker::{CheckError, failed_report, prepare, spawn_check};
use crate::models::check::CheckRequest;
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Builds the provider for one check's resolved settings
pub type ProviderFactory =
    Arc<dyn Fn(&ApiSettings) -> Result<Arc<dyn Provider>, ProviderError> + Send + Sync>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub providers: ProviderFactory,
}

impl AppState {
    /// State that talks to the real API for every check
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            providers: Arc::new(build_provider),
        }
    }
}

/// Create the API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/v1/check", post(check_equivalence))
        .route("/v1/settings", get(settings))
        .route("/health", get(health_check))
        .with_state(state)
}

/// GET / - Checker page
async fn root(State(state): State<AppState>) -> Html<String> {
    Html(index_page(&state.config))
}

/// POST /v1/check - Ask the model whether two expressions are equivalent
async fn check_equivalence(
    State(state): State<AppState>,
    payload: Result<Json<CheckRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!("Malformed check request: {}", rejection.body_text());
            return bad_request(rejection.body_text());
        }
    };

    debug!(
        "Incoming check request: expr1_len={}, expr2_len={}, model_override={:?}",
        request.expr1.len(),
        request.expr2.len(),
        request.model
    );

    let (expr1, expr2, settings) = match prepare(&state.config.api, &request) {
        Ok(prepared) => prepared,
        Err(e) => {
            warn!("Rejected check request: {}", e);
            return bad_request(e.to_string());
        }
    };

    let provider = match (state.providers)(&settings) {
        Ok(provider) => provider,
        Err(e) => {
            let report = failed_report(
                Uuid::new_v4(),
                expr1,
                expr2,
                settings.model,
                &CheckError::Provider(e),
            );
            return Json(report).into_response();
        }
    };

    info!(
        "📥 Check request: provider={}, model={}, verbose={}",
        provider.provider_name(),
        settings.model,
        settings.verbose
    );

    let report = spawn_check(provider, expr1, expr2, settings).await;
    Json(report).into_response()
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

/// GET /v1/settings - Configured defaults, without the API key
async fn settings(State(state): State<AppState>) -> impl IntoResponse {
    let api = &state.config.api;
    Json(json!({
        "provider": api.provider.as_str(),
        "base_url": api.base_url,
        "model": api.model,
        "temperature": api.temperature,
        "verbose": api.verbose,
        "api_key_configured": state.config.has_api_key(),
    }))
}

/// GET /health - Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "api_key_configured": state.config.has_api_key(),
    }))
}
