//! Running one equivalence check
//!
//! A check resolves its API settings, validates the inputs, sends the prompt
//! and turns the reply into a [`CheckReport`]. The report carries the same
//! transcript the front-end shows in its result area.

use crate::core::config::ApiSettings;
use crate::core::constants::TEMPERATURE_RANGE;
use crate::core::provider::{Provider, ProviderError};
use crate::equivalence::prompt::generate_prompt;
use crate::equivalence::verdict::{Verdict, parse_equivalence_result};
use crate::models::check::{CheckOutcome, CheckReport, CheckRequest};
use crate::models::openai::OpenAIChatCompletionRequest;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Errors surfaced by a check
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Please fill in the API settings (base URL, API key and model)")]
    MissingApiSettings,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Check task failed: {0}")]
    Task(String),
}

fn same_endpoint(a: &str, b: &str) -> bool {
    a.trim().trim_end_matches('/') == b.trim().trim_end_matches('/')
}

/// Apply the non-blank overrides in `request` on top of `defaults`
///
/// The configured API key is only reused for the configured base URL. A
/// request that points somewhere else must bring its own key.
pub fn resolve_settings(defaults: &ApiSettings, request: &CheckRequest) -> ApiSettings {
    let pick = |value: &Option<String>, fallback: &str| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(fallback.trim())
            .to_string()
    };

    let base_url = pick(&request.base_url, &defaults.base_url);
    let key_fallback = if same_endpoint(&base_url, &defaults.base_url) {
        defaults.api_key.as_str()
    } else {
        ""
    };

    ApiSettings {
        api_key: pick(&request.api_key, key_fallback),
        base_url,
        model: pick(&request.model, &defaults.model),
        temperature: request.temperature.unwrap_or(defaults.temperature),
        verbose: request.verbose.unwrap_or(defaults.verbose),
        ..defaults.clone()
    }
}

/// Check that a request is complete enough to send
pub fn validate(request: &CheckRequest, settings: &ApiSettings) -> Result<(), CheckError> {
    if request.expr1.trim().is_empty() || request.expr2.trim().is_empty() {
        return Err(CheckError::InvalidInput(
            "Please enter both expressions".to_string(),
        ));
    }

    if settings.base_url.is_empty() || settings.api_key.is_empty() || settings.model.is_empty()
    {
        return Err(CheckError::MissingApiSettings);
    }

    if !settings.temperature.is_finite() || !TEMPERATURE_RANGE.contains(&settings.temperature) {
        return Err(CheckError::InvalidInput(format!(
            "Temperature must be between {:.1} and {:.1}",
            TEMPERATURE_RANGE.start(),
            TEMPERATURE_RANGE.end()
        )));
    }

    Ok(())
}

/// Resolve and validate a request in one go
///
/// Returns the trimmed expressions and the settings to use.
pub fn prepare(
    defaults: &ApiSettings,
    request: &CheckRequest,
) -> Result<(String, String, ApiSettings), CheckError> {
    let settings = resolve_settings(defaults, request);
    validate(request, &settings)?;
    Ok((
        request.expr1.trim().to_string(),
        request.expr2.trim().to_string(),
        settings,
    ))
}

/// Accumulates the lines shown in the result area
#[derive(Debug, Default)]
struct Transcript {
    lines: Vec<String>,
}

impl Transcript {
    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}

/// Run one check on the current task
pub async fn run_check(
    provider: &dyn Provider,
    expr1: &str,
    expr2: &str,
    settings: &ApiSettings,
) -> CheckReport {
    run_check_with_id(Uuid::new_v4(), provider, expr1, expr2, settings).await
}

/// Run one check on its own spawned task
///
/// The caller only awaits the result, so an HTTP handler stays responsive
/// while the API call is in flight. A task that panics still produces a
/// `Failed` report.
pub async fn spawn_check(
    provider: Arc<dyn Provider>,
    expr1: String,
    expr2: String,
    settings: ApiSettings,
) -> CheckReport {
    let id = Uuid::new_v4();
    let model = settings.model.clone();

    let handle = {
        let expr1 = expr1.clone();
        let expr2 = expr2.clone();
        tokio::spawn(async move {
            run_check_with_id(id, provider.as_ref(), &expr1, &expr2, &settings).await
        })
    };

    match handle.await {
        Ok(report) => report,
        Err(e) => {
            warn!(check_id = %id, "Check task did not complete: {}", e);
            failed_report(id, expr1, expr2, model, &CheckError::Task(e.to_string()))
        }
    }
}

/// Build a `Failed` report for an error raised before or outside the API call
pub fn failed_report(
    id: Uuid,
    expr1: String,
    expr2: String,
    model: String,
    error: &CheckError,
) -> CheckReport {
    let message = error.to_string();
    CheckReport {
        id,
        outcome: CheckOutcome::Failed,
        expr1,
        expr2,
        model,
        lines: vec![format!("Error: {}", message)],
        status: format!("Error: {}", message),
        raw_response: None,
        error: Some(message),
        elapsed_ms: 0,
    }
}

async fn run_check_with_id(
    id: Uuid,
    provider: &dyn Provider,
    expr1: &str,
    expr2: &str,
    settings: &ApiSettings,
) -> CheckReport {
    let started = Instant::now();
    let mut transcript = Transcript::default();

    info!(
        check_id = %id,
        provider = provider.provider_name(),
        model = %settings.model,
        "Starting equivalence check"
    );

    let result = exchange(provider, expr1, expr2, settings, &mut transcript).await;
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let (outcome, status, raw_response, error) = match result {
        Ok((verdict, raw)) => {
            transcript.push("Result:");
            transcript.push(format!("Expression 1: {}", expr1));
            transcript.push(format!("Expression 2: {}", expr2));

            let status = match verdict {
                Verdict::Equivalent => {
                    transcript.push("Conclusion: equivalent ✓");
                    "Done: equivalent"
                }
                Verdict::NotEquivalent => {
                    transcript.push("Conclusion: not equivalent ✗");
                    "Done: not equivalent"
                }
                Verdict::Unknown => {
                    transcript.push("Conclusion: undetermined (?)");
                    transcript.push(format!("Raw response: {}", raw));
                    transcript.push(
                        "Hint: the response contained neither the 'equivalent' nor the 'not equivalent' keyword",
                    );
                    "Done: undetermined"
                }
            };
            (CheckOutcome::from(verdict), status.to_string(), Some(raw), None)
        }
        Err(e) => {
            let message = e.to_string();
            warn!(check_id = %id, "Equivalence check failed: {}", message);
            transcript.push(format!("Error: {}", message));
            (
                CheckOutcome::Failed,
                format!("Error: {}", message),
                None,
                Some(message),
            )
        }
    };

    info!(check_id = %id, outcome = ?outcome, elapsed_ms, "Finished equivalence check");

    CheckReport {
        id,
        outcome,
        expr1: expr1.to_string(),
        expr2: expr2.to_string(),
        model: settings.model.clone(),
        lines: transcript.lines,
        status,
        raw_response,
        error,
        elapsed_ms,
    }
}

async fn exchange(
    provider: &dyn Provider,
    expr1: &str,
    expr2: &str,
    settings: &ApiSettings,
    transcript: &mut Transcript,
) -> Result<(Verdict, String), CheckError> {
    let messages = generate_prompt(expr1, expr2);

    if settings.verbose {
        transcript.push("Generated prompt:");
        for message in &messages {
            transcript.push(format!(
                "{}: {}",
                message.role,
                message.text_content().unwrap_or_default()
            ));
        }
        transcript.push("");
    }

    transcript.push("Calling API to determine whether the expressions are equivalent...");

    let request = OpenAIChatCompletionRequest {
        model: settings.model.clone(),
        messages,
        temperature: Some(settings.temperature),
        stream: false,
    };

    let response = provider.create_chat_completion(&request).await?;
    let text = response.first_text().ok_or_else(|| {
        ProviderError::Unexpected("API response contained no message content".to_string())
    })?;

    if settings.verbose {
        transcript.push(format!("Raw API response: {}", text));
        transcript.push("");
    }

    Ok(parse_equivalence_result(text))
}
