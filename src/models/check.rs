//! Check request and report models
//!
//! Shared by the JSON endpoint and the `check` subcommand.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A request to compare two expressions
///
/// Every API field is an optional override of the configured default. Blank
/// strings count as "not set".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckRequest {
    pub expr1: String,
    pub expr2: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub verbose: Option<bool>,
}

impl CheckRequest {
    pub fn new(expr1: impl Into<String>, expr2: impl Into<String>) -> Self {
        Self {
            expr1: expr1.into(),
            expr2: expr2.into(),
            ..Self::default()
        }
    }
}

/// How a check ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    Equivalent,
    NotEquivalent,
    Unknown,
    Failed,
}

impl CheckOutcome {
    /// Process exit code used by the `check` subcommand
    pub fn exit_code(self) -> i32 {
        match self {
            CheckOutcome::Equivalent => 0,
            CheckOutcome::NotEquivalent => 1,
            CheckOutcome::Unknown => 2,
            CheckOutcome::Failed => 3,
        }
    }
}

/// Result of one check, rendered by the front-end as-is
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub id: Uuid,
    pub outcome: CheckOutcome,
    pub expr1: String,
    pub expr2: String,
    pub model: String,
    /// Lines for the result area, in display order
    pub lines: Vec<String>,
    /// Single line for the status bar
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

impl CheckReport {
    pub fn transcript(&self) -> String {
        self.lines.join("\n")
    }
}
