//! Constants for chat roles, verdict keywords and configuration defaults
//!
//! This module defines the string constants shared by prompt construction,
//! response parsing and configuration loading.

/// Message role constants
pub mod role {
    /// User role identifier
    pub const USER: &str = "user";

    /// System role identifier
    pub const SYSTEM: &str = "system";
}

/// Keywords the model is asked to answer with
pub mod keyword {
    /// Answer for equivalent expressions
    pub const EQUIVALENT: &str = "等价";

    /// Answer for non-equivalent expressions
    pub const NOT_EQUIVALENT: &str = "不等价";

    /// Phrases that mean "not equivalent". Checked before [`POSITIVE`]
    /// because every positive keyword is a substring of a negative one.
    pub const NEGATIVE: &[&str] = &[
        NOT_EQUIVALENT,
        "不是等价",
        "not equivalent",
        "non-equivalent",
        "inequivalent",
    ];

    /// Phrases that mean "equivalent"
    pub const POSITIVE: &[&str] = &[EQUIVALENT, "equivalent"];
}

/// Environment variables read as configuration overrides
pub mod env {
    pub const BASE_URL: &str = "LLM_API_BASE_URL";
    pub const API_KEY: &str = "LLM_API_KEY";
    pub const MODEL: &str = "LLM_MODEL";
}

/// Built-in configuration defaults
pub mod defaults {
    pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
    pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
    pub const MODEL: &str = "gpt-3.5-turbo";
    pub const TEMPERATURE: f32 = 0.0;
    pub const HOST: &str = "127.0.0.1";
    pub const PORT: u16 = 8083;
    pub const LOG_LEVEL: &str = "info";

    /// Request timeout in seconds
    pub const REQUEST_TIMEOUT: u64 = 90;

    /// Config file looked up in the working directory when none is named
    pub const CONFIG_FILE: &str = "config.toml";
}

/// Inclusive temperature range accepted by the front-end slider
pub const TEMPERATURE_RANGE: std::ops::RangeInclusive<f32> = 0.0..=1.0;
