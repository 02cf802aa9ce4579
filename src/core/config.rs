//! Application configuration management
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then the `LLM_API_*` environment variables. Everything is validated at
//! startup so a bad file fails fast instead of on the first check.

use crate::core::constants::{TEMPERATURE_RANGE, defaults, env};
use crate::core::provider::ProviderType;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ApiConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub azure_api_version: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct OpenRouterConfig {
    #[serde(default)]
    pub site_url: Option<String>,
    #[serde(default)]
    pub app_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub verbose: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            verbose: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestConfig {
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
        }
    }
}

fn default_temperature() -> f32 {
    defaults::TEMPERATURE
}

fn default_host() -> String {
    defaults::HOST.to_string()
}

fn default_port() -> u16 {
    defaults::PORT
}

fn default_log_level() -> String {
    defaults::LOG_LEVEL.to_string()
}

fn default_request_timeout() -> u64 {
    defaults::REQUEST_TIMEOUT
}

/// Raw shape of `config.toml`; every section is optional
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub openrouter: OpenRouterConfig,
    #[serde(default)]
    pub check: CheckConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub request: RequestConfig,
}

/// Everything needed to send one equivalence check to the LLM API
#[derive(Clone, PartialEq)]
pub struct ApiSettings {
    pub provider: ProviderType,
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub verbose: bool,

    /// Azure API version (switches the OpenAI provider to Azure mode)
    pub azure_api_version: Option<String>,

    /// OpenRouter specific settings
    pub openrouter_site_url: Option<String>,
    pub openrouter_app_name: Option<String>,

    /// Request timeout in seconds
    pub request_timeout: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            provider: ProviderType::OpenAI,
            base_url: defaults::OPENAI_BASE_URL.to_string(),
            api_key: String::new(),
            model: defaults::MODEL.to_string(),
            temperature: defaults::TEMPERATURE,
            verbose: false,
            azure_api_version: None,
            openrouter_site_url: None,
            openrouter_app_name: None,
            request_timeout: defaults::REQUEST_TIMEOUT,
        }
    }
}

// The API key stays out of logs.
impl fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiSettings")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("verbose", &self.verbose)
            .field("azure_api_version", &self.azure_api_version)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Defaults for every check; the front-end may override them per request
    pub api: ApiSettings,

    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Logging level
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, then apply the environment
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The TOML file cannot be read or parsed
    /// - Configuration values are invalid
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;

        let config: TomlConfig =
            toml::from_str(&content).context("Failed to parse TOML configuration")?;

        Self::from_toml(config, env_lookup)
    }

    /// Load configuration for the process
    ///
    /// An explicitly named file must exist. Otherwise `config.toml` in the
    /// working directory is used when present, and built-in defaults when not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(defaults::CONFIG_FILE).is_file() => {
                Self::from_file(defaults::CONFIG_FILE)
            }
            None => Self::from_toml(TomlConfig::default(), env_lookup),
        }
    }

    /// Merge parsed file contents with environment overrides and validate
    pub fn from_toml<F>(config: TomlConfig, env_var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = match config.provider.as_deref() {
            Some(name) => ProviderType::from_str(name).with_context(|| {
                format!(
                    "Invalid provider '{}'. Must be one of: openai, openrouter \
                     (for Azure OpenAI use provider = \"openai\" with api.azure_api_version)",
                    name
                )
            })?,
            None => ProviderType::default(),
        };

        let default_base_url = match provider {
            ProviderType::OpenAI => defaults::OPENAI_BASE_URL,
            ProviderType::OpenRouter => defaults::OPENROUTER_BASE_URL,
        };

        let base_url = env_var(env::BASE_URL)
            .or(non_blank(config.api.base_url))
            .unwrap_or_else(|| default_base_url.to_string());
        let api_key = env_var(env::API_KEY)
            .or(non_blank(config.api.api_key))
            .unwrap_or_default();
        let model = env_var(env::MODEL)
            .or(non_blank(config.api.model))
            .unwrap_or_else(|| defaults::MODEL.to_string());

        let config = Config {
            api: ApiSettings {
                provider,
                base_url,
                api_key,
                model,
                temperature: config.check.temperature,
                verbose: config.check.verbose,
                azure_api_version: non_blank(config.api.azure_api_version),
                openrouter_site_url: non_blank(config.openrouter.site_url),
                openrouter_app_name: non_blank(config.openrouter.app_name),
                request_timeout: config.request.request_timeout,
            },
            host: config.server.host,
            port: config.server.port,
            log_level: config.server.log_level,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !self.api.temperature.is_finite() || !TEMPERATURE_RANGE.contains(&self.api.temperature)
        {
            bail!(
                "Temperature {} is out of range (expected {} to {})",
                self.api.temperature,
                TEMPERATURE_RANGE.start(),
                TEMPERATURE_RANGE.end()
            );
        }
        if self.port == 0 {
            bail!("Server port must be non-zero");
        }
        if self.api.request_timeout == 0 {
            bail!("Request timeout must be at least one second");
        }
        if self.api.base_url.trim().is_empty() || self.api.model.trim().is_empty() {
            bail!("Base URL and model must not be empty");
        }
        Ok(())
    }

    /// Whether a default API key is configured
    pub fn has_api_key(&self) -> bool {
        !self.api.api_key.trim().is_empty()
    }
}

fn env_lookup(key: &str) -> Option<String> {
    non_blank(std::env::var(key).ok())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
