//! Command line interface

use crate::models::check::CheckRequest;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Ask an LLM whether two math expressions are equivalent
#[derive(Debug, Parser)]
#[command(name = "expression-equivalence", version)]
pub struct Cli {
    /// Path to a TOML configuration file (default: ./config.toml if present)
    #[arg(long, global = true, env = "CONFIG_PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the checker page (default)
    Serve(ServeArgs),

    /// Check two expressions once and print the result
    Check(CheckArgs),
}

impl Default for Command {
    fn default() -> Self {
        Command::Serve(ServeArgs::default())
    }
}

#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    /// Host to bind, overrides `[server] host`
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind, overrides `[server] port`
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// First expression
    pub expr1: String,

    /// Second expression
    pub expr2: String,

    /// API base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// API key
    #[arg(long)]
    pub api_key: Option<String>,

    /// Model name
    #[arg(long)]
    pub model: Option<String>,

    /// Sampling temperature, 0.0 to 1.0
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Print the prompt and the raw API response
    #[arg(short, long)]
    pub verbose: bool,
}

impl CheckArgs {
    pub fn to_request(&self) -> CheckRequest {
        CheckRequest {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            verbose: self.verbose.then_some(true),
            ..CheckRequest::new(self.expr1.clone(), self.expr2.clone())
        }
    }
}
