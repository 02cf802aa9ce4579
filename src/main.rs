//! Expression Equivalence Checker
//!
//! Asks an OpenAI-compatible LLM API whether two math expressions are
//! equivalent. Serves a small web page for interactive use and offers a
//! `check` subcommand for the terminal.

mod api;
mod cli;
mod core;
mod equivalence;
mod models;

use crate::api::endpoints::{AppState, create_router};
use crate::cli::{CheckArgs, Cli, Command, ServeArgs};
use crate::core::config::Config;
use crate::core::logging::init_logging;
use crate::core::provider::build_provider;
use crate::equivalence::checker::{CheckError, failed_report, prepare, run_check};
use crate::models::check::CheckOutcome;
use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration Error: {:#}", e);
            std::process::exit(CheckOutcome::Failed.exit_code());
        }
    };

    // Initialize logging
    init_logging(&config.log_level);

    let code = match cli.command.unwrap_or_default() {
        Command::Serve(args) => match serve(config, args).await {
            Ok(()) => 0,
            Err(e) => {
                error!("Server error: {:#}", e);
                1
            }
        },
        Command::Check(args) => check_once(&config, &args).await,
    };

    std::process::exit(code);
}

/// Run the web front-end until Ctrl-C
async fn serve(mut config: Config, args: ServeArgs) -> Result<()> {
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    config.validate()?;

    print_startup_banner(&config);

    if !config.has_api_key() {
        warn!("No default API key configured; every check must supply one");
    }

    let addr = format!("{}:{}", config.host, config.port);
    let app = create_router(AppState::new(Arc::new(config)));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Checker page available at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server terminated unexpectedly")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

/// Run one check from the command line and return the process exit code
async fn check_once(config: &Config, args: &CheckArgs) -> i32 {
    let (expr1, expr2, settings) = match prepare(&config.api, &args.to_request()) {
        Ok(prepared) => prepared,
        Err(e) => {
            eprintln!("Input error: {}", e);
            return CheckOutcome::Failed.exit_code();
        }
    };

    let report = match build_provider(&settings) {
        Ok(provider) => run_check(provider.as_ref(), &expr1, &expr2, &settings).await,
        Err(e) => failed_report(
            Uuid::new_v4(),
            expr1,
            expr2,
            settings.model,
            &CheckError::Provider(e),
        ),
    };

    println!("{}", report.transcript());
    println!();
    println!("{}", report.status);

    report.outcome.exit_code()
}

/// Print startup banner with configuration
fn print_startup_banner(config: &Config) {
    println!("🧮 Expression Equivalence Checker v{}", env!("CARGO_PKG_VERSION"));
    println!("✅ Configuration loaded successfully");
    println!("   Provider: {}", config.api.provider.as_str());
    println!("   Base URL: {}", config.api.base_url);
    println!("   Model: {}", config.api.model);
    println!("   Temperature: {:.1}", config.api.temperature);
    println!("   Verbose: {}", config.api.verbose);
    println!("   Request Timeout: {}s", config.api.request_timeout);
    println!("   Server: {}:{}", config.host, config.port);
    println!(
        "   Default API Key: {}",
        if config.has_api_key() {
            "Configured"
        } else {
            "Not set"
        }
    );
    println!();
}
