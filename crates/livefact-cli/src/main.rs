//! # livefact
//!
//! Command-line client for the live fact-checking backend: stream a
//! session, check single claims, or probe backend health.

#![deny(unsafe_code)]

mod render;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use livefact_client::transport::{ClaimChecker, HttpClaimChecker, WsConnector};
use livefact_client::{SessionConfig, spawn_session};
use livefact_core::errors::LiveFactError;
use livefact_settings::LiveFactSettings;

/// Live fact-checking client.
#[derive(Parser, Debug)]
#[command(name = "livefact", about = "Live fact-checking client", version)]
struct Cli {
    /// Streaming endpoint (overrides settings).
    #[arg(long, global = true)]
    stream_url: Option<String>,

    /// HTTP API base URL (overrides settings).
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log filter, e.g. `info` or `livefact_client=debug` (overrides settings).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stream a session, printing the view on every change. Ctrl-C stops.
    Listen,
    /// Check a single claim.
    Check {
        /// Claim text; multiple words are joined with spaces.
        #[arg(required = true)]
        claim: Vec<String>,
    },
    /// Probe backend health. Exits non-zero when unhealthy.
    Health,
}

impl Cli {
    fn settings(&self) -> Result<LiveFactSettings> {
        let mut settings = livefact_settings::load_settings().context("Failed to load settings")?;
        if let Some(url) = &self.stream_url {
            settings.backend.stream_url.clone_from(url);
        }
        if let Some(url) = &self.api_url {
            settings.backend.api_url.clone_from(url);
        }
        if let Some(level) = &self.log_level {
            settings.logging.level.clone_from(level);
        }
        settings.validate().context("Invalid settings")?;
        Ok(settings)
    }
}

fn http_checker(settings: &LiveFactSettings) -> Result<HttpClaimChecker> {
    HttpClaimChecker::new(&settings.backend.api_url, settings.backend.request_timeout())
        .context("Failed to build HTTP client")
}

async fn listen(settings: &LiveFactSettings) -> Result<ExitCode> {
    let checker = http_checker(settings)?;
    let handle = spawn_session(
        SessionConfig::from_settings(settings),
        Arc::new(WsConnector::new(settings.backend.connect_timeout())),
        Arc::new(checker),
    );
    tracing::info!(session_id = %handle.id(), "listening");

    let mut updates = handle.subscribe();
    handle.start().await?;
    loop {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                res.context("Failed to listen for Ctrl-C")?;
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                println!("{}\n", render::session(&snapshot));
            }
        }
    }

    handle.stop().await?;
    handle.close().await?;
    handle.shutdown().await?;
    Ok(ExitCode::SUCCESS)
}

async fn check(settings: &LiveFactSettings, claim: &[String]) -> Result<ExitCode> {
    let claim = claim.join(" ");
    if livefact_client::session::validate_claim(&claim).is_err() {
        bail!("Claim is empty");
    }
    match http_checker(settings)?.check(&claim).await {
        Ok(result) => {
            println!("{}", render::result(&result));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            let error = LiveFactError::from(e);
            tracing::debug!(kind = error.error_kind(), %error, "claim check failed");
            eprintln!("{}", error.banner().unwrap_or_else(|| error.to_string()));
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn health(settings: &LiveFactSettings) -> Result<ExitCode> {
    let checker = http_checker(settings)?;
    let healthy = checker
        .health()
        .await
        .with_context(|| format!("Backend at {} is unreachable", settings.backend.api_url))?;
    if healthy {
        println!("healthy");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("unhealthy");
        Ok(ExitCode::FAILURE)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let settings = cli.settings()?;
    livefact_core::logging::init_subscriber(&settings.logging.level);

    match &cli.command {
        Command::Listen => listen(&settings).await,
        Command::Check { claim } => check(&settings, claim).await,
        Command::Health => health(&settings).await,
    }
}
