// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reconnect - outreach campaign analytics.
//!
//! Binary entry point: serves the dashboard API or prints one aggregation.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod report;
mod serve;
mod shutdown;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use reconnect_config::ReconnectConfig;

/// Reconnect - outreach campaign analytics.
#[derive(Parser, Debug)]
#[command(name = "reconnect", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the dashboard API until interrupted.
    Serve,
    /// Run one aggregation and print it as JSON.
    Report(report::ReportArgs),
    /// Validate configuration and exit.
    CheckConfig,
}

fn load_config(path: Option<&PathBuf>) -> Result<ReconnectConfig, Vec<reconnect_config::ConfigError>> {
    match path {
        Some(path) => reconnect_config::load_and_validate_path(path),
        None => reconnect_config::load_and_validate(),
    }
}

/// Installs the tracing subscriber. Output goes to stderr so reports keep
/// stdout clean.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("reconnect={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(errors) => {
            reconnect_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    if matches!(cli.command, Commands::CheckConfig) {
        println!(
            "reconnect: config ok (service.name={}, storage.database_path={})",
            config.service.name, config.storage.database_path
        );
        return ExitCode::SUCCESS;
    }

    init_tracing(&config.service.log_level);

    let result = match cli.command {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Report(args) => report::run_report(config, args).await,
        Commands::CheckConfig => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("reconnect: {e}");
            ExitCode::FAILURE
        }
    }
}
