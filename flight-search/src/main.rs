//! Flight Search Main Entry Point
//!
//! Reads settings from the environment, connects to the search backend and
//! runs a single command, printing its result as JSON on stdout.

use clap::Parser;
use dotenv::dotenv;
use flight_search::cli::{self, Cli};
use flight_search::{AppError, Dependencies, Settings};
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
///
/// Logs go to stderr so that stdout carries only command output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("flight_search=info,flight_search_repository=info"));

    let json_logs = env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    let args = Cli::parse();

    info!(
        service_name = "flight-search",
        service_version = env!("CARGO_PKG_VERSION"),
        command = args.command.name(),
        "Starting flight search"
    );

    let settings = Settings::from_env()?;

    let deps = match Dependencies::new(&settings).await {
        Ok(deps) => deps,
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    match cli::run(args.command, &deps.service).await {
        Ok(output) => {
            let rendered = serde_json::to_string_pretty(&output)
                .map_err(|e| AppError::output(e.to_string()))?;
            println!("{}", rendered);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Command failed");
            Err(e)
        }
    }
}
