use std::fmt::Display;

use clap::Parser;
use honeycomb_mcp::cli::Args;
use honeycomb_mcp::observability;
use honeycomb_mcp::server::{SERVER_NAME, SERVER_VERSION};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    // Set up logs immediately, so that we can use `tracing`.
    observability::setup_logs(&args.log_format).expect_pretty("Failed to set up logs");

    tracing::info!("Starting {SERVER_NAME} {SERVER_VERSION}");

    honeycomb_mcp::run(args.config_file.as_deref())
        .await
        .expect_pretty("MCP server stopped");
    tracing::info!("{SERVER_NAME} shut down");
}

/// Startup failures are fatal: log the error and exit with status 1.
/// Only for use in `main`.
trait ExpectPretty<T> {
    fn expect_pretty(self, msg: &str) -> T;
}

impl<T, E: Display> ExpectPretty<T> for Result<T, E> {
    fn expect_pretty(self, msg: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::error!("{msg}: {err}");
                std::process::exit(1);
            }
        }
    }
}
