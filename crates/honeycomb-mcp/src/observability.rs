use clap::ValueEnum;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::ServerError;

pub const DEFAULT_LOG_DIRECTIVES: &str =
    "honeycomb_mcp=info,honeycomb_tools=info,honeycomb_client=info,warn";

#[derive(Clone, Debug, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Set up logs.
///
/// Logs always go to stderr: stdout carries the protocol.
/// `RUST_LOG` replaces [`DEFAULT_LOG_DIRECTIVES`] when set.
///
/// # Errors
///
/// Fails if `RUST_LOG` does not parse or a global subscriber is already installed.
pub fn setup_logs(log_format: &LogFormat) -> Result<(), ServerError> {
    let env_var_name = "RUST_LOG";
    let filter = if std::env::var(env_var_name).is_ok() {
        EnvFilter::builder()
            .with_env_var(env_var_name)
            .from_env()
            .map_err(|e| ServerError::Observability {
                message: format!("Invalid `{env_var_name}` environment variable: {e}"),
            })?
    } else {
        EnvFilter::builder()
            .parse(DEFAULT_LOG_DIRECTIVES)
            .map_err(|e| ServerError::Observability {
                message: format!("Failed to parse default log directives: {e}"),
            })?
    };

    let registry = tracing_subscriber::registry().with(filter);
    let result = match log_format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };
    result.map_err(|e| ServerError::Observability {
        message: format!("Failed to install log subscriber: {e}"),
    })
}
