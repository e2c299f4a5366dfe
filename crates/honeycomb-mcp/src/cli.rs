//! CLI argument definitions for the Honeycomb MCP server.

use clap::Parser;
use std::path::PathBuf;

use crate::observability::LogFormat;

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Path to a TOML file listing Honeycomb environments. Environment variables are
    /// merged in after the file.
    #[arg(long, env = "HONEYCOMB_MCP_CONFIG")]
    pub config_file: Option<PathBuf>,

    /// Sets the log format used for all server logs (written to stderr).
    #[arg(long)]
    #[arg(value_enum)]
    #[clap(default_value_t = LogFormat::default())]
    pub log_format: LogFormat,
}
