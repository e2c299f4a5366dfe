//! Server configuration: a TOML file plus environment variables.
//!
//! ```toml
//! [[environments]]
//! name = "prod"
//! api_key = "..."
//! base_url = "https://api.honeycomb.io"   # optional
//!
//! [query]
//! max_poll_attempts = 10
//! poll_interval_ms = 1000
//!
//! [http]
//! timeout_secs = 30
//! ```
//!
//! Environment variables add environments after the file's:
//! - `HONEYCOMB_ENV_<NAME>_API_KEY` (and optionally `HONEYCOMB_ENV_<NAME>_API_ENDPOINT`)
//!   defines environment `<name>`, lowercased.
//! - `HONEYCOMB_API_KEY` (and optionally `HONEYCOMB_API_ENDPOINT`) defines the environment
//!   named by `HONEYCOMB_ENVIRONMENT`, or `default`.
//!
//! When the same name is defined more than once, the file wins over
//! `HONEYCOMB_ENV_*`, which wins over `HONEYCOMB_API_KEY`.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use honeycomb_client::{Environment, HoneycombClient, HoneycombError, PollConfig};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const ENV_PREFIX: &str = "HONEYCOMB_ENV_";
const API_KEY_SUFFIX: &str = "_API_KEY";
const API_ENDPOINT_SUFFIX: &str = "_API_ENDPOINT";
const DEFAULT_ENVIRONMENT_NAME: &str = "default";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file `{path}`: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Environment `{name}` is defined more than once in the config file")]
    DuplicateEnvironment { name: String },

    #[error("Environment `{name}` has no API key")]
    MissingApiKey { name: String },

    #[error("Environment `{name}` has an API key that cannot be sent as a header value")]
    InvalidApiKey { name: String },

    #[error("Environment `{name}` has an invalid base URL `{url}`: {message}")]
    InvalidBaseUrl {
        name: String,
        url: String,
        message: String,
    },

    #[error("Invalid query settings: {message}")]
    InvalidQuerySettings { message: String },

    #[error(
        "No Honeycomb environments configured. Set HONEYCOMB_API_KEY or add [[environments]] to the config file"
    )]
    NoEnvironments,
}

// No `Debug`: holds the raw API key.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct EnvironmentEntry {
    name: String,
    api_key: String,
    #[serde(default)]
    base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct QuerySettings {
    max_poll_attempts: Option<u32>,
    poll_interval_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct HttpSettings {
    timeout_secs: Option<u64>,
}

#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    environments: Vec<EnvironmentEntry>,
    #[serde(default)]
    query: QuerySettings,
    #[serde(default)]
    http: HttpSettings,
}

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub environments: Vec<Environment>,
    pub poll_config: PollConfig,
    pub http_timeout: Option<Duration>,
}

/// Keys are trimmed; what remains must be sendable as a header value.
fn environment(
    name: String,
    api_key: String,
    base_url: Option<String>,
) -> Result<Environment, ConfigError> {
    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err(ConfigError::MissingApiKey { name });
    }
    let mut environment = Environment::new(name.clone(), SecretString::from(api_key.to_string()));
    if environment.api_key_header().is_err() {
        return Err(ConfigError::InvalidApiKey { name });
    }
    if let Some(url) = base_url {
        let parsed = Url::parse(&url).map_err(|e| ConfigError::InvalidBaseUrl {
            name,
            url: url.clone(),
            message: e.to_string(),
        })?;
        environment = environment.with_base_url(parsed);
    }
    Ok(environment)
}

#[derive(Default)]
struct EnvVarEntry {
    api_key: Option<String>,
    endpoint: Option<String>,
}

/// Environments defined through process environment variables, in precedence order.
fn environments_from_vars(
    vars: impl IntoIterator<Item = (String, String)>,
) -> Result<Vec<Environment>, ConfigError> {
    let mut named: BTreeMap<String, EnvVarEntry> = BTreeMap::new();
    let mut default_key = None;
    let mut default_endpoint = None;
    let mut default_name = None;

    for (key, value) in vars {
        match key.as_str() {
            "HONEYCOMB_API_KEY" => default_key = Some(value),
            "HONEYCOMB_API_ENDPOINT" => default_endpoint = Some(value),
            "HONEYCOMB_ENVIRONMENT" => default_name = Some(value),
            _ => {
                let Some(rest) = key.strip_prefix(ENV_PREFIX) else {
                    continue;
                };
                if let Some(name) = rest.strip_suffix(API_KEY_SUFFIX) {
                    if !name.is_empty() {
                        named.entry(name.to_lowercase()).or_default().api_key = Some(value);
                    }
                } else if let Some(name) = rest.strip_suffix(API_ENDPOINT_SUFFIX)
                    && !name.is_empty()
                {
                    named.entry(name.to_lowercase()).or_default().endpoint = Some(value);
                }
            }
        }
    }

    let mut environments = Vec::new();
    for (name, entry) in named {
        let api_key = entry.api_key.unwrap_or_default();
        environments.push(environment(name, api_key, entry.endpoint)?);
    }
    if let Some(api_key) = default_key {
        let name = default_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT_NAME.to_string());
        environments.push(environment(name, api_key, default_endpoint)?);
    }
    Ok(environments)
}

impl Config {
    /// Loads the config file (if any) and merges in the process environment.
    ///
    /// # Errors
    ///
    /// See [`ConfigError`].
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Some((path, contents))
            }
            None => None,
        };
        Self::from_sources(
            file.as_ref().map(|(path, contents)| (*path, contents.as_str())),
            std::env::vars(),
        )
    }

    /// Builds a config from TOML text and a set of environment variables.
    ///
    /// # Errors
    ///
    /// See [`ConfigError`].
    pub fn from_sources(
        file: Option<(&Path, &str)>,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self, ConfigError> {
        let file: ConfigFile = match file {
            Some((path, contents)) => toml::from_str(contents).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?,
            None => ConfigFile::default(),
        };

        let mut seen = HashSet::new();
        let mut environments = Vec::new();
        for entry in file.environments {
            if !seen.insert(entry.name.clone()) {
                return Err(ConfigError::DuplicateEnvironment { name: entry.name });
            }
            environments.push(environment(entry.name, entry.api_key, entry.base_url)?);
        }

        for environment in environments_from_vars(vars)? {
            if seen.insert(environment.name().to_string()) {
                environments.push(environment);
            } else {
                tracing::debug!(
                    environment = environment.name(),
                    "Ignoring environment variables for an environment that is already defined"
                );
            }
        }

        if environments.is_empty() {
            return Err(ConfigError::NoEnvironments);
        }

        let mut poll_config = PollConfig::default();
        if let Some(max_attempts) = file.query.max_poll_attempts {
            if max_attempts == 0 {
                return Err(ConfigError::InvalidQuerySettings {
                    message: "`max_poll_attempts` must be at least 1".to_string(),
                });
            }
            poll_config.max_attempts = max_attempts;
        }
        if let Some(interval_ms) = file.query.poll_interval_ms {
            poll_config.interval = Duration::from_millis(interval_ms);
        }
        if poll_config != PollConfig::default() {
            tracing::info!(
                max_attempts = poll_config.max_attempts,
                interval_ms = poll_config.interval.as_millis(),
                "Using non-default query polling settings"
            );
        }

        Ok(Self {
            environments,
            poll_config,
            http_timeout: file.http.timeout_secs.map(Duration::from_secs),
        })
    }

    /// Builds a client for every configured environment.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be constructed.
    pub fn build_client(&self) -> Result<HoneycombClient, HoneycombError> {
        let mut builder = HoneycombClient::builder()
            .environments(self.environments.iter().cloned())
            .poll_config(self.poll_config);
        if let Some(timeout) = self.http_timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}
