//! Named Honeycomb environments.
//!
//! An [`EnvironmentRegistry`] is built once at startup and never mutated afterwards.
//! Every request resolves its environment by name through the registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::HoneycombError;

/// Default base URL for the Honeycomb API.
pub const DEFAULT_BASE_URL: &str = "https://api.honeycomb.io";

/// Returns the default base URL as a parsed [`Url`].
///
/// # Panics
///
/// Never in practice: the constant is checked by a unit test.
pub fn default_base_url() -> Url {
    // SAFETY: DEFAULT_BASE_URL is a compile-time constant that is a valid URL.
    // This is tested in unit tests.
    #[expect(clippy::expect_used)]
    Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is a valid URL")
}

/// A single Honeycomb account/region: where to send requests and which key to send.
#[derive(Clone)]
pub struct Environment {
    name: String,
    base_url: Url,
    api_key: SecretString,
}

impl Environment {
    /// Creates an environment pointing at [`DEFAULT_BASE_URL`].
    pub fn new(name: impl Into<String>, api_key: impl Into<SecretString>) -> Self {
        Self {
            name: name.into(),
            base_url: default_base_url(),
            api_key: api_key.into(),
        }
    }

    /// Overrides the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    /// The API key as a sensitive header value.
    ///
    /// # Errors
    ///
    /// Returns [`HoneycombError::InvalidApiKey`] if the key contains characters that
    /// cannot appear in a header, such as a trailing newline.
    pub fn api_key_header(&self) -> Result<HeaderValue, HoneycombError> {
        let mut value = HeaderValue::from_str(self.api_key.expose_secret()).map_err(|_| {
            HoneycombError::InvalidApiKey {
                environment: self.name.clone(),
            }
        })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Immutable lookup of environments by name.
///
/// Registration order is preserved so that listings are stable.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentRegistry {
    by_name: HashMap<String, usize>,
    environments: Vec<Arc<Environment>>,
}

impl EnvironmentRegistry {
    /// Builds a registry from a list of environments.
    ///
    /// When two environments share a name, the first one wins.
    pub fn new(environments: impl IntoIterator<Item = Environment>) -> Self {
        let mut registry = Self::default();
        for environment in environments {
            if registry.by_name.contains_key(environment.name()) {
                tracing::warn!(
                    environment = environment.name(),
                    "Ignoring duplicate environment"
                );
                continue;
            }
            registry
                .by_name
                .insert(environment.name().to_string(), registry.environments.len());
            registry.environments.push(Arc::new(environment));
        }
        registry
    }

    /// Resolves an environment by name.
    ///
    /// # Errors
    ///
    /// Returns [`HoneycombError::UnknownEnvironment`] if no environment has that name.
    pub fn get(&self, name: &str) -> Result<&Arc<Environment>, HoneycombError> {
        self.by_name
            .get(name)
            .and_then(|index| self.environments.get(*index))
            .ok_or_else(|| HoneycombError::UnknownEnvironment {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Environment names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.environments.iter().map(|e| e.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.environments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }
}
