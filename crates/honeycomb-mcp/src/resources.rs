//! Dataset resources exposed as `honeycomb://{environment}/{dataset}`.

pub const JSON_MIME_TYPE: &str = "application/json";

/// A parsed `honeycomb://{environment}/{dataset}` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetUri {
    pub environment: String,
    pub dataset: String,
}

impl DatasetUri {
    pub const SCHEME: &'static str = "honeycomb://";

    pub fn format(environment: &str, dataset: &str) -> String {
        format!("{}{environment}/{dataset}", Self::SCHEME)
    }

    pub fn parse(uri: &str) -> Option<Self> {
        let rest = uri.strip_prefix(Self::SCHEME)?;
        let (environment, dataset) = rest.split_once('/')?;
        if environment.is_empty() || dataset.is_empty() || dataset.contains('/') {
            return None;
        }
        Some(Self {
            environment: environment.to_string(),
            dataset: dataset.to_string(),
        })
    }
}
