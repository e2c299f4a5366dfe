//! Response types for the Honeycomb API.
//!
//! Only the fields this crate reasons about are typed. Everything else the server sends
//! is kept in an `extra` map so a decoded body can be re-serialized unchanged.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A named collection of events within an environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub name: String,
    pub slug: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Dataset {
    pub fn description(&self) -> Option<&str> {
        str_field(&self.extra, "description")
    }
}

/// The value type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Integer,
    Float,
    Boolean,
    #[serde(other)]
    Unknown,
}

impl ColumnType {
    /// Parses the API's `type` string. Anything unrecognized is [`ColumnType::Unknown`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "string" => ColumnType::String,
            "integer" => ColumnType::Integer,
            "float" => ColumnType::Float,
            "boolean" => ColumnType::Boolean,
            _ => ColumnType::Unknown,
        }
    }

    /// Whether numeric aggregations (AVG, P95, ...) make sense for this type.
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

/// A named, typed field within a dataset's events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub key_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Column {
    pub fn column_type(&self) -> ColumnType {
        str_field(&self.extra, "type").map_or(ColumnType::Unknown, ColumnType::from_name)
    }

    /// Hidden columns are omitted from default listings. Absent means visible.
    pub fn hidden(&self) -> bool {
        bool_field(&self.extra, "hidden")
    }

    pub fn description(&self) -> Option<&str> {
        str_field(&self.extra, "description")
    }
}

/// The server's echo of a submitted query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedQuery {
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One row of a query result.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryResultRow {
    #[serde(default)]
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryResultData {
    #[serde(default)]
    pub results: Vec<QueryResultRow>,
    #[serde(default)]
    pub series: Vec<Value>,
}

/// Links into the Honeycomb UI for a query result.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryResultLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_image_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The asynchronously computed output of a query.
///
/// The same `id` is polled until `complete` becomes true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub id: String,
    #[serde(default)]
    pub complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<QueryResultData>,
    #[serde(default)]
    pub links: QueryResultLinks,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body for `POST /1/query_results/{dataset}`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateQueryResultRequest {
    pub query_id: String,
    pub disable_series: bool,
}

/// A service level objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slo {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Slo {
    pub fn description(&self) -> Option<&str> {
        str_field(&self.extra, "description")
    }
}

/// A trigger (alert) definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Trigger {
    pub fn description(&self) -> Option<&str> {
        str_field(&self.extra, "description")
    }

    pub fn disabled(&self) -> bool {
        bool_field(&self.extra, "disabled")
    }

    pub fn triggered(&self) -> bool {
        bool_field(&self.extra, "triggered")
    }
}

fn str_field<'a>(extra: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    extra.get(key).and_then(Value::as_str)
}

fn bool_field(extra: &Map<String, Value>, key: &str) -> bool {
    extra.get(key).and_then(Value::as_bool).unwrap_or(false)
}
