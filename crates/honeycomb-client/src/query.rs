//! Typed query bodies for `POST /1/queries/{dataset}`.
//!
//! Queries are validated locally with [`AnalysisQuery::validate`] before they are sent,
//! so obviously malformed requests never reach the API.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::HoneycombError;

/// Default query window: the last hour.
pub const DEFAULT_TIME_RANGE_SECONDS: u64 = 3600;

/// Largest `limit` the API accepts.
pub const MAX_QUERY_LIMIT: u32 = 1000;

/// Aggregation applied by a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalculationOp {
    Count,
    Concurrency,
    Sum,
    Avg,
    CountDistinct,
    Heatmap,
    Max,
    Min,
    P001,
    P01,
    P05,
    P10,
    P25,
    P50,
    P75,
    P90,
    P95,
    P99,
    P999,
    RateAvg,
    RateSum,
    RateMax,
}

impl CalculationOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CalculationOp::Count => "COUNT",
            CalculationOp::Concurrency => "CONCURRENCY",
            CalculationOp::Sum => "SUM",
            CalculationOp::Avg => "AVG",
            CalculationOp::CountDistinct => "COUNT_DISTINCT",
            CalculationOp::Heatmap => "HEATMAP",
            CalculationOp::Max => "MAX",
            CalculationOp::Min => "MIN",
            CalculationOp::P001 => "P001",
            CalculationOp::P01 => "P01",
            CalculationOp::P05 => "P05",
            CalculationOp::P10 => "P10",
            CalculationOp::P25 => "P25",
            CalculationOp::P50 => "P50",
            CalculationOp::P75 => "P75",
            CalculationOp::P90 => "P90",
            CalculationOp::P95 => "P95",
            CalculationOp::P99 => "P99",
            CalculationOp::P999 => "P999",
            CalculationOp::RateAvg => "RATE_AVG",
            CalculationOp::RateSum => "RATE_SUM",
            CalculationOp::RateMax => "RATE_MAX",
        }
    }

    /// COUNT and CONCURRENCY operate on whole events; every other op needs a column.
    pub fn requires_column(self) -> bool {
        !matches!(self, CalculationOp::Count | CalculationOp::Concurrency)
    }
}

impl fmt::Display for CalculationOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single aggregation, e.g. `COUNT` or `P95(duration_ms)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Calculation {
    pub op: CalculationOp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

impl Calculation {
    pub fn new(op: CalculationOp, column: Option<String>) -> Self {
        Self { op, column }
    }

    pub fn count() -> Self {
        Self::new(CalculationOp::Count, None)
    }

    pub fn on(op: CalculationOp, column: impl Into<String>) -> Self {
        Self::new(op, Some(column.into()))
    }

    /// The key Honeycomb uses for this calculation in result rows, e.g. `AVG(duration_ms)`.
    pub fn result_key(&self) -> String {
        match &self.column {
            Some(column) => format!("{}({column})", self.op),
            None => self.op.to_string(),
        }
    }
}

/// Comparison applied by a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum FilterOp {
    #[serde(rename = "=")]
    Equals,
    #[serde(rename = "!=")]
    NotEquals,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanOrEqual,
    #[serde(rename = "starts-with")]
    StartsWith,
    #[serde(rename = "does-not-start-with")]
    DoesNotStartWith,
    #[serde(rename = "ends-with")]
    EndsWith,
    #[serde(rename = "does-not-end-with")]
    DoesNotEndWith,
    #[serde(rename = "exists")]
    Exists,
    #[serde(rename = "does-not-exist")]
    DoesNotExist,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "does-not-contain")]
    DoesNotContain,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "not-in")]
    NotIn,
}

impl FilterOp {
    fn takes_value(self) -> bool {
        !matches!(self, FilterOp::Exists | FilterOp::DoesNotExist)
    }

    fn takes_list(self) -> bool {
        matches!(self, FilterOp::In | FilterOp::NotIn)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Filter {
    pub fn new(column: impl Into<String>, op: FilterOp, value: Option<Value>) -> Self {
        Self {
            column: column.into(),
            op,
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum FilterCombination {
    #[default]
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    Ascending,
    Descending,
}

/// Sort key for result rows: either a calculation (`op` set) or a breakdown column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op: Option<CalculationOp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderDirection>,
}

impl Order {
    pub fn by_calculation(calculation: &Calculation, order: OrderDirection) -> Self {
        Self {
            op: Some(calculation.op),
            column: calculation.column.clone(),
            order: Some(order),
        }
    }

    pub fn by_column(column: impl Into<String>, order: OrderDirection) -> Self {
        Self {
            op: None,
            column: Some(column.into()),
            order: Some(order),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum HavingOp {
    #[serde(rename = "=")]
    Equals,
    #[serde(rename = "!=")]
    NotEquals,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanOrEqual,
}

/// Post-aggregation filter on a calculation's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Having {
    pub calculate_op: CalculationOp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub op: HavingOp,
    pub value: f64,
}

/// A declarative request for aggregated statistics over a dataset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct AnalysisQuery {
    pub calculations: Vec<Calculation>,
    #[serde(default)]
    pub breakdowns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<Filter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_combination: Option<FilterCombination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orders: Option<Vec<Order>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub havings: Option<Vec<Having>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Relative window in seconds, ending now.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<u64>,
    /// Absolute window start, Unix seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<u64>,
    /// Absolute window end, Unix seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<u64>,
    /// Bucket width in seconds for time series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granularity: Option<u64>,
}

fn invalid(message: impl Into<String>) -> HoneycombError {
    HoneycombError::InvalidQuery {
        message: message.into(),
    }
}

impl AnalysisQuery {
    /// Checks the query for mistakes the API would reject.
    ///
    /// # Errors
    ///
    /// Returns [`HoneycombError::InvalidQuery`] describing the first problem found.
    pub fn validate(&self) -> Result<(), HoneycombError> {
        if self.calculations.is_empty() {
            return Err(invalid("at least one calculation is required"));
        }
        for calculation in &self.calculations {
            match (calculation.op.requires_column(), &calculation.column) {
                (true, None) => {
                    return Err(invalid(format!(
                        "{} requires a column",
                        calculation.op
                    )));
                }
                (false, Some(column)) => {
                    return Err(invalid(format!(
                        "{} does not take a column (got `{column}`)",
                        calculation.op
                    )));
                }
                _ => {}
            }
        }

        for filter in self.filters.iter().flatten() {
            match (&filter.value, filter.op.takes_value()) {
                (None, true) => {
                    return Err(invalid(format!(
                        "filter on `{}` needs a value",
                        filter.column
                    )));
                }
                (Some(_), false) => {
                    return Err(invalid(format!(
                        "filter on `{}` must not have a value",
                        filter.column
                    )));
                }
                (Some(value), true) if filter.op.takes_list() && !value.is_array() => {
                    return Err(invalid(format!(
                        "filter on `{}` needs a list value",
                        filter.column
                    )));
                }
                _ => {}
            }
        }

        for order in self.orders.iter().flatten() {
            match order.op {
                Some(CalculationOp::Heatmap) => {
                    return Err(invalid("HEATMAP results cannot be ordered"));
                }
                Some(op) => {
                    let present = self
                        .calculations
                        .iter()
                        .any(|c| c.op == op && c.column == order.column);
                    if !present {
                        return Err(invalid(format!(
                            "order references {} which is not among the calculations",
                            Calculation::new(op, order.column.clone()).result_key()
                        )));
                    }
                }
                None => match &order.column {
                    Some(column) if self.breakdowns.contains(column) => {}
                    Some(column) => {
                        return Err(invalid(format!(
                            "order on column `{column}` requires it to be a breakdown"
                        )));
                    }
                    None => return Err(invalid("order needs an op or a column")),
                },
            }
        }

        for having in self.havings.iter().flatten() {
            let present = self
                .calculations
                .iter()
                .any(|c| c.op == having.calculate_op && c.column == having.column);
            if !present {
                return Err(invalid(format!(
                    "having references {} which is not among the calculations",
                    Calculation::new(having.calculate_op, having.column.clone()).result_key()
                )));
            }
        }

        if let Some(limit) = self.limit
            && !(1..=MAX_QUERY_LIMIT).contains(&limit)
        {
            return Err(invalid(format!(
                "limit must be between 1 and {MAX_QUERY_LIMIT}"
            )));
        }

        if self.time_range.is_some() && self.start_time.is_some() && self.end_time.is_some() {
            return Err(invalid(
                "time_range cannot be combined with both start_time and end_time",
            ));
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time)
            && start >= end
        {
            return Err(invalid("start_time must be before end_time"));
        }
        if self.time_range == Some(0) {
            return Err(invalid("time_range must be positive"));
        }

        Ok(())
    }
}
