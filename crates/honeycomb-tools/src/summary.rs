//! Human-oriented digest of a column analysis.

use honeycomb_client::{Calculation, CalculationOp, ColumnAnalysis, ColumnType, QueryResultRow};
use serde::Serialize;
use serde_json::Value as JsonValue;

/// One of the most frequent values of a column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopValue {
    pub value: JsonValue,
    pub count: f64,
    /// Share of the events covered by the returned rows, rounded to two decimals.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericStats {
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Per-row averages weighted by the row's event count.
    pub avg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub column_type: ColumnType,
    pub total_events: f64,
    pub top_values: Vec<TopValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericStats>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn number(row: &QueryResultRow, key: &str) -> Option<f64> {
    row.data.get(key).and_then(JsonValue::as_f64)
}

fn count(row: &QueryResultRow) -> f64 {
    number(row, CalculationOp::Count.as_str()).unwrap_or(0.0)
}

pub fn summarize_column(analysis: &ColumnAnalysis) -> ColumnSummary {
    let column = &analysis.column;
    let rows = &analysis.result.results;
    let total_events: f64 = rows.iter().map(count).sum();

    let top_values = rows
        .iter()
        .map(|row| {
            let count = count(row);
            TopValue {
                value: row
                    .data
                    .get(&column.key_name)
                    .cloned()
                    .unwrap_or(JsonValue::Null),
                count,
                percentage: if total_events > 0.0 {
                    round2(count / total_events * 100.0)
                } else {
                    0.0
                },
            }
        })
        .collect();

    let numeric = column.column_type().is_numeric().then(|| {
        let key = |op| Calculation::on(op, column.key_name.clone()).result_key();
        let (min_key, max_key, avg_key) = (
            key(CalculationOp::Min),
            key(CalculationOp::Max),
            key(CalculationOp::Avg),
        );

        let min = rows.iter().filter_map(|row| number(row, &min_key)).reduce(f64::min);
        let max = rows.iter().filter_map(|row| number(row, &max_key)).reduce(f64::max);

        let (weighted_sum, weight) = rows
            .iter()
            .filter_map(|row| number(row, &avg_key).map(|avg| (avg, count(row))))
            .fold((0.0, 0.0), |(sum, weight), (avg, count)| {
                (sum + avg * count, weight + count)
            });
        let avg = (weight > 0.0).then(|| weighted_sum / weight);

        NumericStats { min, max, avg }
    });

    ColumnSummary {
        column: column.key_name.clone(),
        column_type: column.column_type(),
        total_events,
        top_values,
        numeric,
    }
}
