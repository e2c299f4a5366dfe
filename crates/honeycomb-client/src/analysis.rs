//! Convenience operations built on the query workflow.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::HoneycombApi;
use crate::error::HoneycombError;
use crate::query::{
    AnalysisQuery, Calculation, CalculationOp, DEFAULT_TIME_RANGE_SECONDS, Filter, Order,
    OrderDirection,
};
use crate::types::{Column, QueryResult, QueryResultLinks, QueryResultRow};
use crate::workflow::{self, PollConfig};

/// Number of distinct values reported by [`analyze_column`].
pub const COLUMN_ANALYSIS_TOP_N: u32 = 10;

/// Inputs for [`run_analysis_query`]: one calculation plus optional grouping and filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisQueryParams {
    pub calculation: CalculationOp,
    pub column: Option<String>,
    pub breakdowns: Option<Vec<String>>,
    pub filter: Option<Filter>,
    /// Seconds; defaults to [`DEFAULT_TIME_RANGE_SECONDS`].
    pub time_range: Option<u64>,
}

impl AnalysisQueryParams {
    pub fn new(calculation: CalculationOp) -> Self {
        Self {
            calculation,
            column: None,
            breakdowns: None,
            filter: None,
            time_range: None,
        }
    }
}

/// A completed query's rows, series and UI links.
///
/// Missing fields in the server response are replaced by empty values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub results: Vec<QueryResultRow>,
    pub series: Vec<Value>,
    pub links: QueryResultLinks,
}

impl From<QueryResult> for AnalysisResult {
    fn from(result: QueryResult) -> Self {
        let data = result.data.unwrap_or_default();
        Self {
            results: data.results,
            series: data.series,
            links: result.links,
        }
    }
}

/// Result of [`analyze_column`]: the column's metadata alongside the query output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnAnalysis {
    pub column: Column,
    pub calculations: Vec<Calculation>,
    #[serde(flatten)]
    pub result: AnalysisResult,
}

/// Builds the query submitted by [`run_analysis_query`].
pub fn build_analysis_query(params: AnalysisQueryParams) -> AnalysisQuery {
    AnalysisQuery {
        calculations: vec![Calculation::new(params.calculation, params.column)],
        breakdowns: params.breakdowns.unwrap_or_default(),
        filters: params.filter.map(|filter| vec![filter]),
        time_range: Some(params.time_range.unwrap_or(DEFAULT_TIME_RANGE_SECONDS)),
        ..Default::default()
    }
}

/// Builds the query submitted by [`analyze_column`].
///
/// Always counts events per value of the column (top [`COLUMN_ANALYSIS_TOP_N`], most
/// frequent first). Numeric columns also get AVG, P95, MAX and MIN.
pub fn build_column_analysis_query(column: &Column, time_range: Option<u64>) -> AnalysisQuery {
    let mut calculations = vec![Calculation::count()];
    if column.column_type().is_numeric() {
        calculations.extend(
            [
                CalculationOp::Avg,
                CalculationOp::P95,
                CalculationOp::Max,
                CalculationOp::Min,
            ]
            .into_iter()
            .map(|op| Calculation::on(op, column.key_name.clone())),
        );
    }

    AnalysisQuery {
        calculations,
        breakdowns: vec![column.key_name.clone()],
        orders: Some(vec![Order::by_calculation(
            &Calculation::count(),
            OrderDirection::Descending,
        )]),
        limit: Some(COLUMN_ANALYSIS_TOP_N),
        time_range: Some(time_range.unwrap_or(DEFAULT_TIME_RANGE_SECONDS)),
        ..Default::default()
    }
}

/// Runs a single-calculation query and waits for its results.
///
/// # Errors
///
/// Any failure (validation, request, timeout) is reported as
/// [`HoneycombError::AnalysisQueryFailed`] carrying the original message.
pub async fn run_analysis_query<A: HoneycombApi + ?Sized>(
    api: &A,
    environment: &str,
    dataset: &str,
    params: AnalysisQueryParams,
    poll: &PollConfig,
) -> Result<AnalysisResult, HoneycombError> {
    let query = build_analysis_query(params);
    let run = async {
        query.validate()?;
        workflow::query_and_wait_for_results(api, environment, dataset, &query, poll).await
    };
    run.await
        .map(AnalysisResult::from)
        .map_err(|e| HoneycombError::AnalysisQueryFailed {
            message: e.to_string(),
        })
}

/// Summarizes the distribution of one column.
///
/// The column's metadata is fetched first to decide which calculations apply.
///
/// # Errors
///
/// Any failure is reported as [`HoneycombError::ColumnAnalysisFailed`] carrying the
/// original message.
pub async fn analyze_column<A: HoneycombApi + ?Sized>(
    api: &A,
    environment: &str,
    dataset: &str,
    column: &str,
    time_range: Option<u64>,
    poll: &PollConfig,
) -> Result<ColumnAnalysis, HoneycombError> {
    let run = async {
        let column = api.get_column_by_name(environment, dataset, column).await?;
        let query = build_column_analysis_query(&column, time_range);
        let result =
            workflow::query_and_wait_for_results(api, environment, dataset, &query, poll).await?;
        Ok::<_, HoneycombError>(ColumnAnalysis {
            column,
            calculations: query.calculations,
            result: result.into(),
        })
    };
    run.await
        .map_err(|e| HoneycombError::ColumnAnalysisFailed {
            message: e.to_string(),
        })
}

/// Drops columns flagged `hidden`, keeping the rest in order.
pub fn visible_columns(columns: Vec<Column>) -> Vec<Column> {
    columns.into_iter().filter(|c| !c.hidden()).collect()
}

/// Fetches a dataset's columns without the hidden ones.
pub async fn get_visible_columns<A: HoneycombApi + ?Sized>(
    api: &A,
    environment: &str,
    dataset: &str,
) -> Result<Vec<Column>, HoneycombError> {
    api.get_columns(environment, dataset)
        .await
        .map(visible_columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockHoneycombApi;
    use crate::query::FilterOp;
    use crate::types::{ColumnType, CreatedQuery};
    use serde_json::json;

    fn column(key_name: &str, column_type: &str, hidden: bool) -> Column {
        serde_json::from_value(json!({
            "key_name": key_name,
            "type": column_type,
            "hidden": hidden,
        }))
        .unwrap()
    }

    fn completed(body: Value) -> QueryResult {
        serde_json::from_value(body).unwrap()
    }

    fn expect_handles(api: &mut MockHoneycombApi) {
        api.expect_create_query_result().returning(|_, _, _| {
            Ok(completed(json!({"id": "qr-1", "complete": false})))
        });
    }

    #[test]
    fn test_build_analysis_query_defaults() {
        let query = build_analysis_query(AnalysisQueryParams::new(CalculationOp::Count));
        assert_eq!(query.time_range, Some(3600));
        assert!(query.breakdowns.is_empty());
        assert_eq!(query.calculations, vec![Calculation::count()]);
        assert!(query.filters.is_none());

        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value["time_range"], json!(3600));
        assert_eq!(value["breakdowns"], json!([]));
    }

    #[test]
    fn test_build_analysis_query_with_options() {
        let query = build_analysis_query(AnalysisQueryParams {
            calculation: CalculationOp::P99,
            column: Some("duration_ms".to_string()),
            breakdowns: Some(vec!["service.name".to_string()]),
            filter: Some(Filter::new("status_code", FilterOp::Equals, Some(json!(500)))),
            time_range: Some(600),
        });
        assert_eq!(
            query.calculations,
            vec![Calculation::on(CalculationOp::P99, "duration_ms")]
        );
        assert_eq!(query.breakdowns, vec!["service.name"]);
        assert_eq!(query.filters.as_ref().map(Vec::len), Some(1));
        assert_eq!(query.time_range, Some(600));
    }

    #[test]
    fn test_column_analysis_query_numeric() {
        for column_type in ["integer", "float"] {
            let query = build_column_analysis_query(&column("duration_ms", column_type, false), None);
            let ops: Vec<_> = query.calculations.iter().map(|c| c.op).collect();
            assert_eq!(
                ops,
                vec![
                    CalculationOp::Count,
                    CalculationOp::Avg,
                    CalculationOp::P95,
                    CalculationOp::Max,
                    CalculationOp::Min
                ]
            );
            assert!(
                query.calculations[1..]
                    .iter()
                    .all(|c| c.column.as_deref() == Some("duration_ms"))
            );
            query.validate().expect("column analysis query is valid");
        }
    }

    #[test]
    fn test_column_analysis_query_non_numeric() {
        for column_type in ["string", "boolean"] {
            let query = build_column_analysis_query(&column("http.route", column_type, false), Some(60));
            assert_eq!(query.calculations, vec![Calculation::count()]);
            assert_eq!(query.breakdowns, vec!["http.route"]);
            assert_eq!(query.limit, Some(10));
            assert_eq!(query.time_range, Some(60));
            assert_eq!(
                query.orders,
                Some(vec![Order {
                    op: Some(CalculationOp::Count),
                    column: None,
                    order: Some(OrderDirection::Descending),
                }])
            );
        }
    }

    #[test]
    fn test_visible_columns_preserves_order() {
        let columns = vec![
            column("a", "string", false),
            column("b", "string", true),
            column("c", "integer", false),
            column("d", "float", true),
        ];
        let visible = visible_columns(columns);
        let names: Vec<_> = visible.iter().map(|c| c.key_name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_run_analysis_query_submits_defaults() {
        let mut api = MockHoneycombApi::new();
        api.expect_create_query()
            .withf(|_, _, query| {
                query.time_range == Some(3600)
                    && query.breakdowns.is_empty()
                    && query.calculations == vec![Calculation::count()]
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(serde_json::from_value::<CreatedQuery>(json!({"id": "q-1"})).unwrap())
            });
        expect_handles(&mut api);
        api.expect_get_query_result().times(1).returning(|_, _, _| {
            Ok(completed(json!({
                "id": "qr-1",
                "complete": true,
                "data": {"results": [{"data": {"COUNT": 7}}]},
            })))
        });

        let result = run_analysis_query(
            &api,
            "prod",
            "web-logs",
            AnalysisQueryParams::new(CalculationOp::Count),
            &PollConfig::default(),
        )
        .await
        .expect("analysis should succeed");

        assert_eq!(result.results.len(), 1);
        assert!(result.series.is_empty(), "missing series becomes empty");
        assert!(result.links.query_url.is_none());
    }

    #[tokio::test]
    async fn test_run_analysis_query_wraps_errors() {
        let mut api = MockHoneycombApi::new();
        api.expect_create_query().returning(|_, _, _| {
            Err(HoneycombError::Api {
                status_code: 401,
                status_text: "Unauthorized".to_string(),
            })
        });

        let err = run_analysis_query(
            &api,
            "prod",
            "web-logs",
            AnalysisQueryParams::new(CalculationOp::Count),
            &PollConfig::default(),
        )
        .await
        .expect_err("create query fails");

        assert!(matches!(err, HoneycombError::AnalysisQueryFailed { .. }));
        assert_eq!(
            err.to_string(),
            "Analysis query failed: Honeycomb API error: 401 Unauthorized"
        );
    }

    #[tokio::test]
    async fn test_run_analysis_query_rejects_invalid_before_submitting() {
        let mut api = MockHoneycombApi::new();
        api.expect_create_query().never();

        let err = run_analysis_query(
            &api,
            "prod",
            "web-logs",
            AnalysisQueryParams::new(CalculationOp::Avg),
            &PollConfig::default(),
        )
        .await
        .expect_err("AVG without a column is invalid");
        assert_eq!(
            err.to_string(),
            "Analysis query failed: Invalid query: AVG requires a column"
        );
    }

    #[tokio::test]
    async fn test_analyze_column_numeric() {
        let mut api = MockHoneycombApi::new();
        api.expect_get_column_by_name()
            .times(1)
            .returning(|_, _, _| Ok(column("duration_ms", "float", false)));
        api.expect_create_query()
            .withf(|_, _, query| {
                query.calculations.len() == 5 && query.breakdowns == vec!["duration_ms"]
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(serde_json::from_value::<CreatedQuery>(json!({"id": "q-1"})).unwrap())
            });
        expect_handles(&mut api);
        api.expect_get_query_result().returning(|_, _, _| {
            Ok(completed(json!({"id": "qr-1", "complete": true, "data": {"results": []}})))
        });

        let analysis = analyze_column(
            &api,
            "prod",
            "web-logs",
            "duration_ms",
            None,
            &PollConfig::default(),
        )
        .await
        .expect("analysis should succeed");

        assert_eq!(analysis.column.column_type(), ColumnType::Float);
        assert_eq!(analysis.calculations.len(), 5);
        assert!(analysis.result.results.is_empty());
    }

    #[tokio::test]
    async fn test_analyze_column_wraps_lookup_failure() {
        let mut api = MockHoneycombApi::new();
        api.expect_get_column_by_name().returning(|_, _, _| {
            Err(HoneycombError::Api {
                status_code: 404,
                status_text: "Not Found".to_string(),
            })
        });
        api.expect_create_query().never();

        let err = analyze_column(
            &api,
            "prod",
            "web-logs",
            "nope",
            None,
            &PollConfig::default(),
        )
        .await
        .expect_err("column lookup fails");
        assert_eq!(
            err.to_string(),
            "Column analysis failed: Honeycomb API error: 404 Not Found"
        );
    }

    #[tokio::test]
    async fn test_get_visible_columns() {
        let mut api = MockHoneycombApi::new();
        api.expect_get_columns().returning(|_, _| {
            Ok(vec![
                column("trace.trace_id", "string", true),
                column("duration_ms", "float", false),
            ])
        });
        let columns = get_visible_columns(&api, "prod", "web-logs").await.unwrap();
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].key_name, "duration_ms");
    }
}
