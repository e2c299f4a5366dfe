//! Integration tests for the Honeycomb tools, driven through the registry.

use std::sync::Arc;
use std::time::Duration;

use honeycomb_client::{
    Column, CreatedQuery, Dataset, HoneycombError, MockHoneycombApi, PollConfig, QueryResult,
};
use honeycomb_tools::{ToolContext, ToolError, honeycomb_tool_registry};
use serde_json::{Value, json};

fn ctx(api: MockHoneycombApi) -> ToolContext {
    ToolContext::new(
        Arc::new(api),
        PollConfig {
            max_attempts: 3,
            interval: Duration::from_millis(1),
        },
    )
}

fn column(key_name: &str, column_type: &str, hidden: bool) -> Column {
    serde_json::from_value(json!({"key_name": key_name, "type": column_type, "hidden": hidden}))
        .unwrap()
}

fn query_result(body: Value) -> QueryResult {
    serde_json::from_value(body).unwrap()
}

fn expect_query_handles(api: &mut MockHoneycombApi) {
    api.expect_create_query()
        .returning(|_, _, _| Ok(serde_json::from_value::<CreatedQuery>(json!({"id": "q-1"})).unwrap()));
    api.expect_create_query_result()
        .returning(|_, _, _| Ok(query_result(json!({"id": "qr-1", "complete": false}))));
}

#[test]
fn test_registry_has_every_tool() {
    let registry = honeycomb_tool_registry().unwrap();
    assert_eq!(
        registry.list_tools(),
        vec![
            "analyze_column",
            "get_columns",
            "get_dataset",
            "get_slo",
            "get_trigger",
            "list_datasets",
            "list_slos",
            "list_triggers",
            "run_analysis_query",
            "run_query",
        ]
    );

    for definition in registry.definitions().unwrap() {
        assert_eq!(
            definition.input_schema["type"],
            json!("object"),
            "{} should take an object",
            definition.name
        );
        assert!(!definition.description.is_empty());
    }
}

#[test]
fn test_get_columns_schema_marks_include_hidden_optional() {
    let registry = honeycomb_tool_registry().unwrap();
    let definition = registry
        .definitions()
        .unwrap()
        .into_iter()
        .find(|d| d.name == "get_columns")
        .unwrap();
    let required = definition.input_schema["required"].as_array().unwrap();
    assert!(required.contains(&json!("environment")));
    assert!(required.contains(&json!("dataset")));
    assert!(!required.contains(&json!("include_hidden")));
}

#[tokio::test]
async fn test_list_datasets() {
    let mut api = MockHoneycombApi::new();
    api.expect_list_datasets().times(1).returning(|environment| {
        assert_eq!(environment, "prod");
        Ok(vec![
            serde_json::from_value::<Dataset>(json!({"name": "Web Logs", "slug": "web-logs"}))
                .unwrap(),
        ])
    });

    let result = honeycomb_tool_registry()
        .unwrap()
        .execute("list_datasets", json!({"environment": "prod"}), &ctx(api))
        .await
        .unwrap();
    assert_eq!(result, json!([{"name": "Web Logs", "slug": "web-logs"}]));
}

#[tokio::test]
async fn test_missing_environment_is_invalid_parameters() {
    let api = MockHoneycombApi::new();
    let err = honeycomb_tool_registry()
        .unwrap()
        .execute("get_dataset", json!({"dataset": "web-logs"}), &ctx(api))
        .await
        .expect_err("environment is required");
    match err {
        ToolError::InvalidParameters { tool, message, .. } => {
            assert_eq!(tool, "get_dataset");
            assert!(message.contains("environment"), "{message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_client_errors_are_wrapped() {
    let mut api = MockHoneycombApi::new();
    api.expect_get_dataset().returning(|_, _| {
        Err(HoneycombError::UnknownEnvironment {
            name: "staging".to_string(),
        })
    });

    let err = honeycomb_tool_registry()
        .unwrap()
        .execute(
            "get_dataset",
            json!({"environment": "staging", "dataset": "web-logs"}),
            &ctx(api),
        )
        .await
        .expect_err("unknown environment");
    assert!(matches!(err, ToolError::Client { ref tool, .. } if tool == "get_dataset"));
    assert_eq!(err.to_string(), "get_dataset failed: Unknown environment: staging");
}

#[tokio::test]
async fn test_get_columns_hides_hidden_by_default() {
    let mut api = MockHoneycombApi::new();
    api.expect_get_columns().times(2).returning(|_, _| {
        Ok(vec![
            column("trace.trace_id", "string", true),
            column("duration_ms", "float", false),
        ])
    });
    let ctx = ctx(api);
    let registry = honeycomb_tool_registry().unwrap();

    let visible = registry
        .execute(
            "get_columns",
            json!({"environment": "prod", "dataset": "web-logs"}),
            &ctx,
        )
        .await
        .unwrap();
    assert_eq!(visible.as_array().unwrap().len(), 1);
    assert_eq!(visible[0]["key_name"], json!("duration_ms"));

    let all = registry
        .execute(
            "get_columns",
            json!({"environment": "prod", "dataset": "web-logs", "include_hidden": true}),
            &ctx,
        )
        .await
        .unwrap();
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_run_query_rejects_invalid_query_locally() {
    let mut api = MockHoneycombApi::new();
    api.expect_create_query().never();

    let err = honeycomb_tool_registry()
        .unwrap()
        .execute(
            "run_query",
            json!({
                "environment": "prod",
                "dataset": "web-logs",
                "query": {"calculations": [{"op": "P99"}]}
            }),
            &ctx(api),
        )
        .await
        .expect_err("P99 needs a column");
    assert_eq!(
        err.to_string(),
        "run_query failed: Invalid query: P99 requires a column"
    );
}

#[tokio::test]
async fn test_run_query_returns_results() {
    let mut api = MockHoneycombApi::new();
    expect_query_handles(&mut api);
    api.expect_get_query_result().returning(|_, _, _| {
        Ok(query_result(json!({
            "id": "qr-1",
            "complete": true,
            "data": {"results": [{"data": {"COUNT": 12}}]},
            "links": {"query_url": "https://ui.honeycomb.io/q"}
        })))
    });

    let result = honeycomb_tool_registry()
        .unwrap()
        .execute(
            "run_query",
            json!({
                "environment": "prod",
                "dataset": "web-logs",
                "query": {"calculations": [{"op": "COUNT"}], "time_range": 600}
            }),
            &ctx(api),
        )
        .await
        .unwrap();
    assert_eq!(result["results"][0]["data"]["COUNT"], json!(12));
    assert_eq!(result["series"], json!([]));
    assert_eq!(result["links"]["query_url"], json!("https://ui.honeycomb.io/q"));
}

#[tokio::test]
async fn test_run_analysis_query_times_out() {
    let mut api = MockHoneycombApi::new();
    expect_query_handles(&mut api);
    api.expect_get_query_result()
        .times(3)
        .returning(|_, _, _| Ok(query_result(json!({"id": "qr-1", "complete": false}))));

    let err = honeycomb_tool_registry()
        .unwrap()
        .execute(
            "run_analysis_query",
            json!({"environment": "prod", "dataset": "web-logs", "calculation": "COUNT"}),
            &ctx(api),
        )
        .await
        .expect_err("never completes");
    match err {
        ToolError::Client { source, .. } => {
            assert!(matches!(source, HoneycombError::AnalysisQueryFailed { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_analyze_column_includes_summary() {
    let mut api = MockHoneycombApi::new();
    api.expect_get_column_by_name()
        .returning(|_, _, _| Ok(column("status_code", "integer", false)));
    expect_query_handles(&mut api);
    api.expect_get_query_result().returning(|_, _, _| {
        Ok(query_result(json!({
            "id": "qr-1",
            "complete": true,
            "data": {"results": [
                {"data": {"status_code": 200, "COUNT": 3, "AVG(status_code)": 200.0,
                          "MIN(status_code)": 200, "MAX(status_code)": 200}},
                {"data": {"status_code": 500, "COUNT": 1, "AVG(status_code)": 500.0,
                          "MIN(status_code)": 500, "MAX(status_code)": 500}}
            ]}
        })))
    });

    let result = honeycomb_tool_registry()
        .unwrap()
        .execute(
            "analyze_column",
            json!({"environment": "prod", "dataset": "web-logs", "column": "status_code"}),
            &ctx(api),
        )
        .await
        .unwrap();

    assert_eq!(result["column"]["key_name"], json!("status_code"));
    assert_eq!(result["calculations"].as_array().unwrap().len(), 5);
    assert_eq!(result["results"].as_array().unwrap().len(), 2);

    let summary = &result["summary"];
    assert_eq!(summary["total_events"], json!(4.0));
    assert_eq!(summary["top_values"][0]["value"], json!(200));
    assert_eq!(summary["top_values"][0]["percentage"], json!(75.0));
    assert_eq!(summary["numeric"]["min"], json!(200.0));
    assert_eq!(summary["numeric"]["max"], json!(500.0));
    assert_eq!(summary["numeric"]["avg"], json!(275.0));
}

#[tokio::test]
async fn test_get_slo_and_trigger() {
    let mut api = MockHoneycombApi::new();
    api.expect_get_slo().returning(|_, _, slo_id| {
        assert_eq!(slo_id, "slo-1");
        Ok(serde_json::from_value(json!({"id": "slo-1", "name": "Availability"})).unwrap())
    });
    api.expect_get_trigger().returning(|_, _, trigger_id| {
        assert_eq!(trigger_id, "tr-1");
        Ok(serde_json::from_value(json!({"id": "tr-1", "name": "Latency", "triggered": true})).unwrap())
    });
    let ctx = ctx(api);
    let registry = honeycomb_tool_registry().unwrap();

    let slo = registry
        .execute(
            "get_slo",
            json!({"environment": "prod", "dataset": "web-logs", "slo_id": "slo-1"}),
            &ctx,
        )
        .await
        .unwrap();
    assert_eq!(slo["name"], json!("Availability"));

    let trigger = registry
        .execute(
            "get_trigger",
            json!({"environment": "prod", "dataset": "web-logs", "trigger_id": "tr-1"}),
            &ctx,
        )
        .await
        .unwrap();
    assert_eq!(trigger["triggered"], json!(true));
}
