//! Prompt templates offered alongside the tools.

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::error::{ToolError, ToolResult};

pub const INSTRUMENTATION_GUIDANCE: &str = "instrumentation-guidance";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptArgument {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub arguments: Vec<PromptArgument>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PromptContent {
    Text { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptMessage {
    pub role: &'static str,
    pub content: PromptContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPrompt {
    pub description: &'static str,
    pub messages: Vec<PromptMessage>,
}

const GUIDANCE: &str = "\
Instrument this code with OpenTelemetry so its telemetry can be explored in Honeycomb.

Follow these rules:
- Use the OpenTelemetry SDK for the language and export over OTLP. Configure the exporter \
through environment variables: OTEL_EXPORTER_OTLP_ENDPOINT=https://api.honeycomb.io and \
OTEL_EXPORTER_OTLP_HEADERS=x-honeycomb-team=<API key>.
- Set OTEL_SERVICE_NAME. Honeycomb uses the service name as the dataset name.
- Prefer automatic instrumentation for HTTP servers, HTTP clients and database drivers, then \
add manual spans around meaningful units of work.
- Put high-cardinality context on spans as attributes (user id, tenant, request id, feature \
flags, payload sizes). Wide events with many attributes are cheap and make later queries useful.
- Record errors on the span with its status and the exception, not only in logs.
- Name spans after the operation, not the values (`GET /users/{id}`, not `GET /users/42`).
- Propagate trace context across process boundaries with W3C traceparent headers.
- Never put secrets or raw credentials into attributes.";

pub fn list_prompts() -> Vec<PromptDefinition> {
    vec![PromptDefinition {
        name: INSTRUMENTATION_GUIDANCE,
        description: "OpenTelemetry instrumentation guidance for sending traces to Honeycomb",
        arguments: vec![
            PromptArgument {
                name: "language",
                description: "Programming language of the code to instrument",
                required: false,
            },
            PromptArgument {
                name: "filepath",
                description: "Path of the file to instrument",
                required: false,
            },
        ],
    }]
}

fn string_argument<'a>(arguments: &'a Map<String, JsonValue>, name: &str) -> Option<&'a str> {
    arguments
        .get(name)
        .and_then(JsonValue::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Renders a prompt with the given arguments. Unknown arguments are ignored.
///
/// # Errors
///
/// Returns [`ToolError::UnknownPrompt`] if `name` is not a known prompt.
pub fn get_prompt(name: &str, arguments: &Map<String, JsonValue>) -> ToolResult<RenderedPrompt> {
    if name != INSTRUMENTATION_GUIDANCE {
        return Err(ToolError::UnknownPrompt {
            name: name.to_string(),
        });
    }

    let intro = match (
        string_argument(arguments, "language"),
        string_argument(arguments, "filepath"),
    ) {
        (Some(language), Some(filepath)) => format!("The code is {language} in `{filepath}`.\n\n"),
        (Some(language), None) => format!("The code is written in {language}.\n\n"),
        (None, Some(filepath)) => format!("The code is in `{filepath}`.\n\n"),
        (None, None) => String::new(),
    };
    let text = format!("{intro}{GUIDANCE}");

    Ok(RenderedPrompt {
        description: "OpenTelemetry instrumentation guidance for Honeycomb",
        messages: vec![PromptMessage {
            role: "user",
            content: PromptContent::Text { text },
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: JsonValue) -> Map<String, JsonValue> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_list_prompts() {
        let prompts = list_prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].name, "instrumentation-guidance");
        assert!(prompts[0].arguments.iter().all(|a| !a.required));
    }

    #[test]
    fn test_prompt_mentions_language_and_file() {
        let prompt = get_prompt(
            INSTRUMENTATION_GUIDANCE,
            &args(json!({"language": "Go", "filepath": "cmd/server/main.go"})),
        )
        .unwrap();
        assert_eq!(prompt.messages.len(), 1);
        let PromptContent::Text { text } = &prompt.messages[0].content;
        assert!(text.starts_with("The code is Go in `cmd/server/main.go`."), "{text}");
        assert!(text.contains("OTEL_SERVICE_NAME"));
    }

    #[test]
    fn test_prompt_without_arguments() {
        let prompt = get_prompt(INSTRUMENTATION_GUIDANCE, &Map::new()).unwrap();
        let PromptContent::Text { text } = &prompt.messages[0].content;
        assert!(text.starts_with("Instrument this code"));

        let value = serde_json::to_value(&prompt.messages[0]).unwrap();
        assert_eq!(value["role"], json!("user"));
        assert_eq!(value["content"]["type"], json!("text"));
    }

    #[test]
    fn test_blank_arguments_are_ignored() {
        let prompt =
            get_prompt(INSTRUMENTATION_GUIDANCE, &args(json!({"language": "  "}))).unwrap();
        let PromptContent::Text { text } = &prompt.messages[0].content;
        assert!(text.starts_with("Instrument this code"));
    }

    #[test]
    fn test_unknown_prompt() {
        let err = get_prompt("nope", &Map::new()).expect_err("unknown prompt");
        assert_eq!(err.to_string(), "Unknown prompt: nope");
    }
}
