//! The MCP server: an `rmcp` handler over the tool registry, the prompt templates
//! and the dataset resources.

use std::sync::Arc;

use honeycomb_client::analysis::get_visible_columns;
use honeycomb_tools::prompts::{get_prompt, list_prompts};
use honeycomb_tools::{ToolContext, ToolError, ToolRegistry};
use rmcp::model::{
    AnnotateAble, CallToolRequestParams, CallToolResult, Content, GetPromptRequestParams,
    GetPromptResult, Implementation, JsonObject, ListPromptsResult, ListResourcesResult,
    ListToolsResult, PaginatedRequestParams, Prompt, ProtocolVersion, RawResource,
    ReadResourceRequestParams, ReadResourceResult, Resource, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler, ServiceExt};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::error::ServerError;
use crate::resources::{DatasetUri, JSON_MIME_TYPE};

pub const SERVER_NAME: &str = "honeycomb-mcp";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Clone)]
pub struct McpServer {
    registry: Arc<ToolRegistry>,
    ctx: ToolContext,
}

impl McpServer {
    pub fn new(registry: ToolRegistry, ctx: ToolContext) -> Self {
        Self {
            registry: Arc::new(registry),
            ctx,
        }
    }

    /// Serves one MCP session over stdin/stdout until the client disconnects.
    ///
    /// # Errors
    ///
    /// Fails if the session cannot be initialized or the transport breaks.
    pub async fn serve_stdio(self) -> Result<(), ServerError> {
        let service = self
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| ServerError::Transport {
                message: e.to_string(),
            })?;
        service
            .waiting()
            .await
            .map_err(|e| ServerError::Transport {
                message: e.to_string(),
            })?;
        Ok(())
    }

    /// Every registered tool with its JSON input schema.
    ///
    /// # Errors
    ///
    /// Fails if a tool's schema cannot be generated.
    pub fn tools(&self) -> Result<Vec<Tool>, ErrorData> {
        let definitions = self
            .registry
            .definitions()
            .map_err(|e| ErrorData::internal_error(e.to_string(), None))?;
        definitions
            .into_iter()
            .map(|definition| {
                let Value::Object(schema) = definition.input_schema else {
                    return Err(ErrorData::internal_error(
                        format!("Input schema for `{}` is not an object", definition.name),
                        None,
                    ));
                };
                Ok(Tool::new(
                    definition.name,
                    definition.description,
                    Arc::new(schema),
                ))
            })
            .collect()
    }

    /// Runs a tool. Tool failures are reported in the result with `isError` set so the
    /// model can read them; only an unknown tool name is a protocol error.
    ///
    /// # Errors
    ///
    /// Fails for an unknown tool or if the output cannot be rendered.
    pub async fn call(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, ErrorData> {
        let arguments = arguments.map_or(Value::Null, Value::Object);
        match self.registry.execute(name, arguments, &self.ctx).await {
            Ok(output) => {
                let text = serde_json::to_string_pretty(&output)
                    .map_err(|e| ErrorData::internal_error(e.to_string(), None))?;
                Ok(CallToolResult::success(vec![Content::text(text)]))
            }
            Err(e @ ToolError::UnknownTool { .. }) => {
                Err(ErrorData::invalid_params(e.to_string(), None))
            }
            Err(e) => {
                tracing::debug!(tool = name, error = %e, "Tool call failed");
                Ok(CallToolResult::error(vec![Content::text(e.to_string())]))
            }
        }
    }

    /// # Errors
    ///
    /// Fails if a prompt definition does not fit the MCP prompt shape.
    pub fn prompts() -> Result<Vec<Prompt>, ErrorData> {
        from_wire(json!(list_prompts()))
    }

    /// # Errors
    ///
    /// Fails for an unknown prompt.
    pub fn prompt(
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<GetPromptResult, ErrorData> {
        let prompt = get_prompt(name, &arguments.unwrap_or_default())
            .map_err(|e| ErrorData::invalid_params(e.to_string(), None))?;
        from_wire(json!(prompt))
    }

    /// One resource per dataset per environment. Environments that fail to list are skipped.
    pub async fn resources(&self) -> Vec<Resource> {
        let client = self.ctx.client();
        let mut resources = Vec::new();
        for environment in client.environment_names() {
            let datasets = match client.list_datasets(&environment).await {
                Ok(datasets) => datasets,
                Err(e) => {
                    tracing::warn!(%environment, error = %e, "Skipping environment while listing resources");
                    continue;
                }
            };
            resources.extend(datasets.into_iter().map(|dataset| {
                let mut resource = RawResource::new(
                    DatasetUri::format(&environment, &dataset.slug),
                    format!("{environment}/{}", dataset.name),
                );
                resource.description = dataset.description().map(str::to_string);
                resource.mime_type = Some(JSON_MIME_TYPE.to_string());
                resource.no_annotation()
            }));
        }
        resources
    }

    /// The dataset's metadata and its visible columns, as pretty JSON.
    ///
    /// # Errors
    ///
    /// Fails with invalid params for a malformed URI, otherwise with an internal error
    /// if the API calls fail.
    pub async fn read(&self, uri: &str) -> Result<ReadResourceResult, ErrorData> {
        let parsed = DatasetUri::parse(uri).ok_or_else(|| {
            ErrorData::invalid_params(
                format!(
                    "Invalid resource URI `{uri}`: expected {}{{environment}}/{{dataset}}",
                    DatasetUri::SCHEME
                ),
                None,
            )
        })?;

        let client = self.ctx.client();
        let dataset = client
            .get_dataset(&parsed.environment, &parsed.dataset)
            .await
            .map_err(|e| ErrorData::internal_error(e.to_string(), None))?;
        let columns = get_visible_columns(client, &parsed.environment, &parsed.dataset)
            .await
            .map_err(|e| ErrorData::internal_error(e.to_string(), None))?;

        let text = serde_json::to_string_pretty(&json!({
            "dataset": dataset,
            "columns": columns,
        }))
        .map_err(|e| ErrorData::internal_error(e.to_string(), None))?;

        from_wire(json!({
            "contents": [{
                "uri": uri,
                "mimeType": JSON_MIME_TYPE,
                "text": text,
            }],
        }))
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        let mut server_info = Implementation::from_build_env();
        server_info.name = SERVER_NAME.to_string();
        server_info.version = SERVER_VERSION.to_string();

        let mut info = ServerInfo::default();
        info.protocol_version = ProtocolVersion::V_2024_11_05;
        info.capabilities = ServerCapabilities::builder()
            .enable_tools()
            .enable_prompts()
            .enable_resources()
            .build();
        info.server_info = server_info;
        info.instructions = Some(
            "Read-only access to Honeycomb datasets, columns, queries, SLOs and triggers. \
             Call list_datasets first to discover what an environment contains."
                .to_string(),
        );
        info
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.tools()?))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        self.call(&request.name, request.arguments).await
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, ErrorData> {
        Ok(ListPromptsResult::with_all_items(Self::prompts()?))
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, ErrorData> {
        Self::prompt(&request.name, request.arguments)
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        Ok(ListResourcesResult::with_all_items(self.resources().await))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        self.read(&request.uri).await
    }
}

/// Converts one of our wire-shaped values into the matching `rmcp` model type.
fn from_wire<T: DeserializeOwned>(value: Value) -> Result<T, ErrorData> {
    serde_json::from_value(value).map_err(|e| ErrorData::internal_error(e.to_string(), None))
}
