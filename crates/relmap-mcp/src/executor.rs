//! Tool execution engine.
//!
//! Maps tool calls to catalog reads and formats each result as a text block
//! plus a structured JSON block. The default schema is threaded in explicitly
//! and applied whenever a call omits `db_schema`.

use crate::error::McpError;
use crate::protocol::{CallToolResponse, ToolContent};
use crate::render;
use crate::tools::{DESCRIBE_TABLE, FIND_RELATIONSHIPS, GET_FOREIGN_KEYS, LIST_SCHEMAS, LIST_TABLES};
use relmap_relations::{find_relationships, CatalogBrowser, CatalogError, TableFilter};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

/// Result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Whether the execution was successful.
    pub success: bool,
    /// The result content.
    pub content: Vec<ToolContent>,
    /// Error message if failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionResult {
    /// A successful result with a text rendering and its structured value.
    pub fn success(text: String, value: Value) -> Self {
        Self {
            success: true,
            content: vec![ToolContent::Text { text }, ToolContent::Json { json: value }],
            error: None,
        }
    }

    /// Create an error result.
    pub fn error(message: impl Into<String>) -> Self {
        let msg = message.into();
        Self {
            success: false,
            content: vec![ToolContent::Text { text: msg.clone() }],
            error: Some(msg),
        }
    }

    /// The text block, if any.
    pub fn text(&self) -> Option<&str> {
        self.content.iter().find_map(|c| match c {
            ToolContent::Text { text } => Some(text.as_str()),
            ToolContent::Json { .. } => None,
        })
    }

    /// The structured block, if any.
    pub fn json(&self) -> Option<&Value> {
        self.content.iter().find_map(|c| match c {
            ToolContent::Json { json } => Some(json),
            ToolContent::Text { .. } => None,
        })
    }

    pub fn into_response(self) -> CallToolResponse {
        CallToolResponse {
            content: self.content,
            is_error: !self.success,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListTablesArgs {
    #[serde(default)]
    db_schema: Option<String>,
    #[serde(default)]
    name_like: Option<String>,
    #[serde(default)]
    case_sensitive: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TableArgs {
    table_name: String,
    #[serde(default)]
    db_schema: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct NoArgs {}

/// Runs catalog tools against a [`CatalogBrowser`].
#[derive(Clone)]
pub struct ToolExecutor {
    catalog: Arc<dyn CatalogBrowser>,
    default_schema: String,
}

impl ToolExecutor {
    pub fn new(catalog: Arc<dyn CatalogBrowser>, default_schema: impl Into<String>) -> Self {
        Self {
            catalog,
            default_schema: default_schema.into(),
        }
    }

    pub fn default_schema(&self) -> &str {
        &self.default_schema
    }

    /// Execute `tool` with `arguments`.
    ///
    /// Unknown tools and malformed arguments are errors; catalog failures
    /// become error results.
    pub async fn execute(&self, tool: &str, arguments: Value) -> Result<ExecutionResult, McpError> {
        tracing::debug!(tool, "Executing tool");

        match tool {
            LIST_SCHEMAS => {
                let _: NoArgs = parse_args(tool, arguments)?;
                self.list_schemas().await
            }
            LIST_TABLES => self.list_tables(parse_args(tool, arguments)?).await,
            DESCRIBE_TABLE => {
                let args = parse_table_args(tool, arguments)?;
                self.describe_table(args).await
            }
            GET_FOREIGN_KEYS => {
                let args = parse_table_args(tool, arguments)?;
                self.get_foreign_keys(args).await
            }
            FIND_RELATIONSHIPS => {
                let args = parse_table_args(tool, arguments)?;
                self.find_relationships(args).await
            }
            other => Err(McpError::ToolNotFound {
                name: other.to_string(),
            }),
        }
    }

    fn schema_or_default(&self, schema: Option<String>) -> String {
        schema
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.default_schema.clone())
    }

    async fn list_schemas(&self) -> Result<ExecutionResult, McpError> {
        let schemas = match self.catalog.list_schemas().await {
            Ok(schemas) => schemas,
            Err(e) => return Ok(catalog_failure(LIST_SCHEMAS, e)),
        };
        let text = render::rows(&render::schema_rows(&schemas));
        Ok(ExecutionResult::success(text, json!({ "schemas": schemas })))
    }

    async fn list_tables(&self, args: ListTablesArgs) -> Result<ExecutionResult, McpError> {
        let schema = self.schema_or_default(args.db_schema);
        let filter = TableFilter {
            name_like: args.name_like,
            case_sensitive: args.case_sensitive,
        };

        let tables = match self.catalog.list_relations(&schema, &filter).await {
            Ok(tables) => tables,
            Err(e) => return Ok(catalog_failure(LIST_TABLES, e)),
        };
        let text = render::rows(&render::table_rows(&tables));
        Ok(ExecutionResult::success(
            text,
            json!({ "schema": schema, "tables": tables }),
        ))
    }

    async fn describe_table(&self, args: TableArgs) -> Result<ExecutionResult, McpError> {
        let schema = self.schema_or_default(args.db_schema);
        let columns = match self.catalog.describe_table(&schema, &args.table_name).await {
            Ok(columns) => columns,
            Err(e) => return Ok(catalog_failure(DESCRIBE_TABLE, e)),
        };
        let text = render::rows(&render::column_rows(&columns));
        Ok(ExecutionResult::success(
            text,
            json!({ "schema": schema, "table": args.table_name, "columns": columns }),
        ))
    }

    async fn get_foreign_keys(&self, args: TableArgs) -> Result<ExecutionResult, McpError> {
        let schema = self.schema_or_default(args.db_schema);
        let foreign_keys = match self
            .catalog
            .list_explicit_foreign_keys(&schema, &args.table_name)
            .await
        {
            Ok(foreign_keys) => foreign_keys,
            Err(e) => return Ok(catalog_failure(GET_FOREIGN_KEYS, e)),
        };
        let text = render::rows(&render::foreign_key_rows(&foreign_keys));
        Ok(ExecutionResult::success(
            text,
            json!({ "schema": schema, "table": args.table_name, "foreign_keys": foreign_keys }),
        ))
    }

    async fn find_relationships(&self, args: TableArgs) -> Result<ExecutionResult, McpError> {
        let schema = self.schema_or_default(args.db_schema);
        let report = match find_relationships(self.catalog.as_ref(), &schema, &args.table_name).await
        {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(schema = %schema, table = %args.table_name, error = %e, "Relationship discovery failed");
                return Ok(ExecutionResult::error(format!(
                    "Error finding relationships: {}",
                    e
                )));
            }
        };

        tracing::info!(
            schema = %schema,
            table = %args.table_name,
            explicit = report.explicit().len(),
            implied = report.implied().len(),
            "Found relationships"
        );

        let text = render::report(&report);
        let value = json!({
            "schema": schema,
            "table": args.table_name,
            "relationships": serde_json::to_value(&report)?,
        });
        Ok(ExecutionResult::success(text, value))
    }
}

fn catalog_failure(tool: &str, error: CatalogError) -> ExecutionResult {
    tracing::warn!(tool, error = %error, "Catalog read failed");
    ExecutionResult::error(format!("Catalog error: {}", error))
}

fn parse_args<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, McpError> {
    let arguments = if arguments.is_null() {
        json!({})
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| McpError::InvalidArguments {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}

fn parse_table_args(tool: &str, arguments: Value) -> Result<TableArgs, McpError> {
    let args: TableArgs = parse_args(tool, arguments)?;
    if args.table_name.trim().is_empty() {
        return Err(McpError::InvalidArguments {
            tool: tool.to_string(),
            reason: "table_name must not be empty".to_string(),
        });
    }
    Ok(args)
}
