//! One-shot catalog commands. Each runs the matching MCP tool once and prints
//! its text or JSON block.

use super::GlobalArgs;
use anyhow::{Context, Result};
use relmap_mcp::tools::{
    DESCRIBE_TABLE, FIND_RELATIONSHIPS, GET_FOREIGN_KEYS, LIST_SCHEMAS, LIST_TABLES,
};
use relmap_mcp::{ExecutionResult, ToolExecutor};
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogCommand {
    Relationships {
        table: String,
    },
    Schemas,
    Tables {
        name_like: Option<String>,
        case_sensitive: bool,
    },
    Describe {
        table: String,
    },
    ForeignKeys {
        table: String,
    },
}

impl CatalogCommand {
    /// Tool name and arguments for this command. The schema is left to the
    /// executor's default.
    fn tool_call(&self) -> (&'static str, Value) {
        match self {
            CatalogCommand::Relationships { table } => {
                (FIND_RELATIONSHIPS, json!({ "table_name": table }))
            }
            CatalogCommand::Schemas => (LIST_SCHEMAS, json!({})),
            CatalogCommand::Tables {
                name_like,
                case_sensitive,
            } => {
                let mut args = json!({ "case_sensitive": case_sensitive });
                if let Some(pattern) = name_like {
                    args["name_like"] = json!(pattern);
                }
                (LIST_TABLES, args)
            }
            CatalogCommand::Describe { table } => (DESCRIBE_TABLE, json!({ "table_name": table })),
            CatalogCommand::ForeignKeys { table } => {
                (GET_FOREIGN_KEYS, json!({ "table_name": table }))
            }
        }
    }
}

pub async fn execute(global: &GlobalArgs, command: CatalogCommand) -> Result<()> {
    let config = super::load_config(global)?;
    let catalog = super::connect(&config).await?;
    let executor = ToolExecutor::new(Arc::new(catalog), config.catalog.default_schema.clone());

    let (tool, arguments) = command.tool_call();
    let result = executor
        .execute(tool, arguments)
        .await
        .with_context(|| format!("Failed to run {}", tool))?;

    println!("{}", output(&result, global.json)?);
    Ok(())
}

fn output(result: &ExecutionResult, as_json: bool) -> Result<String> {
    if !result.success {
        anyhow::bail!(
            "{}",
            result.error.as_deref().unwrap_or("catalog command failed")
        );
    }

    if as_json {
        let value = result.json().cloned().unwrap_or(Value::Null);
        Ok(serde_json::to_string_pretty(&value)?)
    } else {
        Ok(result.text().unwrap_or_default().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_calls() {
        let (tool, args) = CatalogCommand::Relationships {
            table: "orders".to_string(),
        }
        .tool_call();
        assert_eq!(tool, FIND_RELATIONSHIPS);
        assert_eq!(args, json!({"table_name": "orders"}));

        let (tool, args) = CatalogCommand::Tables {
            name_like: Some("ord*".to_string()),
            case_sensitive: false,
        }
        .tool_call();
        assert_eq!(tool, LIST_TABLES);
        assert_eq!(args, json!({"case_sensitive": false, "name_like": "ord*"}));

        let (_, args) = CatalogCommand::Tables {
            name_like: None,
            case_sensitive: true,
        }
        .tool_call();
        assert!(args.get("name_like").is_none());
    }

    #[test]
    fn test_output_modes() {
        let result = ExecutionResult::success("Results:".to_string(), json!({"schemas": []}));
        assert_eq!(output(&result, false).unwrap(), "Results:");
        assert_eq!(output(&result, true).unwrap(), "{\n  \"schemas\": []\n}");

        let failed = ExecutionResult::error("Catalog error: catalog unavailable: down");
        let err = output(&failed, false).unwrap_err();
        assert_eq!(err.to_string(), "Catalog error: catalog unavailable: down");
    }
}
