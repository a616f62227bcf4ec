//! Tool registry and the catalog tool definitions.

use crate::protocol::{ToolAnnotations, ToolDefinition};
use serde_json::{json, Value};
use std::collections::HashMap;

pub const LIST_SCHEMAS: &str = "list_schemas";
pub const LIST_TABLES: &str = "list_tables";
pub const DESCRIBE_TABLE: &str = "describe_table";
pub const GET_FOREIGN_KEYS: &str = "get_foreign_keys";
pub const FIND_RELATIONSHIPS: &str = "find_relationships";

/// Registry of available MCP tools.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolDefinition>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    /// Create a new empty tool registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Registry holding every catalog tool.
    pub fn catalog(default_schema: &str) -> Self {
        let mut registry = Self::new();
        for tool in catalog_tools(default_schema) {
            registry.register(tool);
        }
        registry
    }

    /// Register a tool.
    pub fn register(&mut self, tool: ToolDefinition) {
        self.tools.insert(tool.name.clone(), tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// All tools, sorted by name.
    pub fn list(&self) -> Vec<&ToolDefinition> {
        let mut tools: Vec<_> = self.tools.values().collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

fn read_only(name: &str, description: String, input_schema: Value) -> ToolDefinition {
    ToolDefinition {
        name: name.to_string(),
        description: Some(description),
        input_schema,
        annotations: Some(ToolAnnotations {
            read_only: Some(true),
        }),
    }
}

fn schema_property(default_schema: &str) -> Value {
    json!({
        "type": "string",
        "description": format!("The schema name (defaults to '{}')", default_schema),
        "default": default_schema
    })
}

fn table_input(default_schema: &str, table_description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "table_name": {
                "type": "string",
                "description": table_description
            },
            "db_schema": schema_property(default_schema)
        },
        "required": ["table_name"],
        "additionalProperties": false
    })
}

/// Definitions of the read-only catalog tools.
pub fn catalog_tools(default_schema: &str) -> Vec<ToolDefinition> {
    vec![
        read_only(
            LIST_SCHEMAS,
            "List all schemas in the database.".to_string(),
            json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
        ),
        read_only(
            LIST_TABLES,
            "List all tables in a specific schema, optionally filtered by name.".to_string(),
            json!({
                "type": "object",
                "properties": {
                    "db_schema": schema_property(default_schema),
                    "name_like": {
                        "type": "string",
                        "description": "Table name pattern; supports * and ? as well as SQL % and _"
                    },
                    "case_sensitive": {
                        "type": "boolean",
                        "description": "Match name_like case sensitively",
                        "default": false
                    }
                },
                "additionalProperties": false
            }),
        ),
        read_only(
            DESCRIBE_TABLE,
            "Get detailed information about a table.".to_string(),
            table_input(default_schema, "The name of the table to describe"),
        ),
        read_only(
            GET_FOREIGN_KEYS,
            "Get foreign key information for a table.".to_string(),
            table_input(default_schema, "The name of the table to get foreign keys from"),
        ),
        read_only(
            FIND_RELATIONSHIPS,
            "Find both explicit and implied relationships for a table.".to_string(),
            table_input(default_schema, "The name of the table to analyze relationships for"),
        ),
    ]
}
