//! Catalog access contract.
//!
//! The relationship engine only needs [`CatalogReader`]. The listing tools
//! (schemas, tables, column details) additionally use [`CatalogBrowser`].
//! Both are read-only and must reflect catalog state at call time.

use crate::error::CatalogError;
use crate::model::{ColumnMetadata, ForeignKeyConstraint, TableRef};
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Read-only access to column, constraint and table metadata.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Columns of `schema.table` in declaration order. Empty if the table does not exist.
    async fn list_columns(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<Vec<ColumnMetadata>, CatalogError>;

    /// Declared foreign keys of `schema.table`, one entry per constrained column.
    async fn list_explicit_foreign_keys(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<Vec<ForeignKeyConstraint>, CatalogError>;

    /// Tables and views of `schema`.
    async fn list_tables(&self, schema: &str) -> Result<Vec<TableRef>, CatalogError>;
}

/// Catalog reads backing the listing tools.
#[async_trait]
pub trait CatalogBrowser: CatalogReader {
    /// All schema names, sorted.
    async fn list_schemas(&self) -> Result<Vec<String>, CatalogError>;

    /// Relations of `schema` matching `filter`, sorted by name.
    async fn list_relations(
        &self,
        schema: &str,
        filter: &TableFilter,
    ) -> Result<Vec<TableListing>, CatalogError>;

    /// Detailed column information for `schema.table` in declaration order.
    async fn describe_table(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<Vec<ColumnDetail>, CatalogError>;
}

/// A relation returned by [`CatalogBrowser::list_relations`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableListing {
    pub name: String,
    /// `BASE TABLE`, `VIEW`, ...
    pub table_type: String,
}

/// Column details returned by [`CatalogBrowser::describe_table`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDetail {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_maximum_length: Option<i32>,
}

/// Name filter for relation listings.
///
/// `name_like` accepts shell-style wildcards (`*`, `?`) as well as SQL
/// `LIKE` wildcards (`%`, `_`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFilter {
    #[serde(default)]
    pub name_like: Option<String>,
    #[serde(default)]
    pub case_sensitive: bool,
}

impl TableFilter {
    pub fn name_like(pattern: impl Into<String>) -> Self {
        Self {
            name_like: Some(pattern.into()),
            case_sensitive: false,
        }
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// The pattern translated to SQL `LIKE` syntax, if any.
    pub fn like_pattern(&self) -> Option<String> {
        self.name_like
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| p.replace('*', "%").replace('?', "_"))
    }

    /// Whether `name` passes the filter, with `LIKE` semantics.
    pub fn matches(&self, name: &str) -> bool {
        let Some(pattern) = self.like_pattern() else {
            return true;
        };

        let mut expr = String::from(if self.case_sensitive { "^" } else { "(?i)^" });
        for ch in pattern.chars() {
            match ch {
                '%' => expr.push_str(".*"),
                '_' => expr.push('.'),
                other => expr.push_str(&regex::escape(&other.to_string())),
            }
        }
        expr.push('$');

        match Regex::new(&expr) {
            Ok(re) => re.is_match(name),
            Err(e) => {
                tracing::warn!(pattern = %pattern, error = %e, "Ignoring unusable table filter");
                true
            }
        }
    }
}
