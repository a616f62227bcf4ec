//! In-memory catalog.
//!
//! Backs unit and integration tests of the engine and of the tool layer
//! without a live database.

use crate::catalog::{CatalogBrowser, CatalogReader, ColumnDetail, TableFilter, TableListing};
use crate::error::CatalogError;
use crate::model::{ColumnMetadata, ForeignKeyConstraint, TableRef};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone)]
struct MemoryTable {
    table_type: String,
    columns: Vec<ColumnDetail>,
    foreign_keys: Vec<ForeignKeyConstraint>,
}

/// A catalog held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    schemas: BTreeSet<String>,
    tables: BTreeMap<TableRef, MemoryTable>,
    unavailable: Option<String>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty schema.
    pub fn with_schema(mut self, schema: &str) -> Self {
        self.schemas.insert(schema.to_string());
        self
    }

    /// Add a base table with `(name, data_type)` columns.
    pub fn with_table(self, schema: &str, name: &str, columns: &[(&str, &str)]) -> Self {
        self.with_relation(schema, name, "BASE TABLE", columns)
    }

    /// Add a view with `(name, data_type)` columns.
    pub fn with_view(self, schema: &str, name: &str, columns: &[(&str, &str)]) -> Self {
        self.with_relation(schema, name, "VIEW", columns)
    }

    fn with_relation(
        mut self,
        schema: &str,
        name: &str,
        table_type: &str,
        columns: &[(&str, &str)],
    ) -> Self {
        self.schemas.insert(schema.to_string());
        let columns = columns
            .iter()
            .map(|(column, data_type)| ColumnDetail {
                name: column.to_string(),
                data_type: data_type.to_string(),
                is_nullable: *column != "id",
                column_default: None,
                character_maximum_length: None,
            })
            .collect();
        self.tables.insert(
            TableRef::new(schema, name),
            MemoryTable {
                table_type: table_type.to_string(),
                columns,
                foreign_keys: Vec::new(),
            },
        );
        self
    }

    /// Declare a foreign-key column on an existing table. Columns of the same
    /// constraint get increasing positions in call order.
    pub fn with_foreign_key(
        mut self,
        schema: &str,
        table: &str,
        constraint_name: &str,
        source_column: &str,
        target_table: &str,
        target_column: &str,
    ) -> Self {
        if let Some(entry) = self.tables.get_mut(&TableRef::new(schema, table)) {
            let position = entry
                .foreign_keys
                .iter()
                .filter(|fk| fk.constraint_name == constraint_name)
                .count() as u32
                + 1;
            entry.foreign_keys.push(ForeignKeyConstraint {
                constraint_name: constraint_name.to_string(),
                source_column: source_column.to_string(),
                target_schema: schema.to_string(),
                target_table: target_table.to_string(),
                target_column: target_column.to_string(),
                position,
            });
        }
        self
    }

    /// Make every read fail as if the database were unreachable.
    pub fn unavailable(mut self, reason: &str) -> Self {
        self.unavailable = Some(reason.to_string());
        self
    }

    fn check_available(&self) -> Result<(), CatalogError> {
        match &self.unavailable {
            Some(reason) => Err(CatalogError::unavailable(reason.clone())),
            None => Ok(()),
        }
    }

    fn table(&self, schema: &str, table: &str) -> Option<&MemoryTable> {
        self.tables.get(&TableRef::new(schema, table))
    }
}

#[async_trait]
impl CatalogReader for InMemoryCatalog {
    async fn list_columns(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<Vec<ColumnMetadata>, CatalogError> {
        self.check_available()?;
        Ok(self
            .table(schema, table)
            .map(|t| {
                t.columns
                    .iter()
                    .map(|c| ColumnMetadata::new(&c.name, &c.data_type))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn list_explicit_foreign_keys(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<Vec<ForeignKeyConstraint>, CatalogError> {
        self.check_available()?;
        Ok(self
            .table(schema, table)
            .map(|t| t.foreign_keys.clone())
            .unwrap_or_default())
    }

    async fn list_tables(&self, schema: &str) -> Result<Vec<TableRef>, CatalogError> {
        self.check_available()?;
        Ok(self
            .tables
            .keys()
            .filter(|t| t.schema == schema)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CatalogBrowser for InMemoryCatalog {
    async fn list_schemas(&self) -> Result<Vec<String>, CatalogError> {
        self.check_available()?;
        Ok(self.schemas.iter().cloned().collect())
    }

    async fn list_relations(
        &self,
        schema: &str,
        filter: &TableFilter,
    ) -> Result<Vec<TableListing>, CatalogError> {
        self.check_available()?;
        Ok(self
            .tables
            .iter()
            .filter(|(t, _)| t.schema == schema && filter.matches(&t.name))
            .map(|(t, entry)| TableListing {
                name: t.name.clone(),
                table_type: entry.table_type.clone(),
            })
            .collect())
    }

    async fn describe_table(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<Vec<ColumnDetail>, CatalogError> {
        self.check_available()?;
        Ok(self
            .table(schema, table)
            .map(|t| t.columns.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::new()
            .with_table("public", "orders", &[("id", "integer"), ("customer_id", "integer")])
            .with_table("public", "customers", &[("id", "integer")])
            .with_view("public", "order_totals", &[("order_id", "integer")])
            .with_table("sales", "leads", &[("id", "uuid")])
            .with_foreign_key("public", "orders", "orders_customer_fk", "customer_id", "customers", "id")
    }

    #[tokio::test]
    async fn test_reads_are_scoped_to_schema() {
        let catalog = catalog();
        let tables = catalog.list_tables("public").await.unwrap();
        let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["customers", "order_totals", "orders"]);

        assert_eq!(catalog.list_schemas().await.unwrap(), vec!["public", "sales"]);
    }

    #[tokio::test]
    async fn test_unknown_table_reads_empty() {
        let catalog = catalog();
        assert!(catalog.list_columns("public", "missing").await.unwrap().is_empty());
        assert!(catalog
            .list_explicit_foreign_keys("nope", "orders")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_foreign_key_positions() {
        let catalog = InMemoryCatalog::new()
            .with_table("public", "lines", &[("order_id", "integer"), ("line_no", "integer")])
            .with_foreign_key("public", "lines", "lines_fk", "order_id", "order_lines", "order_id")
            .with_foreign_key("public", "lines", "lines_fk", "line_no", "order_lines", "line_no");
        let fks = catalog.list_explicit_foreign_keys("public", "lines").await.unwrap();
        let positions: Vec<u32> = fks.iter().map(|fk| fk.position).collect();
        assert_eq!(positions, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_list_relations_filters_and_reports_type() {
        let catalog = catalog();
        let listed = catalog
            .list_relations("public", &TableFilter::name_like("order*"))
            .await
            .unwrap();
        assert_eq!(
            listed,
            vec![
                TableListing {
                    name: "order_totals".to_string(),
                    table_type: "VIEW".to_string()
                },
                TableListing {
                    name: "orders".to_string(),
                    table_type: "BASE TABLE".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_unavailable_fails_every_read() {
        let catalog = catalog().unavailable("connection refused");
        let err = catalog.list_tables("public").await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
        assert!(catalog.describe_table("public", "orders").await.is_err());
    }
}
