//! Postgres catalog reader backed by `information_schema` and `pg_catalog`.

use async_trait::async_trait;
use relmap_core::{CatalogConfig, UpstreamConfig};
use relmap_relations::{
    CatalogBrowser, CatalogError, CatalogReader, ColumnDetail, ColumnMetadata,
    ForeignKeyConstraint, TableFilter, TableListing, TableRef,
};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::Row;
use std::time::Duration;

pub mod query;

use query::CatalogQuery;

const COLUMNS_SELECT: &str = r#"
    SELECT column_name::text AS column_name,
           data_type::text AS data_type,
           is_nullable::text AS is_nullable,
           column_default::text AS column_default,
           character_maximum_length::int4 AS character_maximum_length
    FROM information_schema.columns
"#;

// Read from pg_constraint: foreign key names are only unique per table, so
// joining information_schema views on constraint name can mix tables.
const FOREIGN_KEYS_SELECT: &str = r#"
    SELECT con.conname::text AS constraint_name,
           sa.attname::text AS source_column,
           tn.nspname::text AS target_schema,
           tc.relname::text AS target_table,
           ta.attname::text AS target_column,
           k.position::int4 AS position
    FROM pg_catalog.pg_constraint con
    JOIN pg_catalog.pg_class sc ON sc.oid = con.conrelid
    JOIN pg_catalog.pg_namespace sn ON sn.oid = sc.relnamespace
    JOIN pg_catalog.pg_class tc ON tc.oid = con.confrelid
    JOIN pg_catalog.pg_namespace tn ON tn.oid = tc.relnamespace
    CROSS JOIN LATERAL unnest(con.conkey, con.confkey)
         WITH ORDINALITY AS k(source_attnum, target_attnum, position)
    JOIN pg_catalog.pg_attribute sa
      ON sa.attrelid = con.conrelid AND sa.attnum = k.source_attnum
    JOIN pg_catalog.pg_attribute ta
      ON ta.attrelid = con.confrelid AND ta.attnum = k.target_attnum
"#;

const TABLES_SELECT: &str = r#"
    SELECT table_schema::text AS table_schema,
           table_name::text AS table_name,
           table_type::text AS table_type
    FROM information_schema.tables
"#;

const SCHEMAS_SELECT: &str = r#"
    SELECT schema_name::text AS schema_name
    FROM information_schema.schemata
"#;

/// Pool and read settings for [`PgCatalog`].
#[derive(Debug, Clone, Copy)]
pub struct PgCatalogOptions {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    /// Upper bound for a single catalog read.
    pub read_timeout: Duration,
}

impl Default for PgCatalogOptions {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            read_timeout: Duration::from_secs(30),
        }
    }
}

impl PgCatalogOptions {
    pub fn from_config(upstream: &UpstreamConfig, catalog: &CatalogConfig) -> Self {
        Self {
            max_connections: upstream.pool.max_connections,
            acquire_timeout: Duration::from_secs(upstream.pool.acquire_timeout_seconds),
            read_timeout: Duration::from_secs(catalog.read_timeout_seconds),
        }
    }
}

/// Catalog reader over a Postgres connection pool.
#[derive(Debug, Clone)]
pub struct PgCatalog {
    pool: sqlx::PgPool,
    read_timeout: Duration,
}

impl PgCatalog {
    pub async fn connect(database_url: &str, options: PgCatalogOptions) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(options.max_connections)
            .acquire_timeout(options.acquire_timeout)
            .connect(database_url)
            .await?;
        tracing::debug!(
            max_connections = options.max_connections,
            "Connected catalog pool"
        );
        Ok(Self::from_pool(pool, options.read_timeout))
    }

    pub fn from_pool(pool: sqlx::PgPool, read_timeout: Duration) -> Self {
        Self { pool, read_timeout }
    }

    pub fn pool(&self) -> &sqlx::PgPool {
        &self.pool
    }

    async fn fetch(&self, query: CatalogQuery) -> Result<Vec<PgRow>, CatalogError> {
        let (sql, args) = query.build()?;
        tracing::trace!(sql = %sql, "Catalog read");

        tokio::time::timeout(
            self.read_timeout,
            sqlx::query_with(&sql, args).fetch_all(&self.pool),
        )
        .await
        .map_err(|_| {
            CatalogError::unavailable(format!(
                "catalog read timed out after {}s",
                self.read_timeout.as_secs()
            ))
        })?
        .map_err(db_error)
    }
}

fn db_error(e: sqlx::Error) -> CatalogError {
    CatalogError::unavailable(e.to_string())
}

fn get<'r, T>(row: &'r PgRow, column: &str) -> Result<T, CatalogError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column).map_err(db_error)
}

fn columns_query(schema: &str, table: &str) -> CatalogQuery {
    CatalogQuery::new(COLUMNS_SELECT)
        .filter_eq("table_schema", schema)
        .filter_eq("table_name", table)
        .order_by("ordinal_position")
}

fn foreign_keys_query(schema: &str, table: &str) -> CatalogQuery {
    CatalogQuery::new(FOREIGN_KEYS_SELECT)
        .condition("con.contype = 'f'")
        .filter_eq("sn.nspname::text", schema)
        .filter_eq("sc.relname::text", table)
        .order_by("con.conname")
        .order_by("k.position")
}

fn column_metadata(row: &PgRow) -> Result<ColumnMetadata, CatalogError> {
    Ok(ColumnMetadata::new(
        get::<String>(row, "column_name")?,
        get::<String>(row, "data_type")?,
    ))
}

fn column_detail(row: &PgRow) -> Result<ColumnDetail, CatalogError> {
    Ok(ColumnDetail {
        name: get(row, "column_name")?,
        data_type: get(row, "data_type")?,
        is_nullable: get::<String>(row, "is_nullable")? == "YES",
        column_default: get(row, "column_default")?,
        character_maximum_length: get(row, "character_maximum_length")?,
    })
}

fn foreign_key(row: &PgRow) -> Result<ForeignKeyConstraint, CatalogError> {
    Ok(ForeignKeyConstraint {
        constraint_name: get(row, "constraint_name")?,
        source_column: get(row, "source_column")?,
        target_schema: get(row, "target_schema")?,
        target_table: get(row, "target_table")?,
        target_column: get(row, "target_column")?,
        position: get::<i32>(row, "position")?.max(0) as u32,
    })
}

fn table_ref(row: &PgRow) -> Result<TableRef, CatalogError> {
    Ok(TableRef::new(
        get::<String>(row, "table_schema")?,
        get::<String>(row, "table_name")?,
    ))
}

fn table_listing(row: &PgRow) -> Result<TableListing, CatalogError> {
    Ok(TableListing {
        name: get(row, "table_name")?,
        table_type: get(row, "table_type")?,
    })
}

#[async_trait]
impl CatalogReader for PgCatalog {
    async fn list_columns(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<Vec<ColumnMetadata>, CatalogError> {
        let rows = self.fetch(columns_query(schema, table)).await?;
        rows.iter().map(column_metadata).collect()
    }

    async fn list_explicit_foreign_keys(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<Vec<ForeignKeyConstraint>, CatalogError> {
        let rows = self.fetch(foreign_keys_query(schema, table)).await?;
        rows.iter().map(foreign_key).collect()
    }

    async fn list_tables(&self, schema: &str) -> Result<Vec<TableRef>, CatalogError> {
        let query = CatalogQuery::new(TABLES_SELECT)
            .filter_eq("table_schema", schema)
            .order_by("table_name");

        let rows = self.fetch(query).await?;
        rows.iter().map(table_ref).collect()
    }
}

#[async_trait]
impl CatalogBrowser for PgCatalog {
    async fn list_schemas(&self) -> Result<Vec<String>, CatalogError> {
        let rows = self
            .fetch(CatalogQuery::new(SCHEMAS_SELECT).order_by("schema_name"))
            .await?;
        rows.iter()
            .map(|row| get::<String>(row, "schema_name"))
            .collect()
    }

    async fn list_relations(
        &self,
        schema: &str,
        filter: &TableFilter,
    ) -> Result<Vec<TableListing>, CatalogError> {
        let mut query = CatalogQuery::new(TABLES_SELECT).filter_eq("table_schema", schema);
        if let Some(pattern) = filter.like_pattern() {
            query = query.filter_like("table_name", pattern, filter.case_sensitive);
        }
        let query = query.order_by("table_name");

        let rows = self.fetch(query).await?;
        rows.iter().map(table_listing).collect()
    }

    async fn describe_table(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<Vec<ColumnDetail>, CatalogError> {
        let rows = self.fetch(columns_query(schema, table)).await?;
        rows.iter().map(column_detail).collect()
    }
}
