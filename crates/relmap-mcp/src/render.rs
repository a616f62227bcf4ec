//! Text rendering of catalog rows and relationship reports.
//!
//! A row set renders as a `Results:` header followed by one
//! `key: value | key: value` line per row. Missing values print as `NULL`.

use relmap_relations::{
    ColumnDetail, ForeignKeyConstraint, RelationshipCandidate, Report, TableListing,
};

pub const NO_RESULTS: &str = "No results found";
pub const NO_RELATIONSHIPS: &str = "No relationships found for this table";

/// One output row: column labels paired with nullable values, in display order.
pub type Row = Vec<(&'static str, Option<String>)>;

pub fn rows(rows: &[Row]) -> String {
    if rows.is_empty() {
        return NO_RESULTS.to_string();
    }

    let mut lines = vec!["Results:".to_string(), "--------".to_string()];
    for row in rows {
        let items: Vec<String> = row
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value.as_deref().unwrap_or("NULL")))
            .collect();
        lines.push(items.join(" | "));
    }
    lines.join("\n")
}

pub fn schema_rows(schemas: &[String]) -> Vec<Row> {
    schemas
        .iter()
        .map(|name| vec![("schema_name", Some(name.clone()))])
        .collect()
}

pub fn table_rows(tables: &[TableListing]) -> Vec<Row> {
    tables
        .iter()
        .map(|t| {
            vec![
                ("table_name", Some(t.name.clone())),
                ("table_type", Some(t.table_type.clone())),
            ]
        })
        .collect()
}

pub fn column_rows(columns: &[ColumnDetail]) -> Vec<Row> {
    columns
        .iter()
        .map(|c| {
            vec![
                ("column_name", Some(c.name.clone())),
                ("data_type", Some(c.data_type.clone())),
                (
                    "is_nullable",
                    Some(if c.is_nullable { "YES" } else { "NO" }.to_string()),
                ),
                ("column_default", c.column_default.clone()),
                (
                    "character_maximum_length",
                    c.character_maximum_length.map(|n| n.to_string()),
                ),
            ]
        })
        .collect()
}

pub fn foreign_key_rows(foreign_keys: &[ForeignKeyConstraint]) -> Vec<Row> {
    foreign_keys
        .iter()
        .map(|fk| {
            vec![
                ("constraint_name", Some(fk.constraint_name.clone())),
                ("fk_column", Some(fk.source_column.clone())),
                ("referenced_schema", Some(fk.target_schema.clone())),
                ("referenced_table", Some(fk.target_table.clone())),
                ("referenced_column", Some(fk.target_column.clone())),
            ]
        })
        .collect()
}

pub fn relationship_rows(candidates: &[RelationshipCandidate]) -> Vec<Row> {
    candidates
        .iter()
        .map(|c| {
            vec![
                ("column_name", Some(c.source_column.clone())),
                ("foreign_table", Some(c.target_table.clone())),
                ("foreign_column", Some(c.target_column.clone())),
                ("relationship_type", Some(c.label.clone())),
                ("confidence_level", Some(c.tier.level().to_string())),
            ]
        })
        .collect()
}

/// Both report sections, or the no-relationships sentinel.
pub fn report(report: &Report) -> String {
    if report.is_empty() {
        return NO_RELATIONSHIPS.to_string();
    }
    format!(
        "Explicit Foreign Keys:\n{}\n\nImplied Relationships:\n{}",
        rows(&relationship_rows(report.explicit())),
        rows(&relationship_rows(report.implied())),
    )
}
