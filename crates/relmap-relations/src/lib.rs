//! # relmap-relations
//!
//! Relationship discovery for a single table of a database catalog.
//!
//! Two kinds of relationships are reported:
//!
//! - **Explicit**: declared foreign-key constraints, always tier 1.
//! - **Implied**: inferred from column naming conventions and matching data
//!   types when no constraint exists, ranked tier 2 (strongest) to 5.
//!
//! ```text
//! CatalogReader ──► extract_explicit ─┐
//!        │                            ├──► assemble ──► Report
//!        └────────► infer_implied ────┘
//!                      │
//!                   ranker (ordered rules, first match wins)
//! ```
//!
//! ## Implied tiers
//!
//! | Tier | Rule | Label |
//! |------|------|-------|
//! | 2 | column is `<table>_id` | Strong implied relationship (exact match) |
//! | 3 | column ends with `_id` | Strong implied relationship (_id pattern) |
//! | 4 | column contains the table name | Likely implied relationship (name match) |
//! | 5 | column ends with `id` | Possible implied relationship |
//!
//! ## Example
//!
//! ```ignore
//! use relmap_relations::{find_relationships, memory::InMemoryCatalog};
//!
//! let catalog = InMemoryCatalog::new()
//!     .with_table("public", "orders", &[("id", "integer"), ("customer_id", "integer")])
//!     .with_table("public", "customer", &[("id", "integer")]);
//!
//! let report = find_relationships(&catalog, "public", "orders").await?;
//! ```

pub mod assembler;
pub mod catalog;
pub mod error;
pub mod explicit;
pub mod implied;
pub mod memory;
pub mod model;
pub mod ranker;

pub use assembler::{assemble, Report};
pub use catalog::{CatalogBrowser, CatalogReader, ColumnDetail, TableFilter, TableListing};
pub use error::CatalogError;
pub use explicit::extract_explicit;
pub use implied::{infer_from, infer_implied, is_id_like};
pub use model::{
    ColumnMetadata, ForeignKeyConstraint, RelationshipCandidate, RelationshipKind, TableRef, Tier,
};

/// Explicit and implied relationships of `schema.table`.
///
/// Both catalog reads run concurrently. A missing table yields
/// [`Report::NoRelationshipsFound`]; only catalog failures are errors.
pub async fn find_relationships<C: CatalogReader + ?Sized>(
    catalog: &C,
    schema: &str,
    table: &str,
) -> Result<Report, CatalogError> {
    let (explicit, implied) = futures::try_join!(
        extract_explicit(catalog, schema, table),
        infer_implied(catalog, schema, table),
    )?;

    tracing::debug!(
        schema,
        table,
        explicit = explicit.len(),
        implied = implied.len(),
        "Assembled relationship report"
    );

    Ok(assemble(explicit, implied))
}
