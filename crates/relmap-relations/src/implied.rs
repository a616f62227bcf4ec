//! Implied relationship inference from naming conventions and types.
//!
//! Id-like columns of the analysed table are paired with every other table of
//! the same schema that has either an `id` column or a column of the same name.
//! Pairings with different data types are discarded; the rest are ranked by
//! [`crate::ranker`], deduplicated and ordered.

use crate::catalog::CatalogReader;
use crate::error::CatalogError;
use crate::model::{ColumnMetadata, RelationshipCandidate, TableRef, Tier};
use crate::ranker;
use futures::future::try_join_all;
use std::collections::BTreeMap;

/// Name of the conventional primary key column on target tables.
pub const ID_COLUMN: &str = "id";

/// Whether a column name looks like a reference: ends with `id` or `_fk`,
/// ignoring case.
pub fn is_id_like(column_name: &str) -> bool {
    let name = column_name.to_lowercase();
    name.ends_with("id") || name.ends_with("_fk")
}

/// Implied relationships of `schema.table`.
pub async fn infer_implied<C: CatalogReader + ?Sized>(
    catalog: &C,
    schema: &str,
    table: &str,
) -> Result<Vec<RelationshipCandidate>, CatalogError> {
    let sources: Vec<ColumnMetadata> = catalog
        .list_columns(schema, table)
        .await?
        .into_iter()
        .filter(|c| is_id_like(&c.name))
        .collect();

    if sources.is_empty() {
        tracing::debug!(schema, table, "No id-like columns, skipping implied inference");
        return Ok(Vec::new());
    }

    let others: Vec<TableRef> = catalog
        .list_tables(schema)
        .await?
        .into_iter()
        .filter(|t| t.name != table)
        .collect();

    let targets = try_join_all(others.into_iter().map(|t| async move {
        let columns = catalog.list_columns(&t.schema, &t.name).await?;
        Ok::<_, CatalogError>((t, columns))
    }))
    .await?;

    let candidates = infer_from(table, &sources, &targets);
    tracing::debug!(
        schema,
        table,
        source_columns = sources.len(),
        target_tables = targets.len(),
        candidates = candidates.len(),
        "Inferred implied relationships"
    );
    Ok(candidates)
}

/// Pure inference over already-loaded metadata.
///
/// `sources` are the analysed table's columns (non id-like ones are ignored),
/// `targets` every table of the schema with its columns. Targets named
/// `table` are skipped.
pub fn infer_from(
    table: &str,
    sources: &[ColumnMetadata],
    targets: &[(TableRef, Vec<ColumnMetadata>)],
) -> Vec<RelationshipCandidate> {
    let mut best: BTreeMap<(String, String, String), Tier> = BTreeMap::new();

    for source in sources.iter().filter(|c| is_id_like(&c.name)) {
        for (target, columns) in targets {
            if target.name == table {
                continue;
            }

            for column in columns
                .iter()
                .filter(|c| c.name == ID_COLUMN || c.name == source.name)
            {
                let types_equal = source.data_type == column.data_type;
                let Some(tier) = ranker::rank(&source.name, &target.name, types_equal) else {
                    continue;
                };

                best.entry((source.name.clone(), target.name.clone(), column.name.clone()))
                    .and_modify(|current| *current = (*current).min(tier))
                    .or_insert(tier);
            }
        }
    }

    let mut candidates: Vec<RelationshipCandidate> = best
        .into_iter()
        .map(|((source, target_table, target_column), tier)| {
            RelationshipCandidate::new(source, target_table, target_column, tier)
        })
        .collect();

    candidates.sort_by(|a, b| {
        a.tier
            .cmp(&b.tier)
            .then_with(|| a.source_column.cmp(&b.source_column))
            .then_with(|| a.target_table.cmp(&b.target_table))
            .then_with(|| a.target_column.cmp(&b.target_column))
    });
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RelationshipKind;

    fn col(name: &str, data_type: &str) -> ColumnMetadata {
        ColumnMetadata::new(name, data_type)
    }

    fn target(name: &str, columns: Vec<ColumnMetadata>) -> (TableRef, Vec<ColumnMetadata>) {
        (TableRef::new("public", name), columns)
    }

    #[test]
    fn test_is_id_like() {
        assert!(is_id_like("id"));
        assert!(is_id_like("customer_id"));
        assert!(is_id_like("CustomerID"));
        assert!(is_id_like("rapid"));
        assert!(is_id_like("parent_fk"));
        assert!(is_id_like("PARENT_FK"));
        assert!(!is_id_like("name"));
        assert!(!is_id_like("fk_parent"));
        assert!(!is_id_like("identity"));
    }

    #[test]
    fn test_exact_match_from_id_column() {
        let candidates = infer_from(
            "orders",
            &[col("customer_id", "integer"), col("total", "numeric")],
            &[target("customer", vec![col("id", "integer"), col("name", "text")])],
        );
        assert_eq!(
            candidates,
            vec![RelationshipCandidate::new("customer_id", "customer", "id", Tier::ExactMatch)]
        );
        assert_eq!(candidates[0].kind, RelationshipKind::Implied);
    }

    #[test]
    fn test_type_mismatch_is_dropped() {
        let candidates = infer_from(
            "orders",
            &[col("notes_id", "text")],
            &[target("notes", vec![col("id", "integer")])],
        );
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_self_reference_excluded() {
        let candidates = infer_from(
            "nodes",
            &[col("parent_id", "integer")],
            &[target("nodes", vec![col("id", "integer"), col("parent_id", "integer")])],
        );
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_same_name_column_target() {
        let candidates = infer_from(
            "shipments",
            &[col("tracking_fk", "uuid")],
            &[target("parcels", vec![col("tracking_fk", "uuid")])],
        );
        // "tracking_fk" matches no naming rule against "parcels"
        assert!(candidates.is_empty());

        let candidates = infer_from(
            "shipments",
            &[col("parcels_fk", "uuid")],
            &[target("parcels", vec![col("parcels_fk", "uuid")])],
        );
        assert_eq!(
            candidates,
            vec![RelationshipCandidate::new("parcels_fk", "parcels", "parcels_fk", Tier::NameMatch)]
        );
    }

    #[test]
    fn test_id_source_column_pairs_with_id_targets() {
        // A bare "id" column ends with "id" and pairs with other tables' id columns.
        let candidates = infer_from(
            "orders",
            &[col("id", "integer")],
            &[target("customers", vec![col("id", "integer")])],
        );
        assert_eq!(
            candidates,
            vec![RelationshipCandidate::new("id", "customers", "id", Tier::Possible)]
        );
    }

    #[test]
    fn test_duplicate_keys_keep_best_tier() {
        let sources = [col("customer_id", "integer")];
        let targets = [
            target("customer", vec![col("id", "integer")]),
            target("customer", vec![col("id", "integer")]),
        ];
        let candidates = infer_from("orders", &sources, &targets);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].tier, Tier::ExactMatch);
    }

    #[test]
    fn test_ordering_by_tier_then_column() {
        let candidates = infer_from(
            "orders",
            &[
                col("rapid", "integer"),
                col("warehouse_id", "integer"),
                col("customer_id", "integer"),
            ],
            &[
                target("customer", vec![col("id", "integer")]),
                target("depots", vec![col("id", "integer")]),
            ],
        );
        let summary: Vec<(&str, &str, u8)> = candidates
            .iter()
            .map(|c| (c.source_column.as_str(), c.target_table.as_str(), c.tier.level()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("customer_id", "customer", 2),
                ("customer_id", "depots", 3),
                ("warehouse_id", "customer", 3),
                ("warehouse_id", "depots", 3),
                ("rapid", "customer", 5),
                ("rapid", "depots", 5),
            ]
        );
    }

    #[test]
    fn test_non_id_like_sources_ignored() {
        let candidates = infer_from(
            "orders",
            &[col("status", "text")],
            &[target("status", vec![col("status", "text")])],
        );
        assert!(candidates.is_empty());
    }
}
