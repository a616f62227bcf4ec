//! Declared foreign-key extraction.

use crate::catalog::CatalogReader;
use crate::error::CatalogError;
use crate::model::{ForeignKeyConstraint, RelationshipCandidate, Tier};

/// Declared foreign keys of `schema.table` as tier-1 candidates.
///
/// Ordered by constraint name, then by the column's position inside the
/// constraint. Self-referencing constraints are passed through unchanged.
pub async fn extract_explicit<C: CatalogReader + ?Sized>(
    catalog: &C,
    schema: &str,
    table: &str,
) -> Result<Vec<RelationshipCandidate>, CatalogError> {
    let constraints = catalog.list_explicit_foreign_keys(schema, table).await?;
    tracing::debug!(
        schema,
        table,
        constraint_columns = constraints.len(),
        "Loaded declared foreign keys"
    );
    Ok(to_candidates(constraints))
}

fn to_candidates(mut constraints: Vec<ForeignKeyConstraint>) -> Vec<RelationshipCandidate> {
    constraints.sort_by(|a, b| {
        a.constraint_name
            .cmp(&b.constraint_name)
            .then(a.position.cmp(&b.position))
    });

    constraints
        .into_iter()
        .map(|fk| {
            RelationshipCandidate::new(fk.source_column, fk.target_table, fk.target_column, Tier::Explicit)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RelationshipKind;

    fn fk(name: &str, column: &str, target: &str, position: u32) -> ForeignKeyConstraint {
        ForeignKeyConstraint {
            constraint_name: name.to_string(),
            source_column: column.to_string(),
            target_schema: "public".to_string(),
            target_table: target.to_string(),
            target_column: "id".to_string(),
            position,
        }
    }

    #[test]
    fn test_orders_by_constraint_then_position() {
        let candidates = to_candidates(vec![
            fk("fk_b", "b2", "beta", 2),
            fk("fk_a", "a1", "alpha", 1),
            fk("fk_b", "b1", "beta", 1),
        ]);
        let columns: Vec<&str> = candidates.iter().map(|c| c.source_column.as_str()).collect();
        assert_eq!(columns, vec!["a1", "b1", "b2"]);
    }

    #[test]
    fn test_all_candidates_are_explicit_tier_one() {
        let candidates = to_candidates(vec![fk("fk_self", "parent_id", "nodes", 1)]);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].kind, RelationshipKind::Explicit);
        assert_eq!(candidates[0].tier.level(), 1);
        assert_eq!(candidates[0].label, "Explicit FK");
        assert_eq!(candidates[0].target_table, "nodes");
    }
}
