//! Composition of explicit and implied relationships into a report.

use crate::model::RelationshipCandidate;
use serde::{Deserialize, Serialize};

/// Relationships of a single table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Report {
    /// Neither declared nor implied relationships exist.
    NoRelationshipsFound,
    /// At least one section is non-empty.
    Found {
        explicit_relationships: Vec<RelationshipCandidate>,
        implied_relationships: Vec<RelationshipCandidate>,
    },
}

impl Report {
    pub fn is_empty(&self) -> bool {
        matches!(self, Report::NoRelationshipsFound)
    }

    pub fn explicit(&self) -> &[RelationshipCandidate] {
        match self {
            Report::NoRelationshipsFound => &[],
            Report::Found {
                explicit_relationships,
                ..
            } => explicit_relationships,
        }
    }

    pub fn implied(&self) -> &[RelationshipCandidate] {
        match self {
            Report::NoRelationshipsFound => &[],
            Report::Found {
                implied_relationships,
                ..
            } => implied_relationships,
        }
    }
}

/// Compose both sections as given; no filtering or re-ranking happens here.
pub fn assemble(
    explicit: Vec<RelationshipCandidate>,
    implied: Vec<RelationshipCandidate>,
) -> Report {
    if explicit.is_empty() && implied.is_empty() {
        return Report::NoRelationshipsFound;
    }
    Report::Found {
        explicit_relationships: explicit,
        implied_relationships: implied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tier;
    use serde_json::json;

    #[test]
    fn test_empty_inputs_yield_sentinel() {
        let report = assemble(Vec::new(), Vec::new());
        assert!(report.is_empty());
        assert!(report.explicit().is_empty());
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({"status": "no_relationships_found"})
        );
    }

    #[test]
    fn test_sections_preserved_in_order() {
        let implied = vec![
            RelationshipCandidate::new("b_id", "b", "id", Tier::ExactMatch),
            RelationshipCandidate::new("a_id", "x", "id", Tier::IdSuffix),
        ];
        let report = assemble(Vec::new(), implied.clone());
        assert!(!report.is_empty());
        assert!(report.explicit().is_empty());
        assert_eq!(report.implied(), implied.as_slice());
    }

    #[test]
    fn test_serialized_shape() {
        let report = assemble(
            vec![RelationshipCandidate::new("customer_id", "customers", "id", Tier::Explicit)],
            Vec::new(),
        );
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["status"], "found");
        assert_eq!(value["explicit_relationships"][0]["tier"], 1);
        assert_eq!(value["explicit_relationships"][0]["label"], "Explicit FK");
        assert_eq!(value["implied_relationships"], json!([]));
    }
}
