//! Confidence ranking for implied relationships.
//!
//! Rules are evaluated top-down and the first match wins. A column named
//! `customer_id` pointing at table `customer` satisfies the exact-match,
//! `_id` suffix and `id` suffix rules at once; it must rank as an exact match.
//! Names are compared exactly as the catalog reports them.

use crate::model::Tier;

/// A single naming rule.
#[derive(Clone, Copy)]
pub struct Rule {
    pub tier: Tier,
    pub name: &'static str,
    matches: fn(source_column: &str, target_table: &str) -> bool,
}

impl Rule {
    pub fn matches(&self, source_column: &str, target_table: &str) -> bool {
        (self.matches)(source_column, target_table)
    }
}

/// Rules in priority order.
pub const RULES: [Rule; 4] = [
    Rule {
        tier: Tier::ExactMatch,
        name: "table_id",
        matches: |column, table| column.strip_suffix("_id") == Some(table),
    },
    Rule {
        tier: Tier::IdSuffix,
        name: "_id suffix",
        matches: |column, _| column.ends_with("_id"),
    },
    Rule {
        tier: Tier::NameMatch,
        name: "contains table name",
        matches: |column, table| column.contains(table),
    },
    Rule {
        tier: Tier::Possible,
        name: "id suffix",
        matches: |column, _| column.ends_with("id"),
    },
];

/// Rank a pairing of a source column with a target table.
///
/// Returns `None` when the data types differ or no rule matches; such
/// pairings are dropped rather than reported.
pub fn rank(source_column: &str, target_table: &str, types_equal: bool) -> Option<Tier> {
    if !types_equal {
        return None;
    }

    RULES
        .iter()
        .find(|rule| rule.matches(source_column, target_table))
        .map(|rule| rule.tier)
}
