//! Data model shared by the relationship engine and its catalog readers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A column as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Column name, unique within its table.
    pub name: String,
    /// Catalog data type (e.g. `integer`, `text`, `uuid`).
    pub data_type: String,
}

impl ColumnMetadata {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// A `(schema, name)` reference to a table or view.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TableRef {
    pub schema: String,
    pub name: String,
}

impl TableRef {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

/// One column mapping of a declared foreign-key constraint.
///
/// Multi-column constraints are reported as one entry per column, with
/// `position` giving the declared ordinal (1-based) inside the constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyConstraint {
    pub constraint_name: String,
    pub source_column: String,
    pub target_schema: String,
    pub target_table: String,
    pub target_column: String,
    pub position: u32,
}

/// Whether a relationship was declared or inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipKind {
    Explicit,
    Implied,
}

/// Confidence tier of a relationship. Lower is stronger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Declared foreign key.
    Explicit = 1,
    /// Column is exactly `<table>_id`.
    ExactMatch = 2,
    /// Column ends with `_id`.
    IdSuffix = 3,
    /// Column contains the target table name.
    NameMatch = 4,
    /// Column merely ends with `id`.
    Possible = 5,
}

impl Tier {
    /// Numeric confidence level (1..=5).
    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Tier::Explicit),
            2 => Some(Tier::ExactMatch),
            3 => Some(Tier::IdSuffix),
            4 => Some(Tier::NameMatch),
            5 => Some(Tier::Possible),
            _ => None,
        }
    }

    /// Human readable relationship label for this tier.
    pub fn label(self) -> &'static str {
        match self {
            Tier::Explicit => "Explicit FK",
            Tier::ExactMatch => "Strong implied relationship (exact match)",
            Tier::IdSuffix => "Strong implied relationship (_id pattern)",
            Tier::NameMatch => "Likely implied relationship (name match)",
            Tier::Possible => "Possible implied relationship",
        }
    }

    pub fn kind(self) -> RelationshipKind {
        match self {
            Tier::Explicit => RelationshipKind::Explicit,
            _ => RelationshipKind::Implied,
        }
    }
}

impl Serialize for Tier {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.level())
    }
}

impl<'de> Deserialize<'de> for Tier {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let level = u8::deserialize(deserializer)?;
        Tier::from_level(level)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid tier level {}", level)))
    }
}

/// A relationship from a column of the analysed table to another table's column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipCandidate {
    pub source_column: String,
    pub target_table: String,
    pub target_column: String,
    pub kind: RelationshipKind,
    pub tier: Tier,
    pub label: String,
}

impl RelationshipCandidate {
    /// Build a candidate whose kind and label follow from `tier`.
    pub fn new(
        source_column: impl Into<String>,
        target_table: impl Into<String>,
        target_column: impl Into<String>,
        tier: Tier,
    ) -> Self {
        Self {
            source_column: source_column.into(),
            target_table: target_table.into(),
            target_column: target_column.into(),
            kind: tier.kind(),
            tier,
            label: tier.label().to_string(),
        }
    }

    /// Deduplication key.
    pub fn key(&self) -> (&str, &str, &str) {
        (&self.source_column, &self.target_table, &self.target_column)
    }
}
