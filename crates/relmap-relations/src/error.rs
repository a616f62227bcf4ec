//! Error types for catalog access.

use thiserror::Error;

/// Errors raised while reading catalog metadata.
///
/// A missing schema or table is not an error: readers return empty lists
/// and the engine reports no relationships.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The metadata source could not be reached, timed out, or returned an
    /// unexpected shape.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

impl CatalogError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        CatalogError::Unavailable(message.into())
    }
}
