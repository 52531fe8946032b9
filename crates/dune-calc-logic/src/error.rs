//! Error types for catalog loading and resource calculation.

use std::path::PathBuf;

/// Failure while computing a calculation request.
///
/// Unknown names are the only way a calculation can fail; every other input
/// (non-positive quantities, empty request lists) is a normal case.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalcError {
    /// A requested placeable name has no exact match in the catalog.
    #[error("Placeable '{name}' not found")]
    UnknownPlaceable { name: String },
}

/// Failure while loading or validating a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate placeable name '{0}' in catalog")]
    DuplicateName(String),
    #[error("catalog contains a placeable with an empty name")]
    EmptyName,
    #[error("placeable '{placeable}' has zero cost for resource '{resource}'")]
    ZeroCost { placeable: String, resource: String },
}
