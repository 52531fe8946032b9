//! Placeable catalog — every known placeable and its per-unit resource cost.
//!
//! The catalog is loaded once at startup from an ordered JSON array:
//!
//! ```json
//! [
//!   { "name": "Wall", "resources": { "wood": 10, "stone": 5 } }
//! ]
//! ```
//!
//! Entries keep file order for listing, and each resource map keeps the
//! key order it was written in. Lookups are exact string matches
//! served from a name index built at load time. A loaded catalog is never
//! mutated, so it can be shared across threads behind an `Arc` without
//! locking.

use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// A single placeable recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    /// Resource name → cost for one unit. Every cost is at least 1.
    pub resources: IndexMap<String, u32>,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, resources: &[(&str, u32)]) -> Self {
        Self {
            name: name.into(),
            resources: resources
                .iter()
                .map(|(resource, amount)| (resource.to_string(), *amount))
                .collect(),
        }
    }
}

/// Immutable, validated collection of placeables.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from in-memory entries, validating names and costs.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(entries.len());

        for (i, entry) in entries.iter().enumerate() {
            if entry.name.is_empty() {
                return Err(CatalogError::EmptyName);
            }
            if let Some((resource, _)) = entry.resources.iter().find(|(_, amount)| **amount == 0)
            {
                return Err(CatalogError::ZeroCost {
                    placeable: entry.name.clone(),
                    resource: resource.clone(),
                });
            }
            if index.insert(entry.name.clone(), i).is_some() {
                return Err(CatalogError::DuplicateName(entry.name.clone()));
            }
        }

        Ok(Self { entries, index })
    }

    /// Parse a catalog from its JSON array representation.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    /// Read and parse a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// All entries in catalog (file) order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Exact-match lookup by placeable name.
    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every distinct resource name referenced by any entry, sorted.
    pub fn resource_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .entries
            .iter()
            .flat_map(|e| e.resources.keys().map(String::as_str))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}
