//! Pure placeable cost logic for the Dune calculator.
//!
//! This crate contains the catalog and the resource calculator, independent
//! of any HTTP framework or runtime. Functions take plain data and return
//! results, so the same code backs the server, the headless harness and the
//! unit tests.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`catalog`] | Placeable catalog: JSON loading, validation, lookup, listing |
//! | [`calculator`] | Aggregate resource totals for a batch of placeable requests |
//! | [`cost`] | Standard vs. Deep Desert cost mode and the halving rule |
//! | [`error`] | Catalog load errors and calculation errors |
//!
//! ```
//! use dune_calc_logic::calculator::{calculate, CalculationRequest, PlaceableRequest};
//! use dune_calc_logic::catalog::Catalog;
//!
//! let catalog = Catalog::from_json_str(
//!     r#"[{"name": "Wall", "resources": {"wood": 10, "stone": 5}}]"#,
//! )
//! .unwrap();
//! let request = CalculationRequest {
//!     placeables: vec![PlaceableRequest::new("Wall", 3)],
//!     use_deep_desert_cost: false,
//! };
//! let result = calculate(&catalog, &request).unwrap();
//! assert_eq!(result.total_resources["wood"], 30);
//! assert_eq!(result.total_resources["stone"], 15);
//! ```

pub mod calculator;
pub mod catalog;
pub mod cost;
pub mod error;

pub use calculator::{calculate, CalculationRequest, CalculationResult, PlaceableRequest};
pub use catalog::{Catalog, CatalogEntry};
pub use error::{CalcError, CatalogError};
