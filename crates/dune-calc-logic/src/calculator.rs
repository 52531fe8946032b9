//! Resource calculator — aggregate costs for a batch of placeables.
//!
//! Given a [`Catalog`] and a list of `(name, quantity)` requests, sums
//! `quantity × per-unit cost` for every resource, then applies the
//! selected [`CostMode`]. The function is pure: the same catalog and request
//! always produce the same result.
//!
//! Rules, in order, for each requested item:
//! 1. The name must exist in the catalog, otherwise the whole call fails
//!    with [`CalcError::UnknownPlaceable`] and nothing is returned.
//! 2. Items with `quantity <= 0` are skipped silently.
//! 3. Remaining items add to the totals and appear in the breakdown, in
//!    request order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::cost::CostMode;
use crate::error::CalcError;

/// One requested placeable. Any sign of quantity is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceableRequest {
    pub name: String,
    pub quantity: i64,
}

impl PlaceableRequest {
    pub fn new(name: impl Into<String>, quantity: i64) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub placeables: Vec<PlaceableRequest>,
    #[serde(default)]
    pub use_deep_desert_cost: bool,
}

impl CalculationRequest {
    pub fn cost_mode(&self) -> CostMode {
        CostMode::from_deep_desert_flag(self.use_deep_desert_cost)
    }
}

/// Per-item breakdown line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCalculated {
    pub name: String,
    pub quantity: i64,
    pub resources_per_unit: IndexMap<String, u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Resource → total, in the order each resource was first needed.
    pub total_resources: IndexMap<String, u128>,
    pub use_deep_desert_cost: bool,
    pub items_calculated: Vec<ItemCalculated>,
}

/// Compute total resources for every requested placeable.
///
/// Fails on the first name missing from the catalog. Totals are exact:
/// one item adds at most `u32::MAX * i64::MAX`, well inside `u128`.
pub fn calculate(
    catalog: &Catalog,
    request: &CalculationRequest,
) -> Result<CalculationResult, CalcError> {
    let mut total_resources: IndexMap<String, u128> = IndexMap::new();
    let mut items_calculated = Vec::new();

    for item in &request.placeables {
        let entry = catalog
            .get(&item.name)
            .ok_or_else(|| CalcError::UnknownPlaceable {
                name: item.name.clone(),
            })?;

        if item.quantity <= 0 {
            continue;
        }
        let quantity = item.quantity as u128;

        for (resource, &per_unit) in &entry.resources {
            let amount = u128::from(per_unit) * quantity;
            *total_resources.entry(resource.clone()).or_insert(0) += amount;
        }

        items_calculated.push(ItemCalculated {
            name: item.name.clone(),
            quantity: item.quantity,
            resources_per_unit: entry.resources.clone(),
        });
    }

    request.cost_mode().apply(&mut total_resources);

    Ok(CalculationResult {
        total_resources,
        use_deep_desert_cost: request.use_deep_desert_cost,
        items_calculated,
    })
}

/// Every requested name with no catalog entry, de-duplicated, in request order.
pub fn unknown_names<'a>(catalog: &Catalog, request: &'a CalculationRequest) -> Vec<&'a str> {
    let mut missing: Vec<&str> = Vec::new();
    for item in &request.placeables {
        if !catalog.contains(&item.name) && !missing.contains(&item.name.as_str()) {
            missing.push(&item.name);
        }
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;

    fn wall_catalog() -> Catalog {
        Catalog::from_entries(vec![
            CatalogEntry::new("Wall", &[("wood", 10), ("stone", 5)]),
            CatalogEntry::new("Gate", &[("wood", 4), ("iron", 3)]),
            CatalogEntry::new("Marker", &[]),
        ])
        .unwrap()
    }

    fn request(items: &[(&str, i64)], deep_desert: bool) -> CalculationRequest {
        CalculationRequest {
            placeables: items
                .iter()
                .map(|(name, qty)| PlaceableRequest::new(*name, *qty))
                .collect(),
            use_deep_desert_cost: deep_desert,
        }
    }

    #[test]
    fn test_single_item_standard() {
        let result = calculate(&wall_catalog(), &request(&[("Wall", 3)], false)).unwrap();
        assert_eq!(result.total_resources["wood"], 30);
        assert_eq!(result.total_resources["stone"], 15);
        assert_eq!(result.total_resources.len(), 2);
        assert!(!result.use_deep_desert_cost);
    }

    #[test]
    fn test_single_item_deep_desert() {
        let result = calculate(&wall_catalog(), &request(&[("Wall", 3)], true)).unwrap();
        assert_eq!(result.total_resources["wood"], 15);
        assert_eq!(result.total_resources["stone"], 8);
        assert!(result.use_deep_desert_cost);
    }

    #[test]
    fn test_zero_quantity_skipped() {
        let result = calculate(&wall_catalog(), &request(&[("Wall", 0)], false)).unwrap();
        assert!(result.total_resources.is_empty());
        assert!(result.items_calculated.is_empty());
    }

    #[test]
    fn test_negative_quantity_skipped() {
        let result =
            calculate(&wall_catalog(), &request(&[("Wall", -5), ("Gate", 1)], false)).unwrap();
        assert_eq!(result.total_resources["wood"], 4);
        assert!(!result.total_resources.contains_key("stone"));
        assert_eq!(result.items_calculated.len(), 1);
        assert_eq!(result.items_calculated[0].name, "Gate");
    }

    #[test]
    fn test_unknown_name_fails() {
        let err = calculate(&wall_catalog(), &request(&[("Unknown", 1)], false)).unwrap_err();
        assert_eq!(
            err,
            CalcError::UnknownPlaceable {
                name: "Unknown".into()
            }
        );
        assert_eq!(err.to_string(), "Placeable 'Unknown' not found");
    }

    #[test]
    fn test_unknown_after_valid_items_returns_no_result() {
        let res = calculate(
            &wall_catalog(),
            &request(&[("Wall", 2), ("Gate", 1), ("Tower", 1)], false),
        );
        assert!(matches!(res, Err(CalcError::UnknownPlaceable { ref name }) if name == "Tower"));
    }

    #[test]
    fn test_unknown_name_fails_even_with_zero_quantity() {
        let res = calculate(&wall_catalog(), &request(&[("Tower", 0)], false));
        assert!(res.is_err());
    }

    #[test]
    fn test_first_unknown_reported() {
        let err = calculate(
            &wall_catalog(),
            &request(&[("Alpha", 1), ("Beta", 1)], false),
        )
        .unwrap_err();
        assert_eq!(
            err,
            CalcError::UnknownPlaceable {
                name: "Alpha".into()
            }
        );
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert!(calculate(&wall_catalog(), &request(&[("wall", 1)], false)).is_err());
    }

    #[test]
    fn test_breakdown_in_request_order() {
        let result = calculate(
            &wall_catalog(),
            &request(&[("Gate", 2), ("Wall", 1), ("Gate", 1)], false),
        )
        .unwrap();
        let names: Vec<_> = result
            .items_calculated
            .iter()
            .map(|i| (i.name.as_str(), i.quantity))
            .collect();
        assert_eq!(names, vec![("Gate", 2), ("Wall", 1), ("Gate", 1)]);
        assert_eq!(result.items_calculated[1].resources_per_unit["wood"], 10);
        // 4*2 + 10*1 + 4*1
        assert_eq!(result.total_resources["wood"], 22);
        assert_eq!(result.total_resources["iron"], 9);
    }

    #[test]
    fn test_order_does_not_change_totals() {
        let catalog = wall_catalog();
        let a = calculate(&catalog, &request(&[("Wall", 3), ("Gate", 7)], true)).unwrap();
        let b = calculate(&catalog, &request(&[("Gate", 7), ("Wall", 3)], true)).unwrap();
        assert_eq!(a.total_resources, b.total_resources);
    }

    #[test]
    fn test_deep_desert_halves_aggregate_not_items() {
        // Halving applies to the aggregate (2 -> 1), not per item (1 + 1).
        let catalog =
            Catalog::from_entries(vec![CatalogEntry::new("Post", &[("stone", 1)])]).unwrap();
        let result = calculate(&catalog, &request(&[("Post", 1), ("Post", 1)], true)).unwrap();
        assert_eq!(result.total_resources["stone"], 1);
    }

    #[test]
    fn test_deep_desert_floor_of_one() {
        let catalog =
            Catalog::from_entries(vec![CatalogEntry::new("Post", &[("stone", 1)])]).unwrap();
        let result = calculate(&catalog, &request(&[("Post", 1)], true)).unwrap();
        assert_eq!(result.total_resources["stone"], 1);
    }

    #[test]
    fn test_empty_resources_item_listed_without_totals() {
        let result = calculate(&wall_catalog(), &request(&[("Marker", 4)], true)).unwrap();
        assert!(result.total_resources.is_empty());
        assert_eq!(result.items_calculated.len(), 1);
    }

    #[test]
    fn test_empty_request() {
        let result = calculate(&wall_catalog(), &CalculationRequest::default()).unwrap();
        assert_eq!(result, CalculationResult::default());
    }

    #[test]
    fn test_idempotent() {
        let catalog = wall_catalog();
        let req = request(&[("Wall", 3), ("Gate", 11)], true);
        assert_eq!(
            calculate(&catalog, &req).unwrap(),
            calculate(&catalog, &req).unwrap()
        );
    }

    #[test]
    fn test_huge_quantities_stay_exact() {
        let result = calculate(
            &wall_catalog(),
            &request(&[("Wall", i64::MAX), ("Wall", 1)], false),
        )
        .unwrap();
        let walls = i64::MAX as u128 + 1;
        assert_eq!(result.total_resources["wood"], 10 * walls);
        assert_eq!(result.total_resources["stone"], 5 * walls);
        assert!(result.total_resources["wood"] > u64::MAX as u128);

        let halved = calculate(
            &wall_catalog(),
            &request(&[("Wall", i64::MAX), ("Wall", 1)], true),
        )
        .unwrap();
        assert_eq!(halved.total_resources["wood"], 5 * walls);
    }

    #[test]
    fn test_huge_total_serializes_exactly() {
        let result =
            calculate(&wall_catalog(), &request(&[("Wall", i64::MAX / 4)], false)).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains(r#""wood":23058430092136939510"#));
    }

    #[test]
    fn test_resource_order_preserved() {
        let result = calculate(
            &wall_catalog(),
            &request(&[("Gate", 1), ("Wall", 1)], false),
        )
        .unwrap();
        let totals: Vec<_> = result.total_resources.keys().map(String::as_str).collect();
        // First-needed order: Gate brings wood and iron, Wall adds stone.
        assert_eq!(totals, vec!["wood", "iron", "stone"]);
        let per_unit: Vec<_> = result.items_calculated[1]
            .resources_per_unit
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(per_unit, vec!["wood", "stone"]);
    }

    #[test]
    fn test_unknown_names_collects_all_once() {
        let req = request(&[("Alpha", 1), ("Wall", 1), ("Beta", 0), ("Alpha", 2)], false);
        assert_eq!(unknown_names(&wall_catalog(), &req), vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_request_flag_defaults_false() {
        let req: CalculationRequest =
            serde_json::from_str(r#"{"placeables": [{"name": "Wall", "quantity": 1}]}"#).unwrap();
        assert!(!req.use_deep_desert_cost);
        assert_eq!(req.cost_mode(), CostMode::Standard);
    }

    #[test]
    fn test_result_wire_shape() {
        let result = calculate(&wall_catalog(), &request(&[("Gate", 2)], false)).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "total_resources": {"iron": 6, "wood": 8},
                "use_deep_desert_cost": false,
                "items_calculated": [
                    {"name": "Gate", "quantity": 2, "resources_per_unit": {"iron": 3, "wood": 4}}
                ]
            })
        );
    }
}
