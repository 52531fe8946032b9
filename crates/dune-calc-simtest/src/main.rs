//! Dune Calculator Headless Harness
//!
//! Validates the bundled catalog and the calculator's invariants without
//! the HTTP server. Runs entirely in-process.
//!
//! Usage:
//!   cargo run -p dune-calc-simtest
//!   cargo run -p dune-calc-simtest -- --verbose --seed 7 --iterations 5000

use std::collections::{BTreeMap, HashSet};

use clap::Parser;
use dune_calc_logic::calculator::{
    calculate, unknown_names, CalculationRequest, PlaceableRequest,
};
use dune_calc_logic::catalog::Catalog;
use dune_calc_logic::cost::deep_desert_amount;
use dune_calc_logic::error::CalcError;
use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

// ── Catalog data (same JSON the server loads) ───────────────────────────
const CATALOG_JSON: &str = include_str!("../../../data/dune_placeables.json");

/// Loosely typed record, so bad values show up as failures instead of a
/// single parse error.
#[derive(Debug, Deserialize)]
struct RawEntry {
    name: String,
    resources: BTreeMap<String, i64>,
}

#[derive(Parser, Debug)]
#[command(name = "dune-calc-simtest")]
#[command(about = "Headless validation harness for the Dune calculator")]
struct Args {
    /// Print passing checks and data summaries.
    #[arg(long)]
    verbose: bool,

    /// Seed for the random request sweep.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of random requests to check.
    #[arg(long, default_value_t = 1000)]
    iterations: u32,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let args = Args::parse();
    println!("=== Dune Calculator Harness ===\n");

    let mut results = Vec::new();

    // 1. Raw catalog data
    results.extend(validate_catalog_data(args.verbose));

    let catalog = match Catalog::from_json_str(CATALOG_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "catalog_load".into(),
                passed: false,
                detail: format!("catalog rejected: {}", e),
            });
            report(&results, args.verbose);
            return;
        }
    };

    // 2. Fixed calculation scenarios
    results.extend(validate_scenarios(&catalog));

    // 3. Randomized invariant sweep
    results.extend(validate_random_sweep(&catalog, args.seed, args.iterations));

    report(&results, args.verbose);
}

fn report(results: &[TestResult], verbose: bool) {
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Catalog Data ─────────────────────────────────────────────────────

fn validate_catalog_data(verbose: bool) -> Vec<TestResult> {
    println!("--- Catalog Data ---");
    let mut results = Vec::new();

    let raw: Vec<RawEntry> = match serde_json::from_str(CATALOG_JSON) {
        Ok(r) => r,
        Err(e) => {
            results.push(TestResult {
                name: "catalog_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "catalog_not_empty".into(),
        passed: !raw.is_empty(),
        detail: format!("{} placeables loaded", raw.len()),
    });

    let mut seen = HashSet::new();
    let dupes: Vec<&str> = raw
        .iter()
        .filter(|e| !seen.insert(e.name.as_str()))
        .map(|e| e.name.as_str())
        .collect();
    results.push(TestResult {
        name: "catalog_unique_names".into(),
        passed: dupes.is_empty(),
        detail: if dupes.is_empty() {
            "all names unique".into()
        } else {
            format!("duplicate names: {}", dupes.join(", "))
        },
    });

    let bad_cost: Vec<String> = raw
        .iter()
        .flat_map(|e| {
            e.resources
                .iter()
                .filter(|(_, amount)| **amount <= 0 || **amount > u32::MAX as i64)
                .map(move |(resource, amount)| format!("{}/{}={}", e.name, resource, amount))
        })
        .collect();
    results.push(TestResult {
        name: "catalog_positive_costs".into(),
        passed: bad_cost.is_empty(),
        detail: if bad_cost.is_empty() {
            "all per-unit costs positive".into()
        } else {
            format!("{} bad costs: {}", bad_cost.len(), bad_cost.join(", "))
        },
    });

    let padded: Vec<&str> = raw
        .iter()
        .filter(|e| e.name.is_empty() || e.name.trim() != e.name)
        .map(|e| e.name.as_str())
        .collect();
    results.push(TestResult {
        name: "catalog_clean_names".into(),
        passed: padded.is_empty(),
        detail: format!("{} empty or padded names", padded.len()),
    });

    let has_basics = ["Foundation", "Wall", "Door"]
        .iter()
        .all(|n| raw.iter().any(|e| e.name == *n));
    results.push(TestResult {
        name: "catalog_key_placeables".into(),
        passed: has_basics,
        detail: "foundation, wall and door present".into(),
    });

    if verbose {
        let mut usage: BTreeMap<&str, usize> = BTreeMap::new();
        for e in &raw {
            for resource in e.resources.keys() {
                *usage.entry(resource.as_str()).or_default() += 1;
            }
        }
        println!("  Resource usage across placeables:");
        for (resource, count) in &usage {
            println!("    {:20}: {} placeables", resource, count);
        }
    }

    results
}

// ── 2. Fixed Scenarios ──────────────────────────────────────────────────

fn request(items: &[(&str, i64)], deep_desert: bool) -> CalculationRequest {
    CalculationRequest {
        placeables: items
            .iter()
            .map(|(name, qty)| PlaceableRequest::new(*name, *qty))
            .collect(),
        use_deep_desert_cost: deep_desert,
    }
}

fn validate_scenarios(catalog: &Catalog) -> Vec<TestResult> {
    println!("--- Calculation Scenarios ---");
    let mut results = Vec::new();

    // Starter base: 10 foundations, 12 walls, 1 door
    let base = request(&[("Foundation", 10), ("Wall", 12), ("Door", 1)], false);
    match calculate(catalog, &base) {
        Ok(r) => {
            let stone = r.total_resources.get("Granite Stone").copied().unwrap_or(0);
            results.push(TestResult {
                name: "scenario_starter_base".into(),
                passed: stone == 112 && r.items_calculated.len() == 3,
                detail: format!("granite={} items={}", stone, r.items_calculated.len()),
            });
        }
        Err(e) => results.push(TestResult {
            name: "scenario_starter_base".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    // Same base in the Deep Desert
    let deep = request(&[("Foundation", 10), ("Wall", 12), ("Door", 1)], true);
    let deep_ok = calculate(catalog, &deep)
        .map(|r| {
            r.total_resources.get("Granite Stone") == Some(&56)
                && r.total_resources.get("Salvaged Metal") == Some(&1)
        })
        .unwrap_or(false);
    results.push(TestResult {
        name: "scenario_deep_desert_base".into(),
        passed: deep_ok,
        detail: "granite 112 → 56, metal 2 → 1".into(),
    });

    // Non-positive quantities contribute nothing
    let skipped = calculate(catalog, &request(&[("Wall", 0), ("Roof", -3)], true));
    results.push(TestResult {
        name: "scenario_non_positive_skipped".into(),
        passed: matches!(&skipped, Ok(r) if r.total_resources.is_empty() && r.items_calculated.is_empty()),
        detail: "zero and negative quantities produce an empty result".into(),
    });

    // Unknown names abort the whole request
    let unknown = calculate(catalog, &request(&[("Wall", 5), ("Sandworm Trap", 1)], false));
    results.push(TestResult {
        name: "scenario_unknown_rejected".into(),
        passed: matches!(&unknown, Err(CalcError::UnknownPlaceable { name }) if name == "Sandworm Trap"),
        detail: match &unknown {
            Ok(_) => "unexpected success".into(),
            Err(e) => e.to_string(),
        },
    });

    results
}

// ── 3. Random Sweep ─────────────────────────────────────────────────────

fn validate_random_sweep(catalog: &Catalog, seed: u64, iterations: u32) -> Vec<TestResult> {
    println!("--- Random Sweep (seed={}, n={}) ---", seed, iterations);
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(seed);
    let names: Vec<&str> = catalog.entries().iter().map(|e| e.name.as_str()).collect();
    if names.is_empty() {
        results.push(TestResult {
            name: "sweep_catalog".into(),
            passed: false,
            detail: "empty catalog, nothing to sweep".into(),
        });
        return results;
    }

    let mut sum_mismatches = 0u32;
    let mut skipped_leaks = 0u32;
    let mut halving_mismatches = 0u32;
    let mut unknown_leaks = 0u32;
    let mut nondeterministic = 0u32;

    for _ in 0..iterations {
        let len = rng.gen_range(0..8);
        let mut req = CalculationRequest {
            placeables: (0..len)
                .map(|_| {
                    let name = names[rng.gen_range(0..names.len())];
                    PlaceableRequest::new(name, rng.gen_range(-5..=50))
                })
                .collect(),
            use_deep_desert_cost: rng.gen_bool(0.5),
        };

        let Ok(result) = calculate(catalog, &req) else {
            sum_mismatches += 1;
            continue;
        };

        let mut expected: IndexMap<String, u128> = IndexMap::new();
        for item in req.placeables.iter().filter(|i| i.quantity > 0) {
            if let Some(entry) = catalog.get(&item.name) {
                for (resource, per_unit) in &entry.resources {
                    *expected.entry(resource.clone()).or_insert(0) +=
                        u128::from(*per_unit) * item.quantity as u128;
                }
            }
        }
        let standard = if req.use_deep_desert_cost {
            let mut flat = req.clone();
            flat.use_deep_desert_cost = false;
            calculate(catalog, &flat).map(|r| r.total_resources).ok()
        } else {
            Some(result.total_resources.clone())
        };
        if standard.as_ref() != Some(&expected) {
            sum_mismatches += 1;
        }
        if req.use_deep_desert_cost {
            let halved: IndexMap<String, u128> = expected
                .iter()
                .map(|(k, v)| (k.clone(), deep_desert_amount(*v)))
                .collect();
            if halved != result.total_resources {
                halving_mismatches += 1;
            }
        }

        if result.items_calculated.iter().any(|i| i.quantity <= 0)
            || result.items_calculated.len()
                != req.placeables.iter().filter(|i| i.quantity > 0).count()
        {
            skipped_leaks += 1;
        }

        if calculate(catalog, &req).ok().as_ref() != Some(&result) {
            nondeterministic += 1;
        }

        // Poison the request with an unknown name at a random position
        let at = rng.gen_range(0..=req.placeables.len());
        req.placeables
            .insert(at, PlaceableRequest::new("__missing__", 1));
        if calculate(catalog, &req).is_ok() || unknown_names(catalog, &req) != ["__missing__"] {
            unknown_leaks += 1;
        }
    }

    for (name, count, what) in [
        ("sweep_totals_match_sum", sum_mismatches, "totals differ from Σ qty × cost"),
        ("sweep_skipped_items_absent", skipped_leaks, "non-positive items leaked into breakdown"),
        ("sweep_deep_desert_halving", halving_mismatches, "halved totals differ from max(1, ceil(a/2))"),
        ("sweep_unknown_rejected", unknown_leaks, "unknown name did not abort"),
        ("sweep_deterministic", nondeterministic, "repeat call gave a different result"),
    ] {
        results.push(TestResult {
            name: name.into(),
            passed: count == 0,
            detail: format!("{}/{} requests: {}", count, iterations, what),
        });
    }

    results
}
