//! Cost modes — standard pricing vs. the Deep Desert discount.
//!
//! Building in the Deep Desert costs half the usual resources, rounded up,
//! and never less than one unit of any resource the build needs.

use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CostMode {
    #[default]
    Standard,
    DeepDesert,
}

impl CostMode {
    pub fn from_deep_desert_flag(use_deep_desert_cost: bool) -> Self {
        if use_deep_desert_cost {
            CostMode::DeepDesert
        } else {
            CostMode::Standard
        }
    }

    /// Rewrite every present total for this mode. Absent resources stay absent.
    pub fn apply(self, totals: &mut IndexMap<String, u128>) {
        if let CostMode::DeepDesert = self {
            for amount in totals.values_mut() {
                *amount = deep_desert_amount(*amount);
            }
        }
    }
}

/// Half of `amount`, rounded up, with a floor of 1.
pub fn deep_desert_amount(amount: u128) -> u128 {
    (amount / 2 + amount % 2).max(1)
}
