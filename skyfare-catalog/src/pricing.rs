use crate::aircraft::CabinClass;
use serde::{Deserialize, Serialize};

/// Per-class prices in NUC, assigned to tickets when a flight's inventory
/// is materialized. Prices are uniform per class per flight; the engine
/// never recomputes them afterwards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClassPricing {
    pub economy_nuc: i32,
    pub business_nuc: i32,
    pub first_nuc: i32,
}

impl ClassPricing {
    pub fn price_for(&self, cabin: CabinClass) -> i32 {
        match cabin {
            CabinClass::Economy => self.economy_nuc,
            CabinClass::Business => self.business_nuc,
            CabinClass::First => self.first_nuc,
        }
    }
}

impl Default for ClassPricing {
    fn default() -> Self {
        Self {
            economy_nuc: 100,
            business_nuc: 280,
            first_nuc: 520,
        }
    }
}
