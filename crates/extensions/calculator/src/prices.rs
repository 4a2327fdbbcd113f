//! Price lookup tables.

use std::collections::BTreeMap;

use f1sync_core::CalculatorData;
use f1sync_core::optimizer::CalculatorEntry;
use serde::{Deserialize, Serialize};

/// Prices in millions keyed by abbreviation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceMaps {
    pub drivers: BTreeMap<String, f64>,
    pub constructors: BTreeMap<String, f64>,
}

impl PriceMaps {
    pub fn driver(&self, abbr: &str) -> Option<f64> {
        self.drivers.get(abbr).copied()
    }

    pub fn constructor(&self, abbr: &str) -> Option<f64> {
        self.constructors.get(abbr).copied()
    }
}

fn prices_of(entries: &[CalculatorEntry], kind: &str) -> BTreeMap<String, f64> {
    entries
        .iter()
        .filter(|e| e.is_kind(kind))
        .filter_map(|e| Some((e.abbreviation.clone()?, e.price?)))
        .filter(|(abbr, _)| !abbr.is_empty())
        .collect()
}

/// Driver and constructor prices listed by the calculator.
pub fn price_maps(data: &CalculatorData) -> PriceMaps {
    PriceMaps {
        drivers: prices_of(&data.drivers, "driver"),
        constructors: prices_of(&data.constructors, "constructor"),
    }
}
