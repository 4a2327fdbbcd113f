//! Roster and team state types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::contains_member;

/// Roster observed on the site at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    #[serde(default)]
    pub drivers: Vec<String>,

    #[serde(default)]
    pub constructors: Vec<String>,

    /// Driver currently carrying the boost.
    #[serde(default, rename = "boost_driver")]
    pub boosted: Option<String>,
}

impl RosterSnapshot {
    pub fn new(
        drivers: Vec<String>,
        constructors: Vec<String>,
        boosted: Option<String>,
    ) -> Self {
        Self {
            drivers,
            constructors,
            boosted,
        }
    }

    /// The boosted driver, if it is actually one of the drivers.
    ///
    /// A reader may pick up a stray boost badge; a boost that does not belong
    /// to a selected driver is treated as no boost at all.
    pub fn effective_boost(&self) -> Option<&str> {
        self.boosted
            .as_deref()
            .filter(|b| contains_member(&self.drivers, b))
    }
}

/// Fixed roster sizes imposed by the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterCapacity {
    pub drivers: usize,
    pub constructors: usize,
}

impl Default for RosterCapacity {
    fn default() -> Self {
        Self {
            drivers: 5,
            constructors: 2,
        }
    }
}

/// Budget figures read from the team page, in millions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSnapshot {
    pub remaining_m: f64,
    pub used_m: f64,
    pub cap_m: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_source")]
    pub source: String,
}

impl BudgetSnapshot {
    /// Build a snapshot from the remaining cap and the sum of selected prices.
    pub fn from_parts(remaining_m: f64, used_m: f64) -> Self {
        Self {
            remaining_m: round3(remaining_m),
            used_m: round3(used_m),
            cap_m: round3(remaining_m + used_m),
            currency: default_currency(),
            source: default_source(),
        }
    }
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_source() -> String {
    "fantasy.formula1.com".to_string()
}

/// Round to three decimals, the precision prices are quoted with.
pub fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

/// Persisted record of a team as read from the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamState {
    pub ts_utc: String,
    pub team_id: u32,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(flatten)]
    pub roster: RosterSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<BudgetSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default = "default_state_source")]
    pub source: String,
}

fn default_state_source() -> String {
    "site".to_string()
}

impl TeamState {
    /// Stamp a freshly read roster.
    pub fn observed(team_id: u32, team_name: Option<String>, roster: RosterSnapshot) -> Self {
        Self {
            ts_utc: utc_stamp(Utc::now()),
            team_id,
            team_name,
            roster,
            budget: None,
            url: None,
            source: default_state_source(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_budget(mut self, budget: BudgetSnapshot) -> Self {
        self.budget = Some(budget);
        self
    }
}

/// Second-precision UTC timestamp with a `Z` suffix.
pub fn utc_stamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
