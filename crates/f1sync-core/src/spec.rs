//! Desired roster document.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RosterCategory, SpecError};
use crate::model::{RosterCapacity, RosterSnapshot};
use crate::reconcile;

/// Target roster, as supplied by the user or the optimizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredSpec {
    pub drivers: Vec<String>,
    pub constructors: Vec<String>,
    #[serde(default)]
    pub boost_driver: Option<String>,
}

impl DesiredSpec {
    pub fn new(drivers: Vec<String>, constructors: Vec<String>, boost_driver: Option<String>) -> Self {
        Self {
            drivers,
            constructors,
            boost_driver,
        }
    }

    /// Parse and validate a JSON document.
    pub fn from_json(content: &str) -> Result<Self, SpecError> {
        let spec: DesiredSpec = serde_json::from_str(content)?;
        spec.validate(&RosterCapacity::default())?;
        Ok(spec)
    }

    /// Load and validate a JSON document from disk.
    pub fn load(path: &Path) -> Result<Self, SpecError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Boundary validation.
    ///
    /// Stricter than what the reconciler needs: the site only saves full
    /// rosters, so lists must match the capacity exactly and names must not
    /// be blank.
    pub fn validate(&self, capacity: &RosterCapacity) -> Result<(), SpecError> {
        for (members, category) in [
            (&self.drivers, RosterCategory::Drivers),
            (&self.constructors, RosterCategory::Constructors),
        ] {
            if members.iter().any(|m| m.trim().is_empty()) {
                return Err(SpecError::BlankMember(category));
            }
        }
        if self.boost_driver.as_deref().is_some_and(|b| b.trim().is_empty()) {
            return Err(SpecError::BlankMember(RosterCategory::Drivers));
        }

        reconcile::validate(self, capacity)?;

        for (len, expected, category) in [
            (self.drivers.len(), capacity.drivers, RosterCategory::Drivers),
            (
                self.constructors.len(),
                capacity.constructors,
                RosterCategory::Constructors,
            ),
        ] {
            if len < expected {
                return Err(SpecError::Undersized {
                    category,
                    len,
                    expected,
                });
            }
        }
        Ok(())
    }

    /// Pretty JSON with a trailing newline, as written to ideal files.
    pub fn to_json_pretty(&self) -> Result<String, SpecError> {
        let mut s = serde_json::to_string_pretty(self)?;
        s.push('\n');
        Ok(s)
    }

    /// View the spec as the roster it describes.
    pub fn as_snapshot(&self) -> RosterSnapshot {
        RosterSnapshot::new(
            self.drivers.clone(),
            self.constructors.clone(),
            self.boost_driver.clone(),
        )
    }
}

/// Audit record of the last spec applied successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastApplied {
    pub ts_utc: String,
    pub ideal: DesiredSpec,
}
