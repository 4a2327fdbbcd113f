//! Core error types.

use std::fmt;

use thiserror::Error;

/// Roster category an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterCategory {
    Drivers,
    Constructors,
}

impl fmt::Display for RosterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosterCategory::Drivers => write!(f, "drivers"),
            RosterCategory::Constructors => write!(f, "constructors"),
        }
    }
}

/// Validation failures on a desired roster.
///
/// All of these are raised before a single action is emitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error("Desired {0} list is empty")]
    EmptySpec(RosterCategory),

    #[error("Desired {category} list contains '{member}' more than once")]
    DuplicateMember {
        category: RosterCategory,
        member: String,
    },

    #[error("Desired {category} list has {len} entries, capacity is {capacity}")]
    OversizedSpec {
        category: RosterCategory,
        len: usize,
        capacity: usize,
    },

    #[error("Boost target '{0}' is not one of the desired drivers")]
    InvalidBoostTarget(String),
}

/// Errors raised while parsing a desired roster document.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("Invalid desired roster document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Desired {category} list has {len} entries, expected exactly {expected}")]
    Undersized {
        category: RosterCategory,
        len: usize,
        expected: usize,
    },

    #[error("Desired {0} list contains a blank name")]
    BlankMember(RosterCategory),

    #[error(transparent)]
    Invalid(#[from] ReconcileError),
}

/// Errors raised when translating calculator abbreviations to site names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("Unknown driver abbreviation '{0}'")]
    UnknownDriver(String),

    #[error("Unknown constructor abbreviation '{0}'")]
    UnknownConstructor(String),

    #[error("Boost override '{0}' must be one of the selected drivers")]
    BoostOverrideNotSelected(String),
}

/// Errors raised by the team optimizer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptimizerError {
    #[error("No analyst simulation found in calculator data")]
    NoSimulation,

    #[error("Could not build driver/constructor pick lists")]
    EmptyPickList,

    #[error("No feasible team under budget {0}")]
    Infeasible(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_display() {
        assert_eq!(RosterCategory::Drivers.to_string(), "drivers");
        assert_eq!(RosterCategory::Constructors.to_string(), "constructors");
    }

    #[test]
    fn test_oversized_display() {
        let err = ReconcileError::OversizedSpec {
            category: RosterCategory::Drivers,
            len: 6,
            capacity: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains("drivers"));
        assert!(msg.contains('6'));
        assert!(msg.contains('5'));
    }

    #[test]
    fn test_spec_error_wraps_reconcile_error() {
        let err: SpecError = ReconcileError::InvalidBoostTarget("Z".to_string()).into();
        assert!(matches!(err, SpecError::Invalid(ReconcileError::InvalidBoostTarget(_))));
        assert!(err.to_string().contains("'Z'"));
    }

    #[test]
    fn test_mapping_error_display() {
        let err = MappingError::UnknownDriver("XYZ".to_string());
        assert_eq!(err.to_string(), "Unknown driver abbreviation 'XYZ'");
    }
}
