//! # f1sync Core
//!
//! Roster model and reconciliation logic for the f1sync automation.
//!
//! The reconciler is a pure function: given the roster observed on the site
//! and the desired roster, it returns the ordered list of primitive UI
//! actions that turn one into the other. Everything that touches the outside
//! world (the browser, the filesystem, the network) lives in other crates and
//! talks to this one through the [`RosterReader`] and [`RosterApplier`]
//! traits.

pub mod error;
pub mod identity;
pub mod mappings;
pub mod model;
pub mod optimizer;
pub mod plan;
pub mod reconcile;
pub mod roster;
pub mod spec;

pub use error::{MappingError, OptimizerError, ReconcileError, RosterCategory, SpecError};
pub use identity::{normalize_name, same_member};
pub use model::{BudgetSnapshot, RosterCapacity, RosterSnapshot, TeamState};
pub use optimizer::{compute_optimal, CalculatorData, OptimalTeam, SimulationInfo};
pub use plan::{Action, ActionPlan};
pub use reconcile::{reconcile, Reconciliation};
pub use roster::{RosterApplier, RosterReader};
pub use spec::{DesiredSpec, LastApplied};
