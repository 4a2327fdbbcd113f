//! Observed-vs-desired roster reconciliation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ReconcileError, RosterCategory};
use crate::identity::{contains_member, normalize_name, same_member};
use crate::model::{RosterCapacity, RosterSnapshot};
use crate::plan::{Action, ActionPlan};
use crate::spec::DesiredSpec;

/// Result of reconciling an observed roster against a desired one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub plan: ActionPlan,
    pub changed: bool,
}

impl Reconciliation {
    pub fn is_noop(&self) -> bool {
        !self.changed
    }
}

/// Compute the ordered actions that turn `observed` into `desired`.
///
/// The desired roster is validated in full before anything is emitted; the
/// first violation found is returned and no plan is produced.
///
/// Emission order: driver removals (observed order), driver additions
/// (desired order), constructor removals, constructor additions, then boost
/// changes.
pub fn reconcile(
    observed: &RosterSnapshot,
    desired: &DesiredSpec,
    capacity: &RosterCapacity,
) -> Result<Reconciliation, ReconcileError> {
    validate(desired, capacity)?;

    let drivers_remove = difference(&observed.drivers, &desired.drivers);
    let drivers_add = difference(&desired.drivers, &observed.drivers);
    let constructors_remove = difference(&observed.constructors, &desired.constructors);
    let constructors_add = difference(&desired.constructors, &observed.constructors);

    let mut plan = ActionPlan::new();
    for d in &drivers_remove {
        plan.push(Action::RemoveDriver(d.clone()));
    }
    for d in &drivers_add {
        plan.push(Action::AddDriver(d.clone()));
    }
    for c in &constructors_remove {
        plan.push(Action::RemoveConstructor(c.clone()));
    }
    for c in &constructors_add {
        plan.push(Action::AddConstructor(c.clone()));
    }

    let observed_boost = observed.effective_boost();
    let desired_boost = desired.boost_driver.as_deref();

    let boost_differs = match (observed_boost, desired_boost) {
        (Some(o), Some(d)) => !same_member(o, d),
        (None, None) => false,
        _ => true,
    };

    if boost_differs {
        // Un-boost explicitly, even when the holder was removed above.
        if observed_boost.is_some() {
            plan.push(Action::ClearBoost);
        }
        if let Some(target) = desired_boost {
            plan.push(Action::SetBoost(target.to_string()));
        }
    }

    let changed = !plan.is_empty();
    debug!(
        actions = plan.len(),
        drivers_out = drivers_remove.len(),
        constructors_out = constructors_remove.len(),
        "Reconciled roster"
    );
    Ok(Reconciliation { plan, changed })
}

/// Validate a desired roster against the site's capacity.
pub(crate) fn validate(
    desired: &DesiredSpec,
    capacity: &RosterCapacity,
) -> Result<(), ReconcileError> {
    validate_members(&desired.drivers, RosterCategory::Drivers, capacity.drivers)?;
    validate_members(
        &desired.constructors,
        RosterCategory::Constructors,
        capacity.constructors,
    )?;

    if let Some(boost) = &desired.boost_driver {
        // The post-membership driver set equals the desired driver set, so
        // membership there is the whole check.
        if !contains_member(&desired.drivers, boost) {
            return Err(ReconcileError::InvalidBoostTarget(boost.clone()));
        }
    }
    Ok(())
}

fn validate_members(
    members: &[String],
    category: RosterCategory,
    capacity: usize,
) -> Result<(), ReconcileError> {
    if members.is_empty() {
        return Err(ReconcileError::EmptySpec(category));
    }
    if members.len() > capacity {
        return Err(ReconcileError::OversizedSpec {
            category,
            len: members.len(),
            capacity,
        });
    }

    let mut seen = HashSet::with_capacity(members.len());
    for m in members {
        if !seen.insert(normalize_name(m)) {
            return Err(ReconcileError::DuplicateMember {
                category,
                member: m.clone(),
            });
        }
    }
    Ok(())
}

/// Members of `left` not in `right`, in `left` order, display spelling kept.
fn difference(left: &[String], right: &[String]) -> Vec<String> {
    let right: HashSet<String> = right.iter().map(|r| normalize_name(r)).collect();
    let mut seen = HashSet::new();
    left.iter()
        .filter(|l| {
            let key = normalize_name(l);
            !right.contains(&key) && seen.insert(key)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
