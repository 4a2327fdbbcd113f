//! Primitive roster actions and ordered plans.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identity::same_member;
use crate::model::RosterSnapshot;

/// A single UI-level mutation of the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "member", rename_all = "snake_case")]
pub enum Action {
    RemoveDriver(String),
    AddDriver(String),
    RemoveConstructor(String),
    AddConstructor(String),
    ClearBoost,
    SetBoost(String),
}

impl Action {
    /// Member the action refers to, if any.
    pub fn member(&self) -> Option<&str> {
        match self {
            Action::RemoveDriver(m)
            | Action::AddDriver(m)
            | Action::RemoveConstructor(m)
            | Action::AddConstructor(m)
            | Action::SetBoost(m) => Some(m),
            Action::ClearBoost => None,
        }
    }

    pub fn is_removal(&self) -> bool {
        matches!(self, Action::RemoveDriver(_) | Action::RemoveConstructor(_))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::RemoveDriver(m) => write!(f, "remove driver {}", m),
            Action::AddDriver(m) => write!(f, "add driver {}", m),
            Action::RemoveConstructor(m) => write!(f, "remove constructor {}", m),
            Action::AddConstructor(m) => write!(f, "add constructor {}", m),
            Action::ClearBoost => write!(f, "clear boost"),
            Action::SetBoost(m) => write!(f, "boost {}", m),
        }
    }
}

/// Ordered sequence of actions, meant to be applied front to back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionPlan {
    actions: Vec<Action>,
}

impl ActionPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.actions.iter()
    }

    /// Simulate the plan against a snapshot.
    ///
    /// Removing the boosted driver drops the boost with it, matching how the
    /// site behaves.
    pub fn apply_to(&self, snapshot: &RosterSnapshot) -> RosterSnapshot {
        let mut out = snapshot.clone();
        out.boosted = snapshot.effective_boost().map(str::to_string);

        for action in &self.actions {
            match action {
                Action::RemoveDriver(m) => {
                    out.drivers.retain(|d| !same_member(d, m));
                    if out.boosted.as_deref().is_some_and(|b| same_member(b, m)) {
                        out.boosted = None;
                    }
                }
                Action::AddDriver(m) => out.drivers.push(m.clone()),
                Action::RemoveConstructor(m) => out.constructors.retain(|c| !same_member(c, m)),
                Action::AddConstructor(m) => out.constructors.push(m.clone()),
                Action::ClearBoost => out.boosted = None,
                Action::SetBoost(m) => out.boosted = Some(m.clone()),
            }
        }
        out
    }
}

impl<'a> IntoIterator for &'a ActionPlan {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

impl From<Vec<Action>> for ActionPlan {
    fn from(actions: Vec<Action>) -> Self {
        Self { actions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_serialize() {
        let json = serde_json::to_value(Action::AddDriver("Lando Norris".into())).unwrap();
        assert_eq!(json["action"], "add_driver");
        assert_eq!(json["member"], "Lando Norris");

        let json = serde_json::to_value(Action::ClearBoost).unwrap();
        assert_eq!(json["action"], "clear_boost");
    }

    #[test]
    fn test_action_display() {
        assert_eq!(Action::RemoveConstructor("Alpine".into()).to_string(), "remove constructor Alpine");
        assert_eq!(Action::ClearBoost.to_string(), "clear boost");
    }

    #[test]
    fn test_apply_remove_boosted_driver_drops_boost() {
        let snap = RosterSnapshot::new(
            vec!["A".into(), "B".into()],
            vec![],
            Some("A".into()),
        );
        let plan = ActionPlan::from(vec![Action::RemoveDriver("A".into())]);
        let out = plan.apply_to(&snap);
        assert_eq!(out.drivers, vec!["B".to_string()]);
        assert_eq!(out.boosted, None);
    }

    #[test]
    fn test_apply_full_plan() {
        let snap = RosterSnapshot::new(vec!["A".into()], vec!["X".into()], None);
        let plan = ActionPlan::from(vec![
            Action::RemoveDriver("a".into()),
            Action::AddDriver("B".into()),
            Action::RemoveConstructor("X".into()),
            Action::AddConstructor("Y".into()),
            Action::SetBoost("B".into()),
        ]);
        let out = plan.apply_to(&snap);
        assert_eq!(out.drivers, vec!["B".to_string()]);
        assert_eq!(out.constructors, vec!["Y".to_string()]);
        assert_eq!(out.boosted.as_deref(), Some("B"));
    }
}
