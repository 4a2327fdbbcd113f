//! In-memory reader/applier and team source for tests.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use f1sync_calculator::{CalculatorError, CalculatorResult, PriceMaps};
use f1sync_core::{
    Action, ActionPlan, BudgetSnapshot, DesiredSpec, OptimalTeam, RosterApplier, RosterReader,
    RosterSnapshot, SimulationInfo, TeamState,
};

use crate::source::TeamSource;

#[derive(Debug, thiserror::Error)]
#[error("mock site: {0}")]
pub struct MockError(String);

/// Site whose edits only land on `confirm`.
pub struct MockSite {
    team_id: u32,
    saved: Mutex<RosterSnapshot>,
    pending: Mutex<Option<RosterSnapshot>>,
    calls: Mutex<Vec<String>>,
    captures: Mutex<Vec<String>>,
    artifact_dir: Mutex<Option<PathBuf>>,
    fail_on: Option<Action>,
    ignore_boost: bool,
    budget: BudgetSnapshot,
}

impl MockSite {
    pub fn new(team_id: u32, roster: RosterSnapshot) -> Self {
        Self {
            team_id,
            saved: Mutex::new(roster),
            pending: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            captures: Mutex::new(Vec::new()),
            artifact_dir: Mutex::new(None),
            fail_on: None,
            ignore_boost: false,
            budget: BudgetSnapshot::from_parts(2.5, 97.5),
        }
    }

    /// Fail when asked to apply `action`.
    pub fn failing_on(mut self, action: Action) -> Self {
        self.fail_on = Some(action);
        self
    }

    /// Accept boost changes without saving them.
    pub fn ignoring_boost(mut self) -> Self {
        self.ignore_boost = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn captures(&self) -> Vec<String> {
        self.captures.lock().unwrap().clone()
    }

    pub fn artifact_dir(&self) -> Option<PathBuf> {
        self.artifact_dir.lock().unwrap().clone()
    }

    pub fn saved(&self) -> RosterSnapshot {
        self.saved.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl RosterReader for MockSite {
    type Error = MockError;

    async fn read_state(&self) -> Result<TeamState, MockError> {
        self.record("read_state");
        Ok(TeamState::observed(
            self.team_id,
            Some("Test GP".to_string()),
            self.saved(),
        ))
    }

    async fn read_budget(&self) -> Result<BudgetSnapshot, MockError> {
        self.record("read_budget");
        Ok(self.budget.clone())
    }
}

#[async_trait]
impl RosterApplier for MockSite {
    type Error = MockError;

    async fn apply(&self, action: &Action) -> Result<(), MockError> {
        self.record(action.to_string());
        if self.fail_on.as_ref() == Some(action) {
            return Err(MockError(format!("cannot {}", action)));
        }
        if self.ignore_boost && matches!(action, Action::SetBoost(_) | Action::ClearBoost) {
            return Ok(());
        }

        let mut pending = self.pending.lock().unwrap();
        let current = pending.take().unwrap_or_else(|| self.saved());
        *pending = Some(ActionPlan::from(vec![action.clone()]).apply_to(&current));
        Ok(())
    }

    async fn stage(&self) -> Result<(), MockError> {
        self.record("stage");
        Ok(())
    }

    async fn confirm(&self) -> Result<(), MockError> {
        self.record("confirm");
        if let Some(roster) = self.pending.lock().unwrap().take() {
            *self.saved.lock().unwrap() = roster;
        }
        Ok(())
    }

    fn set_artifact_dir(&self, dir: Option<&Path>) {
        *self.artifact_dir.lock().unwrap() = dir.map(Path::to_path_buf);
    }

    async fn capture(&self, path: &Path) -> Result<(), MockError> {
        std::fs::write(path, b"png").map_err(|e| MockError(e.to_string()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.captures.lock().unwrap().push(name);
        Ok(())
    }
}

/// Always returns the same optimal team.
pub struct FixedSource {
    pub optimal: OptimalTeam,
    pub prices: PriceMaps,
    pub asked: Mutex<Vec<f64>>,
}

impl FixedSource {
    pub fn new() -> Self {
        let mut prices = PriceMaps::default();
        for (abbr, price) in [("HAM", 20.0), ("LEC", 22.0), ("NOR", 30.0), ("PIA", 25.0), ("VER", 28.0)] {
            prices.drivers.insert(abbr.to_string(), price);
        }
        prices.constructors.insert("MCL".to_string(), 31.0);

        Self {
            optimal: OptimalTeam {
                max_budget: 100.0,
                constructors: vec!["FER".into(), "MCL".into()],
                drivers: vec!["HAM".into(), "LEC".into(), "NOR".into(), "PIA".into(), "VER".into()],
                boost: Some("VER".into()),
                total_cost: 180.0,
                expected_points: 222.0,
                sim: SimulationInfo {
                    name: Some("Analyst sim".into()),
                    ..Default::default()
                },
            },
            prices,
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<f64> {
        self.asked.lock().unwrap().clone()
    }
}

#[async_trait]
impl TeamSource for FixedSource {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn optimal_team(&self, max_budget: f64) -> Result<CalculatorResult, CalculatorError> {
        self.asked.lock().unwrap().push(max_budget);
        Ok(CalculatorResult {
            optimal: self.optimal.clone(),
            prices: self.prices.clone(),
        })
    }
}

/// Desired roster matching [`FixedSource`].
pub fn optimal_ideal() -> DesiredSpec {
    DesiredSpec::new(
        vec![
            "Lewis Hamilton".into(),
            "Charles Leclerc".into(),
            "Lando Norris".into(),
            "Oscar Piastri".into(),
            "Max Verstappen".into(),
        ],
        vec!["Ferrari".into(), "McLaren".into()],
        Some("Max Verstappen".into()),
    )
}

/// A full roster sharing three drivers and one constructor with
/// [`optimal_ideal`].
pub fn current_roster() -> RosterSnapshot {
    RosterSnapshot::new(
        vec![
            "Lando Norris".into(),
            "Oscar Piastri".into(),
            "Max Verstappen".into(),
            "George Russell".into(),
            "Fernando Alonso".into(),
        ],
        vec!["McLaren".into(), "Williams".into()],
        Some("Lando Norris".into()),
    )
}
