//! Budget, calculator and sync in one run.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Utc;
use f1sync_calculator::CalculatorResult;
use f1sync_core::mappings::{constructor_name, driver_name, map_optimal_to_desired};
use f1sync_core::model::{round3, utc_stamp};
use f1sync_core::{
    reconcile, ActionPlan, BudgetSnapshot, DesiredSpec, OptimalTeam, RosterApplier, RosterReader,
    SimulationInfo, TeamState,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{site_error, SyncError};
use crate::source::TeamSource;
use crate::sync::{SyncOptions, SyncRunner};

pub const RUN_BUNDLE_SCHEMA_VERSION: u32 = 1;

const LAST_BUDGET_FILE: &str = "last_budget.json";
const LAST_OPTIMAL_FILE: &str = "last_optimal.json";
const LAST_OPTIMAL_WITH_BUDGET_FILE: &str = "last_optimal_with_budget.json";
const LAST_RUN_FILE: &str = "last_run.json";

/// Budget requested on the command line: `auto` or a cap in millions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum BudgetChoice {
    /// Scrape the cap from the team page.
    #[default]
    Auto,
    Fixed(f64),
}

impl FromStr for BudgetChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 => Ok(Self::Fixed(v)),
            _ => Err(format!(
                "budget must be 'auto' or a positive number of millions, got '{}'",
                s
            )),
        }
    }
}

impl fmt::Display for BudgetChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Fixed(v) => write!(f, "{}", v),
        }
    }
}

/// Budget a team was optimized for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BudgetInput {
    Scraped(BudgetSnapshot),
    Fixed { cap_m: f64 },
}

impl BudgetInput {
    pub fn cap_m(&self) -> f64 {
        match self {
            Self::Scraped(b) => b.cap_m,
            Self::Fixed { cap_m } => *cap_m,
        }
    }

    pub fn snapshot(&self) -> Option<&BudgetSnapshot> {
        match self {
            Self::Scraped(b) => Some(b),
            Self::Fixed { .. } => None,
        }
    }
}

/// One optimal pick with its site name and price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedPick {
    pub abbr: String,
    pub name: Option<String>,
    pub price_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boosted: Option<bool>,
}

/// Optimal team with prices and budget, as written to
/// `last_optimal_with_budget.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimalSummary {
    pub ts_utc: String,
    pub budget: BudgetInput,
    pub optimal: OptimalTeam,
    pub drivers: Vec<PricedPick>,
    pub constructors: Vec<PricedPick>,
    /// Sum of the known prices.
    pub total_m: f64,
    pub missing_price_abbr: Vec<String>,
    pub remaining_m: Option<f64>,
    pub used_m: Option<f64>,
    pub cap_m: f64,
}

impl OptimalSummary {
    pub fn new(ts_utc: String, budget: BudgetInput, result: &CalculatorResult) -> Self {
        let optimal = &result.optimal;
        let boost = optimal.boost.as_deref();

        let drivers: Vec<PricedPick> = optimal
            .drivers
            .iter()
            .map(|abbr| PricedPick {
                abbr: abbr.clone(),
                name: driver_name(abbr).map(str::to_string),
                price_m: result.prices.driver(abbr),
                boosted: Some(boost == Some(abbr.as_str())),
            })
            .collect();
        let constructors: Vec<PricedPick> = optimal
            .constructors
            .iter()
            .map(|abbr| PricedPick {
                abbr: abbr.clone(),
                name: constructor_name(abbr).map(str::to_string),
                price_m: result.prices.constructor(abbr),
                boosted: None,
            })
            .collect();

        let mut total_m = 0.0;
        let mut missing_price_abbr = Vec::new();
        for pick in drivers.iter().chain(&constructors) {
            match pick.price_m {
                Some(p) => total_m += p,
                None => missing_price_abbr.push(pick.abbr.clone()),
            }
        }

        let remaining_m = budget.snapshot().map(|b| b.remaining_m);
        let used_m = budget.snapshot().map(|b| b.used_m);
        let cap_m = budget.cap_m();
        Self {
            ts_utc,
            remaining_m,
            used_m,
            cap_m,
            budget,
            optimal: optimal.clone(),
            drivers,
            constructors,
            total_m: round3(total_m),
            missing_price_abbr,
        }
    }
}

/// Desired roster derived from the calculator.
#[derive(Debug, Clone)]
pub struct PlannedIdeal {
    pub ideal: DesiredSpec,
    pub summary: OptimalSummary,
}

/// Options for [`SyncRunner::run_end_to_end`].
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub team_id: u32,
    pub budget: BudgetChoice,
    /// Apply and commit. Otherwise the site is read and the plan computed.
    pub apply: bool,
    pub force: bool,
    /// Display name of the driver to boost instead of the optimizer's pick.
    pub boost_override: Option<String>,
    /// Where the desired roster is written.
    pub ideal_out: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunInputs {
    pub team_id: u32,
    pub budget: BudgetInput,
    pub price_source: String,
    pub sim: SimulationInfo,
}

/// Final roster vs desired roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verification {
    pub ok: bool,
    pub remaining: ActionPlan,
}

/// Everything one end-to-end run did, written to `last_run.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunBundle {
    pub schema_version: u32,
    pub ts_utc: String,
    pub inputs: RunInputs,
    pub optimal: OptimalSummary,
    pub ideal: DesiredSpec,
    pub site_before: TeamState,
    pub plan: ActionPlan,
    pub site_after: Option<TeamState>,
    pub verify: Verification,
}

impl SyncRunner {
    /// Read the budget from the team page and record it in `last_budget.json`.
    pub async fn scrape_budget<R: RosterReader>(
        &self,
        reader: &R,
    ) -> Result<BudgetSnapshot, SyncError> {
        let budget = reader.read_budget().await.map_err(site_error)?;
        self.store()
            .write_json(&self.store().file(LAST_BUDGET_FILE), &budget)
            .await?;
        Ok(budget)
    }

    /// Scrape the budget and save it with the observed team state.
    ///
    /// Holds the run lock while `team_state.json` is written. Returns the
    /// budget and the history copy path.
    pub async fn record_budget_state<R: RosterReader>(
        &self,
        reader: &R,
    ) -> Result<(BudgetSnapshot, PathBuf), SyncError> {
        let _lock = self.store().lock()?;
        let budget = self.scrape_budget(reader).await?;
        let state = reader
            .read_state()
            .await
            .map_err(site_error)?
            .with_budget(budget.clone());
        let history = self.store().save_team_state(&state).await?;
        info!("Saved team state with budget, history copy {:?}", history);
        Ok((budget, history))
    }

    /// Optimize for `budget` and write the resulting desired roster.
    ///
    /// Also records `last_optimal.json` and `last_optimal_with_budget.json`.
    pub async fn plan_ideal<T: TeamSource + ?Sized>(
        &self,
        source: &T,
        budget: BudgetInput,
        boost_override: Option<&str>,
        ideal_out: &Path,
    ) -> Result<PlannedIdeal, SyncError> {
        let ts_utc = utc_stamp(Utc::now());
        let result = source.optimal_team(budget.cap_m()).await?;

        let ideal = map_optimal_to_desired(&result.optimal, boost_override)?;
        ideal.validate(self.capacity())?;

        let store = self.store();
        store.write_json(ideal_out, &ideal).await?;
        store
            .write_json(&store.file(LAST_OPTIMAL_FILE), &result.optimal)
            .await?;

        let summary = OptimalSummary::new(ts_utc, budget, &result);
        store
            .write_json(&store.file(LAST_OPTIMAL_WITH_BUDGET_FILE), &summary)
            .await?;

        info!(
            "Ideal roster written to {:?}: {} | {} | boost {}",
            ideal_out,
            ideal.drivers.join(", "),
            ideal.constructors.join(", "),
            ideal.boost_driver.as_deref().unwrap_or("-")
        );
        Ok(PlannedIdeal { ideal, summary })
    }

    /// Budget, calculator, mapping, sync and verification in one go.
    ///
    /// A dry run always reads the site so the bundle shows the real plan.
    pub async fn run_end_to_end<S, T>(
        &self,
        site: &S,
        source: &T,
        options: &RunOptions,
    ) -> Result<RunBundle, SyncError>
    where
        S: RosterReader + RosterApplier,
        T: TeamSource + ?Sized,
    {
        let ts_utc = utc_stamp(Utc::now());

        let budget = match options.budget {
            BudgetChoice::Auto => BudgetInput::Scraped(self.scrape_budget(site).await?),
            BudgetChoice::Fixed(cap_m) => BudgetInput::Fixed { cap_m },
        };
        info!("Optimizing for a {}M budget", budget.cap_m());

        let planned = self
            .plan_ideal(
                source,
                budget.clone(),
                options.boost_override.as_deref(),
                &options.ideal_out,
            )
            .await?;

        let sync_options = SyncOptions {
            team_id: options.team_id,
            apply: options.apply,
            force: options.force || !options.apply,
        };
        let outcome = self.sync(site, &planned.ideal, &sync_options).await?;

        let verify = match &outcome.after {
            Some(after) => {
                let r = reconcile(&after.roster, &planned.ideal, self.capacity())?;
                Verification {
                    ok: r.is_noop(),
                    remaining: r.plan,
                }
            }
            None => Verification {
                ok: outcome.plan.is_empty(),
                remaining: outcome.plan.clone(),
            },
        };

        let bundle = RunBundle {
            schema_version: RUN_BUNDLE_SCHEMA_VERSION,
            ts_utc,
            inputs: RunInputs {
                team_id: options.team_id,
                budget,
                price_source: source.name().to_string(),
                sim: planned.summary.optimal.sim.clone(),
            },
            optimal: planned.summary,
            ideal: planned.ideal,
            site_before: outcome.before,
            plan: outcome.plan,
            site_after: outcome.after,
            verify,
        };

        let store = self.store();
        store
            .write_json(&store.file(LAST_RUN_FILE), &bundle)
            .await?;
        info!(
            "Run finished: verify {}, {} action(s) pending",
            if bundle.verify.ok { "ok" } else { "not ok" },
            bundle.verify.remaining.len()
        );
        Ok(bundle)
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
