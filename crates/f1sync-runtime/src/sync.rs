//! Single-team sync.

use std::path::PathBuf;

use chrono::Utc;
use f1sync_core::model::utc_stamp;
use f1sync_core::{
    reconcile, ActionPlan, DesiredSpec, RosterApplier, RosterCapacity, RosterReader, TeamState,
};
use f1sync_store::{RunDir, StateStore};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{site_error, SyncError};

/// Options for one sync.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub team_id: u32,
    /// Apply and commit the plan. Otherwise only compute it.
    pub apply: bool,
    /// Skip the stored-state shortcut and always read the site.
    pub force: bool,
}

/// How a sync ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// The stored team state already matched; the site was not opened.
    UpToDate,
    /// The site already matched.
    InSync,
    /// Dry run, the plan was computed but not applied.
    Planned,
    Applied,
}

#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub status: SyncStatus,
    /// Artifacts directory, absent when the site was not opened.
    pub run_dir: Option<PathBuf>,
    pub before: TeamState,
    pub plan: ActionPlan,
    /// State read back after committing, or the stored state for
    /// [`SyncStatus::UpToDate`].
    pub after: Option<TeamState>,
}

/// Runs syncs against one state directory.
pub struct SyncRunner {
    store: StateStore,
    capacity: RosterCapacity,
}

impl SyncRunner {
    pub fn new(store: StateStore) -> Self {
        Self {
            store,
            capacity: RosterCapacity::default(),
        }
    }

    pub fn with_capacity(mut self, capacity: RosterCapacity) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn capacity(&self) -> &RosterCapacity {
        &self.capacity
    }

    /// Bring the site roster in line with `desired`.
    ///
    /// Holds the run lock for the whole call. Nothing is persisted unless the
    /// roster read back after confirming matches `desired`.
    pub async fn sync<S>(
        &self,
        site: &S,
        desired: &DesiredSpec,
        options: &SyncOptions,
    ) -> Result<SyncOutcome, SyncError>
    where
        S: RosterReader + RosterApplier,
    {
        desired.validate(&self.capacity)?;
        let _lock = self.store.lock()?;

        if !options.force {
            if let Some(local) = self.stored_match(desired, options.team_id).await? {
                info!("Stored team state already matches the desired roster, nothing to do");
                return Ok(SyncOutcome {
                    status: SyncStatus::UpToDate,
                    run_dir: None,
                    before: local.clone(),
                    plan: ActionPlan::new(),
                    after: Some(local),
                });
            }
        }

        let run = self
            .store
            .create_run_dir(options.team_id, &utc_stamp(Utc::now()))
            .await?;
        self.store
            .write_json(&run.artifact("ideal.json"), desired)
            .await?;
        info!("Run artifacts in {:?}", run.path());

        site.set_artifact_dir(Some(run.path()));
        let result = self.sync_in_run(site, desired, options, &run).await;
        if result.is_err() {
            capture(site, &run, "error.png").await;
        }
        site.set_artifact_dir(None);

        let mut outcome = result?;
        outcome.run_dir = Some(run.path().to_path_buf());
        Ok(outcome)
    }

    async fn sync_in_run<S>(
        &self,
        site: &S,
        desired: &DesiredSpec,
        options: &SyncOptions,
        run: &RunDir,
    ) -> Result<SyncOutcome, SyncError>
    where
        S: RosterReader + RosterApplier,
    {
        let before = site.read_state().await.map_err(site_error)?;
        capture(site, run, "state_start.png").await;

        let reconciliation = reconcile(&before.roster, desired, &self.capacity)?;
        self.store
            .write_json(&run.artifact("plan.json"), &reconciliation)
            .await?;
        info!("Planned {} action(s)", reconciliation.plan.len());
        for action in &reconciliation.plan {
            info!("  {}", action);
        }

        let plan = reconciliation.plan;
        if !options.apply {
            return Ok(SyncOutcome {
                status: SyncStatus::Planned,
                run_dir: None,
                before,
                plan,
                after: None,
            });
        }

        if plan.is_empty() {
            info!("Site roster already matches the desired roster");
            self.persist(&before, desired).await?;
            return Ok(SyncOutcome {
                status: SyncStatus::InSync,
                run_dir: None,
                after: Some(before.clone()),
                before,
                plan,
            });
        }

        for action in &plan {
            info!("Applying: {}", action);
            site.apply(action).await.map_err(site_error)?;
        }
        capture(site, run, "after_actions.png").await;

        site.stage().await.map_err(site_error)?;
        site.confirm().await.map_err(site_error)?;
        capture(site, run, "home_after_confirm.png").await;

        let after = site.read_state().await.map_err(site_error)?;
        capture(site, run, "state_final.png").await;

        let verify = reconcile(&after.roster, desired, &self.capacity)?;
        self.store
            .write_json(&run.artifact("plan_final_vs_ideal.json"), &verify)
            .await?;
        if verify.changed {
            capture(site, run, "verify_failed.png").await;
            return Err(SyncError::VerificationFailed {
                remaining: verify.plan,
            });
        }

        self.persist(&after, desired).await?;
        info!("Applied {} action(s) to team {}", plan.len(), options.team_id);
        Ok(SyncOutcome {
            status: SyncStatus::Applied,
            run_dir: None,
            before,
            plan,
            after: Some(after),
        })
    }

    /// Stored state for `team_id`, if it already satisfies `desired`.
    async fn stored_match(
        &self,
        desired: &DesiredSpec,
        team_id: u32,
    ) -> Result<Option<TeamState>, SyncError> {
        let Some(local) = self.store.load_team_state().await? else {
            return Ok(None);
        };
        if local.team_id != team_id {
            debug!(
                "Stored team state is for team {}, not {}",
                local.team_id, team_id
            );
            return Ok(None);
        }

        let reconciliation = reconcile(&local.roster, desired, &self.capacity)?;
        Ok(reconciliation.is_noop().then_some(local))
    }

    async fn persist(&self, state: &TeamState, desired: &DesiredSpec) -> Result<(), SyncError> {
        let history = self.store.save_team_state(state).await?;
        self.store.save_last_applied(desired).await?;
        info!("Saved team state, history copy {:?}", history);
        Ok(())
    }
}

/// Screenshot into the run directory; failures are only logged.
async fn capture<A: RosterApplier>(site: &A, run: &RunDir, name: &str) {
    if let Err(e) = site.capture(&run.artifact(name)).await {
        warn!("Failed to capture {}: {}", name, e);
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
