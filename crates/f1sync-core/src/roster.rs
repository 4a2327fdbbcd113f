//! Seams between the reconciler and whatever drives the site.

use std::path::Path;

use async_trait::async_trait;

use crate::model::{BudgetSnapshot, TeamState};
use crate::plan::Action;

/// Reads the roster currently saved on the site.
#[async_trait]
pub trait RosterReader: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the team page and return the observed state.
    async fn read_state(&self) -> Result<TeamState, Self::Error>;

    /// Read the budget figures shown on the team page.
    async fn read_budget(&self) -> Result<BudgetSnapshot, Self::Error>;
}

/// Applies primitive actions and commits them.
///
/// Actions are applied strictly in the order given. Nothing is saved until
/// [`stage`](RosterApplier::stage) and [`confirm`](RosterApplier::confirm)
/// both succeed.
#[async_trait]
pub trait RosterApplier: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn apply(&self, action: &Action) -> Result<(), Self::Error>;

    /// First commit step: open the change summary.
    async fn stage(&self) -> Result<(), Self::Error>;

    /// Second commit step: confirm the change summary.
    async fn confirm(&self) -> Result<(), Self::Error>;

    /// Directory for screenshots taken on failure; `None` turns them off.
    fn set_artifact_dir(&self, _dir: Option<&Path>) {}

    /// Capture evidence of the current page into `path`.
    async fn capture(&self, _path: &Path) -> Result<(), Self::Error> {
        Ok(())
    }
}
