use super::*;
use crate::testing::{current_roster, optimal_ideal, MockSite};
use f1sync_core::{Action, LastApplied};
use f1sync_store::StoreError;
use tempfile::TempDir;

async fn runner(dir: &TempDir) -> SyncRunner {
    SyncRunner::new(StateStore::open(dir.path()).await.unwrap())
}

fn options(apply: bool, force: bool) -> SyncOptions {
    SyncOptions {
        team_id: 1,
        apply,
        force,
    }
}

#[tokio::test]
async fn test_dry_run_plans_without_applying() {
    let dir = TempDir::new().unwrap();
    let runner = runner(&dir).await;
    let site = MockSite::new(1, current_roster());

    let outcome = runner
        .sync(&site, &optimal_ideal(), &options(false, false))
        .await
        .unwrap();

    assert_eq!(outcome.status, SyncStatus::Planned);
    assert_eq!(outcome.plan.len(), 8);
    assert!(outcome.after.is_none());
    assert_eq!(site.calls(), vec!["read_state"]);

    let run_dir = outcome.run_dir.unwrap();
    assert!(run_dir.join("ideal.json").exists());
    assert!(run_dir.join("plan.json").exists());
    assert!(run_dir.join("state_start.png").exists());
    assert!(runner.store().load_team_state().await.unwrap().is_none());
    assert!(site.artifact_dir().is_none());
}

#[tokio::test]
async fn test_apply_commits_and_persists() {
    let dir = TempDir::new().unwrap();
    let runner = runner(&dir).await;
    let site = MockSite::new(1, current_roster());
    let desired = optimal_ideal();

    let outcome = runner
        .sync(&site, &desired, &options(true, false))
        .await
        .unwrap();

    assert_eq!(outcome.status, SyncStatus::Applied);
    assert_eq!(
        site.calls(),
        vec![
            "read_state",
            "remove driver George Russell",
            "remove driver Fernando Alonso",
            "add driver Lewis Hamilton",
            "add driver Charles Leclerc",
            "remove constructor Williams",
            "add constructor Ferrari",
            "clear boost",
            "boost Max Verstappen",
            "stage",
            "confirm",
            "read_state",
        ]
    );
    assert_eq!(
        site.captures(),
        vec![
            "state_start.png",
            "after_actions.png",
            "home_after_confirm.png",
            "state_final.png"
        ]
    );

    let after = outcome.after.unwrap();
    assert_eq!(after.roster.boosted.as_deref(), Some("Max Verstappen"));

    let stored = runner.store().load_team_state().await.unwrap().unwrap();
    assert_eq!(stored, after);
    let last: LastApplied = runner.store().load_last_applied().await.unwrap().unwrap();
    assert_eq!(last.ideal, desired);
    assert_eq!(std::fs::read_dir(runner.store().history_dir()).unwrap().count(), 1);
    assert!(outcome.run_dir.unwrap().join("plan_final_vs_ideal.json").exists());
}

#[tokio::test]
async fn test_stored_state_short_circuits() {
    let dir = TempDir::new().unwrap();
    let runner = runner(&dir).await;
    let desired = optimal_ideal();
    let stored = TeamState::observed(1, None, desired.as_snapshot());
    runner.store().save_team_state(&stored).await.unwrap();

    let site = MockSite::new(1, current_roster());
    let outcome = runner
        .sync(&site, &desired, &options(true, false))
        .await
        .unwrap();

    assert_eq!(outcome.status, SyncStatus::UpToDate);
    assert!(outcome.plan.is_empty());
    assert!(outcome.run_dir.is_none());
    assert!(site.calls().is_empty());
}

#[tokio::test]
async fn test_stored_state_of_other_team_is_ignored() {
    let dir = TempDir::new().unwrap();
    let runner = runner(&dir).await;
    let desired = optimal_ideal();
    let stored = TeamState::observed(2, None, desired.as_snapshot());
    runner.store().save_team_state(&stored).await.unwrap();

    let site = MockSite::new(1, current_roster());
    let outcome = runner
        .sync(&site, &desired, &options(false, false))
        .await
        .unwrap();

    assert_eq!(outcome.status, SyncStatus::Planned);
    assert_eq!(site.calls(), vec!["read_state"]);
}

#[tokio::test]
async fn test_force_reads_site_even_when_stored_state_matches() {
    let dir = TempDir::new().unwrap();
    let runner = runner(&dir).await;
    let desired = optimal_ideal();
    let mut stored = TeamState::observed(1, None, desired.as_snapshot());
    stored.ts_utc = "2026-03-01T12:00:00Z".to_string();
    runner.store().save_team_state(&stored).await.unwrap();

    let site = MockSite::new(1, desired.as_snapshot());
    let outcome = runner
        .sync(&site, &desired, &options(true, true))
        .await
        .unwrap();

    assert_eq!(outcome.status, SyncStatus::InSync);
    assert_eq!(site.calls(), vec!["read_state"]);
    // A matching site is still recorded.
    assert_eq!(std::fs::read_dir(runner.store().history_dir()).unwrap().count(), 2);
}

#[tokio::test]
async fn test_apply_failure_captures_error_and_persists_nothing() {
    let dir = TempDir::new().unwrap();
    let runner = runner(&dir).await;
    let site = MockSite::new(1, current_roster())
        .failing_on(Action::AddDriver("Lewis Hamilton".to_string()));

    let err = runner
        .sync(&site, &optimal_ideal(), &options(true, false))
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Site(_)));
    assert!(err.to_string().contains("Lewis Hamilton"));
    assert!(!site.calls().contains(&"stage".to_string()));
    assert_eq!(site.captures().last().map(String::as_str), Some("error.png"));
    assert!(runner.store().load_team_state().await.unwrap().is_none());
    assert!(runner.store().load_last_applied().await.unwrap().is_none());
    assert!(site.artifact_dir().is_none());
}

#[tokio::test]
async fn test_verification_failure() {
    let dir = TempDir::new().unwrap();
    let runner = runner(&dir).await;
    let site = MockSite::new(1, current_roster()).ignoring_boost();

    let err = runner
        .sync(&site, &optimal_ideal(), &options(true, false))
        .await
        .unwrap_err();

    match err {
        SyncError::VerificationFailed { remaining } => {
            assert_eq!(
                remaining.actions(),
                &[
                    Action::ClearBoost,
                    Action::SetBoost("Max Verstappen".to_string())
                ]
            );
        }
        other => panic!("unexpected error: {other}"),
    }
    let captures = site.captures();
    assert!(captures.contains(&"verify_failed.png".to_string()));
    assert!(captures.contains(&"error.png".to_string()));
    assert!(runner.store().load_team_state().await.unwrap().is_none());
}

#[tokio::test]
async fn test_invalid_desired_roster_fails_before_reading() {
    let dir = TempDir::new().unwrap();
    let runner = runner(&dir).await;
    let site = MockSite::new(1, current_roster());
    let mut desired = optimal_ideal();
    desired.drivers.pop();

    let err = runner
        .sync(&site, &desired, &options(true, true))
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Spec(_)));
    assert!(site.calls().is_empty());
}

#[tokio::test]
async fn test_lock_held_by_live_process() {
    let dir = TempDir::new().unwrap();
    let runner = runner(&dir).await;
    std::fs::write(dir.path().join("f1sync.lock"), "1").unwrap();
    let site = MockSite::new(1, current_roster());

    let err = runner
        .sync(&site, &optimal_ideal(), &options(true, true))
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Store(StoreError::Locked { pid: 1, .. })));
    assert!(site.calls().is_empty());
}

#[tokio::test]
async fn test_lock_released_after_sync() {
    let dir = TempDir::new().unwrap();
    let runner = runner(&dir).await;
    let site = MockSite::new(1, current_roster());

    runner
        .sync(&site, &optimal_ideal(), &options(false, true))
        .await
        .unwrap();
    assert!(!dir.path().join("f1sync.lock").exists());
}
