use super::*;
use crate::sync::SyncRunner;
use crate::testing::{current_roster, optimal_ideal, FixedSource, MockSite};
use f1sync_core::MappingError;
use f1sync_store::StateStore;
use tempfile::TempDir;

async fn runner(dir: &TempDir) -> SyncRunner {
    SyncRunner::new(StateStore::open(dir.path().join("state")).await.unwrap())
}

fn run_options(dir: &TempDir, budget: BudgetChoice, apply: bool) -> RunOptions {
    RunOptions {
        team_id: 1,
        budget,
        apply,
        force: false,
        boost_override: None,
        ideal_out: dir.path().join("ideal_team.json"),
    }
}

#[test]
fn test_budget_choice_parse() {
    assert_eq!("auto".parse::<BudgetChoice>(), Ok(BudgetChoice::Auto));
    assert_eq!(" AUTO ".parse::<BudgetChoice>(), Ok(BudgetChoice::Auto));
    assert_eq!("102.5".parse::<BudgetChoice>(), Ok(BudgetChoice::Fixed(102.5)));
    assert!("0".parse::<BudgetChoice>().is_err());
    assert!("-5".parse::<BudgetChoice>().is_err());
    assert!("lots".parse::<BudgetChoice>().is_err());
    assert_eq!(BudgetChoice::Fixed(100.0).to_string(), "100");
}

#[test]
fn test_budget_input_serialization() {
    let fixed = serde_json::to_value(BudgetInput::Fixed { cap_m: 100.0 }).unwrap();
    assert_eq!(fixed, serde_json::json!({"cap_m": 100.0}));

    let scraped: BudgetInput = serde_json::from_value(serde_json::json!({
        "remaining_m": 1.5, "used_m": 98.5, "cap_m": 100.0,
        "currency": "USD", "source": "fantasy.formula1.com"
    }))
    .unwrap();
    assert_eq!(scraped.cap_m(), 100.0);
    assert_eq!(scraped.snapshot().map(|b| b.remaining_m), Some(1.5));
}

#[test]
fn test_optimal_summary_prices() {
    let source = FixedSource::new();
    let result = f1sync_calculator::CalculatorResult {
        optimal: source.optimal.clone(),
        prices: source.prices.clone(),
    };
    let summary = OptimalSummary::new(
        "2026-03-01T12:00:00Z".to_string(),
        BudgetInput::Fixed { cap_m: 200.0 },
        &result,
    );

    assert_eq!(summary.drivers.len(), 5);
    let ver = summary.drivers.iter().find(|p| p.abbr == "VER").unwrap();
    assert_eq!(ver.name.as_deref(), Some("Max Verstappen"));
    assert_eq!(ver.boosted, Some(true));
    assert_eq!(summary.constructors[0].name.as_deref(), Some("Ferrari"));
    // FER has no price listed.
    assert_eq!(summary.missing_price_abbr, vec!["FER"]);
    assert_eq!(summary.total_m, 156.0);
    assert_eq!(summary.cap_m, 200.0);
    assert!(summary.remaining_m.is_none());
}

#[tokio::test]
async fn test_plan_ideal_writes_files() {
    let dir = TempDir::new().unwrap();
    let runner = runner(&dir).await;
    let source = FixedSource::new();
    let ideal_out = dir.path().join("out/ideal_team.json");

    let planned = runner
        .plan_ideal(&source, BudgetInput::Fixed { cap_m: 100.0 }, None, &ideal_out)
        .await
        .unwrap();

    assert_eq!(planned.ideal, optimal_ideal());
    assert_eq!(source.asked(), vec![100.0]);
    let written = DesiredSpec::load(&ideal_out).unwrap();
    assert_eq!(written, planned.ideal);
    assert!(runner.store().file("last_optimal.json").exists());
    assert!(runner.store().file("last_optimal_with_budget.json").exists());
}

#[tokio::test]
async fn test_plan_ideal_boost_override() {
    let dir = TempDir::new().unwrap();
    let runner = runner(&dir).await;
    let source = FixedSource::new();
    let ideal_out = dir.path().join("ideal_team.json");

    let planned = runner
        .plan_ideal(
            &source,
            BudgetInput::Fixed { cap_m: 100.0 },
            Some("lando norris"),
            &ideal_out,
        )
        .await
        .unwrap();
    assert_eq!(planned.ideal.boost_driver.as_deref(), Some("Lando Norris"));

    let err = runner
        .plan_ideal(
            &source,
            BudgetInput::Fixed { cap_m: 100.0 },
            Some("George Russell"),
            &ideal_out,
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SyncError::Mapping(MappingError::BoostOverrideNotSelected(_))
    ));
}

#[tokio::test]
async fn test_run_dry_run_with_fixed_budget() {
    let dir = TempDir::new().unwrap();
    let runner = runner(&dir).await;
    let site = MockSite::new(1, current_roster());
    let source = FixedSource::new();

    let bundle = runner
        .run_end_to_end(&site, &source, &run_options(&dir, BudgetChoice::Fixed(100.0), false))
        .await
        .unwrap();

    assert_eq!(bundle.schema_version, RUN_BUNDLE_SCHEMA_VERSION);
    assert_eq!(bundle.inputs.budget, BudgetInput::Fixed { cap_m: 100.0 });
    assert_eq!(bundle.inputs.price_source, "fixed");
    assert_eq!(bundle.inputs.sim.name.as_deref(), Some("Analyst sim"));
    assert_eq!(bundle.ideal, optimal_ideal());
    assert_eq!(bundle.plan.len(), 8);
    assert!(bundle.site_after.is_none());
    assert!(!bundle.verify.ok);
    assert_eq!(bundle.verify.remaining, bundle.plan);

    assert!(!site.calls().contains(&"read_budget".to_string()));
    assert!(!site.calls().contains(&"confirm".to_string()));
    assert!(!runner.store().file("last_budget.json").exists());
    assert!(dir.path().join("ideal_team.json").exists());

    let text = std::fs::read_to_string(runner.store().file("last_run.json")).unwrap();
    let reloaded: RunBundle = serde_json::from_str(&text).unwrap();
    assert_eq!(reloaded, bundle);
}

#[tokio::test]
async fn test_run_apply_with_scraped_budget() {
    let dir = TempDir::new().unwrap();
    let runner = runner(&dir).await;
    let site = MockSite::new(1, current_roster());
    let source = FixedSource::new();

    let bundle = runner
        .run_end_to_end(&site, &source, &run_options(&dir, BudgetChoice::Auto, true))
        .await
        .unwrap();

    assert_eq!(source.asked(), vec![100.0]);
    assert_eq!(bundle.optimal.remaining_m, Some(2.5));
    assert_eq!(bundle.optimal.used_m, Some(97.5));
    assert!(runner.store().file("last_budget.json").exists());

    assert!(bundle.verify.ok);
    assert!(bundle.verify.remaining.is_empty());
    let after = bundle.site_after.unwrap();
    assert_eq!(after.roster.constructors, vec!["McLaren", "Ferrari"]);
    assert_eq!(site.saved(), after.roster);
}

#[tokio::test]
async fn test_run_apply_when_already_up_to_date() {
    let dir = TempDir::new().unwrap();
    let runner = runner(&dir).await;
    let site = MockSite::new(1, optimal_ideal().as_snapshot());
    let source = FixedSource::new();
    let options = run_options(&dir, BudgetChoice::Fixed(100.0), true);

    runner.run_end_to_end(&site, &source, &options).await.unwrap();
    let calls_after_first = site.calls().len();

    // The second run is answered from the stored state.
    let bundle = runner.run_end_to_end(&site, &source, &options).await.unwrap();
    assert_eq!(site.calls().len(), calls_after_first);
    assert!(bundle.verify.ok);
    assert!(bundle.plan.is_empty());
}

#[tokio::test]
async fn test_record_budget_state_saves_under_lock() {
    let dir = TempDir::new().unwrap();
    let runner = runner(&dir).await;
    let site = MockSite::new(1, current_roster());

    let (budget, history) = runner.record_budget_state(&site).await.unwrap();
    assert_eq!(site.calls(), vec!["read_budget", "read_state"]);
    assert!(history.exists());
    assert!(!runner.store().root().join("f1sync.lock").exists());

    let stored = runner.store().load_team_state().await.unwrap().unwrap();
    assert_eq!(stored.budget, Some(budget));
    assert_eq!(stored.roster, current_roster());
}

#[tokio::test]
async fn test_record_budget_state_waits_for_running_sync() {
    let dir = TempDir::new().unwrap();
    let runner = runner(&dir).await;
    let site = MockSite::new(1, current_roster());
    let _held = runner.store().lock().unwrap();

    let err = runner.record_budget_state(&site).await.unwrap_err();
    assert!(matches!(
        err,
        SyncError::Store(f1sync_store::StoreError::Locked { .. })
    ));
    assert!(site.calls().is_empty());
    assert!(runner.store().load_team_state().await.unwrap().is_none());
}
