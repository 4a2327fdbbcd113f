//! Subcommand handlers.

use std::path::{Path, PathBuf};
use std::time::Duration;

use f1sync_calculator::CalculatorClient;
use f1sync_core::{reconcile, DesiredSpec, RosterCapacity, RosterSnapshot};
use f1sync_runtime::{BudgetChoice, BudgetInput, RunOptions, SyncOptions, SyncStatus};
use serde_json::json;
use tracing::info;

use crate::app::{App, CliResult};
use crate::cli::BrowserArgs;

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn calculator(app: &App, url: Option<String>) -> CliResult<CalculatorClient> {
    let calculator = &app.config.calculator;
    let url = url.unwrap_or_else(|| calculator.url.clone());
    Ok(CalculatorClient::new(
        &url,
        Duration::from_secs(calculator.timeout_seconds),
    )?)
}

pub(crate) async fn budget(
    app: &App,
    team_id: Option<u32>,
    out: Option<PathBuf>,
    write_state: bool,
    browser: &BrowserArgs,
) -> CliResult<()> {
    let team_id = app.team_id(team_id)?;
    let runner = app.runner().await?;
    let session = app.open_site(team_id, None, browser).await?;

    let result = async {
        let budget = if write_state {
            runner.record_budget_state(&session.site).await?.0
        } else {
            runner.scrape_budget(&session.site).await?
        };
        CliResult::Ok(budget)
    }
    .await;
    session.close().await;

    let budget = result?;
    if let Some(out) = out {
        runner.store().write_json(&out, &budget).await?;
    }
    print_json(&budget)
}

pub(crate) async fn optimal(
    app: &App,
    budget: BudgetChoice,
    team_id: Option<u32>,
    url: Option<String>,
    ideal_out: &Path,
    boost_override: Option<String>,
    browser: &BrowserArgs,
) -> CliResult<()> {
    let runner = app.runner().await?;
    let source = calculator(app, url)?;

    let budget = match budget {
        BudgetChoice::Fixed(cap_m) => BudgetInput::Fixed { cap_m },
        BudgetChoice::Auto => {
            let team_id = app.team_id(team_id)?;
            let session = app.open_site(team_id, None, browser).await?;
            let scraped = runner.scrape_budget(&session.site).await;
            session.close().await;
            BudgetInput::Scraped(scraped?)
        }
    };

    let planned = runner
        .plan_ideal(&source, budget, boost_override.as_deref(), ideal_out)
        .await?;
    print_json(&planned.summary)
}

pub(crate) async fn plan(app: &App, ideal: &Path, observed: Option<&Path>) -> CliResult<()> {
    let desired = DesiredSpec::load(ideal)?;

    let observed: RosterSnapshot = match observed {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read observed roster {:?}: {}", path, e))?;
            // Team state files carry the roster fields at the top level.
            serde_json::from_str(&content)?
        }
        None => {
            let runner = app.runner().await?;
            let state = runner.store().load_team_state().await?.ok_or_else(|| {
                format!(
                    "no stored team state in {:?}, pass --observed",
                    app.state_dir()
                )
            })?;
            state.roster
        }
    };

    let reconciliation = reconcile(&observed, &desired, &RosterCapacity::default())?;
    print_json(&reconciliation)
}

pub(crate) async fn sync(
    app: &App,
    ideal: &Path,
    team_id: Option<u32>,
    expected_team_name: Option<String>,
    apply: bool,
    force: bool,
    browser: &BrowserArgs,
) -> CliResult<()> {
    let desired = DesiredSpec::load(ideal)?;
    let options = SyncOptions {
        team_id: app.team_id(team_id)?,
        apply,
        force,
    };
    let runner = app.runner().await?;

    if !force {
        // Answer from the stored state without starting a browser.
        if let Some(local) = runner.store().load_team_state().await? {
            let up_to_date = local.team_id == options.team_id
                && reconcile(&local.roster, &desired, runner.capacity())?.is_noop();
            if up_to_date {
                info!("Stored team state already matches {:?}, nothing to do", ideal);
                return print_json(&json!({
                    "status": SyncStatus::UpToDate,
                    "site_before": local,
                    "plan": [],
                }));
            }
        }
    }

    let session = app
        .open_site(options.team_id, expected_team_name, browser)
        .await?;
    let result = runner.sync(&session.site, &desired, &options).await;
    session.close().await;
    let outcome = result?;

    print_json(&json!({
        "status": outcome.status,
        "run_dir": outcome.run_dir,
        "site_before": outcome.before,
        "plan": outcome.plan,
        "site_after": outcome.after,
    }))
}

#[allow(clippy::too_many_arguments)]
pub(crate) async fn run(
    app: &App,
    budget: BudgetChoice,
    team_id: Option<u32>,
    expected_team_name: Option<String>,
    apply: bool,
    force: bool,
    url: Option<String>,
    boost_override: Option<String>,
    out: PathBuf,
    browser: &BrowserArgs,
) -> CliResult<()> {
    let options = RunOptions {
        team_id: app.team_id(team_id)?,
        budget,
        apply,
        force,
        boost_override,
        ideal_out: out,
    };
    let runner = app.runner().await?;
    let source = calculator(app, url)?;

    let session = app
        .open_site(options.team_id, expected_team_name, browser)
        .await?;
    let result = runner.run_end_to_end(&session.site, &source, &options).await;
    session.close().await;
    let bundle = result?;

    print_json(&bundle)
}
