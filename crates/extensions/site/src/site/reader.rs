//! Reading the roster and budget off the team page.

use async_trait::async_trait;
use f1sync_core::{BudgetSnapshot, RosterReader, RosterSnapshot, TeamState};
use serde_json::json;
use tracing::{debug, info};

use super::parse::{
    boost_from_badge_text, check_team_identity, cost_cap_from_html, is_team_url,
    parse_money_millions, split_roster, sum_money_millions,
};
use super::{scripts, settle, FantasySite, SiteError, Tab};

/// First names of the full player list; scraping the fallback region stops
/// at them.
const PLAYER_LIST_HEAD: &[&str] = &[
    "Max Verstappen",
    "George Russell",
    "Lando Norris",
    "Oscar Piastri",
    "Kimi Antonelli",
];

impl FantasySite {
    /// Open the team page and make sure it is the right team.
    pub async fn goto_team(&self) -> Result<(), SiteError> {
        let url = &self.options.team_url;
        info!("Opening team page {}", url);
        self.page
            .navigate(url, self.options.navigation_timeout)
            .await?;

        self.page
            .wait_for_function(
                scripts::TEAM_READY,
                self.options.navigation_timeout,
                self.options.poll_interval,
            )
            .await
            .map_err(|e| {
                SiteError::Timeout(format!("team page did not render ({}), are we logged in?", e))
            })?;
        settle(250).await;

        self.assert_team_page().await
    }

    /// Refuse to touch a page that is not the configured team.
    pub async fn assert_team_page(&self) -> Result<(), SiteError> {
        let current = self.page.get_url().await?;
        if !is_team_url(&current, self.options.team_id) {
            return Err(SiteError::WrongTeam {
                expected: self.options.team_id,
                actual: current,
            });
        }

        let body = self.body_text().await?;
        check_team_identity(
            &body,
            self.options.expected_team_name.as_deref(),
            &self.options.forbidden_names,
        )
    }

    /// Roster on the page currently open.
    async fn scrape_roster(&self) -> Result<RosterSnapshot, SiteError> {
        self.select_tab(Tab::Drivers).await?;

        let names: Vec<String> = serde_json::from_value(
            self.script(scripts::SELECTED_NAMES, &[json!(PLAYER_LIST_HEAD)])
                .await?,
        )?;
        let (drivers, constructors) = split_roster(names);

        let boosted = match self.script(scripts::BOOST_BADGE, &[]).await?.as_str() {
            Some(name) if !name.is_empty() => Some(name.to_string()),
            _ => boost_from_badge_text(&self.body_text().await?, &drivers),
        };

        debug!(
            drivers = drivers.len(),
            constructors = constructors.len(),
            boosted = ?boosted,
            "Scraped roster"
        );
        Ok(RosterSnapshot::new(drivers, constructors, boosted))
    }

    /// Remaining cost cap shown on the page currently open.
    async fn scrape_remaining(&self) -> Result<f64, SiteError> {
        let section = self.script(scripts::COST_CAP_SECTION, &[]).await?;
        if let Some(value) = section.as_str().and_then(parse_money_millions) {
            return Ok(value);
        }

        let html = self.page.evaluate(scripts::PAGE_HTML).await?;
        cost_cap_from_html(html.as_str().unwrap_or_default()).ok_or_else(|| {
            SiteError::BudgetUnavailable("could not parse remaining Cost Cap from page".to_string())
        })
    }
}

#[async_trait]
impl RosterReader for FantasySite {
    type Error = SiteError;

    async fn read_state(&self) -> Result<TeamState, SiteError> {
        self.goto_team().await?;
        let roster = self.scrape_roster().await?;
        let url = self.page.get_url().await?;

        info!(
            "Read team {}: {} drivers, {} constructors",
            self.options.team_id,
            roster.drivers.len(),
            roster.constructors.len()
        );
        Ok(TeamState::observed(
            self.options.team_id,
            self.options.expected_team_name.clone(),
            roster,
        )
        .with_url(url))
    }

    async fn read_budget(&self) -> Result<BudgetSnapshot, SiteError> {
        self.goto_team().await?;

        self.wait_for_text("Cost Cap", self.options.navigation_timeout)
            .await
            .map_err(|_| {
                SiteError::BudgetUnavailable(format!(
                    "budget widget not shown on {}, are we logged in?",
                    self.options.team_url
                ))
            })?;

        let remaining = self.scrape_remaining().await?;
        let formation = self.script(scripts::FORMATION_TEXT, &[]).await?;
        let used = sum_money_millions(formation.as_str().unwrap_or_default());

        let budget = BudgetSnapshot::from_parts(remaining, used);
        info!(
            "Budget: remaining {}M, used {}M, cap {}M",
            budget.remaining_m, budget.used_m, budget.cap_m
        );
        Ok(budget)
    }
}
