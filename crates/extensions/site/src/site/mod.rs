//! F1 Fantasy team page, driven through a CDP page session.

mod applier;
mod error;
mod parse;
mod reader;
mod scripts;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::cdp::{CdpError, PageSession};

pub use error::SiteError;
pub use parse::{
    boost_from_badge_text, check_team_identity, cost_cap_from_html, is_team_url,
    parse_money_millions, split_roster, sum_money_millions,
};

/// Where and how to find one team on the site.
#[derive(Debug, Clone)]
pub struct SiteOptions {
    pub team_id: u32,
    /// Fully resolved team page URL.
    pub team_url: String,
    /// Page to return to after a commit.
    pub home_url: String,
    pub expected_team_name: Option<String>,
    /// Team names whose presence on the page aborts the run.
    pub forbidden_names: Vec<String>,
    pub navigation_timeout: Duration,
    /// Upper bound for a single in-page wait.
    pub wait_timeout: Duration,
    pub poll_interval: Duration,
}

impl SiteOptions {
    pub fn new(team_id: u32, team_url: impl Into<String>, home_url: impl Into<String>) -> Self {
        Self {
            team_id,
            team_url: team_url.into(),
            home_url: home_url.into(),
            expected_team_name: None,
            forbidden_names: Vec::new(),
            navigation_timeout: Duration::from_secs(60),
            wait_timeout: Duration::from_secs(20),
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// Player list tabs on the team page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tab {
    Drivers,
    Constructors,
}

impl Tab {
    fn label(self) -> &'static str {
        match self {
            Tab::Drivers => "drivers",
            Tab::Constructors => "constructors",
        }
    }

    fn search_label(self) -> &'static str {
        match self {
            Tab::Drivers => "Search Drivers",
            Tab::Constructors => "Search Constructors",
        }
    }

    fn member_kind(self) -> &'static str {
        match self {
            Tab::Drivers => "driver",
            Tab::Constructors => "constructor",
        }
    }
}

/// The team page of one F1 Fantasy team.
///
/// Implements [`RosterReader`](f1sync_core::RosterReader) and
/// [`RosterApplier`](f1sync_core::RosterApplier). Failure screenshots go to
/// the artifact directory when one is set.
pub struct FantasySite {
    page: Arc<PageSession>,
    options: SiteOptions,
    artifact_dir: Mutex<Option<PathBuf>>,
}

impl FantasySite {
    pub fn new(page: Arc<PageSession>, options: SiteOptions) -> Self {
        Self {
            page,
            options,
            artifact_dir: Mutex::new(None),
        }
    }

    pub fn options(&self) -> &SiteOptions {
        &self.options
    }

    pub fn page(&self) -> &Arc<PageSession> {
        &self.page
    }

    /// Call a page script with JSON arguments.
    async fn script(&self, function: &str, args: &[Value]) -> Result<Value, SiteError> {
        Ok(self.page.call_function(function, args).await?)
    }

    /// Call a page script that returns a boolean.
    async fn script_flag(&self, function: &str, args: &[Value]) -> Result<bool, SiteError> {
        Ok(self.script(function, args).await?.as_bool().unwrap_or(false))
    }

    /// Poll a page script until it returns something truthy.
    async fn wait_for_script(
        &self,
        function: &str,
        args: &[Value],
        timeout: Duration,
    ) -> Result<Value, CdpError> {
        let expression = PageSession::invocation(function, args)?;
        self.page
            .wait_for_function(&expression, timeout, self.options.poll_interval)
            .await
    }

    /// Wait until `text` shows up in the page body.
    async fn wait_for_text(&self, text: &str, timeout: Duration) -> Result<(), CdpError> {
        self.wait_for_script(scripts::TEXT_PRESENT, &[json!(text)], timeout)
            .await
            .map(|_| ())
    }

    async fn body_text(&self) -> Result<String, SiteError> {
        let text = self.page.evaluate(scripts::BODY_TEXT).await?;
        Ok(text.as_str().unwrap_or_default().to_string())
    }

    async fn select_tab(&self, tab: Tab) -> Result<(), SiteError> {
        if !self.script_flag(scripts::CLICK_TAB, &[json!(tab.label())]).await? {
            debug!("No '{}' tab link on page", tab.label());
        }
        settle(250).await;
        Ok(())
    }

    /// Write a full-page PNG screenshot to `path`.
    async fn save_screenshot(&self, path: &Path) -> Result<(), SiteError> {
        let png = self.page.screenshot_png().await?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, png).await?;
        debug!("Screenshot saved to {:?}", path);
        Ok(())
    }

    /// Best-effort screenshot into the artifact directory.
    async fn snapshot(&self, name: &str) {
        let Some(dir) = self.artifact_dir.lock().clone() else {
            return;
        };
        if let Err(e) = self.save_screenshot(&dir.join(name)).await {
            warn!("Failed to capture {}: {}", name, e);
        }
    }
}

/// Fixed pause for the page to react to a click.
async fn settle(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

/// File name component for a member name.
fn file_part(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '-') {
            out.push(c);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_options_defaults() {
        let options = SiteOptions::new(
            2,
            "https://fantasy.formula1.com/en/my-team/2",
            "https://fantasy.formula1.com/en/my-team",
        );
        assert_eq!(options.team_id, 2);
        assert_eq!(options.wait_timeout, Duration::from_secs(20));
        assert_eq!(options.poll_interval, Duration::from_millis(500));
        assert!(options.forbidden_names.is_empty());
    }

    #[test]
    fn test_tab_labels() {
        assert_eq!(Tab::Drivers.label(), "drivers");
        assert_eq!(Tab::Constructors.search_label(), "Search Constructors");
        assert_eq!(Tab::Constructors.member_kind(), "constructor");
    }

    #[test]
    fn test_file_part() {
        assert_eq!(file_part("Lando Norris"), "Lando_Norris");
        assert_eq!(file_part("Haas F1 Team"), "Haas_F1_Team");
        assert_eq!(file_part("Nico Hülkenberg"), "Nico_H_lkenberg");
    }
}
