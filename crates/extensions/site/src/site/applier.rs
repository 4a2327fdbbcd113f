//! Editing the lineup and committing it.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use f1sync_core::{Action, RosterApplier};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::{file_part, scripts, settle, FantasySite, SiteError, Tab};
use crate::cdp::{CdpError, PageSession};

/// Pause for a removal to leave the lineup before moving on.
const REMOVAL_WAIT: Duration = Duration::from_secs(15);
/// Window scroll per poll while hunting for a driver row.
const DRIVER_LIST_SCROLL: u32 = 900;

/// Result of the in-page add-row probe.
#[derive(Debug, Deserialize)]
struct RowProbe {
    ok: bool,
    #[serde(default)]
    disabled: bool,
    #[serde(default)]
    clicked: bool,
    #[serde(default)]
    err: Option<String>,
}

impl RowProbe {
    fn ready(&self) -> bool {
        self.ok && !self.disabled
    }

    fn reason(&self) -> String {
        self.err.clone().unwrap_or_else(|| "unknown".to_string())
    }
}

#[derive(Debug, Deserialize)]
struct ScriptOutcome {
    ok: bool,
    #[serde(default)]
    err: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MarkedButton {
    found: bool,
    disabled: bool,
}

impl FantasySite {
    /// Remove a lineup card via its close button.
    async fn remove_member(&self, tab: Tab, name: &str) -> Result<(), SiteError> {
        self.select_tab(tab).await?;
        info!("Removing {}: {}", tab.member_kind(), name);

        let outcome: ScriptOutcome = serde_json::from_value(
            self.script(scripts::REMOVE_FROM_LINEUP, &[json!(name)]).await?,
        )?;
        if !outcome.ok {
            return Err(SiteError::ElementNotFound(format!(
                "{} '{}' in lineup: {}",
                tab.member_kind(),
                name,
                outcome.err.unwrap_or_default()
            )));
        }

        let gone = format!(
            "!{}",
            PageSession::invocation(scripts::IN_LINEUP, &[json!(name)])?
        );
        if let Err(e) = self
            .page
            .wait_for_function(&gone, REMOVAL_WAIT, self.options.poll_interval)
            .await
        {
            warn!("'{}' still shown in lineup after removal: {}", name, e);
        }
        settle(350).await;
        Ok(())
    }

    /// Add a member through the searchable player list.
    async fn add_member(&self, tab: Tab, name: &str) -> Result<(), SiteError> {
        self.select_tab(tab).await?;
        let kind = tab.member_kind();
        info!("Adding {} via search list: {}", kind, name);

        if !self
            .script_flag(scripts::PREPARE_SEARCH, &[json!(tab.search_label())])
            .await?
        {
            return Err(SiteError::ElementNotFound(format!("{} box", tab.search_label())));
        }
        self.page.fill(scripts::SEARCH_INPUT, name).await?;
        settle(300).await;

        let scroll = match tab {
            Tab::Drivers => DRIVER_LIST_SCROLL,
            Tab::Constructors => 0,
        };
        let probe = self.poll_add_row(name, scroll).await?;

        if !probe.ok {
            self.snapshot(&format!("add_{}_no_row_{}.png", kind, file_part(name)))
                .await;
            return Err(SiteError::AddFailed {
                member: name.to_string(),
                reason: "row not found in player list".to_string(),
            });
        }
        if probe.disabled {
            self.snapshot(&format!("add_{}_still_disabled_{}.png", kind, file_part(name)))
                .await;
            return Err(SiteError::AddFailed {
                member: name.to_string(),
                reason: "add button stayed disabled".to_string(),
            });
        }

        let clicked: RowProbe = serde_json::from_value(
            self.script(scripts::PROBE_ADD_ROW, &[json!(name), json!(true), json!(0)])
                .await?,
        )?;
        if !(clicked.ready() && clicked.clicked) {
            self.snapshot(&format!("add_{}_failed_{}.png", kind, file_part(name)))
                .await;
            return Err(SiteError::AddFailed {
                member: name.to_string(),
                reason: clicked.reason(),
            });
        }

        self.wait_for_script(scripts::IN_LINEUP, &[json!(name)], self.options.wait_timeout)
            .await
            .map_err(|e| SiteError::AddFailed {
                member: name.to_string(),
                reason: format!("did not appear in lineup: {}", e),
            })?;
        settle(250).await;

        self.script(scripts::CLEAR_SEARCH, &[]).await?;
        settle(150).await;
        Ok(())
    }

    /// Poll the player list until the row for `name` has an enabled add button.
    ///
    /// Returns the last probe when the wait runs out.
    async fn poll_add_row(&self, name: &str, scroll: u32) -> Result<RowProbe, SiteError> {
        let deadline = tokio::time::Instant::now() + self.options.wait_timeout;
        loop {
            let probe: RowProbe = serde_json::from_value(
                self.script(
                    scripts::PROBE_ADD_ROW,
                    &[json!(name), json!(false), json!(scroll)],
                )
                .await?,
            )?;
            if probe.ready() || tokio::time::Instant::now() >= deadline {
                return Ok(probe);
            }
            tokio::time::sleep(self.options.poll_interval).await;
        }
    }

    /// Open a lineup card's detail view.
    async fn open_card(&self, name: &str) -> Result<bool, SiteError> {
        let opened = self
            .script_flag(scripts::OPEN_LINEUP_CARD, &[json!(name)])
            .await?;
        if opened {
            settle(400).await;
        }
        Ok(opened)
    }

    /// Close the card detail view.
    async fn close_card(&self) -> Result<(), SiteError> {
        if self.script_flag(scripts::CLICK_BUTTON, &[json!("Done")]).await? {
            settle(250).await;
        } else {
            self.page.press_key("Escape").await?;
        }
        Ok(())
    }

    async fn set_boost(&self, name: &str) -> Result<(), SiteError> {
        self.select_tab(Tab::Drivers).await?;
        info!("Setting boost to: {}", name);

        if !self.open_card(name).await? {
            return Err(SiteError::ElementNotFound(format!(
                "boost target '{}' in lineup",
                name
            )));
        }
        if self.script_flag(scripts::CLICK_BUTTON, &[json!("Add Boost")]).await? {
            settle(300).await;
        } else {
            warn!("No 'Add Boost' button on card of {}", name);
        }
        self.close_card().await
    }

    async fn clear_boost(&self) -> Result<(), SiteError> {
        self.select_tab(Tab::Drivers).await?;

        let Some(current) = self
            .script(scripts::BOOST_BADGE, &[])
            .await?
            .as_str()
            .map(str::to_string)
        else {
            warn!("No boost badge found, nothing to clear");
            return Ok(());
        };
        info!("Clearing boost from: {}", current);

        if !self.open_card(&current).await? {
            return Err(SiteError::ElementNotFound(format!(
                "boosted driver '{}' in lineup",
                current
            )));
        }
        if self.script_flag(scripts::CLICK_BUTTON, &[json!("Remove Boost")]).await? {
            settle(300).await;
        } else {
            // The site moves the boost when another driver takes it.
            warn!("No 'Remove Boost' button on card of {}", current);
        }
        self.close_card().await
    }

    /// Tag a button by label and report whether it can be clicked.
    async fn mark_button(&self, text: &str, marker: &str) -> Result<MarkedButton, SiteError> {
        Ok(serde_json::from_value(
            self.script(scripts::MARK_BUTTON, &[json!(text), json!(marker)])
                .await?,
        )?)
    }
}

/// Selector of a button tagged by `MARK_BUTTON`.
fn marked(marker: &str) -> String {
    format!("button[data-f1sync-target=\"{}\"]", marker)
}

#[async_trait]
impl RosterApplier for FantasySite {
    type Error = SiteError;

    async fn apply(&self, action: &Action) -> Result<(), SiteError> {
        match action {
            Action::RemoveDriver(name) => self.remove_member(Tab::Drivers, name).await,
            Action::RemoveConstructor(name) => self.remove_member(Tab::Constructors, name).await,
            Action::AddDriver(name) => self.add_member(Tab::Drivers, name).await,
            Action::AddConstructor(name) => self.add_member(Tab::Constructors, name).await,
            Action::ClearBoost => self.clear_boost().await,
            Action::SetBoost(name) => self.set_boost(name).await,
        }
    }

    async fn stage(&self) -> Result<(), SiteError> {
        let button = self.mark_button("Continue", "continue").await?;
        if !button.found {
            return Err(SiteError::ElementNotFound("Continue button".to_string()));
        }
        if button.disabled {
            self.snapshot("continue_disabled.png").await;
            return Err(SiteError::CommitBlocked(
                "Continue button is disabled; team likely invalid or an edit did not apply"
                    .to_string(),
            ));
        }

        info!("Staging changes");
        self.page.click_selector(&marked("continue")).await?;
        settle(500).await;

        if let Err(e) = self
            .wait_for_text("Team Changes", self.options.wait_timeout)
            .await
        {
            self.snapshot("continue_no_modal.png").await;
            return Err(match e {
                CdpError::Timeout(_) => {
                    SiteError::Timeout("Team Changes summary did not open".to_string())
                }
                other => other.into(),
            });
        }

        self.snapshot("team_changes_modal.png").await;
        Ok(())
    }

    async fn confirm(&self) -> Result<(), SiteError> {
        let button = self.mark_button("Confirm", "confirm").await?;
        if !button.found {
            return Err(SiteError::ElementNotFound(
                "Confirm button in Team Changes summary".to_string(),
            ));
        }

        info!("Confirming changes");
        self.page.click_selector(&marked("confirm")).await?;
        settle(1500).await;

        self.page
            .navigate(&self.options.home_url, self.options.navigation_timeout)
            .await?;
        settle(500).await;
        Ok(())
    }

    fn set_artifact_dir(&self, dir: Option<&Path>) {
        *self.artifact_dir.lock() = dir.map(Path::to_path_buf);
    }

    async fn capture(&self, path: &Path) -> Result<(), SiteError> {
        self.save_screenshot(path).await
    }
}
