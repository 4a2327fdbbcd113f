//! Resolved settings and site sessions shared by the commands.

use std::path::{Path, PathBuf};
use std::time::Duration;

use f1sync_config::{Config, ConfigLoader, ConfigValidator};
use f1sync_runtime::SyncRunner;
use f1sync_site::{BrowserManager, BrowserManagerConfig, FantasySite, SiteOptions};
use f1sync_store::StateStore;
use tracing::{info, warn};

use crate::cli::BrowserArgs;

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Configuration with command-line overrides applied.
pub(crate) struct App {
    pub config: Config,
}

impl App {
    /// Load the config file (optional) and apply the global overrides.
    pub fn load(config_path: &Path, state_dir: Option<PathBuf>) -> CliResult<Self> {
        let mut config = ConfigLoader::load_or_default(config_path)?;
        if let Some(dir) = state_dir {
            config.state.dir = dir;
        }
        Ok(Self { config })
    }

    /// Validate the configuration, logging warnings.
    pub fn validate(&self) -> CliResult<()> {
        let warnings = ConfigValidator::validate(&self.config)?.into_result()?;
        for w in warnings {
            warn!("Config {}: {}", w.path, w.message);
        }
        Ok(())
    }

    pub fn state_dir(&self) -> &Path {
        &self.config.state.dir
    }

    pub async fn runner(&self) -> CliResult<SyncRunner> {
        let store = StateStore::open(self.state_dir()).await?;
        Ok(SyncRunner::new(store))
    }

    /// Team id from the flag, falling back to `[team].id`.
    pub fn team_id(&self, flag: Option<u32>) -> CliResult<u32> {
        flag.or(self.config.team.id)
            .ok_or_else(|| "no team id: pass --team-id or set [team].id".into())
    }

    pub fn browser_config(&self, args: &BrowserArgs) -> BrowserManagerConfig {
        let browser = &self.config.browser;
        let profile_dir = args
            .profile_dir
            .clone()
            .unwrap_or_else(|| browser.profile_dir_or(self.state_dir()));

        BrowserManagerConfig {
            debug_port: args.debug_port.unwrap_or(browser.debug_port),
            viewport_width: browser.viewport_width,
            viewport_height: browser.viewport_height,
            profile_dir,
            headless: browser.headless && !args.headful,
            chrome_path: browser.chrome_path.as_ref().map(PathBuf::from),
        }
    }

    pub fn site_options(&self, team_id: u32, expected_team_name: Option<String>) -> SiteOptions {
        let site = &self.config.site;
        let mut options = SiteOptions::new(team_id, site.team_url_for(team_id), site.home_url.clone());
        options.expected_team_name = expected_team_name.or_else(|| self.config.team.expected_name.clone());
        options.forbidden_names = self.config.team.forbidden_names.clone();
        options.navigation_timeout = Duration::from_millis(site.navigation_timeout_ms);
        options.wait_timeout = Duration::from_millis(site.wait_timeout_ms);
        options.poll_interval = Duration::from_millis(site.poll_interval_ms);
        options
    }

    /// Launch or attach to Chrome and open the team page.
    pub async fn open_site(
        &self,
        team_id: u32,
        expected_team_name: Option<String>,
        args: &BrowserArgs,
    ) -> CliResult<SiteSession> {
        let options = self.site_options(team_id, expected_team_name);
        let manager = BrowserManager::new(self.browser_config(args));
        let page = manager.open_page(&options.team_url).await?;
        info!("Opened {}", options.team_url);

        Ok(SiteSession {
            site: FantasySite::new(page, options),
            manager,
        })
    }
}

/// An open team page and the browser behind it.
pub(crate) struct SiteSession {
    pub site: FantasySite,
    manager: BrowserManager,
}

impl SiteSession {
    /// Close the tab and stop Chrome if we started it.
    pub async fn close(self) {
        if let Err(e) = self.manager.close_page(self.site.page()).await {
            warn!("Failed to close page: {}", e);
        }
        if let Err(e) = self.manager.shutdown_chrome().await {
            warn!("Failed to shut down Chrome: {}", e);
        }
    }
}
