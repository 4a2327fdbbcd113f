//! Configuration schema definitions.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub team: TeamConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub calculator: CalculatorConfig,

    #[serde(default)]
    pub state: StateConfig,
}

/// Which team slot to operate on, and how to recognise it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamConfig {
    /// Team slot number in the site URL.
    #[serde(default)]
    pub id: Option<u32>,

    /// Team name that must be visible on the page before anything is edited.
    #[serde(default)]
    pub expected_name: Option<String>,

    /// Team names that must not be visible (other slots of the same account).
    #[serde(default)]
    pub forbidden_names: Vec<String>,
}

/// Chrome launch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_debug_port")]
    pub debug_port: u16,

    /// Persistent profile holding the logged-in session.
    #[serde(default)]
    pub profile_dir: Option<PathBuf>,

    #[serde(default = "default_true")]
    pub headless: bool,

    #[serde(default)]
    pub chrome_path: Option<String>,

    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            debug_port: default_debug_port(),
            profile_dir: None,
            headless: true,
            chrome_path: None,
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
        }
    }
}

impl BrowserConfig {
    /// Profile directory, falling back to `.browser-profile` under `state_dir`.
    pub fn profile_dir_or(&self, state_dir: &Path) -> PathBuf {
        self.profile_dir
            .clone()
            .unwrap_or_else(|| state_dir.join(".browser-profile"))
    }
}

fn default_debug_port() -> u16 {
    9222
}

fn default_true() -> bool {
    true
}

// Portrait viewport: the lineup renders as a single column.
fn default_viewport_width() -> u32 {
    900
}

fn default_viewport_height() -> u32 {
    1600
}

/// Fantasy site URLs and wait bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Team page, `{team_id}` is substituted.
    #[serde(default = "default_team_url")]
    pub team_url: String,

    #[serde(default = "default_home_url")]
    pub home_url: String,

    #[serde(default = "default_navigation_timeout")]
    pub navigation_timeout_ms: u64,

    /// Upper bound for element and search-result waits.
    #[serde(default = "default_wait_timeout")]
    pub wait_timeout_ms: u64,

    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            team_url: default_team_url(),
            home_url: default_home_url(),
            navigation_timeout_ms: default_navigation_timeout(),
            wait_timeout_ms: default_wait_timeout(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

impl SiteConfig {
    pub fn team_url_for(&self, team_id: u32) -> String {
        self.team_url.replace("{team_id}", &team_id.to_string())
    }
}

fn default_team_url() -> String {
    "https://fantasy.formula1.com/en/my-team/{team_id}".to_string()
}

fn default_home_url() -> String {
    "https://fantasy.formula1.com/en/my-team".to_string()
}

fn default_navigation_timeout() -> u64 {
    60_000
}

fn default_wait_timeout() -> u64 {
    20_000
}

fn default_poll_interval() -> u64 {
    500
}

/// Team-calculator source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculatorConfig {
    #[serde(default = "default_calculator_url")]
    pub url: String,

    #[serde(default = "default_calculator_timeout")]
    pub timeout_seconds: u64,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            url: default_calculator_url(),
            timeout_seconds: default_calculator_timeout(),
        }
    }
}

fn default_calculator_url() -> String {
    "https://f1fantasytools.com/team-calculator".to_string()
}

fn default_calculator_timeout() -> u64 {
    60
}

/// Where state, history, artifacts and logs live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    #[serde(default = "default_state_dir")]
    pub dir: PathBuf,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            dir: default_state_dir(),
        }
    }
}

fn default_state_dir() -> PathBuf {
    PathBuf::from("state")
}
