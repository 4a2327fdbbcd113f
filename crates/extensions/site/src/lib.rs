//! F1 Fantasy team page automation for f1sync.
//!
//! Drives Chrome over the Chrome DevTools Protocol (CDP) without any Node.js
//! tooling. The browser keeps its own persistent profile, so logging in to
//! the site once by hand is enough for later runs.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐    WebSocket     ┌──────────────────┐
//! │  FantasySite    │ ◄──────────────► │   Chrome/Edge    │
//! │  (this crate)   │       CDP        │ (f1sync profile) │
//! └─────────────────┘                  └──────────────────┘
//! ```
//!
//! - [`cdp`]: WebSocket JSON-RPC client and page session
//! - [`manager`]: Chrome discovery, launch and page creation
//! - [`FantasySite`]: reads the roster and budget, applies roster actions,
//!   and commits them through the site's Continue / Confirm flow

pub mod cdp;
pub mod manager;
mod site;

pub use cdp::{CdpClient, CdpError, PageSession};
pub use manager::{BrowserError, BrowserManager, BrowserManagerConfig};
pub use site::{
    boost_from_badge_text, check_team_identity, cost_cap_from_html, is_team_url,
    parse_money_millions, split_roster, sum_money_millions, FantasySite, SiteError, SiteOptions,
};
