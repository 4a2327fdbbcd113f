//! Team page automation errors.

use thiserror::Error;

use crate::cdp::CdpError;
use crate::manager::BrowserError;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error(transparent)]
    Cdp(#[from] CdpError),

    #[error(transparent)]
    Browser(#[from] BrowserError),

    /// The browser is not on the requested team's page.
    #[error("Not on expected team page: expected /my-team/{expected}, got {actual}")]
    WrongTeam { expected: u32, actual: String },

    /// Team identity check on the page text failed; nothing was touched.
    #[error("Safety check failed: {0}")]
    SafetyCheck(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Failed to add {member}: {reason}")]
    AddFailed { member: String, reason: String },

    /// The site refuses to commit the edited lineup.
    #[error("Commit blocked: {0}")]
    CommitBlocked(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Budget unavailable: {0}")]
    BudgetUnavailable(String),

    #[error("Unexpected page result: {0}")]
    UnexpectedResult(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
