//! CLI definitions for f1sync.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use f1sync_runtime::BudgetChoice;

/// f1sync CLI.
#[derive(Parser)]
#[command(name = "f1sync")]
#[command(about = "Keep an F1 Fantasy team in line with a desired roster")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (optional)
    #[arg(short, long, default_value = "f1sync.toml", global = true)]
    pub config: PathBuf,

    /// State directory (overrides [state].dir)
    #[arg(long, global = true)]
    pub state_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Browser flags shared by every command that opens the site.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct BrowserArgs {
    /// Persistent browser profile holding the site login
    #[arg(long)]
    pub profile_dir: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    pub headful: bool,

    /// Chrome remote debugging port
    #[arg(long)]
    pub debug_port: Option<u16>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Scrape the remaining budget and cost cap from the team page
    Budget {
        #[arg(long)]
        team_id: Option<u32>,

        /// Also write the snapshot to this file
        #[arg(long)]
        out: Option<PathBuf>,

        /// Read the roster too and save it, with the budget, as the team state
        #[arg(long)]
        write_state: bool,

        #[command(flatten)]
        browser: BrowserArgs,
    },

    /// Compute the optimal team for a budget and write it as an ideal roster
    Optimal {
        /// Cap in millions, or "auto" to scrape it from the team page
        #[arg(long, default_value = "auto")]
        budget: BudgetChoice,

        #[arg(long)]
        team_id: Option<u32>,

        /// Team-calculator page URL
        #[arg(long)]
        url: Option<String>,

        #[arg(long, default_value = "ideal_team.json")]
        ideal_out: PathBuf,

        /// Boost this driver (full name, one of the selected five)
        #[arg(long)]
        boost_driver_override: Option<String>,

        #[command(flatten)]
        browser: BrowserArgs,
    },

    /// Print the actions turning an observed roster into an ideal one
    Plan {
        /// Ideal roster JSON
        #[arg(long)]
        ideal: PathBuf,

        /// Observed roster JSON (default: the stored team state)
        #[arg(long)]
        observed: Option<PathBuf>,
    },

    /// Sync the team on the site to an ideal roster
    Sync {
        /// Ideal roster JSON
        #[arg(long)]
        ideal: PathBuf,

        #[arg(long)]
        team_id: Option<u32>,

        #[arg(long)]
        expected_team_name: Option<String>,

        /// Compute and print the plan only
        #[arg(long)]
        no_apply: bool,

        /// Read the site even when the stored state already matches
        #[arg(long)]
        force: bool,

        #[command(flatten)]
        browser: BrowserArgs,
    },

    /// Budget, optimal team and sync in one run
    Run {
        /// Cap in millions, or "auto" to scrape it from the team page
        #[arg(long, default_value = "auto")]
        budget: BudgetChoice,

        #[arg(long)]
        team_id: Option<u32>,

        #[arg(long)]
        expected_team_name: Option<String>,

        /// Apply the changes; without it the run is a dry run
        #[arg(long)]
        apply: bool,

        /// Read the site even when the stored state already matches
        #[arg(long)]
        force: bool,

        /// Team-calculator page URL
        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        boost_driver_override: Option<String>,

        /// Where the ideal roster is written
        #[arg(long, default_value = "ideal_team.json")]
        out: PathBuf,

        #[command(flatten)]
        browser: BrowserArgs,
    },
}
