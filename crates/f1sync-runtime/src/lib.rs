//! # f1sync Runtime
//!
//! Drives one team from its current roster to a desired one:
//!
//! ```text
//! lock ─▶ local no-op? ─▶ read ─▶ reconcile ─▶ apply ─▶ stage ─▶ confirm
//!                                                                   │
//!                          persist ◀── verify ◀── re-read ◀─────────┘
//! ```
//!
//! [`SyncRunner::run_end_to_end`] puts the budget scrape and the calculator
//! in front of that and writes a bundle describing the whole run.

mod error;
mod run;
mod source;
mod sync;

#[cfg(test)]
mod testing;

pub use error::{site_error, SyncError};
pub use run::{
    BudgetChoice, BudgetInput, OptimalSummary, PlannedIdeal, PricedPick, RunBundle, RunInputs,
    RunOptions, Verification, RUN_BUNDLE_SCHEMA_VERSION,
};
pub use source::TeamSource;
pub use sync::{SyncOptions, SyncOutcome, SyncRunner, SyncStatus};
