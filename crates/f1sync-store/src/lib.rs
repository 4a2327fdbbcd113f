//! # f1sync Store
//!
//! Everything f1sync keeps on disk, rooted at one state directory:
//!
//! ```text
//! {state_dir}/
//! ├── team_state.json
//! ├── last_applied.json
//! ├── f1sync.lock
//! ├── history/
//! │   └── team_state_{ts}_team{id}.json
//! └── artifacts/
//!     └── run_{ts}_team{id}/
//! ```

mod error;
mod lock;
mod store;

pub use error::StoreError;
pub use lock::RunLock;
pub use store::{safe_filename, RunDir, StateStore};
