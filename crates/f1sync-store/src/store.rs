//! File-backed state store.

use std::path::{Path, PathBuf};

use chrono::Utc;
use f1sync_core::model::utc_stamp;
use f1sync_core::{DesiredSpec, LastApplied, TeamState};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::lock::RunLock;

const TEAM_STATE_FILE: &str = "team_state.json";
const LAST_APPLIED_FILE: &str = "last_applied.json";
const LOCK_FILE: &str = "f1sync.lock";

/// State directory accessor.
///
/// JSON is written pretty-printed with a trailing newline, through a sibling
/// `.tmp` file renamed into place so readers never see a partial file.
#[derive(Debug, Clone)]
pub struct StateStore {
    root: PathBuf,
}

impl StateStore {
    /// Open a store, creating the directory layout if missing.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self { root: root.into() };
        fs::create_dir_all(store.history_dir()).await?;
        fs::create_dir_all(store.artifacts_dir()).await?;
        debug!("StateStore opened at {:?}", store.root);
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn history_dir(&self) -> PathBuf {
        self.root.join("history")
    }

    pub fn artifacts_dir(&self) -> PathBuf {
        self.root.join("artifacts")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn team_state_path(&self) -> PathBuf {
        self.root.join(TEAM_STATE_FILE)
    }

    pub fn last_applied_path(&self) -> PathBuf {
        self.root.join(LAST_APPLIED_FILE)
    }

    /// Path of a named file directly under the state directory.
    pub fn file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Acquire the single-run lock for this state directory.
    pub fn lock(&self) -> Result<RunLock, StoreError> {
        RunLock::acquire(self.root.join(LOCK_FILE))
    }

    /// Atomically write `value` as pretty JSON.
    pub async fn write_json<T: Serialize + ?Sized>(
        &self,
        path: &Path,
        value: &T,
    ) -> Result<(), StoreError> {
        let mut content =
            serde_json::to_string_pretty(value).map_err(|source| StoreError::Serialization {
                path: path.to_path_buf(),
                source,
            })?;
        content.push('\n');

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, content).await?;
        fs::rename(&tmp, path).await?;
        debug!("Wrote {:?}", path);
        Ok(())
    }

    /// Read JSON from `path`; `None` if the file does not exist.
    pub async fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>, StoreError> {
        let content = match fs::read_to_string(path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let value = serde_json::from_str(&content).map_err(|source| StoreError::Serialization {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(value))
    }

    /// Last saved team state.
    ///
    /// A corrupt file is logged and treated as absent; it only drives the
    /// local no-op shortcut.
    pub async fn load_team_state(&self) -> Result<Option<TeamState>, StoreError> {
        match self.read_json(&self.team_state_path()).await {
            Err(StoreError::Serialization { path, source }) => {
                warn!("Ignoring unreadable team state {:?}: {}", path, source);
                Ok(None)
            }
            other => other,
        }
    }

    /// Save the current team state and append a history copy.
    ///
    /// Returns the history file path.
    pub async fn save_team_state(&self, state: &TeamState) -> Result<PathBuf, StoreError> {
        self.write_json(&self.team_state_path(), state).await?;

        let history = self.history_dir().join(format!(
            "team_state_{}_team{}.json",
            file_stamp(&state.ts_utc),
            state.team_id
        ));
        self.write_json(&history, state).await?;
        Ok(history)
    }

    pub async fn load_last_applied(&self) -> Result<Option<LastApplied>, StoreError> {
        self.read_json(&self.last_applied_path()).await
    }

    /// Record `ideal` as the last spec applied successfully.
    pub async fn save_last_applied(&self, ideal: &DesiredSpec) -> Result<LastApplied, StoreError> {
        let record = LastApplied {
            ts_utc: utc_stamp(Utc::now()),
            ideal: ideal.clone(),
        };
        self.write_json(&self.last_applied_path(), &record).await?;
        Ok(record)
    }

    /// Create the artifacts directory for one run.
    pub async fn create_run_dir(&self, team_id: u32, ts_utc: &str) -> Result<RunDir, StoreError> {
        let path = self
            .artifacts_dir()
            .join(format!("run_{}_team{}", file_stamp(ts_utc), team_id));
        fs::create_dir_all(&path).await?;
        Ok(RunDir { path })
    }
}

/// Artifacts directory of a single run.
#[derive(Debug, Clone)]
pub struct RunDir {
    path: PathBuf,
}

impl RunDir {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of an artifact inside the run directory, name sanitized.
    pub fn artifact(&self, name: &str) -> PathBuf {
        self.path.join(safe_filename(name))
    }
}

/// Timestamps go into file names with `:` replaced.
fn file_stamp(ts_utc: &str) -> String {
    ts_utc.replace(':', "-")
}

/// Replace runs of characters outside `[A-Za-z0-9._-]` with `_`.
pub fn safe_filename(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_run = false;
    for c in s.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
