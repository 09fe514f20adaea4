use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Directory under the cache root that holds the per-patch match folders.
pub const MATCH_SUBDIR: &str = "matches";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Match record has no string field {0}")]
    MissingField(&'static str),
    #[error("Refusing to use {0:?} as a storage key")]
    InvalidKey(String),
    #[error("Failed to write match record: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode match record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A full match-v5 document, kept verbatim.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(transparent)]
pub struct MatchRecord(Value);

impl MatchRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn match_id(&self) -> Result<&str, StoreError> {
        self.0["metadata"]["matchId"]
            .as_str()
            .ok_or(StoreError::MissingField("metadata.matchId"))
    }

    pub fn game_version(&self) -> Result<&str, StoreError> {
        self.0["info"]["gameVersion"]
            .as_str()
            .ok_or(StoreError::MissingField("info.gameVersion"))
    }

    pub fn belongs_to(&self, patch_prefix: &str) -> Result<bool, StoreError> {
        Ok(self.game_version()?.starts_with(patch_prefix))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    Persisted(PathBuf),
    /// `gameVersion` is from another patch, nothing was written.
    Skipped,
}

impl PersistOutcome {
    pub fn is_persisted(&self) -> bool {
        matches!(self, PersistOutcome::Persisted(_))
    }
}

pub struct MatchStore {
    root: PathBuf,
}

impl MatchStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, patch_prefix: &str, match_id: &str) -> Result<PathBuf, StoreError> {
        let patch = single_component(patch_prefix)?;
        let name = single_component(match_id)?;
        Ok(self.root.join(patch).join(format!("{}.json", name)))
    }

    /// Writes `record` to `{root}/{patch_prefix}/{matchId}.json` if its game version
    /// starts with `patch_prefix`. An existing file is overwritten.
    pub fn persist_if_matching_patch(
        &self,
        record: &MatchRecord,
        patch_prefix: &str,
    ) -> Result<PersistOutcome, StoreError> {
        if !record.belongs_to(patch_prefix)? {
            return Ok(PersistOutcome::Skipped);
        }
        let path = self.path_for(patch_prefix, record.match_id()?)?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_vec(record)?;
        std::fs::write(&path, content)?;
        Ok(PersistOutcome::Persisted(path))
    }
}

// the key ends up in a file path, so it must not escape the patch directory
fn single_component(key: &str) -> Result<&str, StoreError> {
    let bad = key.is_empty()
        || key == "."
        || key == ".."
        || key.contains(['/', '\\', '\0']);
    if bad {
        Err(StoreError::InvalidKey(key.to_string()))
    } else {
        Ok(key)
    }
}
