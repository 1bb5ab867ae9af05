use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use crate::models::{PatientError, ProfileExtras};

/// File-backed key-value store for profile extras, keyed by user id.
///
/// The whole map is read and rewritten on every mutation; the file stays
/// small enough that this is simpler than anything incremental.
pub struct LocalProfileStore {
    path: PathBuf,
}

impl LocalProfileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn get(&self, user_id: Uuid) -> Result<Option<ProfileExtras>, PatientError> {
        Ok(self.read_all()?.remove(&user_id.to_string()))
    }

    pub fn put(&self, user_id: Uuid, extras: ProfileExtras) -> Result<(), PatientError> {
        let mut all = self.read_all()?;
        all.insert(user_id.to_string(), extras);
        self.write_all(&all)?;
        debug!("Stored profile extras for user {}", user_id);
        Ok(())
    }

    pub fn remove(&self, user_id: Uuid) -> Result<(), PatientError> {
        let mut all = self.read_all()?;
        if all.remove(&user_id.to_string()).is_some() {
            self.write_all(&all)?;
        }
        Ok(())
    }

    fn read_all(&self) -> Result<BTreeMap<String, ProfileExtras>, PatientError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|e| PatientError::Sidecar(e.to_string()))
    }

    fn write_all(&self, all: &BTreeMap<String, ProfileExtras>) -> Result<(), PatientError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(all)
            .map_err(|e| PatientError::Sidecar(e.to_string()))?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}
