//! Snapshot of the repository between process runs
//!
//! The in-memory store is the source of truth while a process lives; the
//! snapshot lets consecutive CLI invocations observe earlier aggregates.
//! One JSON file, one rotating backup of the previous generation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::{ControlError, Result};
use crate::record::InfrastructureRecord;

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    records: Vec<InfrastructureRecord>,
}

pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".backup");
        PathBuf::from(name)
    }

    /// Load the last saved records; a missing file is an empty store.
    pub async fn load(&self) -> Result<Vec<InfrastructureRecord>> {
        if !self.path.exists() {
            tracing::debug!("Snapshot not found, starting empty");
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).await?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;

        if snapshot.version > SNAPSHOT_VERSION {
            return Err(ControlError::Snapshot(format!(
                "snapshot version {} is newer than supported version {}",
                snapshot.version, SNAPSHOT_VERSION
            )));
        }

        tracing::debug!("Loaded snapshot with {} records", snapshot.records.len());
        Ok(snapshot.records)
    }

    /// Save all records, rotating the previous file to `.backup` first.
    pub async fn save(&self, records: Vec<InfrastructureRecord>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if self.path.exists() {
            let backup = self.backup_path();
            if backup.exists() {
                fs::remove_file(&backup).await?;
            }
            fs::rename(&self.path, &backup).await?;
        }

        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            records,
        };
        let content = serde_json::to_string_pretty(&snapshot)?;
        fs::write(&self.path, content).await?;

        tracing::debug!("Saved snapshot with {} records", snapshot.records.len());
        Ok(())
    }
}
