//! Persistence hooks.
//!
//! The owner of an [`AgendaState`] calls [`Persist::persist`] after every
//! mutation with the full tree. Where and how it is written is up to the
//! implementation: [`crate::db::Database`] writes SQLite, [`SnapshotFile`]
//! writes the JSON snapshot format.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::models::AgendaState;
use crate::snapshot;

pub trait Persist {
    fn persist(&self, state: &AgendaState) -> Result<()>;
}

/// Keeps the state as a JSON snapshot on disk.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Read the snapshot back. A missing file is an empty state.
    pub fn load(&self) -> Result<AgendaState> {
        if !self.path.exists() {
            return Ok(AgendaState::default());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let state = snapshot::import(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;
        Ok(state)
    }
}

impl Persist for SnapshotFile {
    fn persist(&self, state: &AgendaState) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create snapshot directory")?;
        }

        let content = snapshot::export(state)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}
