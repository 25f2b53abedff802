//! Lock-guarded store with transactional mutation

use super::state::LeagueState;
use crate::error::{LeagueError, Result};
use std::path::Path;
use std::sync::RwLock;
use tracing::{debug, info};

/// In-memory league store.
///
/// Every mutation goes through [`LeagueStore::transaction`], which holds the
/// write lock for the whole read-modify-write and works on a copy of the
/// state that only replaces the committed one when the closure succeeds.
#[derive(Debug, Default)]
pub struct LeagueStore {
    state: RwLock<LeagueState>,
}

impl LeagueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: LeagueState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Run a read-only query against a consistent view of the state
    pub fn read<T>(&self, query: impl FnOnce(&LeagueState) -> T) -> Result<T> {
        let state = self
            .state
            .read()
            .map_err(|_| LeagueError::internal("Failed to acquire league read lock"))?;
        Ok(query(&state))
    }

    /// Run a mutation atomically: either every change in `mutation` becomes
    /// visible or none does.
    ///
    /// The working copy is a full clone taken under the write lock, so each
    /// write costs time linear in the league size. A recreational league stays
    /// in the low thousands of rows; an undo log becomes worthwhile past that.
    pub fn transaction<T>(
        &self,
        mutation: impl FnOnce(&mut LeagueState) -> Result<T>,
    ) -> Result<T> {
        let mut state = self
            .state
            .write()
            .map_err(|_| LeagueError::internal("Failed to acquire league write lock"))?;

        let mut working = state.clone();
        match mutation(&mut working) {
            Ok(value) => {
                *state = working;
                Ok(value)
            }
            Err(e) => {
                debug!("Transaction rolled back: {}", e);
                Err(e)
            }
        }
    }

    /// Copy of the full state
    pub fn snapshot(&self) -> Result<LeagueState> {
        self.read(|state| state.clone())
    }

    pub fn to_json(&self) -> Result<String> {
        let state = self.snapshot()?;
        serde_json::to_string_pretty(&state)
            .map_err(|e| LeagueError::internal(format!("Failed to serialize league state: {}", e)))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let state: LeagueState = serde_json::from_str(json)
            .map_err(|e| LeagueError::internal(format!("Failed to parse league snapshot: {}", e)))?;
        Ok(Self::with_state(state))
    }

    /// Write the state to a JSON snapshot file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| {
            LeagueError::internal(format!("Failed to write snapshot {}: {}", path.display(), e))
        })?;
        info!("Saved league snapshot to {}", path.display());
        Ok(())
    }

    /// Load a store from a JSON snapshot file
    pub fn load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            LeagueError::internal(format!("Failed to read snapshot {}: {}", path.display(), e))
        })?;
        let store = Self::from_json(&json)?;
        info!("Loaded league snapshot from {}", path.display());
        Ok(store)
    }
}
