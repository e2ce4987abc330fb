//! Players that already received their first spawn.
//!
//! The set survives restarts: it is written to a RON file after every change,
//! so a player only ever gets one shelter.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::PersistError;
use crate::spawn::PlayerId;
use crate::LOG_BOXED_SPAWN;

/// On-disk layout of the ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredData {
    pub previously_connected_players: HashSet<PlayerId>,
}

#[derive(Resource, Debug, Default)]
pub struct SpawnLedger {
    data: StoredData,
    /// `None` keeps the ledger in memory only.
    path: Option<PathBuf>,
}

impl SpawnLedger {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads the ledger from `path`, starting empty if it is missing or unreadable.
    ///
    /// An unreadable file is moved aside to `<path>.bak` so the next save does
    /// not destroy it.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            match Self::read(&path) {
                Ok(data) => {
                    info!(
                        target: LOG_BOXED_SPAWN,
                        "Spawn ledger loaded from {}: {} players",
                        path.display(),
                        data.previously_connected_players.len()
                    );
                    data
                }
                Err(e) => {
                    warn!(
                        target: LOG_BOXED_SPAWN,
                        "Could not read spawn ledger {}: {}. Starting empty.",
                        path.display(),
                        e
                    );
                    Self::move_aside(&path);
                    StoredData::default()
                }
            }
        } else {
            StoredData::default()
        };

        Self {
            data,
            path: Some(path),
        }
    }

    fn move_aside(path: &Path) {
        let backup = Self::backup_path(path);
        match std::fs::rename(path, &backup) {
            Ok(()) => warn!(
                target: LOG_BOXED_SPAWN,
                "Kept unreadable spawn ledger as {}",
                backup.display()
            ),
            Err(e) => warn!(
                target: LOG_BOXED_SPAWN,
                "Could not move unreadable spawn ledger to {}: {}",
                backup.display(),
                e
            ),
        }
    }

    /// `players.ron` becomes `players.ron.bak`.
    pub fn backup_path(path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_owned();
        name.push(".bak");
        PathBuf::from(name)
    }

    fn read(path: &Path) -> Result<StoredData, PersistError> {
        let ron_string =
            std::fs::read_to_string(path).map_err(|e| PersistError::Io(e.to_string()))?;
        ron::from_str(&ron_string).map_err(|e| PersistError::Deserialization(e.to_string()))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn has_spawned(&self, player: PlayerId) -> bool {
        self.data.previously_connected_players.contains(&player)
    }

    /// Records `player`. Returns `false` if they were already known.
    pub fn record(&mut self, player: PlayerId) -> bool {
        self.data.previously_connected_players.insert(player)
    }

    pub fn len(&self) -> usize {
        self.data.previously_connected_players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.previously_connected_players.is_empty()
    }

    /// Writes the ledger to its file. No-op for in-memory ledgers.
    pub fn save(&self) -> Result<(), PersistError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let ron_string = ron::ser::to_string_pretty(&self.data, ron::ser::PrettyConfig::default())
            .map_err(|e| PersistError::Serialization(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PersistError::Io(e.to_string()))?;
        }
        std::fs::write(path, ron_string).map_err(|e| PersistError::Io(e.to_string()))
    }
}
