//! Boxed player spawn for game servers.
//!
//! New players that wash up on a beach are moved into a temporary, locked
//! shelter built next to their spawn point, optionally stocked with a few
//! starter items. Each player gets this once; the set of players already
//! handled is persisted across restarts.
//!
//! The plugin does not know the game world. The host inserts a
//! [`PlacementHost`] resource wrapping its terrain and physics queries, writes
//! [`PlayerRespawning`] messages and reads back [`SpawnResolved`].
//!
//! # Example
//! ```no_run
//! use bevy::prelude::*;
//! use boxed_spawn::BoxedSpawnPlugin;
//!
//! let plugin = BoxedSpawnPlugin::from_config_file(
//!     "config/boxed_spawn.ron",
//!     Some("data/boxed_spawn_players.ron".into()),
//! )?;
//!
//! App::new()
//!     .add_plugins((MinimalPlugins, plugin))
//!     .run();
//! # Ok::<(), boxed_spawn::PersistError>(())
//! ```

use bevy::prelude::*;
use std::path::{Path, PathBuf};

pub mod config;
pub mod error;
pub mod ledger;
pub mod loot;
pub mod registry;
pub mod shelter;
pub mod spawn;

pub use config::BoxedSpawnConfig;
pub use error::PersistError;
pub use ledger::{SpawnLedger, StoredData};
pub use loot::{fill_stash, StarterItem};
pub use registry::{ShelterRecord, ShelterRegistry};
pub use shelter::{DoorLock, Shelter, ShelterDoor, StarterStash};
pub use spawn::{
    PlacementHost, PlayerId, PlayerRespawning, SpawnOutcome, SpawnPoint, SpawnResolved, SpawnRng,
};

/// Tracing target used by everything in this crate.
pub const LOG_BOXED_SPAWN: &str = "boxed_spawn";

/// Shelter spawning for first-time players.
///
/// Requires a [`Time`] resource (e.g. from `MinimalPlugins`). Spawn requests
/// arriving while no [`PlacementHost`] exists are answered with
/// [`SpawnOutcome::NoHost`] and the unchanged spawn point.
#[derive(Debug, Clone, Default)]
pub struct BoxedSpawnPlugin {
    pub config: BoxedSpawnConfig,
    /// Where the spawn ledger is stored. `None` keeps it in memory.
    pub ledger_path: Option<PathBuf>,
}

impl BoxedSpawnPlugin {
    pub fn new(config: BoxedSpawnConfig) -> Self {
        Self {
            config,
            ledger_path: None,
        }
    }

    pub fn with_ledger_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ledger_path = Some(path.into());
        self
    }

    /// Builds the plugin from a RON config file, creating it if missing.
    pub fn from_config_file(
        config_path: impl AsRef<Path>,
        ledger_path: Option<PathBuf>,
    ) -> Result<Self, PersistError> {
        Ok(Self {
            config: BoxedSpawnConfig::load_or_create(config_path)?,
            ledger_path,
        })
    }
}

impl Plugin for BoxedSpawnPlugin {
    fn build(&self, app: &mut App) {
        let ledger = match &self.ledger_path {
            Some(path) => SpawnLedger::load_or_default(path),
            None => SpawnLedger::in_memory(),
        };

        app.insert_resource(self.config.clone())
            .insert_resource(SpawnRng::from_seed(self.config.rng_seed))
            .insert_resource(ledger)
            .init_resource::<ShelterRegistry>()
            .add_message::<PlayerRespawning>()
            .add_message::<SpawnResolved>()
            .configure_sets(
                Update,
                (BoxedSpawnSet::Resolve, BoxedSpawnSet::Cleanup).chain(),
            )
            .add_systems(
                Update,
                spawn::handle_spawn_requests.in_set(BoxedSpawnSet::Resolve),
            )
            .add_systems(
                Update,
                (
                    registry::forget_destroyed_shelters,
                    registry::expire_shelters,
                )
                    .chain()
                    .in_set(BoxedSpawnSet::Cleanup),
            )
            .add_systems(Last, registry::despawn_all_on_exit);
    }
}

/// System sets of the plugin, in execution order within `Update`.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum BoxedSpawnSet {
    /// Answer spawn requests and build shelters.
    Resolve,
    /// Remove expired or destroyed shelters.
    Cleanup,
}
