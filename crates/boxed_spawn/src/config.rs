//! Plugin configuration.
//!
//! Stored as a RON file next to the server's other data. A missing file is
//! replaced by the defaults, which are written back so operators have
//! something to edit.

use bevy::prelude::*;
use placement::{LayerMask, PlacementError, SearchRequest, Topology, ValidationContext};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::error::PersistError;
use crate::loot::StarterItem;
use crate::LOG_BOXED_SPAWN;

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxedSpawnConfig {
    /// Candidates tried before giving up on a shelter.
    pub max_placement_attempts: u32,
    pub min_search_radius: f32,
    /// Outer radius of the search around the original spawn point.
    pub search_radius: f32,
    pub nearby_entities_avoidance_radius: f32,
    pub rocks_avoidance_radius: f32,
    pub nearby_players_avoidance_radius: f32,
    pub ground_probe_range: f32,
    pub shelter_lifetime_secs: f32,
    pub lock_shelter_door: bool,
    /// Slots in the starter stash. Zero disables the stash.
    pub stash_capacity: usize,
    pub starter_items: Vec<StarterItem>,
    /// Fixed seed for reproducible placement; entropy when unset.
    pub rng_seed: Option<u64>,
}

impl Default for BoxedSpawnConfig {
    fn default() -> Self {
        Self {
            max_placement_attempts: 5,
            min_search_radius: 0.0,
            search_radius: 5.0,
            nearby_entities_avoidance_radius: 6.0,
            rocks_avoidance_radius: 3.0,
            nearby_players_avoidance_radius: 3.0,
            ground_probe_range: 5.0,
            shelter_lifetime_secs: 30.0,
            lock_shelter_door: true,
            stash_capacity: 6,
            starter_items: vec![
                StarterItem::new("bandage", 2),
                StarterItem::new("apple", 3),
                StarterItem::new("waterjug", 1),
                StarterItem::new("torch", 1),
                StarterItem::new("stone.pickaxe", 1),
                StarterItem::new("stonehatchet", 1),
                StarterItem::new("bow.hunting", 1),
                StarterItem::new("arrow.wooden", 12),
            ],
            rng_seed: None,
        }
    }
}

impl BoxedSpawnConfig {
    /// Loads the config, creating it with defaults if the file does not exist.
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self, PersistError> {
        let path = path.as_ref();
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            info!(target: LOG_BOXED_SPAWN, "Wrote default config to {}", path.display());
            return Ok(config);
        }

        let ron_string =
            std::fs::read_to_string(path).map_err(|e| PersistError::Io(e.to_string()))?;
        let config: Self =
            ron::from_str(&ron_string).map_err(|e| PersistError::Deserialization(e.to_string()))?;

        info!(target: LOG_BOXED_SPAWN, "Config loaded from {}", path.display());
        Ok(config)
    }

    /// Saves the config (RON format).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PersistError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| PersistError::Serialization(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| PersistError::Io(e.to_string()))?;
        }
        std::fs::write(path.as_ref(), ron_string).map_err(|e| PersistError::Io(e.to_string()))
    }

    /// Checks the search needs to run against every shelter candidate.
    pub fn validation_context(&self) -> ValidationContext {
        ValidationContext {
            required_topology: Topology::BEACH,
            obstruction_radius: self.rocks_avoidance_radius,
            entity_radius: self.nearby_entities_avoidance_radius,
            entity_layers: LayerMask::ENTITIES,
            player_radius: self.nearby_players_avoidance_radius,
            probe_range: self.ground_probe_range,
            probe_layers: LayerMask::TERRAIN,
            ..Default::default()
        }
    }

    /// How long a shelter stays before it is removed. Negative means immediately.
    pub fn shelter_lifetime(&self) -> Duration {
        Duration::try_from_secs_f32(self.shelter_lifetime_secs.max(0.0)).unwrap_or(Duration::MAX)
    }

    pub fn search_request(&self, center: Vec3) -> Result<SearchRequest, PlacementError> {
        SearchRequest::new(
            center,
            self.min_search_radius,
            self.search_radius,
            self.max_placement_attempts,
        )
    }
}
