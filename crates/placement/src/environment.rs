//! Queries the search needs from the hosting game engine.

use bevy::math::Vec3;

use crate::types::{GroundHit, HeightSurface, LayerMask, Topology};

/// Collider name fragments that mark natural rock formations.
pub const OBSTRUCTION_KEYWORDS: [&str; 3] = ["rock", "cliff", "formation"];

/// Read-only view of the game world.
///
/// Implementations must be side-effect free from the search's point of view;
/// the search may call them any number of times per attempt.
pub trait PlacementEnvironment {
    /// Height of the given surface at the horizontal location of `point`.
    fn terrain_height(&self, point: Vec3, surface: HeightSurface) -> f32;

    fn topology_at(&self, point: Vec3) -> Topology;

    /// True if an obstruction-class collider is within `radius`.
    fn obstruction_near(&self, point: Vec3, radius: f32) -> bool;

    /// True if an entity collider on `layers` is within `radius`.
    fn entity_near(&self, point: Vec3, radius: f32, layers: LayerMask) -> bool;

    /// True if a connected player is within `radius`.
    fn player_near(&self, point: Vec3, radius: f32) -> bool;

    /// Vertical linecast from `point + range` down to `point - range`.
    fn ground_probe(&self, point: Vec3, range: f32, layers: LayerMask) -> Option<GroundHit>;
}

impl<T: PlacementEnvironment + ?Sized> PlacementEnvironment for &T {
    fn terrain_height(&self, point: Vec3, surface: HeightSurface) -> f32 {
        (**self).terrain_height(point, surface)
    }

    fn topology_at(&self, point: Vec3) -> Topology {
        (**self).topology_at(point)
    }

    fn obstruction_near(&self, point: Vec3, radius: f32) -> bool {
        (**self).obstruction_near(point, radius)
    }

    fn entity_near(&self, point: Vec3, radius: f32, layers: LayerMask) -> bool {
        (**self).entity_near(point, radius, layers)
    }

    fn player_near(&self, point: Vec3, radius: f32) -> bool {
        (**self).player_near(point, radius)
    }

    fn ground_probe(&self, point: Vec3, range: f32, layers: LayerMask) -> Option<GroundHit> {
        (**self).ground_probe(point, range, layers)
    }
}

/// Classifies a collider by name, ignoring case.
///
/// Hosts that only know their colliders by prefab or mesh name can use this
/// inside [`PlacementEnvironment::obstruction_near`].
pub fn is_obstruction_collider(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    OBSTRUCTION_KEYWORDS
        .iter()
        .any(|keyword| name.contains(keyword))
}
