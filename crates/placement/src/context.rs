//! Validation settings applied to every candidate.

use crate::error::PlacementError;
use crate::types::{HeightSurface, LayerMask, Topology};

/// Predicates and radii a candidate has to satisfy.
///
/// Supplied by the caller for each search and only ever borrowed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationContext {
    /// Topology the candidate must lie on.
    pub required_topology: Topology,
    /// No rock, cliff or formation collider inside this radius.
    pub obstruction_radius: f32,
    /// No entity on `entity_layers` inside this radius.
    pub entity_radius: f32,
    pub entity_layers: LayerMask,
    /// No connected player inside this radius.
    pub player_radius: f32,
    /// Half-length of the vertical ground probe.
    pub probe_range: f32,
    pub probe_layers: LayerMask,
    pub height_surface: HeightSurface,
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self {
            required_topology: Topology::BEACH,
            obstruction_radius: 3.0,
            entity_radius: 6.0,
            entity_layers: LayerMask::ENTITIES,
            player_radius: 3.0,
            probe_range: 5.0,
            probe_layers: LayerMask::TERRAIN,
            height_surface: HeightSurface::Terrain,
        }
    }
}

impl ValidationContext {
    pub fn validate(&self) -> Result<(), PlacementError> {
        for (check, radius) in [
            ("obstruction", self.obstruction_radius),
            ("entity", self.entity_radius),
            ("player", self.player_radius),
        ] {
            if !radius.is_finite() || radius < 0.0 {
                return Err(PlacementError::InvalidAvoidanceRadius { check, radius });
            }
        }
        if !self.probe_range.is_finite() || self.probe_range <= 0.0 {
            return Err(PlacementError::InvalidProbeRange(self.probe_range));
        }
        Ok(())
    }
}
