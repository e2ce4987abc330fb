//! Value types shared by the search and its callers.

use bevy::math::{Quat, Vec3};

use crate::error::PlacementError;

bitflags::bitflags! {
    /// Terrain classification flags reported by the host at a location.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Topology: u32 {
        const FIELD = 1 << 0;
        const CLIFF = 1 << 1;
        const SUMMIT = 1 << 2;
        const BEACHSIDE = 1 << 3;
        /// Sandy shoreline; new players wash up here.
        const BEACH = 1 << 4;
        const FOREST = 1 << 5;
        const FORESTSIDE = 1 << 6;
        const OCEAN = 1 << 7;
        const OCEANSIDE = 1 << 8;
        const DECOR = 1 << 9;
        const MONUMENT = 1 << 10;
        const ROAD = 1 << 11;
        const ROADSIDE = 1 << 12;
        const SWAMP = 1 << 13;
        const RIVER = 1 << 14;
        const RIVERSIDE = 1 << 15;
        const LAKE = 1 << 16;
        const LAKESIDE = 1 << 17;
    }
}

bitflags::bitflags! {
    /// Collision layers used to filter physics queries.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LayerMask: u32 {
        const DEPLOYED = 1 << 8;
        const WORLD = 1 << 16;
        const PLAYER_SERVER = 1 << 17;
        const CONSTRUCTION = 1 << 21;
        const TERRAIN = 1 << 23;
        /// Everything a player or another structure could be standing on.
        const ENTITIES = Self::DEPLOYED.bits()
            | Self::CONSTRUCTION.bits()
            | Self::PLAYER_SERVER.bits();
    }
}

/// Which surface a sampled candidate is snapped to before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeightSurface {
    #[default]
    Terrain,
    Water,
}

/// Contact reported by a ground probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundHit {
    pub point: Vec3,
    pub normal: Vec3,
}

/// A validated spot: where to put the structure and how to tilt it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    /// Rotation taking world up onto the ground normal. Always normalized.
    pub rotation: Quat,
}

/// Outcome of one search. `NotFound` is an ordinary result, not a failure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchResult {
    Found(Placement),
    NotFound,
}

impl SearchResult {
    pub fn placement(&self) -> Option<Placement> {
        match self {
            SearchResult::Found(placement) => Some(*placement),
            SearchResult::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchResult::Found(_))
    }
}

/// Parameters of a single search around `center`.
///
/// Candidates are drawn from the shell between `min_radius` and `max_radius`;
/// with `min_radius == 0` that is a full ball.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchRequest {
    pub center: Vec3,
    pub min_radius: f32,
    pub max_radius: f32,
    pub max_attempts: u32,
}

impl SearchRequest {
    /// Builds a request, rejecting contract violations up front.
    pub fn new(
        center: Vec3,
        min_radius: f32,
        max_radius: f32,
        max_attempts: u32,
    ) -> Result<Self, PlacementError> {
        let request = Self {
            center,
            min_radius,
            max_radius,
            max_attempts,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), PlacementError> {
        if !self.center.is_finite() {
            return Err(PlacementError::NonFiniteCenter(self.center));
        }
        if !self.min_radius.is_finite()
            || !self.max_radius.is_finite()
            || self.min_radius < 0.0
            || self.max_radius < self.min_radius
            // The sampler scales the width slightly above 1; keep headroom for it.
            || !((self.max_radius - self.min_radius) * 2.0).is_finite()
            || !(self.center.abs() + Vec3::splat(self.max_radius)).is_finite()
        {
            return Err(PlacementError::InvalidRadius {
                min: self.min_radius,
                max: self.max_radius,
            });
        }
        if self.max_attempts == 0 {
            return Err(PlacementError::ZeroAttempts);
        }
        Ok(())
    }
}
