use bevy::math::Vec3;
use thiserror::Error;

/// Contract violations detected before any candidate is sampled.
///
/// Running out of attempts is not an error; see [`crate::SearchResult::NotFound`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlacementError {
    #[error("search center is not finite: {0}")]
    NonFiniteCenter(Vec3),

    #[error("invalid search radius: min {min}, max {max}")]
    InvalidRadius { min: f32, max: f32 },

    #[error("search needs at least one attempt")]
    ZeroAttempts,

    #[error("invalid {check} radius: {radius}")]
    InvalidAvoidanceRadius { check: &'static str, radius: f32 },

    #[error("invalid ground probe range: {0}")]
    InvalidProbeRange(f32),
}
