//! Bounded rejection sampling of placement candidates.

use bevy::math::{Quat, Vec3};
use rand::Rng;
use rand_distr::{Distribution, UnitSphere};
use tracing::{debug, trace};

use crate::context::ValidationContext;
use crate::environment::PlacementEnvironment;
use crate::error::PlacementError;
use crate::types::{HeightSurface, Placement, SearchRequest, SearchResult};
use crate::LOG_PLACEMENT;

/// One sampled candidate before validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Raw sample: `center + direction * distance`.
    pub sampled: Vec3,
    /// `sampled` with its height replaced by the surface height.
    pub position: Vec3,
}

/// Why a candidate was thrown away. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    Topology,
    Obstruction,
    Entity,
    Player,
    NoGround,
}

/// Uniformly distributed unit vector.
pub fn random_direction_on_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let [x, y, z]: [f32; 3] = UnitSphere.sample(rng);
    Vec3::new(x, y, z)
}

/// Draws one candidate from the request's shell and snaps it to `surface`.
pub fn sample_candidate<E, R>(
    request: &SearchRequest,
    surface: HeightSurface,
    env: &E,
    rng: &mut R,
) -> Candidate
where
    E: PlacementEnvironment + ?Sized,
    R: Rng + ?Sized,
{
    let direction = random_direction_on_sphere(rng);
    let distance = rng.gen_range(request.min_radius..=request.max_radius);
    let sampled = request.center + direction * distance;

    let mut position = sampled;
    position.y = env.terrain_height(sampled, surface);

    Candidate { sampled, position }
}

/// Searches for a spot near `request.center` that passes every check in `ctx`.
///
/// Each attempt samples a candidate and runs, in order and stopping at the
/// first failure: topology, obstruction, entity and player checks, then the
/// ground probe. The first candidate to get through all of them is returned.
/// Running out of attempts yields `Ok(SearchResult::NotFound)`.
///
/// # Errors
/// Returns a [`PlacementError`] if the request or context is malformed. No
/// candidate is sampled in that case.
pub fn find_suitable_position<E, R>(
    request: &SearchRequest,
    ctx: &ValidationContext,
    env: &E,
    rng: &mut R,
) -> Result<SearchResult, PlacementError>
where
    E: PlacementEnvironment + ?Sized,
    R: Rng + ?Sized,
{
    request.validate()?;
    ctx.validate()?;

    for attempt in 1..=request.max_attempts {
        let candidate = sample_candidate(request, ctx.height_surface, env, rng);

        match evaluate(candidate.position, ctx, env) {
            Ok(placement) => {
                debug!(
                    target: LOG_PLACEMENT,
                    "Found placement at {} on attempt {}/{}",
                    placement.position,
                    attempt,
                    request.max_attempts
                );
                return Ok(SearchResult::Found(placement));
            }
            Err(reason) => {
                trace!(
                    target: LOG_PLACEMENT,
                    "Attempt {}/{} rejected at {}: {:?}",
                    attempt,
                    request.max_attempts,
                    candidate.position,
                    reason
                );
            }
        }
    }

    debug!(
        target: LOG_PLACEMENT,
        "No placement found around {} after {} attempts",
        request.center,
        request.max_attempts
    );
    Ok(SearchResult::NotFound)
}

fn evaluate<E>(position: Vec3, ctx: &ValidationContext, env: &E) -> Result<Placement, Rejection>
where
    E: PlacementEnvironment + ?Sized,
{
    if !env.topology_at(position).contains(ctx.required_topology) {
        return Err(Rejection::Topology);
    }
    if env.obstruction_near(position, ctx.obstruction_radius) {
        return Err(Rejection::Obstruction);
    }
    if env.entity_near(position, ctx.entity_radius, ctx.entity_layers) {
        return Err(Rejection::Entity);
    }
    if env.player_near(position, ctx.player_radius) {
        return Err(Rejection::Player);
    }

    let hit = env
        .ground_probe(position, ctx.probe_range, ctx.probe_layers)
        .ok_or(Rejection::NoGround)?;
    let rotation = orientation_from_normal(hit.normal).ok_or(Rejection::NoGround)?;

    Ok(Placement {
        position: hit.point,
        rotation,
    })
}

/// Shortest-arc rotation taking world up onto `normal`.
///
/// `None` for zero-length or non-finite normals.
pub(crate) fn orientation_from_normal(normal: Vec3) -> Option<Quat> {
    let normal = normal.try_normalize()?;
    Some(Quat::from_rotation_arc(Vec3::Y, normal).normalize())
}
