//! First-spawn interception.
//!
//! The host writes a [`PlayerRespawning`] message whenever a player is about
//! to spawn and waits for the matching [`SpawnResolved`]. For players seen
//! for the first time on a beach, the spawn is moved into a fresh shelter.

use bevy::prelude::*;
use placement::{find_suitable_position, Placement, PlacementEnvironment, PlacementError, SearchResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error, info, warn};

use crate::config::BoxedSpawnConfig;
use crate::ledger::SpawnLedger;
use crate::loot::fill_stash;
use crate::registry::ShelterRegistry;
use crate::shelter::{spawn_shelter, StarterStash};
use crate::LOG_BOXED_SPAWN;

/// Platform user id of a player.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPoint {
    pub position: Vec3,
    pub rotation: Quat,
}

/// Sent by the host before a player spawns.
#[derive(Message, Debug, Clone)]
pub struct PlayerRespawning {
    pub player: PlayerId,
    pub spawn: SpawnPoint,
}

/// Answer to a [`PlayerRespawning`]; `spawn` is where the player should appear.
#[derive(Message, Debug, Clone)]
pub struct SpawnResolved {
    pub player: PlayerId,
    pub spawn: SpawnPoint,
    pub outcome: SpawnOutcome,
    pub shelter: Option<Entity>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpawnOutcome {
    /// Player already had their first spawn.
    AlreadyConnected,
    /// Original spawn point is not on a beach.
    NotOnBeach,
    /// Every candidate around the spawn point was rejected.
    NoSuitablePosition,
    /// The configured search parameters are invalid.
    Rejected(PlacementError),
    /// No [`PlacementHost`] was available to run the search.
    NoHost,
    Relocated(Placement),
}

impl SpawnOutcome {
    pub fn is_relocated(&self) -> bool {
        matches!(self, SpawnOutcome::Relocated(_))
    }
}

/// The host's view of the game world used for placement queries.
#[derive(Resource)]
pub struct PlacementHost(Box<dyn PlacementEnvironment + Send + Sync>);

impl PlacementHost {
    pub fn new(environment: impl PlacementEnvironment + Send + Sync + 'static) -> Self {
        Self(Box::new(environment))
    }

    pub fn environment(&self) -> &(dyn PlacementEnvironment + Send + Sync) {
        self.0.as_ref()
    }
}

/// Random source for placement and starter items.
#[derive(Resource, Debug)]
pub struct SpawnRng(pub StdRng);

impl SpawnRng {
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(StdRng::seed_from_u64(seed)),
            None => Self(StdRng::from_entropy()),
        }
    }
}

/// Decides what happens to a spawn without touching the world.
pub fn resolve_spawn<E, R>(
    player: PlayerId,
    spawn: &SpawnPoint,
    config: &BoxedSpawnConfig,
    ledger: &SpawnLedger,
    env: &E,
    rng: &mut R,
) -> SpawnOutcome
where
    E: PlacementEnvironment + ?Sized,
    R: Rng + ?Sized,
{
    if ledger.has_spawned(player) {
        return SpawnOutcome::AlreadyConnected;
    }

    let ctx = config.validation_context();
    if !env.topology_at(spawn.position).contains(ctx.required_topology) {
        return SpawnOutcome::NotOnBeach;
    }

    let request = match config.search_request(spawn.position) {
        Ok(request) => request,
        Err(e) => return SpawnOutcome::Rejected(e),
    };

    match find_suitable_position(&request, &ctx, env, rng) {
        Ok(SearchResult::Found(placement)) => SpawnOutcome::Relocated(placement),
        Ok(SearchResult::NotFound) => SpawnOutcome::NoSuitablePosition,
        Err(e) => SpawnOutcome::Rejected(e),
    }
}

/// Resolves pending spawns, building shelters for first-time beach spawns.
#[allow(clippy::too_many_arguments)]
pub fn handle_spawn_requests(
    mut requests: MessageReader<PlayerRespawning>,
    mut resolved: MessageWriter<SpawnResolved>,
    mut commands: Commands,
    host: Option<Res<PlacementHost>>,
    config: Res<BoxedSpawnConfig>,
    mut ledger: ResMut<SpawnLedger>,
    mut registry: ResMut<ShelterRegistry>,
    mut rng: ResMut<SpawnRng>,
    time: Res<Time>,
) {
    let Some(host) = host else {
        for request in requests.read() {
            warn!(
                target: LOG_BOXED_SPAWN,
                "No placement host; player {} keeps the original spawn",
                request.player
            );
            resolved.write(SpawnResolved {
                player: request.player,
                spawn: request.spawn,
                outcome: SpawnOutcome::NoHost,
                shelter: None,
            });
        }
        return;
    };

    for request in requests.read() {
        let outcome = resolve_spawn(
            request.player,
            &request.spawn,
            &config,
            &ledger,
            host.environment(),
            &mut rng.0,
        );

        let mut spawn = request.spawn;
        let mut shelter = None;

        match &outcome {
            SpawnOutcome::Relocated(placement) => {
                let items = fill_stash(&config.starter_items, config.stash_capacity, &mut rng.0);
                let stash = (!items.is_empty()).then(|| StarterStash {
                    capacity: config.stash_capacity,
                    items,
                });

                let entity = spawn_shelter(
                    &mut commands,
                    *placement,
                    request.player,
                    config.lock_shelter_door,
                    stash,
                );
                registry.register(
                    entity,
                    request.player,
                    time.elapsed().saturating_add(config.shelter_lifetime()),
                );

                ledger.record(request.player);
                if let Err(e) = ledger.save() {
                    error!(target: LOG_BOXED_SPAWN, "Failed to save spawn ledger: {}", e);
                }

                spawn.position = placement.position;
                shelter = Some(entity);
                info!(
                    target: LOG_BOXED_SPAWN,
                    "Player {} spawns in shelter {:?} at {}",
                    request.player,
                    entity,
                    placement.position
                );
            }
            SpawnOutcome::Rejected(e) => {
                warn!(
                    target: LOG_BOXED_SPAWN,
                    "Shelter search for player {} rejected: {}",
                    request.player,
                    e
                );
            }
            other => {
                debug!(
                    target: LOG_BOXED_SPAWN,
                    "Player {} keeps the original spawn: {:?}",
                    request.player,
                    other
                );
            }
        }

        resolved.write(SpawnResolved {
            player: request.player,
            spawn,
            outcome,
            shelter,
        });
    }
}
