//! Bookkeeping for live shelters and their scheduled removal.

use bevy::prelude::*;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::Duration;
use tracing::info;

use crate::shelter::Shelter;
use crate::spawn::PlayerId;
use crate::LOG_BOXED_SPAWN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShelterRecord {
    pub owner: PlayerId,
    /// Elapsed app time at which the shelter is removed.
    pub expires_at: Duration,
}

/// Shelters spawned by the plugin, keyed by entity.
///
/// Expiry times live in a min-heap holding exactly one entry per tracked
/// shelter; forgetting or re-registering a shelter prunes its old entry.
#[derive(Resource, Debug, Default)]
pub struct ShelterRegistry {
    active: HashMap<Entity, ShelterRecord>,
    expiries: BinaryHeap<Reverse<(Duration, Entity)>>,
}

impl ShelterRegistry {
    pub fn register(&mut self, entity: Entity, owner: PlayerId, expires_at: Duration) {
        if self
            .active
            .insert(entity, ShelterRecord { owner, expires_at })
            .is_some()
        {
            self.prune_expiry(entity);
        }
        self.expiries.push(Reverse((expires_at, entity)));
    }

    /// Removes and returns every shelter due at `now`, earliest first.
    pub fn pop_expired(&mut self, now: Duration) -> Vec<Entity> {
        let mut due = Vec::new();
        while let Some(Reverse((expires_at, entity))) = self.expiries.peek().copied() {
            if expires_at > now {
                break;
            }
            self.expiries.pop();

            let current = self
                .active
                .get(&entity)
                .is_some_and(|record| record.expires_at == expires_at);
            if current {
                self.active.remove(&entity);
                due.push(entity);
            }
        }
        due
    }

    /// Drops a shelter that was destroyed by something other than the plugin.
    pub fn forget(&mut self, entity: Entity) -> Option<ShelterRecord> {
        let record = self.active.remove(&entity)?;
        self.prune_expiry(entity);
        Some(record)
    }

    fn prune_expiry(&mut self, entity: Entity) {
        self.expiries.retain(|Reverse((_, e))| *e != entity);
    }

    /// Removes every record, returning the tracked entities.
    pub fn drain(&mut self) -> Vec<Entity> {
        self.expiries.clear();
        self.active.drain().map(|(entity, _)| entity).collect()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.active.contains_key(&entity)
    }

    pub fn owner_of(&self, entity: Entity) -> Option<PlayerId> {
        self.active.get(&entity).map(|record| record.owner)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

/// Despawns shelters whose lifetime has run out.
pub fn expire_shelters(
    time: Res<Time>,
    mut registry: ResMut<ShelterRegistry>,
    shelters: Query<(), With<Shelter>>,
    mut commands: Commands,
) {
    for entity in registry.pop_expired(time.elapsed()) {
        if shelters.contains(entity) {
            commands.entity(entity).despawn();
            info!(target: LOG_BOXED_SPAWN, "Shelter {:?} expired and was removed", entity);
        }
    }
}

/// Stops tracking shelters that were despawned elsewhere.
pub fn forget_destroyed_shelters(
    mut removed: RemovedComponents<Shelter>,
    mut registry: ResMut<ShelterRegistry>,
) {
    for entity in removed.read() {
        registry.forget(entity);
    }
}

/// Removes every tracked shelter once the app is shutting down.
pub fn despawn_all_on_exit(
    mut exits: MessageReader<AppExit>,
    mut registry: ResMut<ShelterRegistry>,
    shelters: Query<(), With<Shelter>>,
    mut commands: Commands,
) {
    if exits.is_empty() {
        return;
    }
    exits.clear();

    let mut removed = 0;
    for entity in registry.drain() {
        if shelters.contains(entity) {
            commands.entity(entity).despawn();
            removed += 1;
        }
    }
    info!(target: LOG_BOXED_SPAWN, "Removed {} shelters on shutdown", removed);
}
