//! Shelter entities handed to first-time players.

use bevy::prelude::*;
use placement::Placement;

use crate::loot::StarterItem;
use crate::spawn::PlayerId;

/// Root of a spawned shelter.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shelter {
    /// Player the shelter was built for.
    pub owner: PlayerId,
}

/// Marker for the shelter's door (child of [`Shelter`]).
#[derive(Component, Debug, Clone, Copy)]
pub struct ShelterDoor;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorLock {
    pub locked: bool,
}

/// Container with the starter items (child of [`Shelter`]).
#[derive(Component, Debug, Clone, PartialEq)]
pub struct StarterStash {
    pub capacity: usize,
    pub items: Vec<StarterItem>,
}

/// Local offset of the door from the shelter origin.
const DOOR_OFFSET: Vec3 = Vec3::new(0.0, 0.0, 1.25);

/// Spawns a shelter at `placement` with its door and, optionally, a stash.
pub fn spawn_shelter(
    commands: &mut Commands,
    placement: Placement,
    owner: PlayerId,
    lock_door: bool,
    stash: Option<StarterStash>,
) -> Entity {
    let mut shelter = commands.spawn((
        Shelter { owner },
        Transform::from_translation(placement.position).with_rotation(placement.rotation),
        Name::new("Shelter"),
    ));

    shelter.with_children(|parent| {
        parent.spawn((
            ShelterDoor,
            DoorLock { locked: lock_door },
            Transform::from_translation(DOOR_OFFSET),
            Name::new("Shelter Door"),
        ));

        if let Some(stash) = stash {
            parent.spawn((stash, Transform::default(), Name::new("Starter Stash")));
        }
    });

    shelter.id()
}
