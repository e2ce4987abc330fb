//! Starter items placed in a fresh shelter.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StarterItem {
    /// Item short name as known to the host, e.g. `"bandage"`.
    pub short_name: String,
    pub amount: u32,
}

impl StarterItem {
    pub fn new(short_name: impl Into<String>, amount: u32) -> Self {
        Self {
            short_name: short_name.into(),
            amount,
        }
    }
}

/// Picks a random subset of `pool` that fits into `capacity` slots.
///
/// The pool is shuffled, then items are taken in order until the stash is
/// full or the pool runs out. Entries with a zero amount never take a slot.
pub fn fill_stash<R: Rng + ?Sized>(
    pool: &[StarterItem],
    capacity: usize,
    rng: &mut R,
) -> Vec<StarterItem> {
    let mut candidates: Vec<&StarterItem> = pool.iter().filter(|item| item.amount > 0).collect();
    candidates.shuffle(rng);

    let mut stash = Vec::with_capacity(capacity.min(candidates.len()));
    for item in candidates {
        if stash.len() == capacity {
            break;
        }
        stash.push(item.clone());
    }
    stash
}
