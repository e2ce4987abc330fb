//! Placement search for first-spawn shelters.
//!
//! This crate finds a ground-aligned spot near a spawn point where a small
//! structure can be placed. It knows nothing about the game engine itself:
//! terrain, colliders and players are queried through [`PlacementEnvironment`],
//! which the hosting server implements.
//!
//! # Example
//! ```no_run
//! use bevy::math::Vec3;
//! use placement::{find_suitable_position, SearchRequest, SearchResult, ValidationContext};
//! # fn host() -> Box<dyn placement::PlacementEnvironment> { unimplemented!() }
//!
//! let env = host();
//! let request = SearchRequest::new(Vec3::ZERO, 0.0, 5.0, 5)?;
//! let mut rng = rand::thread_rng();
//!
//! match find_suitable_position(&request, &ValidationContext::default(), env.as_ref(), &mut rng)? {
//!     SearchResult::Found(placement) => println!("place at {}", placement.position),
//!     SearchResult::NotFound => println!("keep the original spawn"),
//! }
//! # Ok::<(), placement::PlacementError>(())
//! ```

pub mod context;
pub mod environment;
pub mod error;
pub mod search;
pub mod types;

pub use context::ValidationContext;
pub use environment::{is_obstruction_collider, PlacementEnvironment, OBSTRUCTION_KEYWORDS};
pub use error::PlacementError;
pub use search::{find_suitable_position, random_direction_on_sphere, sample_candidate, Candidate};
pub use types::{GroundHit, HeightSurface, LayerMask, Placement, SearchRequest, SearchResult, Topology};

/// Tracing target used by everything in this crate.
pub const LOG_PLACEMENT: &str = "placement";
