//! Behaviour of the placement search against a scripted world.

use std::cell::Cell;

use bevy::math::{Quat, Vec3};
use placement::{
    find_suitable_position, sample_candidate, GroundHit, HeightSurface, LayerMask,
    PlacementEnvironment, PlacementError, SearchRequest, SearchResult, Topology,
    ValidationContext,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use test_log::test;

/// World whose answers are fixed up front and whose queries are counted.
struct ScriptedWorld {
    height: f32,
    /// Topology checks (1-based) from which the candidate is on the beach.
    beach_from_check: Option<u32>,
    obstructed: bool,
    crowded: bool,
    player_nearby: bool,
    hit: Option<GroundHit>,

    height_calls: Cell<u32>,
    topology_calls: Cell<u32>,
    obstruction_calls: Cell<u32>,
    entity_calls: Cell<u32>,
    player_calls: Cell<u32>,
    probe_calls: Cell<u32>,
}

impl Default for ScriptedWorld {
    fn default() -> Self {
        Self {
            height: 1.0,
            beach_from_check: Some(1),
            obstructed: false,
            crowded: false,
            player_nearby: false,
            hit: Some(GroundHit {
                point: Vec3::new(0.0, 1.0, 0.0),
                normal: Vec3::Y,
            }),
            height_calls: Cell::new(0),
            topology_calls: Cell::new(0),
            obstruction_calls: Cell::new(0),
            entity_calls: Cell::new(0),
            player_calls: Cell::new(0),
            probe_calls: Cell::new(0),
        }
    }
}

fn bump(counter: &Cell<u32>) -> u32 {
    counter.set(counter.get() + 1);
    counter.get()
}

impl PlacementEnvironment for ScriptedWorld {
    fn terrain_height(&self, _point: Vec3, _surface: HeightSurface) -> f32 {
        bump(&self.height_calls);
        self.height
    }

    fn topology_at(&self, _point: Vec3) -> Topology {
        let call = bump(&self.topology_calls);
        match self.beach_from_check {
            Some(first) if call >= first => Topology::BEACH | Topology::BEACHSIDE,
            _ => Topology::FOREST,
        }
    }

    fn obstruction_near(&self, _point: Vec3, _radius: f32) -> bool {
        bump(&self.obstruction_calls);
        self.obstructed
    }

    fn entity_near(&self, _point: Vec3, _radius: f32, layers: LayerMask) -> bool {
        assert_eq!(layers, LayerMask::ENTITIES);
        bump(&self.entity_calls);
        self.crowded
    }

    fn player_near(&self, _point: Vec3, _radius: f32) -> bool {
        bump(&self.player_calls);
        self.player_nearby
    }

    fn ground_probe(&self, _point: Vec3, range: f32, layers: LayerMask) -> Option<GroundHit> {
        assert_eq!(layers, LayerMask::TERRAIN);
        assert!(range > 0.0);
        bump(&self.probe_calls);
        self.hit
    }
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(0x5EED)
}

fn request(max_attempts: u32) -> SearchRequest {
    SearchRequest::new(Vec3::ZERO, 0.0, 5.0, max_attempts).unwrap()
}

#[test]
fn single_attempt_off_beach_is_not_found() {
    let world = ScriptedWorld {
        beach_from_check: None,
        ..Default::default()
    };

    let result =
        find_suitable_position(&request(1), &ValidationContext::default(), &world, &mut rng())
            .unwrap();

    assert_eq!(result, SearchResult::NotFound);
    assert_eq!(world.topology_calls.get(), 1);
}

#[test]
fn third_candidate_is_accepted() {
    let world = ScriptedWorld {
        beach_from_check: Some(3),
        hit: Some(GroundHit {
            point: Vec3::new(2.0, 1.0, 3.0),
            normal: Vec3::new(0.0, 1.0, 0.0),
        }),
        ..Default::default()
    };

    let result =
        find_suitable_position(&request(5), &ValidationContext::default(), &world, &mut rng())
            .unwrap();

    let placement = result.placement().expect("third candidate should pass");
    assert_eq!(placement.position, Vec3::new(2.0, 1.0, 3.0));
    assert!(placement.rotation.abs_diff_eq(Quat::IDENTITY, 1e-6));

    // Remaining attempts are left unused.
    assert_eq!(world.topology_calls.get(), 3);
    assert_eq!(world.height_calls.get(), 3);
    assert_eq!(world.probe_calls.get(), 1);
}

#[test]
fn always_valid_world_succeeds_on_first_attempt() {
    let world = ScriptedWorld::default();

    let result =
        find_suitable_position(&request(5), &ValidationContext::default(), &world, &mut rng())
            .unwrap();

    assert!(result.is_found());
    assert_eq!(world.topology_calls.get(), 1);
    assert_eq!(world.probe_calls.get(), 1);
}

#[test]
fn no_beach_exhausts_every_attempt() {
    let world = ScriptedWorld {
        beach_from_check: None,
        ..Default::default()
    };

    let result =
        find_suitable_position(&request(7), &ValidationContext::default(), &world, &mut rng())
            .unwrap();

    assert_eq!(result, SearchResult::NotFound);
    assert_eq!(world.topology_calls.get(), 7);
    assert_eq!(world.obstruction_calls.get(), 0);
    assert_eq!(world.probe_calls.get(), 0);
}

#[test]
fn missing_ground_rejects_each_attempt() {
    let world = ScriptedWorld {
        hit: None,
        ..Default::default()
    };

    let result =
        find_suitable_position(&request(4), &ValidationContext::default(), &world, &mut rng())
            .unwrap();

    assert_eq!(result, SearchResult::NotFound);
    assert_eq!(world.topology_calls.get(), 4);
    assert_eq!(world.probe_calls.get(), 4);
}

#[test]
fn degenerate_ground_normal_counts_as_miss() {
    let world = ScriptedWorld {
        hit: Some(GroundHit {
            point: Vec3::ZERO,
            normal: Vec3::ZERO,
        }),
        ..Default::default()
    };

    let result =
        find_suitable_position(&request(2), &ValidationContext::default(), &world, &mut rng())
            .unwrap();

    assert_eq!(result, SearchResult::NotFound);
    assert_eq!(world.probe_calls.get(), 2);
}

#[test]
fn obstruction_short_circuits_later_checks() {
    let world = ScriptedWorld {
        obstructed: true,
        ..Default::default()
    };

    let result =
        find_suitable_position(&request(3), &ValidationContext::default(), &world, &mut rng())
            .unwrap();

    assert_eq!(result, SearchResult::NotFound);
    assert_eq!(world.obstruction_calls.get(), 3);
    assert_eq!(world.entity_calls.get(), 0);
    assert_eq!(world.player_calls.get(), 0);
    assert_eq!(world.probe_calls.get(), 0);
}

#[test]
fn nearby_entity_short_circuits_player_and_probe() {
    let world = ScriptedWorld {
        crowded: true,
        ..Default::default()
    };

    find_suitable_position(&request(2), &ValidationContext::default(), &world, &mut rng())
        .unwrap();

    assert_eq!(world.entity_calls.get(), 2);
    assert_eq!(world.player_calls.get(), 0);
    assert_eq!(world.probe_calls.get(), 0);
}

#[test]
fn nearby_player_skips_ground_probe() {
    let world = ScriptedWorld {
        player_nearby: true,
        ..Default::default()
    };

    let result =
        find_suitable_position(&request(2), &ValidationContext::default(), &world, &mut rng())
            .unwrap();

    assert_eq!(result, SearchResult::NotFound);
    assert_eq!(world.player_calls.get(), 2);
    assert_eq!(world.probe_calls.get(), 0);
}

#[test]
fn sloped_ground_tilts_the_placement() {
    let normal = Vec3::new(0.4, 1.0, 0.1).normalize();
    let world = ScriptedWorld {
        hit: Some(GroundHit {
            point: Vec3::new(1.0, 0.5, -1.0),
            normal,
        }),
        ..Default::default()
    };

    let placement =
        find_suitable_position(&request(1), &ValidationContext::default(), &world, &mut rng())
            .unwrap()
            .placement()
            .unwrap();

    assert!(placement.rotation.is_normalized());
    assert!((placement.rotation * Vec3::Y).dot(normal) > 1.0 - 1e-5);
}

#[test]
fn inverted_radii_are_rejected_before_sampling() {
    let world = ScriptedWorld::default();
    let request = SearchRequest {
        center: Vec3::ZERO,
        min_radius: 3.0,
        max_radius: 1.0,
        max_attempts: 5,
    };

    let err = find_suitable_position(&request, &ValidationContext::default(), &world, &mut rng())
        .unwrap_err();

    assert_eq!(err, PlacementError::InvalidRadius { min: 3.0, max: 1.0 });
    assert_eq!(world.height_calls.get(), 0);
    assert_eq!(world.topology_calls.get(), 0);
}

#[test]
fn unbounded_radius_is_rejected_before_sampling() {
    let world = ScriptedWorld::default();
    let huge = SearchRequest {
        center: Vec3::ZERO,
        min_radius: 0.0,
        max_radius: f32::MAX,
        max_attempts: 3,
    };

    let err = find_suitable_position(&huge, &ValidationContext::default(), &world, &mut rng())
        .unwrap_err();

    assert_eq!(
        err,
        PlacementError::InvalidRadius {
            min: 0.0,
            max: f32::MAX
        }
    );
    assert_eq!(world.height_calls.get(), 0);
}

#[test]
fn invalid_context_is_rejected_before_sampling() {
    let world = ScriptedWorld::default();
    let ctx = ValidationContext {
        entity_radius: f32::NAN,
        ..Default::default()
    };

    let err = find_suitable_position(&request(3), &ctx, &world, &mut rng()).unwrap_err();

    assert!(matches!(
        err,
        PlacementError::InvalidAvoidanceRadius { check: "entity", .. }
    ));
    assert_eq!(world.height_calls.get(), 0);
}

#[test]
fn samples_stay_inside_the_shell() {
    let world = ScriptedWorld {
        height: -2.5,
        ..Default::default()
    };
    let center = Vec3::new(10.0, 4.0, -6.0);
    let request = SearchRequest::new(center, 3.0, 5.0, 1).unwrap();
    let mut rng = rng();

    for _ in 0..500 {
        let candidate = sample_candidate(&request, HeightSurface::Terrain, &world, &mut rng);
        let distance = (candidate.sampled - center).length();

        assert!(
            (3.0_f32 - 1e-4..=5.0 + 1e-4).contains(&distance),
            "sample at distance {distance}"
        );
        assert_eq!(candidate.position.x, candidate.sampled.x);
        assert_eq!(candidate.position.z, candidate.sampled.z);
        assert_eq!(candidate.position.y, -2.5);
    }
}

#[test]
fn zero_radius_samples_the_center() {
    let world = ScriptedWorld::default();
    let center = Vec3::new(1.0, 2.0, 3.0);
    let request = SearchRequest::new(center, 0.0, 0.0, 1).unwrap();

    let candidate = sample_candidate(&request, HeightSurface::Water, &world, &mut rng());

    assert!(candidate.sampled.abs_diff_eq(center, 1e-6));
    assert_eq!(candidate.position, Vec3::new(1.0, 1.0, 3.0));
}
