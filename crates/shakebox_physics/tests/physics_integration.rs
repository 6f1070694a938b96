//! Integration tests for the sandbox physics
//!
//! These tests drive the full spawn → shake → step loop the application
//! runs every frame and check the observable outcomes:
//! 1. Objects dropped in the box come to rest on the floor
//! 2. Shaking never lets an object escape the walls
//! 3. Clearing releases every engine handle

use rand::rngs::StdRng;
use rand::SeedableRng;
use shakebox_physics::{PhysicsConfig, PhysicsSettings, PhysicsWorld, ShapeKind};

const FRAME: f32 = 1.0 / 60.0;

fn sandbox() -> PhysicsWorld {
    let mut world = PhysicsWorld::with_config(PhysicsConfig::default());
    world.create_boundary_walls();
    world
}

fn inside_box(world: &PhysicsWorld, translation: [f32; 3]) -> bool {
    let limit = world.config().boundary_size;
    translation.iter().all(|c| c.abs() < limit)
}

// ==================== Settling ====================

#[test]
fn test_dropped_objects_land_on_floor() {
    let mut world = sandbox();
    let settings = PhysicsSettings::default();
    let cube = world.spawn(ShapeKind::Cube, [0.0, 2.0, 0.0], &settings);
    let sphere = world.spawn(ShapeKind::Sphere, [2.0, 2.0, 0.0], &settings);

    // Five simulated seconds
    for _ in 0..300 {
        world.step(FRAME);
    }

    let floor = -world.config().boundary_size + world.config().wall_thickness * 0.5;
    for key in [cube, sphere] {
        let y = world.transform(key).unwrap().translation[1];
        assert!(y > floor, "object sank through the floor: y = {}", y);
        assert!(y < floor + 1.0, "object did not land: y = {}", y);
    }
}

// ==================== Shaking ====================

#[test]
fn test_shaking_keeps_objects_inside_walls() {
    let mut world = sandbox();
    let settings = PhysicsSettings::default();
    let mut rng = StdRng::seed_from_u64(2024);

    for (i, kind) in ShapeKind::ALL.iter().enumerate() {
        world.spawn(*kind, [i as f32 - 1.5, 2.0, 0.0], &settings);
    }

    for frame in 0..240 {
        if frame % 20 == 0 {
            let direction = if frame % 40 == 0 { 1.0 } else { -1.0 };
            world.apply_shake([25.0 * direction, -15.0 * direction], &settings, &mut rng);
        }
        world.step(FRAME);
    }

    for (object, transform) in world.object_transforms() {
        assert!(
            inside_box(&world, transform.translation),
            "{} escaped to {:?}",
            object.kind.label(),
            transform.translation
        );
    }
}

#[test]
fn test_shake_speed_is_capped_after_step() {
    let mut world = sandbox();
    let settings = PhysicsSettings::default();
    let key = world.spawn(ShapeKind::Cube, [0.0, 0.0, 0.0], &settings);
    let mut rng = StdRng::seed_from_u64(11);

    // A violent drag: impulse far beyond the speed cap
    world.apply_shake([200.0, 0.0], &settings, &mut rng);
    world.step(0.0);

    let v = world.linear_velocity(key).unwrap();
    let speed = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    assert!(speed <= world.config().limits.max_linear + 1e-3);
}

// ==================== Bookkeeping ====================

#[test]
fn test_clear_releases_all_handles() {
    let mut world = sandbox();
    let settings = PhysicsSettings::default();
    let walls_bodies = world.body_count();
    let walls_colliders = world.collider_count();

    let keys: Vec<_> = (0..8)
        .map(|i| world.spawn(ShapeKind::ALL[i % 4], [0.0, i as f32 * 0.5, 0.0], &settings))
        .collect();
    world.step(FRAME);

    assert_eq!(world.clear_objects(), keys.len());
    assert_eq!(world.body_count(), walls_bodies);
    assert_eq!(world.collider_count(), walls_colliders);
    for key in keys {
        assert!(world.get_object(key).is_none());
    }
}

#[test]
fn test_settings_changes_only_affect_new_objects() {
    let mut world = sandbox();
    let mut settings = PhysicsSettings::default();
    let first = world.spawn(ShapeKind::Cube, [0.0, 0.0, 0.0], &settings);

    settings.cube_color = [0.0, 0.0, 1.0];
    let second = world.spawn(ShapeKind::Cube, [1.0, 0.0, 0.0], &settings);

    assert_eq!(world.get_object(first).unwrap().color, [0.8, 0.3, 0.2]);
    assert_eq!(world.get_object(second).unwrap().color, [0.0, 0.0, 1.0]);
}
