//! Integration tests for the scene's frame-to-frame behavior.
//!
//! These exercise the public API the way the animation loop does: build a
//! scene, feed it pointer state, step it many frames, and check the
//! properties the backdrop depends on.

use glam::Vec2;
use polydrift::{Scene, SceneConfig, Shape};

// ============================================================================
// Boundary Behavior
// ============================================================================

#[test]
fn test_pool_stays_inside_overshoot_bound() {
    let mut scene = Scene::build(&SceneConfig::default(), 16.0 / 9.0);
    let bounds = scene.bounds();
    let slack: Vec<(f32, f32)> = scene
        .particles
        .iter()
        .map(|p| (p.velocity.dx.abs(), p.velocity.dy.abs()))
        .collect();

    for _ in 0..25_000 {
        scene.step(Vec2::ZERO);
        for (particle, &(sx, sy)) in scene.particles.iter().zip(&slack) {
            assert!(
                particle.position.x.abs() <= bounds + sx,
                "x escaped: {} vs {}",
                particle.position.x,
                bounds + sx
            );
            assert!(
                particle.position.y.abs() <= bounds + sy,
                "y escaped: {} vs {}",
                particle.position.y,
                bounds + sy
            );
        }
    }
}

#[test]
fn test_depth_is_never_bounded() {
    // z has no velocity component and no reflection rule: whatever depth a
    // particle spawned at, it keeps.
    let mut scene = Scene::build(&SceneConfig::default(), 1.0);
    let depths: Vec<f32> = scene.particles.iter().map(|p| p.position.z).collect();

    for _ in 0..1_000 {
        scene.step(Vec2::new(0.7, -0.3));
    }
    for (particle, z) in scene.particles.iter().zip(depths) {
        assert_eq!(particle.position.z, z);
    }
}

#[test]
fn test_velocity_magnitudes_survive_reflection() {
    let mut scene = Scene::build(&SceneConfig::default(), 1.0);
    let magnitudes: Vec<(f32, f32)> = scene
        .particles
        .iter()
        .map(|p| (p.velocity.dx.abs(), p.velocity.dy.abs()))
        .collect();

    for _ in 0..25_000 {
        scene.step(Vec2::ZERO);
    }
    for (particle, (mx, my)) in scene.particles.iter().zip(magnitudes) {
        assert!((particle.velocity.dx.abs() - mx).abs() < 1e-7);
        assert!((particle.velocity.dy.abs() - my).abs() < 1e-7);
    }
}

// ============================================================================
// Camera Motion
// ============================================================================

#[test]
fn test_camera_rests_with_centered_pointer() {
    let mut scene = Scene::build(&SceneConfig::default(), 1.0);
    for _ in 0..10_000 {
        scene.step(Vec2::ZERO);
    }
    assert_eq!(scene.camera.position.x, 0.0);
    assert_eq!(scene.camera.position.y, 0.0);
    assert_eq!(scene.camera.position.z, 5.0);
}

#[test]
fn test_camera_converges_under_held_pointer() {
    let mut scene = Scene::build(&SceneConfig::default(), 1.0);
    for _ in 0..500 {
        scene.step(Vec2::new(1.0, 1.0));
    }
    // Pointer y is screen-down, so the camera settles below center.
    assert!((scene.camera.position.x - 0.5).abs() < 1e-4);
    assert!((scene.camera.position.y + 0.5).abs() < 1e-4);
    assert_eq!(scene.camera.position.z, 5.0);
}

#[test]
fn test_camera_motion_is_independent_of_particles() {
    let config = SceneConfig {
        particle_count: 0,
        ..Default::default()
    };
    let mut empty = Scene::build(&config, 1.0);
    let mut full = Scene::build(&SceneConfig::default(), 1.0);

    for _ in 0..100 {
        empty.step(Vec2::new(-1.0, 0.5));
        full.step(Vec2::new(-1.0, 0.5));
    }
    assert_eq!(empty.camera.position, full.camera.position);
}

// ============================================================================
// Resize
// ============================================================================

#[test]
fn test_resize_updates_projection_but_not_particles() {
    let mut scene = Scene::build(&SceneConfig::default(), 800.0 / 600.0);
    for _ in 0..50 {
        scene.step(Vec2::ZERO);
    }

    let positions: Vec<_> = scene.particles.iter().map(|p| p.position).collect();
    let projection = scene.camera.projection_matrix();

    scene.camera.set_aspect(1600.0 / 900.0);

    assert_ne!(scene.camera.projection_matrix(), projection);
    assert!((scene.camera.aspect() - 1600.0 / 900.0).abs() < 1e-6);
    for (particle, position) in scene.particles.iter().zip(positions) {
        assert_eq!(particle.position, position);
    }
}

// ============================================================================
// Pool Composition
// ============================================================================

#[test]
fn test_pool_draws_from_all_three_shapes() {
    // 300 uniform draws from 3 kinds make a missing kind vanishingly
    // unlikely.
    let config = SceneConfig {
        particle_count: 300,
        ..Default::default()
    };
    let scene = Scene::build(&config, 1.0);

    for shape in Shape::ALL {
        assert!(
            scene.particles.iter().any(|p| p.shape == shape),
            "no {:?} in a 300-particle pool",
            shape
        );
    }
}

#[test]
fn test_spawned_pool_starts_inside_bounds() {
    let scene = Scene::build(&SceneConfig::default(), 1.0);
    for particle in &scene.particles {
        assert!(particle.position.x.abs() <= 5.0);
        assert!(particle.position.y.abs() <= 5.0);
        assert!(particle.position.z.abs() <= 5.0);
    }
}
