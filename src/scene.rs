//! Scene construction and the per-frame update step.
//!
//! A [`Scene`] is the caller-owned world: the particle pool, the camera and
//! the light rig. Nothing here is global; two scenes coexist and tear down
//! independently.

use glam::Vec2;

use crate::camera::Camera;
use crate::lighting::LightRig;
use crate::particle::Particle;

/// Knobs for building a scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    /// Size of the particle pool, fixed for the scene's lifetime.
    pub particle_count: usize,
    /// Half-extent of the soft bounding box on x and y.
    pub bounds: f32,
    /// Camera displacement at full pointer deflection, in world units.
    pub parallax: f32,
    /// Easing coefficient of the camera's low-pass filter.
    pub ease: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            particle_count: 15,
            bounds: 6.0,
            parallax: 0.5,
            ease: 0.05,
        }
    }
}

/// The built world: particle pool, camera and lights.
#[derive(Debug, Clone)]
pub struct Scene {
    pub particles: Vec<Particle>,
    pub camera: Camera,
    pub lights: LightRig,
    bounds: f32,
}

impl Scene {
    /// Build a scene with a randomized pool.
    ///
    /// Camera, lights and pool size are deterministic; per-particle pose and
    /// drift come from a non-seeded source.
    pub fn build(config: &SceneConfig, aspect: f32) -> Self {
        let mut rng = rand::thread_rng();
        let particles = (0..config.particle_count)
            .map(|_| Particle::spawn(&mut rng))
            .collect();

        let mut camera = Camera::new(aspect);
        camera.parallax = config.parallax;
        camera.ease = config.ease;

        Self {
            particles,
            camera,
            lights: LightRig::backdrop(),
            bounds: config.bounds,
        }
    }

    /// Half-extent of the bounding box.
    pub fn bounds(&self) -> f32 {
        self.bounds
    }

    /// Advance the world by one frame.
    ///
    /// Order per frame: integrate each particle's drift, reflect it off the
    /// bounding box, then ease the camera toward the pointer target. The
    /// view matrix re-aims at the origin when the renderer asks for it.
    pub fn step(&mut self, pointer: Vec2) {
        for particle in &mut self.particles {
            particle.integrate();
            particle.reflect(self.bounds);
        }
        self.camera.ease_toward(pointer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_size_is_fixed() {
        let scene = Scene::build(&SceneConfig::default(), 1.0);
        assert_eq!(scene.particles.len(), 15);

        let small = Scene::build(
            &SceneConfig {
                particle_count: 3,
                ..Default::default()
            },
            1.0,
        );
        assert_eq!(small.particles.len(), 3);
    }

    #[test]
    fn test_step_keeps_pool_in_bounds() {
        let mut scene = Scene::build(&SceneConfig::default(), 1.0);
        let slack: Vec<(f32, f32)> = scene
            .particles
            .iter()
            .map(|p| (p.velocity.dx.abs(), p.velocity.dy.abs()))
            .collect();

        for _ in 0..10_000 {
            scene.step(Vec2::ZERO);
            for (particle, (sx, sy)) in scene.particles.iter().zip(&slack) {
                assert!(particle.position.x.abs() <= 6.0 + sx);
                assert!(particle.position.y.abs() <= 6.0 + sy);
            }
        }
    }

    #[test]
    fn test_config_reaches_camera() {
        let scene = Scene::build(
            &SceneConfig {
                parallax: 0.8,
                ease: 0.1,
                ..Default::default()
            },
            1.0,
        );
        assert_eq!(scene.camera.parallax, 0.8);
        assert_eq!(scene.camera.ease, 0.1);
    }

    #[test]
    fn test_scenes_do_not_share_state() {
        let mut a = Scene::build(&SceneConfig::default(), 1.0);
        let b = Scene::build(&SceneConfig::default(), 1.0);
        let b_camera = b.camera.clone();

        for _ in 0..50 {
            a.step(Vec2::new(1.0, 0.0));
        }
        assert_eq!(b.camera, b_camera);
    }
}
