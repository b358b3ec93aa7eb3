//! The animated particle pool.
//!
//! A particle is one floating polyhedron: a shape kind, a pose, a drift
//! velocity, and its own material instance. Particles are created once at
//! scene build time and mutated every frame until the scene is torn down.

use glam::{EulerRot, Mat4, Vec3};
use rand::Rng;

use crate::lighting::hex_color;
use crate::mesh::Shape;

/// Half-extent of the random spawn cube.
const SPAWN_EXTENT: f32 = 5.0;
/// Upper magnitude for linear and angular drift per frame.
const MAX_DRIFT: f32 = 0.01;

/// Per-frame drift of a particle.
///
/// `dx`/`dy` move the particle in the world xy-plane; `dr` is a single
/// angular rate that drives rotation about both the x and y axes. There is no
/// z component: depth is fixed at spawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Velocity {
    pub dx: f32,
    pub dy: f32,
    pub dr: f32,
}

/// Surface appearance of one particle.
///
/// Every particle starts with the same semi-transparent violet wireframe but
/// owns its instance, so appearances can diverge later without touching the
/// rest of the pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Base color (linear RGB, 0.0-1.0).
    pub color: Vec3,
    /// Wireframe opacity.
    pub opacity: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: hex_color(0x9333EA),
            opacity: 0.6,
        }
    }
}

/// One animated polyhedron in the scene pool.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub shape: Shape,
    /// World position. x and y stay inside the scene bounds via reflection;
    /// z is never bounded.
    pub position: Vec3,
    /// Euler rotation in radians.
    pub rotation: Vec3,
    pub velocity: Velocity,
    pub material: Material,
}

impl Particle {
    /// Spawn a particle with a random shape, pose and drift.
    pub fn spawn<R: Rng>(rng: &mut R) -> Self {
        let shape = Shape::ALL[rng.gen_range(0..Shape::ALL.len())];

        Self {
            shape,
            position: Vec3::new(
                rng.gen_range(-SPAWN_EXTENT..SPAWN_EXTENT),
                rng.gen_range(-SPAWN_EXTENT..SPAWN_EXTENT),
                rng.gen_range(-SPAWN_EXTENT..SPAWN_EXTENT),
            ),
            rotation: Vec3::new(
                rng.gen_range(0.0..std::f32::consts::PI),
                rng.gen_range(0.0..std::f32::consts::PI),
                0.0,
            ),
            velocity: Velocity {
                dx: rng.gen_range(-MAX_DRIFT..MAX_DRIFT),
                dy: rng.gen_range(-MAX_DRIFT..MAX_DRIFT),
                dr: rng.gen_range(-MAX_DRIFT..MAX_DRIFT),
            },
            material: Material::default(),
        }
    }

    /// Advance the pose by one frame of drift.
    ///
    /// The shared `dr` rate drives both rotation axes.
    pub fn integrate(&mut self) {
        self.rotation.x += self.velocity.dr;
        self.rotation.y += self.velocity.dr;
        self.position.x += self.velocity.dx;
        self.position.y += self.velocity.dy;
    }

    /// Bounce off the soft bounding box at `±bounds` on x and y.
    ///
    /// Velocity is negated, position is not clamped: a particle may sit past
    /// the boundary for the frame that crossed it and drifts back on the
    /// next. z is never reflected.
    pub fn reflect(&mut self, bounds: f32) {
        if self.position.x.abs() > bounds {
            self.velocity.dx = -self.velocity.dx;
        }
        if self.position.y.abs() > bounds {
            self.velocity.dy = -self.velocity.dy;
        }
    }

    /// World transform for rendering.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_euler(
                EulerRot::XYZ,
                self.rotation.x,
                self.rotation.y,
                self.rotation.z,
            )
    }
}
