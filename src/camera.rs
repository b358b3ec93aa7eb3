//! Pointer-parallax camera.
//!
//! The camera sits in front of the particle field and drifts a little toward
//! the pointer every frame, which reads as parallax against the slow-moving
//! polyhedra. It always re-aims at the world origin after moving.

use glam::{Mat4, Vec2, Vec3};

/// Resting position of the camera.
const HOME: Vec3 = Vec3::new(0.0, 0.0, 5.0);
/// Vertical field of view in degrees.
const FOV_Y_DEG: f32 = 75.0;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 1000.0;

/// Perspective camera eased toward a pointer-derived target.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Current world position. Only x and y are animated; z stays at its
    /// resting depth.
    pub position: Vec3,
    /// Look-at target, fixed at the world origin.
    pub target: Vec3,
    /// How far the pointer displaces the camera at full deflection, in world
    /// units.
    pub parallax: f32,
    /// Fraction of the remaining distance covered per frame. The single
    /// tunable of the motion: ~20 frames to 90% convergence at 0.05.
    pub ease: f32,
    aspect: f32,
}

impl Camera {
    /// Create a camera at the resting position for the given aspect ratio.
    pub fn new(aspect: f32) -> Self {
        Self {
            position: HOME,
            target: Vec3::ZERO,
            parallax: 0.5,
            ease: 0.05,
            aspect,
        }
    }

    /// Ease toward the target derived from the normalized pointer.
    ///
    /// The pointer is in screen convention (y grows downward), so y is
    /// negated here to map it into world space. This is a first-order
    /// low-pass filter, not a spring: each call covers `ease` of the
    /// remaining distance, independently on x and y.
    pub fn ease_toward(&mut self, pointer: Vec2) {
        let tx = pointer.x * self.parallax;
        let ty = -pointer.y * self.parallax;
        self.position.x += (tx - self.position.x) * self.ease;
        self.position.y += (ty - self.position.y) * self.ease;
    }

    /// Current aspect ratio of the projection.
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Update the projection aspect after a viewport resize.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// View matrix, re-aimed at the target from the current position.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Perspective projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(FOV_Y_DEG.to_radians(), self.aspect, Z_NEAR, Z_FAR)
    }

    /// Combined view-projection matrix for rendering.
    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
