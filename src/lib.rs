//! # polydrift
//!
//! An animated window backdrop: a field of floating wireframe polyhedra with
//! pointer-parallax camera motion, rendered with wgpu.
//!
//! A fixed pool of particles (icosahedra, octahedra, tetrahedra) drifts
//! inside a soft bounding box, reflecting off its x/y walls. The camera eases
//! toward wherever the pointer points and re-aims at the origin every frame,
//! and the viewport stays aspect-correct under resize. It is a decorative
//! layer: failures degrade to "stop animating", never to user-facing errors.
//!
//! ## Quick Start
//!
//! ```ignore
//! use polydrift::Backdrop;
//!
//! fn main() -> Result<(), polydrift::BackdropError> {
//!     Backdrop::new()
//!         .with_particle_count(15)
//!         .with_bounds(6.0)
//!         .with_title("my backdrop")
//!         .run()
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Scene
//!
//! [`Scene`] is the caller-owned world: particle pool, camera and light rig.
//! It is built once per mount from a [`SceneConfig`] and advanced one frame
//! at a time with [`Scene::step`]. Scenes never share state; several can
//! coexist and tear down independently.
//!
//! ### Frame
//!
//! Each frame, in order: particle drift integration, boundary reflection,
//! camera easing, look-at, draw. There is no fixed timestep: the update
//! constants are per-frame, so real-world speed follows the display refresh
//! rate.
//!
//! ### Lifecycle
//!
//! A running backdrop walks `Uninitialized -> Running -> Disposed` (see
//! [`Phase`]). Disposal is idempotent and happens on every exit path: close,
//! GPU-acquisition failure at mount, or surface loss mid-loop.

pub mod backdrop;
pub mod camera;
pub mod error;
mod gpu;
pub mod input;
pub mod lighting;
pub mod mesh;
pub mod particle;
pub mod scene;

pub use backdrop::{Backdrop, Phase};
pub use camera::Camera;
pub use error::{BackdropError, GpuError};
pub use glam::{Vec2, Vec3};
pub use lighting::{AmbientLight, DirectionalLight, LightRig};
pub use mesh::{Shape, WireframeMesh};
pub use particle::{Material, Particle, Velocity};
pub use scene::{Scene, SceneConfig};

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::backdrop::{Backdrop, Phase};
    pub use crate::camera::Camera;
    pub use crate::error::BackdropError;
    pub use crate::input::{PointerTracker, Viewport};
    pub use crate::mesh::{Shape, WireframeMesh};
    pub use crate::particle::{Material, Particle, Velocity};
    pub use crate::scene::{Scene, SceneConfig};
    pub use crate::{Vec2, Vec3};
}
