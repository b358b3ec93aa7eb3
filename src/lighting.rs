//! The backdrop's light rig.
//!
//! Two directional lights from opposing diagonals in distinct colors give the
//! wireframes depth cueing; a dim ambient term keeps back-facing edges
//! legible.

use glam::Vec3;

/// Convert a 0xRRGGBB color to linear RGB components.
pub(crate) fn hex_color(rgb: u32) -> Vec3 {
    Vec3::new(
        ((rgb >> 16) & 0xFF) as f32 / 255.0,
        ((rgb >> 8) & 0xFF) as f32 / 255.0,
        (rgb & 0xFF) as f32 / 255.0,
    )
}

/// A directional light shining toward the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Unit vector pointing from the origin toward the light.
    pub direction: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

impl DirectionalLight {
    /// Light positioned at `from`, aimed at the origin.
    pub fn from_position(from: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            direction: from.normalize(),
            color,
            intensity,
        }
    }
}

/// Uniform fill light with no direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

/// The full light set of a scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightRig {
    pub key: DirectionalLight,
    pub fill: DirectionalLight,
    pub ambient: AmbientLight,
}

impl LightRig {
    /// The standard rig: violet key light from the upper-front diagonal,
    /// half-strength blue fill from the opposite corner, dim gray ambient.
    pub fn backdrop() -> Self {
        Self {
            key: DirectionalLight::from_position(Vec3::new(5.0, 5.0, 5.0), hex_color(0x9333EA), 1.0),
            fill: DirectionalLight::from_position(
                Vec3::new(-5.0, -5.0, -5.0),
                hex_color(0x3B82F6),
                0.5,
            ),
            ambient: AmbientLight {
                color: hex_color(0x404040),
                intensity: 0.5,
            },
        }
    }
}

impl Default for LightRig {
    fn default() -> Self {
        Self::backdrop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color(0xFF0000), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(hex_color(0x000000), Vec3::ZERO);
        let violet = hex_color(0x9333EA);
        assert!((violet.x - 0x93 as f32 / 255.0).abs() < 1e-6);
        assert!((violet.z - 0xEA as f32 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_directional_lights_oppose() {
        let rig = LightRig::backdrop();
        assert!((rig.key.direction.length() - 1.0).abs() < 1e-6);
        assert!((rig.key.direction + rig.fill.direction).length() < 1e-6);
    }
}
