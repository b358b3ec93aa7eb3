//! Wireframe polyhedra for the particle pool.
//!
//! Each particle is drawn as the edge set of a convex polyhedron. Meshes are
//! plain line-segment lists; the renderer expands each segment into a thin
//! camera-robust quad on the GPU.

use glam::Vec3;

/// The polyhedron kinds a particle can be spawned with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Icosahedron,
    Octahedron,
    Tetrahedron,
}

impl Shape {
    /// All spawnable shapes, in renderer batch order.
    pub const ALL: [Shape; 3] = [Shape::Icosahedron, Shape::Octahedron, Shape::Tetrahedron];

    /// The edge mesh for this shape, at circumradius 0.5.
    pub fn mesh(self) -> WireframeMesh {
        match self {
            Shape::Icosahedron => WireframeMesh::icosahedron(),
            Shape::Octahedron => WireframeMesh::octahedron(),
            Shape::Tetrahedron => WireframeMesh::tetrahedron(),
        }
    }
}

/// A wireframe mesh as a list of line segments.
///
/// All built-in shapes are centered on the origin with every vertex at
/// distance 0.5 from it, so the rotated vertex position doubles as a surface
/// normal for shading.
#[derive(Debug, Clone, PartialEq)]
pub struct WireframeMesh {
    /// Line segments as pairs of endpoints (start, end).
    pub lines: Vec<(Vec3, Vec3)>,
}

impl WireframeMesh {
    /// Tetrahedron (4 triangular faces, 6 edges).
    pub fn tetrahedron() -> Self {
        // Alternate cube corners; |(s, s, s)| = s * sqrt(3) = 0.5
        let s = 0.5 / 3.0_f32.sqrt();
        let v0 = Vec3::new(s, s, s);
        let v1 = Vec3::new(s, -s, -s);
        let v2 = Vec3::new(-s, s, -s);
        let v3 = Vec3::new(-s, -s, s);

        Self {
            lines: vec![
                (v0, v1),
                (v0, v2),
                (v0, v3),
                (v1, v2),
                (v1, v3),
                (v2, v3),
            ],
        }
    }

    /// Octahedron (8 triangular faces, 12 edges).
    pub fn octahedron() -> Self {
        // 6 vertices at axis extremes, already at circumradius s
        let s = 0.5;
        let px = Vec3::new(s, 0.0, 0.0);
        let nx = Vec3::new(-s, 0.0, 0.0);
        let py = Vec3::new(0.0, s, 0.0);
        let ny = Vec3::new(0.0, -s, 0.0);
        let pz = Vec3::new(0.0, 0.0, s);
        let nz = Vec3::new(0.0, 0.0, -s);

        Self {
            lines: vec![
                // Top pyramid
                (py, px),
                (py, nx),
                (py, pz),
                (py, nz),
                // Bottom pyramid
                (ny, px),
                (ny, nx),
                (ny, pz),
                (ny, nz),
                // Equator
                (px, pz),
                (pz, nx),
                (nx, nz),
                (nz, px),
            ],
        }
    }

    /// Icosahedron (20 triangular faces, 30 edges).
    pub fn icosahedron() -> Self {
        // Golden ratio
        let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;
        // |(±1, ±phi, 0)| = sqrt(1 + phi^2); scale to circumradius 0.5
        let s = 0.5 / (1.0 + phi * phi).sqrt();

        // 12 vertices
        let vertices = [
            Vec3::new(-1.0, phi, 0.0) * s,
            Vec3::new(1.0, phi, 0.0) * s,
            Vec3::new(-1.0, -phi, 0.0) * s,
            Vec3::new(1.0, -phi, 0.0) * s,
            Vec3::new(0.0, -1.0, phi) * s,
            Vec3::new(0.0, 1.0, phi) * s,
            Vec3::new(0.0, -1.0, -phi) * s,
            Vec3::new(0.0, 1.0, -phi) * s,
            Vec3::new(phi, 0.0, -1.0) * s,
            Vec3::new(phi, 0.0, 1.0) * s,
            Vec3::new(-phi, 0.0, -1.0) * s,
            Vec3::new(-phi, 0.0, 1.0) * s,
        ];

        // 30 edges (each unique edge of the icosahedron)
        let edges = [
            (0, 1), (0, 5), (0, 7), (0, 10), (0, 11),
            (1, 5), (1, 7), (1, 8), (1, 9),
            (2, 3), (2, 4), (2, 6), (2, 10), (2, 11),
            (3, 4), (3, 6), (3, 8), (3, 9),
            (4, 5), (4, 9), (4, 11),
            (5, 9), (5, 11),
            (6, 7), (6, 8), (6, 10),
            (7, 8), (7, 10),
            (8, 9),
            (10, 11),
        ];

        Self {
            lines: edges.iter().map(|(i, j)| (vertices[*i], vertices[*j])).collect(),
        }
    }

    /// Get the total number of line segments.
    pub fn line_count(&self) -> u32 {
        self.lines.len() as u32
    }

    /// Get vertices as flat f32 array for GPU buffer.
    /// Each line is 6 floats: [x0, y0, z0, x1, y1, z1]
    pub fn to_vertices(&self) -> Vec<f32> {
        self.lines
            .iter()
            .flat_map(|(a, b)| [a.x, a.y, a.z, b.x, b.y, b.z])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_counts() {
        assert_eq!(WireframeMesh::tetrahedron().line_count(), 6);
        assert_eq!(WireframeMesh::octahedron().line_count(), 12);
        assert_eq!(WireframeMesh::icosahedron().line_count(), 30);
    }

    #[test]
    fn test_circumradius() {
        for shape in Shape::ALL {
            for (a, b) in shape.mesh().lines {
                assert!((a.length() - 0.5).abs() < 1e-5, "{:?}: |{:?}| != 0.5", shape, a);
                assert!((b.length() - 0.5).abs() < 1e-5, "{:?}: |{:?}| != 0.5", shape, b);
            }
        }
    }

    #[test]
    fn test_flat_vertex_layout() {
        let mesh = WireframeMesh::octahedron();
        let flat = mesh.to_vertices();
        assert_eq!(flat.len(), mesh.line_count() as usize * 6);

        let (a, b) = mesh.lines[0];
        assert_eq!(&flat[..6], &[a.x, a.y, a.z, b.x, b.y, b.z]);
    }
}
