//! Polyhedron generation and normal recomputation.
//!
//! Geometry is produced non-indexed (three vertices per triangle) so that a
//! normal recompute yields flat, per-face shading. Indexed meshes are still
//! supported by [`Mesh::compute_vertex_normals`] for callers that share
//! vertices between faces.

use glam::Vec3;

const OCTAHEDRON_CORNERS: [[f32; 3]; 6] = [
    [1.0, 0.0, 0.0],
    [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, -1.0],
];

// Counter-clockwise when seen from outside.
const OCTAHEDRON_FACES: [[usize; 3]; 8] = [
    [0, 2, 4],
    [0, 4, 3],
    [0, 3, 5],
    [0, 5, 2],
    [1, 2, 5],
    [1, 5, 3],
    [1, 3, 4],
    [1, 4, 2],
];

/// Vertex positions and normals, optionally indexed.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Option<Vec<u32>>,
}

impl Mesh {
    pub fn from_positions(positions: Vec<Vec3>) -> Self {
        let normals = vec![Vec3::ZERO; positions.len()];
        let mut mesh = Self {
            positions,
            normals,
            indices: None,
        };
        mesh.compute_vertex_normals();
        mesh
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Rebuild every normal from the current positions.
    ///
    /// Non-indexed triangles get their face normal on all three corners.
    /// Indexed meshes accumulate area-weighted face normals per vertex.
    /// Degenerate faces contribute a zero normal rather than NaN.
    pub fn compute_vertex_normals(&mut self) {
        self.normals.clear();
        self.normals.resize(self.positions.len(), Vec3::ZERO);

        match &self.indices {
            Some(indices) => {
                for tri in indices.chunks_exact(3) {
                    let (ia, ib, ic) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
                    let (Some(&a), Some(&b), Some(&c)) = (
                        self.positions.get(ia),
                        self.positions.get(ib),
                        self.positions.get(ic),
                    ) else {
                        continue;
                    };
                    let n = (b - a).cross(c - a);
                    self.normals[ia] += n;
                    self.normals[ib] += n;
                    self.normals[ic] += n;
                }
                for n in &mut self.normals {
                    *n = n.normalize_or_zero();
                }
            }
            None => {
                for (tri, normals) in self
                    .positions
                    .chunks_exact(3)
                    .zip(self.normals.chunks_exact_mut(3))
                {
                    let n = face_normal(tri[0], tri[1], tri[2]);
                    normals.fill(n);
                }
            }
        }
    }
}

#[inline]
pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a).normalize_or_zero()
}

/// Octahedron of the given circumradius, each face split into
/// `(detail + 1)^2` triangles projected back onto the sphere.
pub fn octahedron(radius: f32, detail: u32) -> Mesh {
    let per_face = (detail as usize + 1).pow(2);
    let mut positions = Vec::with_capacity(OCTAHEDRON_FACES.len() * 3 * per_face);
    for face in OCTAHEDRON_FACES {
        let [a, b, c] = face.map(|i| Vec3::from(OCTAHEDRON_CORNERS[i]));
        subdivide_face(a, b, c, detail, &mut positions);
    }
    for p in &mut positions {
        *p = p.normalize() * radius;
    }
    Mesh::from_positions(positions)
}

// Builds a triangular lattice between a, b, c with `detail + 1` segments per
// edge and emits it as a triangle list, preserving the face winding.
fn subdivide_face(a: Vec3, b: Vec3, c: Vec3, detail: u32, out: &mut Vec<Vec3>) {
    let cols = detail as usize + 1;
    let mut rows: Vec<Vec<Vec3>> = Vec::with_capacity(cols + 1);
    for i in 0..=cols {
        let t = i as f32 / cols as f32;
        let start = a.lerp(c, t);
        let end = b.lerp(c, t);
        let steps = cols - i;
        let row = (0..=steps)
            .map(|j| {
                if steps == 0 {
                    start
                } else {
                    start.lerp(end, j as f32 / steps as f32)
                }
            })
            .collect();
        rows.push(row);
    }

    for i in 0..cols {
        let width = 2 * (cols - i) - 1;
        for j in 0..width {
            let k = j / 2;
            if j % 2 == 0 {
                out.push(rows[i][k]);
                out.push(rows[i][k + 1]);
                out.push(rows[i + 1][k]);
            } else {
                out.push(rows[i][k + 1]);
                out.push(rows[i + 1][k + 1]);
                out.push(rows[i + 1][k]);
            }
        }
    }
}
