//! Mesh data produced by the Wavefront parser
use crate::math::{self, Vector3};

/// A polygon of a mesh (3 or 4 vertices)
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    /// Indices into the owning mesh's vertex list, in winding order.
    pub indices: Vec<usize>,
    /// Raw cross product of the first two edges. Only its direction is meaningful.
    pub normal: Vector3,
    /// Mean of the face's vertex positions.
    pub centroid: Vector3,
}

impl Face {
    pub fn new(indices: Vec<usize>, normal: Vector3, centroid: Vector3) -> Self {
        Self {
            indices,
            normal,
            centroid,
        }
    }

    /// Builds a face from its vertex positions, computing normal and centroid.
    ///
    /// `positions` must hold the vertices named by `indices`, in the same order.
    /// Returns `None` when fewer than three positions are given.
    pub fn from_positions(indices: Vec<usize>, positions: &[Vector3]) -> Option<Self> {
        let [v1, v2, v3, ..] = *positions else {
            return None;
        };
        let v1_v2 = math::normalize_or_forward(v2 - v1);
        let v2_v3 = math::normalize_or_forward(v3 - v2);
        let normal = v1_v2.cross(&v2_v3);
        let centroid = math::mean(positions)?;

        Some(Self::new(indices, normal, centroid))
    }

    pub fn vertex_count(&self) -> usize {
        self.indices.len()
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vector3,
    pub max: Vector3,
}

impl Bounds {
    /// Inverted box that any point will grow.
    pub const EMPTY: Self = Self {
        min: Vector3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
        max: Vector3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
    };

    pub fn include(&mut self, point: Vector3) {
        self.min = math::component_min(self.min, point);
        self.max = math::component_max(self.max, point);
    }

    pub fn span(&self) -> Vector3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vector3 {
        self.min + self.span() / 2.0
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// A polygon mesh with precomputed bounds
///
/// A mesh without vertices keeps [`Bounds::EMPTY`], so its center is NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vector3>,
    pub faces: Vec<Face>,
    pub bounds: Bounds,
    /// Pivot used for rotation; the bounding box center.
    pub object_center: Vector3,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            bounds: Bounds::EMPTY,
            object_center: Bounds::EMPTY.center(),
        }
    }

    pub fn add_vertex(&mut self, vertex: Vector3) {
        self.bounds.include(vertex);
        self.vertices.push(vertex);
    }

    pub fn add_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    /// Recomputes the pivot from the current bounds.
    pub fn update_center(&mut self) {
        self.object_center = self.bounds_center();
    }

    pub fn bounds_span(&self) -> Vector3 {
        self.bounds.span()
    }

    pub fn bounds_center(&self) -> Vector3 {
        self.bounds.center()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Axis-aligned cube centered at the origin with outward-facing quads.
    pub fn cube(size: f64) -> Self {
        let h = size / 2.0;
        let mut mesh = Self::new();

        for &(x, y, z) in &[
            (-h, -h, -h),
            (h, -h, -h),
            (h, h, -h),
            (-h, h, -h),
            (-h, -h, h),
            (h, -h, h),
            (h, h, h),
            (-h, h, h),
        ] {
            mesh.add_vertex(Vector3::new(x, y, z));
        }

        // +Z, -Z, +X, -X, +Y, -Y
        for quad in [
            [4, 5, 6, 7],
            [1, 0, 3, 2],
            [5, 1, 2, 6],
            [0, 4, 7, 3],
            [7, 6, 2, 3],
            [0, 1, 5, 4],
        ] {
            let positions: Vec<Vector3> = quad.iter().map(|&i| mesh.vertices[i]).collect();
            if let Some(face) = Face::from_positions(quad.to_vec(), &positions) {
                mesh.add_face(face);
            }
        }

        mesh.update_center();
        mesh
    }

    /// Positions of the vertices referenced by `face`.
    pub fn face_positions<'a>(&'a self, face: &'a Face) -> impl Iterator<Item = Vector3> + 'a {
        face.indices.iter().map(move |&i| self.vertices[i])
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
