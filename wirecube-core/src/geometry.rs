/// Wireframe cube geometry: eight vertices joined by twelve edges
use nalgebra::{Matrix3, Point3};

use crate::transform::{Transform, TransformMode};

pub const VERTEX_COUNT: usize = 8;
pub const EDGE_COUNT: usize = 12;

/// A cube vertex position
pub type Vertex = Point3<f32>;

/// A pair of indices into the vertex array
pub type Edge = [usize; 2];

/// Unit cube corners, indexed by the bits of (x, y, z) with x most significant
pub const DEFAULT_VERTICES: [[f32; 3]; VERTEX_COUNT] = [
    [-1.0, -1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, 1.0, 1.0],
    [1.0, -1.0, -1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, -1.0],
    [1.0, 1.0, 1.0],
];

/// Two face loops followed by the four edges joining them
pub const EDGES: [Edge; EDGE_COUNT] = [
    [0, 1],
    [1, 3],
    [3, 2],
    [2, 0],
    [4, 5],
    [5, 7],
    [7, 6],
    [6, 4],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

/// The cube's current vertex positions.
///
/// Transforms are applied directly to the stored positions, so every call
/// composes onto whatever state the previous calls left behind. With
/// [`TransformMode::Composed`] a model matrix is accumulated instead and the
/// positions are re-derived from the default corners after each call.
#[derive(Debug, Clone)]
pub struct WireCube {
    vertices: [Vertex; VERTEX_COUNT],
    mode: TransformMode,
    model: Matrix3<f64>,
}

impl WireCube {
    pub fn new() -> Self {
        Self::with_mode(TransformMode::InPlace)
    }

    pub fn with_mode(mode: TransformMode) -> Self {
        Self {
            vertices: default_vertices(),
            mode,
            model: Matrix3::identity(),
        }
    }

    pub fn mode(&self) -> TransformMode {
        self.mode
    }

    pub fn vertices(&self) -> &[Vertex; VERTEX_COUNT] {
        &self.vertices
    }

    pub fn vertex(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    pub fn edges(&self) -> &'static [Edge; EDGE_COUNT] {
        &EDGES
    }

    /// Endpoint positions of every edge, in edge-list order
    pub fn edge_endpoints(&self) -> impl Iterator<Item = (Vertex, Vertex)> + '_ {
        EDGES
            .iter()
            .map(move |&[a, b]| (self.vertices[a], self.vertices[b]))
    }

    /// Put every vertex back on the unit cube and drop any accumulated model
    pub fn reset(&mut self) {
        self.vertices = default_vertices();
        self.model = Matrix3::identity();
    }

    /// Multiply every vertex component-wise by (fx, fy, fz)
    pub fn scale(&mut self, fx: f32, fy: f32, fz: f32) {
        match self.mode {
            TransformMode::InPlace => Transform::scale_in_place(&mut self.vertices, fx, fy, fz),
            TransformMode::Composed => {
                self.model = Transform::scale_matrix(fx, fy, fz) * self.model;
                self.rederive();
            }
        }
    }

    /// Rotate every vertex in the X-Z plane by `angle_x`, then in the Y-Z
    /// plane by `angle_y`
    pub fn rotate(&mut self, angle_x: f32, angle_y: f32) {
        match self.mode {
            TransformMode::InPlace => {
                Transform::rotate_in_place(&mut self.vertices, angle_x, angle_y)
            }
            TransformMode::Composed => {
                self.model = Transform::rotation_matrix(angle_x, angle_y) * self.model;
                self.rederive();
            }
        }
    }

    fn rederive(&mut self) {
        for (vertex, corner) in self.vertices.iter_mut().zip(DEFAULT_VERTICES.iter()) {
            let corner = Point3::new(corner[0] as f64, corner[1] as f64, corner[2] as f64);
            *vertex = (self.model * corner).cast::<f32>();
        }
    }
}

impl Default for WireCube {
    fn default() -> Self {
        Self::new()
    }
}

fn default_vertices() -> [Vertex; VERTEX_COUNT] {
    DEFAULT_VERTICES.map(|[x, y, z]| Point3::new(x, y, z))
}
