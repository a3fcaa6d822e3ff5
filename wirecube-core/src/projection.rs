/// Orthographic projection of the cube onto the off-screen frame
use nalgebra::Point2;

use crate::geometry::{Vertex, WireCube, EDGE_COUNT};

/// Two endpoints per edge
pub const POINT_COUNT: usize = EDGE_COUNT * 2;

/// An integer pixel position
pub type ScreenPoint = Point2<i32>;

/// Maps cube space onto a frame of fixed size, centered on the origin.
///
/// Depth is dropped; there is no foreshortening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Frame center, using integer halves of the size
    pub fn center(&self) -> (f32, f32) {
        ((self.width / 2) as f32, (self.height / 2) as f32)
    }

    /// Project a single vertex, truncating toward zero like a C float-to-int cast
    pub fn project(&self, vertex: &Vertex) -> ScreenPoint {
        let (cx, cy) = self.center();
        Point2::new((vertex.x + cx) as i32, (vertex.y + cy) as i32)
    }

    /// Both endpoints of every edge, in edge-list order
    pub fn project_edges(&self, cube: &WireCube) -> [ScreenPoint; POINT_COUNT] {
        let mut points = [Point2::origin(); POINT_COUNT];
        for (pair, (a, b)) in points.chunks_exact_mut(2).zip(cube.edge_endpoints()) {
            pair[0] = self.project(&a);
            pair[1] = self.project(&b);
        }
        points
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(320, 240)
    }
}
