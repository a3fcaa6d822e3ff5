/// Scale and rotation of the cube's vertices
use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::geometry::Vertex;

/// How transforms accumulate from frame to frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformMode {
    /// Mutate the stored `f32` vertices directly; rounding error accumulates
    #[default]
    InPlace,
    /// Compose an `f64` model matrix and re-derive the vertices from it
    Composed,
}

/// Transform operations over a vertex array
pub struct Transform;

impl Transform {
    pub fn scale_in_place(vertices: &mut [Vertex], fx: f32, fy: f32, fz: f32) {
        for v in vertices.iter_mut() {
            v.x *= fx;
            v.y *= fy;
            v.z *= fz;
        }
    }

    /// Two-stage rotation applied to each vertex in turn.
    ///
    /// First the X-Z plane is rotated by `angle_x`, then the Y-Z plane by
    /// `angle_y` using the z produced by the first stage.
    pub fn rotate_in_place(vertices: &mut [Vertex], angle_x: f32, angle_y: f32) {
        let (sin_x, cos_x) = angle_x.sin_cos();
        let (sin_y, cos_y) = angle_y.sin_cos();

        for v in vertices.iter_mut() {
            let (x, y, z) = (v.x, v.y, v.z);

            v.x = x * cos_x - z * sin_x;
            let z = z * cos_x + x * sin_x;

            v.y = y * cos_y - z * sin_y;
            v.z = z * cos_y + y * sin_y;
        }
    }

    /// Matrix equivalent of `rotate_in_place`: `Rx(angle_y) * Ry(-angle_x)`
    pub fn rotation_matrix(angle_x: f32, angle_y: f32) -> Matrix3<f64> {
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), -(angle_x as f64));
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), angle_y as f64);
        (rx * ry).into_inner()
    }

    pub fn scale_matrix(fx: f32, fy: f32, fz: f32) -> Matrix3<f64> {
        Matrix3::from_diagonal(&Vector3::new(fx as f64, fy as f64, fz as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn sample() -> Vec<Vertex> {
        vec![
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(-4.0, 0.5, 2.0),
            Point3::new(0.0, -1.0, -7.0),
        ]
    }

    fn assert_close(a: &[Vertex], b: &[Vertex], tolerance: f32) {
        for (p, q) in a.iter().zip(b.iter()) {
            assert!((p - q).norm() < tolerance, "{:?} != {:?}", p, q);
        }
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        let mut vertices = sample();
        Transform::rotate_in_place(&mut vertices, 0.0, 0.0);
        assert_close(&vertices, &sample(), 1e-6);
    }

    #[test]
    fn test_rotation_preserves_length() {
        let mut vertices = sample();
        Transform::rotate_in_place(&mut vertices, 0.8, -1.3);
        for (after, before) in vertices.iter().zip(sample().iter()) {
            assert!((after.coords.norm() - before.coords.norm()).abs() < 1e-5);
        }
    }

    #[test]
    fn test_single_stage_rotations() {
        let half_pi = std::f32::consts::FRAC_PI_2;

        let mut vertices = vec![Point3::new(1.0, 0.0, 0.0)];
        Transform::rotate_in_place(&mut vertices, half_pi, 0.0);
        assert_close(&vertices, &[Point3::new(0.0, 0.0, 1.0)], 1e-6);

        let mut vertices = vec![Point3::new(0.0, 1.0, 0.0)];
        Transform::rotate_in_place(&mut vertices, 0.0, half_pi);
        assert_close(&vertices, &[Point3::new(0.0, 0.0, 1.0)], 1e-6);
    }

    #[test]
    fn test_repeated_rotation_differs_from_doubled_angles() {
        let (a, b) = (0.5, 0.7);

        let mut twice = sample();
        Transform::rotate_in_place(&mut twice, a, b);
        Transform::rotate_in_place(&mut twice, a, b);

        let mut doubled = sample();
        Transform::rotate_in_place(&mut doubled, 2.0 * a, 2.0 * b);

        let max_gap = twice
            .iter()
            .zip(doubled.iter())
            .map(|(p, q)| (p - q).norm())
            .fold(0.0f32, f32::max);
        assert!(max_gap > 1e-2);
    }

    #[test]
    fn test_rotation_matrix_matches_in_place() {
        let (a, b) = (0.9, -0.4);
        let matrix = Transform::rotation_matrix(a, b);

        let mut vertices = sample();
        Transform::rotate_in_place(&mut vertices, a, b);

        let expected: Vec<Vertex> = sample()
            .iter()
            .map(|p| (matrix * p.cast::<f64>()).cast::<f32>())
            .collect();
        assert_close(&vertices, &expected, 1e-5);
    }

    #[test]
    fn test_scale_matrix_is_diagonal() {
        let m = Transform::scale_matrix(2.0, 3.0, 4.0);
        assert_eq!(m.diagonal(), Vector3::new(2.0, 3.0, 4.0));
        assert_eq!(m[(0, 1)], 0.0);
    }
}
