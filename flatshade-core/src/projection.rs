//! Camera projection for the origin camera
use nalgebra::{Matrix4, RowVector4};
use serde::{Deserialize, Serialize};

use crate::math::Vector3;

/// Which way the projected x axis points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    Left,
    #[default]
    Right,
}

/// 4x4 matrix applied to row vectors (`v' = v * M`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix44(Matrix4<f64>);

impl Matrix44 {
    pub fn identity() -> Self {
        Self(Matrix4::identity())
    }

    /// Perspective projection looking down -Z from the origin.
    ///
    /// Returns the identity when `fov_degrees` or `aspect` is not positive.
    pub fn perspective(
        fov_degrees: f64,
        aspect: f64,
        near: f64,
        far: f64,
        handedness: Handedness,
    ) -> Self {
        let mut m = Matrix4::identity();

        if fov_degrees > 0.0 && aspect > 0.0 {
            let one_over_depth = 1.0 / (far - near);
            let scale_y = 1.0 / (0.5 * fov_degrees).to_radians().tan();
            let sign = match handedness {
                Handedness::Left => 1.0,
                Handedness::Right => -1.0,
            };

            m[(1, 1)] = scale_y;
            m[(0, 0)] = sign * scale_y / aspect;
            m[(2, 2)] = far * one_over_depth;
            m[(3, 2)] = -far * near * one_over_depth;
            m[(2, 3)] = -1.0;
            m[(3, 3)] = 0.0;
        }

        Self(m)
    }

    /// Element at `row`, `col`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.0[(row, col)]
    }

    pub fn as_matrix(&self) -> &Matrix4<f64> {
        &self.0
    }

    /// Transforms a point (w = 1) and divides by the resulting w unless it is exactly 1.
    pub fn multiply_vxm(&self, v: Vector3) -> Vector3 {
        let r = RowVector4::new(v.x, v.y, v.z, 1.0) * self.0;
        let result = Vector3::new(r[0], r[1], r[2]);
        let w = r[3];

        if w != 1.0 {
            result / w
        } else {
            result
        }
    }
}

impl Default for Matrix44 {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Matrix4<f64>> for Matrix44 {
    fn from(m: Matrix4<f64>) -> Self {
        Self(m)
    }
}

/// Perspective camera parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Perspective {
    pub fov_degrees: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub handedness: Handedness,
}

impl Perspective {
    pub fn matrix(&self) -> Matrix44 {
        Matrix44::perspective(self.fov_degrees, self.aspect, self.near, self.far, self.handedness)
    }
}

impl Default for Perspective {
    fn default() -> Self {
        Self {
            fov_degrees: 90.0,
            aspect: 1.0,
            near: 0.2,
            far: 1000.0,
            handedness: Handedness::Right,
        }
    }
}

/// NDC x/y to pixel coordinates on a `width` x `height` surface.
///
/// +y is up in NDC and down on screen. The right and bottom edges clamp onto
/// the last pixel.
pub fn ndc_to_pixel(ndc: Vector3, width: f64, height: f64) -> (f64, f64) {
    let px = ((ndc.x + 1.0) * 0.5 * width).min(width - 1.0);
    let py = ((1.0 - (ndc.y + 1.0) * 0.5) * height).min(height - 1.0);
    (px, py)
}
