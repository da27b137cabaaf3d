//! Vector and quaternion helpers on top of nalgebra.
//!
//! The types are nalgebra's. This module adds the degenerate-input rules the
//! renderer depends on and the degree-based Euler convention.
use nalgebra::UnitQuaternion;

pub type Vector3 = nalgebra::Vector3<f64>;
pub type Quaternion = nalgebra::Quaternion<f64>;

pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);
pub const RIGHT: Vector3 = Vector3::new(1.0, 0.0, 0.0);
pub const UP: Vector3 = Vector3::new(0.0, 1.0, 0.0);
pub const FORWARD: Vector3 = Vector3::new(0.0, 0.0, 1.0);

/// `w = 1` and no vector part.
pub const IDENTITY: Quaternion = Quaternion::new(1.0, 0.0, 0.0, 0.0);

/// Quaternion magnitudes inside this band are treated as zero.
const NORMALIZE_EPSILON: f64 = 0.000_000_1;

/// `x*y + z*w` beyond this value selects the pole branch of [`to_euler`].
const GIMBAL_THRESHOLD: f64 = 0.499;

/// Unit vector in the direction of `v`.
///
/// Vectors without a positive length (zero, or containing NaN) map to
/// [`FORWARD`] instead of dividing by zero.
pub fn normalize_or_forward(v: Vector3) -> Vector3 {
    let length = v.norm();
    if length > 0.0 {
        v / length
    } else {
        FORWARD
    }
}

/// Componentwise minimum. NaN in either operand yields NaN.
pub fn component_min(a: Vector3, b: Vector3) -> Vector3 {
    a.zip_map(&b, |a, b| if a.is_nan() || b.is_nan() { f64::NAN } else { a.min(b) })
}

/// Componentwise maximum. NaN in either operand yields NaN.
pub fn component_max(a: Vector3, b: Vector3) -> Vector3 {
    a.zip_map(&b, |a, b| if a.is_nan() || b.is_nan() { f64::NAN } else { a.max(b) })
}

/// Arithmetic mean of a set of points; `None` for an empty slice.
pub fn mean(points: &[Vector3]) -> Option<Vector3> {
    if points.is_empty() {
        return None;
    }
    let sum = points.iter().fold(ZERO, |acc, p| acc + p);
    Some(sum / points.len() as f64)
}

/// Rotation of `radians` about `axis`. The axis is used as given.
pub fn from_axis_angle(axis: Vector3, radians: f64) -> Quaternion {
    let half = radians / 2.0;
    Quaternion::from_parts(half.cos(), axis * half.sin())
}

/// Composes rotations about +X, +Y and +Z (angles in degrees) as `qx * qy * qz`.
pub fn from_euler(degrees: Vector3) -> Quaternion {
    let qx = from_axis_angle(RIGHT, degrees.x.to_radians());
    let qy = from_axis_angle(UP, degrees.y.to_radians());
    let qz = from_axis_angle(FORWARD, degrees.z.to_radians());

    qx * qy * qz
}

/// Unit quaternion, or [`IDENTITY`] when the magnitude is effectively zero.
pub fn normalize_or_identity(q: Quaternion) -> Quaternion {
    let magnitude = q.norm();
    if magnitude > -NORMALIZE_EPSILON && magnitude < NORMALIZE_EPSILON {
        return IDENTITY;
    }
    q.normalize()
}

/// Best-effort Euler decomposition in radians.
///
/// Near the poles (`x*y + z*w` beyond ±0.499) only two angles are
/// recoverable and the result is not unique.
pub fn to_euler(q: Quaternion) -> Vector3 {
    let (x, y, z, w) = (q.i, q.j, q.k, q.w);
    let test = x * y + z * w;

    if test > GIMBAL_THRESHOLD {
        return Vector3::new(std::f64::consts::FRAC_PI_2, 2.0 * x.atan2(w), 0.0);
    }
    if test < -GIMBAL_THRESHOLD {
        return Vector3::new(-std::f64::consts::FRAC_PI_2, -2.0 * x.atan2(w), 0.0);
    }

    Vector3::new(
        (2.0 * test).asin(),
        (2.0 * y * w - 2.0 * x * z).atan2(1.0 - 2.0 * y * y - 2.0 * z * z),
        (2.0 * x * w - 2.0 * y * z).atan2(1.0 - 2.0 * x * x - 2.0 * z * z),
    )
}

/// Rotates `v` by the orientation `q` (assumed unit length).
pub fn rotate(v: Vector3, q: Quaternion) -> Vector3 {
    UnitQuaternion::new_unchecked(q).transform_vector(&v)
}
