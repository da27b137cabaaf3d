//! World placement of a mesh: translation plus an Euler-driven orientation
use std::sync::Arc;

use crate::geometry::Mesh;
use crate::math::{self, rotate, Quaternion, Vector3};

/// Orientation kept as Euler angles (degrees) with a derived quaternion
///
/// The Euler angles are authoritative. Every edit recomputes the quaternion;
/// the quaternion is never converted back, since the decomposition is not
/// unique and repeated round trips drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    euler: Vector3,
    rotation: Quaternion,
}

impl Orientation {
    pub fn from_euler(degrees: Vector3) -> Self {
        Self {
            euler: degrees,
            rotation: math::normalize_or_identity(math::from_euler(degrees)),
        }
    }

    /// Adopts `rotation` as-is and seeds the Euler angles from its decomposition.
    pub fn from_rotation(rotation: Quaternion) -> Self {
        let radians = math::to_euler(rotation);
        Self {
            euler: Vector3::new(
                radians.x.to_degrees(),
                radians.y.to_degrees(),
                radians.z.to_degrees(),
            ),
            rotation,
        }
    }

    pub fn euler(&self) -> Vector3 {
        self.euler
    }

    pub fn rotation(&self) -> Quaternion {
        self.rotation
    }

    pub fn set_euler(&mut self, degrees: Vector3) {
        *self = Self::from_euler(degrees);
    }

    /// Adds `delta` degrees to the Euler angles.
    pub fn rotate_by(&mut self, delta: Vector3) {
        self.set_euler(self.euler + delta);
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::from_euler(math::ZERO)
    }
}

/// A shared mesh placed in the world
#[derive(Debug, Clone)]
pub struct RenderObject {
    pub mesh: Arc<Mesh>,
    pub translation: Vector3,
    pub orientation: Orientation,
    /// Object-space point the orientation turns about. Starts at the mesh center.
    pub pivot: Vector3,
    pub description: String,
}

impl RenderObject {
    pub fn new(mesh: Arc<Mesh>) -> Self {
        let pivot = mesh.object_center;
        Self {
            mesh,
            translation: math::ZERO,
            orientation: Orientation::default(),
            pivot,
            description: String::new(),
        }
    }

    /// Places the mesh in front of the origin camera, vertically centered.
    pub fn framed(mesh: Arc<Mesh>) -> Self {
        let span = mesh.bounds_span();
        let translation = Vector3::new(
            0.0,
            -(mesh.bounds.min.y + span.y / 2.0),
            -(span.z + span.y / 2.5),
        );
        Self::new(mesh).with_translation(translation)
    }

    pub fn with_translation(mut self, translation: Vector3) -> Self {
        self.translation = translation;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_pivot(mut self, pivot: Vector3) -> Self {
        self.pivot = pivot;
        self
    }

    /// Moves the pivot back to the mesh center.
    pub fn reset_pivot(&mut self) {
        self.pivot = self.mesh.object_center;
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn rotation(&self) -> Quaternion {
        self.orientation.rotation()
    }

    /// Object-space point to world space, rotating about the pivot.
    pub fn to_world(&self, point: Vector3) -> Vector3 {
        let pivot = self.pivot;
        rotate(point - pivot, self.rotation()) + pivot + self.translation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_orientation_derives_quaternion() {
        let mut orientation = Orientation::default();
        assert_eq!(orientation.rotation(), math::IDENTITY);

        orientation.rotate_by(Vector3::new(0.0, 90.0, 0.0));
        orientation.rotate_by(Vector3::new(0.0, 90.0, 0.0));
        assert_eq!(orientation.euler(), Vector3::new(0.0, 180.0, 0.0));

        let expected = math::normalize_or_identity(math::from_euler(Vector3::new(0.0, 180.0, 0.0)));
        assert_eq!(orientation.rotation(), expected);
    }

    #[test]
    fn test_orientation_from_rotation_keeps_quaternion() {
        let q = math::from_axis_angle(math::UP, 0.5);
        let orientation = Orientation::from_rotation(q);
        assert_eq!(orientation.rotation(), q);
        assert_relative_eq!(orientation.euler().y, 0.5f64.to_degrees(), epsilon = 1e-9);
    }

    #[test]
    fn test_to_world_rotates_about_center() {
        let mut mesh = Mesh::cube(2.0);
        for v in &mut mesh.vertices {
            *v = *v + Vector3::new(10.0, 0.0, 0.0);
        }
        mesh.bounds.min = mesh.bounds.min + Vector3::new(10.0, 0.0, 0.0);
        mesh.bounds.max = mesh.bounds.max + Vector3::new(10.0, 0.0, 0.0);
        mesh.update_center();

        let object = RenderObject::new(Arc::new(mesh))
            .with_orientation(Orientation::from_euler(Vector3::new(0.0, 180.0, 0.0)))
            .with_translation(Vector3::new(0.0, 0.0, -5.0));

        // the pivot stays put, the point swings around it
        let center = object.to_world(Vector3::new(10.0, 0.0, 0.0));
        assert_relative_eq!(center.x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(center.z, -5.0, epsilon = 1e-9);

        let p = object.to_world(Vector3::new(11.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 9.0, epsilon = 1e-9);
        assert_relative_eq!(p.z, -5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pivot_overrides_mesh_center() {
        let mut object = RenderObject::new(Arc::new(Mesh::cube(2.0)))
            .with_orientation(Orientation::from_euler(Vector3::new(0.0, 180.0, 0.0)))
            .with_pivot(Vector3::new(1.0, 0.0, 0.0));

        // turning half way round (1, 0, 0) sends the origin to (2, 0, 0)
        let p = object.to_world(math::ZERO);
        assert_relative_eq!(p.x, 2.0, epsilon = 1e-9);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-9);

        object.reset_pivot();
        assert_eq!(object.pivot, object.mesh.object_center);
        assert_relative_eq!(object.to_world(math::ZERO).x, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_framed_places_mesh_in_front_of_camera() {
        let object = RenderObject::framed(Arc::new(Mesh::cube(2.0)));
        assert_relative_eq!(object.translation.y, 0.0);
        assert_relative_eq!(object.translation.z, -(2.0 + 2.0 / 2.5));
        assert!(object.to_world(math::ZERO).z < 0.0);
    }

    #[test]
    fn test_instances_share_mesh() {
        let mesh = Arc::new(Mesh::cube(1.0));
        let a = RenderObject::new(Arc::clone(&mesh)).with_description("left");
        let b = RenderObject::new(Arc::clone(&mesh)).with_translation(Vector3::new(3.0, 0.0, 0.0));
        assert!(Arc::ptr_eq(&a.mesh, &b.mesh));
        assert_eq!(a.description, "left");
    }
}
