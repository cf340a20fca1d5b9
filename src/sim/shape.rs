//! Collider geometry
//!
//! A static collider is a `Shape` placed in the world by a `Transform`
//! (translation + rotation). Distances are evaluated by moving the query point
//! into the shape's local frame.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::sdf::{sd_box, sd_capsule, sd_plane, sd_sphere};

/// Rigid placement of a shape in the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation.normalize();
        self
    }

    /// World point -> local frame
    #[inline]
    pub fn to_local(&self, p: Vec3) -> Vec3 {
        self.rotation.inverse() * (p - self.translation)
    }

    /// Local point -> world frame
    #[inline]
    pub fn to_world(&self, p: Vec3) -> Vec3 {
        self.rotation * p + self.translation
    }
}

/// Collision shapes (all centered on their local origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Sphere { radius: f32 },
    /// Box with the given half extents along local X/Y/Z
    Cuboid { half_extents: Vec3 },
    /// Capsule along local Y
    Capsule { half_height: f32, radius: f32 },
    /// Infinite ground: solid below the plane through the origin with local +Y normal
    HalfSpace,
}

impl Shape {
    /// Signed distance from a local-frame point
    pub fn local_distance(&self, p: Vec3) -> f32 {
        match *self {
            Shape::Sphere { radius } => sd_sphere(p, radius),
            Shape::Cuboid { half_extents } => sd_box(p, half_extents),
            Shape::Capsule {
                half_height,
                radius,
            } => sd_capsule(p, half_height, radius),
            Shape::HalfSpace => sd_plane(p, Vec3::Y),
        }
    }

    /// Signed distance from a world point, with the shape placed by `transform`
    #[inline]
    pub fn distance(&self, transform: &Transform, p: Vec3) -> f32 {
        self.local_distance(transform.to_local(p))
    }

    /// Radius of a sphere around the local origin enclosing the shape
    /// (`None` for unbounded shapes)
    pub fn bounding_radius(&self) -> Option<f32> {
        match *self {
            Shape::Sphere { radius } => Some(radius),
            Shape::Cuboid { half_extents } => Some(half_extents.length()),
            Shape::Capsule {
                half_height,
                radius,
            } => Some(half_height + radius),
            Shape::HalfSpace => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_translated_sphere_distance() {
        let shape = Shape::Sphere { radius: 1.0 };
        let transform = Transform::from_translation(Vec3::new(5.0, 0.0, 0.0));
        assert!((shape.distance(&transform, Vec3::new(8.0, 0.0, 0.0)) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotated_cuboid_distance() {
        // Long along local X; rotate 90° about Z so it stands along world Y
        let shape = Shape::Cuboid {
            half_extents: Vec3::new(4.0, 0.5, 0.5),
        };
        let transform = Transform::IDENTITY.with_rotation(Quat::from_rotation_z(FRAC_PI_2));
        // A point 3 units up is inside the rotated box
        assert!(shape.distance(&transform, Vec3::new(0.0, 3.0, 0.0)) < 0.0);
        // ...but 3 units along X is outside
        assert!(shape.distance(&transform, Vec3::new(3.0, 0.0, 0.0)) > 0.0);
    }

    #[test]
    fn test_half_space_follows_transform() {
        let transform = Transform::from_translation(Vec3::new(0.0, -1.0, 0.0));
        assert!((Shape::HalfSpace.distance(&transform, Vec3::ZERO) - 1.0).abs() < 1e-6);
        assert!(Shape::HalfSpace.bounding_radius().is_none());
    }

    #[test]
    fn test_transform_round_trip() {
        let transform = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0))
            .with_rotation(Quat::from_rotation_y(0.7));
        let p = Vec3::new(-4.0, 0.5, 9.0);
        assert!((transform.to_world(transform.to_local(p)) - p).length() < 1e-5);
    }
}
