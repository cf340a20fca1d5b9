//! Collision detection and response against static colliders
//!
//! Dynamic bodies are spheres. Static geometry is any number of `Collider`s;
//! the world treats them as one union SDF (minimum of the individual
//! distances) for sweeping, then resolves against the deepest contact.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::sdf::sdf_gradient;
use super::shape::{Shape, Transform};

/// A static, immovable collider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    pub shape: Shape,
    pub transform: Transform,
}

impl Collider {
    pub fn new(shape: Shape, transform: Transform) -> Self {
        Self { shape, transform }
    }

    #[inline]
    pub fn distance(&self, p: Vec3) -> f32 {
        self.shape.distance(&self.transform, p)
    }

    /// Cheap rejection: can a ball at `center` possibly touch this collider?
    #[inline]
    pub fn may_touch(&self, center: Vec3, radius: f32) -> bool {
        match self.shape.bounding_radius() {
            Some(bound) => {
                let reach = bound + radius;
                center.distance_squared(self.transform.translation) <= reach * reach
            }
            None => true,
        }
    }
}

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Closest surface point (if hit)
    pub point: Vec3,
    /// Surface normal at contact, pointing away from the collider
    pub normal: Vec3,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec3::ZERO,
            normal: Vec3::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check a ball against a single collider
pub fn ball_collider_collision(center: Vec3, radius: f32, collider: &Collider) -> CollisionResult {
    let dist = collider.distance(center);
    if dist >= radius {
        return CollisionResult::miss();
    }

    let normal = sdf_gradient(center, |p| collider.distance(p));
    // Degenerate gradient (center exactly on a medial axis): push straight up
    let normal = if normal == Vec3::ZERO { Vec3::Y } else { normal };

    CollisionResult {
        hit: true,
        point: center - normal * dist,
        normal,
        penetration: radius - dist,
    }
}

/// Deepest contact between a ball and any collider
pub fn deepest_collision(center: Vec3, radius: f32, colliders: &[Collider]) -> CollisionResult {
    colliders
        .iter()
        .filter(|c| c.may_touch(center, radius))
        .map(|c| ball_collider_collision(center, radius, c))
        .filter(|r| r.hit)
        .max_by(|a, b| a.penetration.total_cmp(&b.penetration))
        .unwrap_or_else(CollisionResult::miss)
}

/// Union distance field over all colliders
pub fn union_distance(colliders: &[Collider], p: Vec3) -> f32 {
    colliders
        .iter()
        .map(|c| c.distance(p))
        .fold(f32::MAX, f32::min)
}

/// Velocity after contact
///
/// The normal component is reflected and scaled by `restitution`; the
/// tangential component loses `friction` of its magnitude. Bodies already
/// separating are left alone.
pub fn resolve_velocity(velocity: Vec3, normal: Vec3, restitution: f32, friction: f32) -> Vec3 {
    let vn = velocity.dot(normal);
    if vn >= 0.0 {
        return velocity;
    }
    let normal_part = normal * vn;
    let tangent_part = velocity - normal_part;
    tangent_part * (1.0 - friction) - normal_part * restitution
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ground() -> Collider {
        Collider::new(Shape::HalfSpace, Transform::IDENTITY)
    }

    #[test]
    fn test_ball_ground_collision() {
        let result = ball_collider_collision(Vec3::new(0.0, 0.2, 0.0), 0.5, &ground());
        assert!(result.hit);
        assert!((result.penetration - 0.3).abs() < 1e-5);
        assert!((result.normal - Vec3::Y).length() < 1e-3);
        assert!(result.point.y.abs() < 1e-4);
    }

    #[test]
    fn test_ball_above_ground_misses() {
        let result = ball_collider_collision(Vec3::new(0.0, 2.0, 0.0), 0.5, &ground());
        assert!(!result.hit);
    }

    #[test]
    fn test_deepest_collision_picks_largest_penetration() {
        let wall = Collider::new(
            Shape::Cuboid {
                half_extents: Vec3::new(0.5, 5.0, 5.0),
            },
            Transform::from_translation(Vec3::new(1.0, 0.0, 0.0)),
        );
        // Ball at x=0.3: 0.2 from the wall face at x=0.5, radius 0.5 -> 0.3 deep
        // and 0.9 above ground -> no ground contact
        let result = deepest_collision(Vec3::new(0.3, 0.9, 0.0), 0.5, &[ground(), wall]);
        assert!(result.hit);
        assert!((result.normal - Vec3::NEG_X).length() < 1e-3);
    }

    #[test]
    fn test_bounding_rejection() {
        let pillar = Collider::new(
            Shape::Sphere { radius: 1.0 },
            Transform::from_translation(Vec3::new(10.0, 0.0, 0.0)),
        );
        assert!(!pillar.may_touch(Vec3::ZERO, 0.5));
        assert!(pillar.may_touch(Vec3::new(8.6, 0.0, 0.0), 0.5));
    }

    #[test]
    fn test_resolve_velocity_bounce_and_friction() {
        let v = resolve_velocity(Vec3::new(2.0, -4.0, 0.0), Vec3::Y, 0.5, 0.25);
        assert!((v - Vec3::new(1.5, 2.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_resolve_velocity_ignores_separating_body() {
        let v = Vec3::new(1.0, 3.0, 0.0);
        assert_eq!(resolve_velocity(v, Vec3::Y, 0.5, 0.5), v);
    }

    #[test]
    fn test_union_distance_empty_is_far() {
        assert_eq!(union_distance(&[], Vec3::ZERO), f32::MAX);
    }
}
