//! Launchable projectile
//!
//! The one rigid-body kind in the simulation: a sphere that receives impulses,
//! optionally expires after a lifetime, and can be hidden from rendering while
//! its physics stays active (shadow-world samples).

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::direction_of;
use crate::settings::ProjectileTemplate;

/// Generational handle to a projectile inside a `PhysicsWorld`
///
/// A stale handle (its projectile despawned, slot reused) never resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectileId {
    pub index: u32,
    pub generation: u32,
}

impl std::fmt::Display for ProjectileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}v{}", self.index, self.generation)
    }
}

/// A projectile body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: ProjectileId,
    pub pos: Vec3,
    pub vel: Vec3,
    pub radius: f32,
    inv_mass: f32,
    pub restitution: f32,
    pub friction: f32,
    pub linear_damping: f32,
    /// Seconds left before despawn (`None` = lives until explicitly removed)
    pub remaining_lifetime: Option<f32>,
    /// Whether the renderer should draw this body
    pub visible: bool,
    /// Where the body first touched static geometry
    pub first_contact: Option<Vec3>,
}

impl Projectile {
    /// Instantiate from a template at rest
    ///
    /// Callers validate the template first; `mass` is assumed positive.
    pub(crate) fn from_template(id: ProjectileId, template: &ProjectileTemplate, pos: Vec3) -> Self {
        Self {
            id,
            pos,
            vel: Vec3::ZERO,
            radius: template.radius,
            inv_mass: 1.0 / template.mass,
            restitution: template.restitution,
            friction: template.friction,
            linear_damping: template.linear_damping,
            remaining_lifetime: (template.lifetime > 0.0).then_some(template.lifetime),
            visible: true,
            first_contact: None,
        }
    }

    /// Apply an impulse of magnitude `speed` along `direction`
    ///
    /// Impulses accumulate: firing twice adds both velocity changes.
    pub fn fire(&mut self, direction: Vec3, speed: f32) {
        self.apply_impulse(direction_of(direction) * speed);
    }

    /// Add a raw impulse vector to the body's momentum
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        self.vel += impulse * self.inv_mass;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn mass(&self) -> f32 {
        1.0 / self.inv_mass
    }

    /// Momentum (mass * velocity)
    pub fn momentum(&self) -> Vec3 {
        self.vel * self.mass()
    }

    /// Count down the lifetime; returns true once the projectile should despawn
    pub fn age(&mut self, dt: f32) -> bool {
        match self.remaining_lifetime.as_mut() {
            Some(remaining) => {
                *remaining -= dt;
                *remaining <= 0.0
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projectile(template: &ProjectileTemplate) -> Projectile {
        Projectile::from_template(
            ProjectileId {
                index: 0,
                generation: 0,
            },
            template,
            Vec3::ZERO,
        )
    }

    #[test]
    fn test_fire_normalizes_direction() {
        let mut p = projectile(&ProjectileTemplate::default());
        p.fire(Vec3::new(0.0, 0.0, 10.0), 15.0);
        assert!((p.vel - Vec3::new(0.0, 0.0, 15.0)).length() < 1e-5);
    }

    #[test]
    fn test_fire_is_additive() {
        let mut p = projectile(&ProjectileTemplate::default());
        p.fire(Vec3::X, 3.0);
        p.fire(Vec3::Y, 4.0);
        assert!((p.vel - Vec3::new(3.0, 4.0, 0.0)).length() < 1e-5);
        assert!((p.momentum().length() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_impulse_scales_with_mass() {
        let template = ProjectileTemplate {
            mass: 2.0,
            ..Default::default()
        };
        let mut p = projectile(&template);
        p.fire(Vec3::X, 10.0);
        assert!((p.vel.x - 5.0).abs() < 1e-6);
        assert!((p.momentum().x - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_zero_direction_applies_nothing() {
        let mut p = projectile(&ProjectileTemplate::default());
        p.fire(Vec3::ZERO, 50.0);
        assert_eq!(p.vel, Vec3::ZERO);
    }

    #[test]
    fn test_lifetime_countdown() {
        let template = ProjectileTemplate {
            lifetime: 1.0,
            ..Default::default()
        };
        let mut p = projectile(&template);
        assert!(!p.age(0.6));
        assert!(p.age(0.6));
    }

    #[test]
    fn test_non_positive_lifetime_never_expires() {
        let template = ProjectileTemplate {
            lifetime: 0.0,
            ..Default::default()
        };
        let mut p = projectile(&template);
        assert!(p.remaining_lifetime.is_none());
        assert!(!p.age(1_000.0));
    }

    #[test]
    fn test_visibility_toggle() {
        let mut p = projectile(&ProjectileTemplate::default());
        assert!(p.visible);
        p.set_visible(false);
        assert!(!p.visible);
    }
}
