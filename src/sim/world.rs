//! Physics domain
//!
//! A `PhysicsWorld` owns static colliders and projectile bodies and advances
//! them under gravity. The live world and the shadow world are two separate
//! values of this type: stepping one can never touch the other.

use glam::Vec3;

use super::collision::{Collider, deepest_collision, resolve_velocity, union_distance};
use super::projectile::{Projectile, ProjectileId};
use super::sdf::raymarch_collision;
use crate::consts::{MAX_SUBSTEPS, RAYMARCH_STEPS};
use crate::error::ConfigError;
use crate::settings::ProjectileTemplate;

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    projectile: Option<Projectile>,
}

/// An independent physics simulation
#[derive(Debug, Clone, Default)]
pub struct PhysicsWorld {
    gravity: Vec3,
    colliders: Vec<Collider>,
    /// Projectile storage indexed by `ProjectileId::index` (stable iteration order)
    slots: Vec<Slot>,
    free_indices: Vec<u32>,
    /// Total simulated seconds
    elapsed: f32,
}

impl PhysicsWorld {
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity,
            ..Default::default()
        }
    }

    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn add_collider(&mut self, collider: Collider) {
        self.colliders.push(collider);
    }

    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    /// Instantiate a projectile at rest
    ///
    /// An unusable template is reported and nothing is spawned.
    pub fn spawn(
        &mut self,
        template: &ProjectileTemplate,
        pos: Vec3,
    ) -> Result<ProjectileId, ConfigError> {
        template.validate()?;

        let id = if let Some(index) = self.free_indices.pop() {
            ProjectileId {
                index,
                generation: self.slots[index as usize].generation,
            }
        } else {
            self.slots.push(Slot::default());
            ProjectileId {
                index: (self.slots.len() - 1) as u32,
                generation: 0,
            }
        };

        self.slots[id.index as usize].projectile = Some(Projectile::from_template(id, template, pos));
        Ok(id)
    }

    /// Remove a projectile immediately; returns false for stale handles
    pub fn despawn(&mut self, id: ProjectileId) -> bool {
        let Some(slot) = self.slots.get_mut(id.index as usize) else {
            return false;
        };
        if slot.generation != id.generation || slot.projectile.is_none() {
            return false;
        }
        slot.projectile = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_indices.push(id.index);
        true
    }

    pub fn projectile(&self, id: ProjectileId) -> Option<&Projectile> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.projectile.as_ref())
    }

    pub fn projectile_mut(&mut self, id: ProjectileId) -> Option<&mut Projectile> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.projectile.as_mut())
    }

    pub fn is_alive(&self, id: ProjectileId) -> bool {
        self.projectile(id).is_some()
    }

    /// Iterate over live projectiles in index order
    pub fn projectiles(&self) -> impl Iterator<Item = &Projectile> {
        self.slots.iter().filter_map(|slot| slot.projectile.as_ref())
    }

    pub fn projectile_count(&self) -> usize {
        self.projectiles().count()
    }

    /// Advance the simulation by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.elapsed += dt;

        let gravity = self.gravity;
        let colliders = &self.colliders;
        let mut expired = Vec::new();

        for slot in &mut self.slots {
            let Some(projectile) = slot.projectile.as_mut() else {
                continue;
            };
            integrate(projectile, colliders, gravity, dt);
            if projectile.age(dt) {
                expired.push(projectile.id);
            }
        }

        for id in expired {
            log::debug!("Projectile {} expired", id);
            self.despawn(id);
        }
    }
}

/// Semi-implicit Euler with swept collision against static geometry
fn integrate(p: &mut Projectile, colliders: &[Collider], gravity: Vec3, dt: f32) {
    p.vel += gravity * dt;
    if p.linear_damping > 0.0 {
        p.vel *= (1.0 - p.linear_damping * dt).max(0.0);
    }

    if colliders.is_empty() {
        p.pos += p.vel * dt;
        return;
    }

    // Never travel more than half a radius per substep
    let travel = p.vel.length() * dt;
    let substeps = ((travel / (p.radius * 0.5)).ceil() as u32).clamp(1, MAX_SUBSTEPS);
    let h = dt / substeps as f32;

    for _ in 0..substeps {
        let motion = p.vel * h;
        let sweep = raymarch_collision(p.pos, p.pos + motion, p.radius, RAYMARCH_STEPS, |q| {
            union_distance(colliders, q)
        });

        match sweep {
            Some((t, normal)) if motion.dot(normal) < 0.0 => {
                p.pos += motion * t;
                note_contact(p, normal);
                p.vel = resolve_velocity(p.vel, normal, p.restitution, p.friction);
                p.pos += p.vel * (h * (1.0 - t));
            }
            _ => p.pos += motion,
        }

        let contact = deepest_collision(p.pos, p.radius, colliders);
        if contact.hit {
            p.pos += contact.normal * contact.penetration;
            note_contact(p, contact.normal);
            p.vel = resolve_velocity(p.vel, contact.normal, p.restitution, p.friction);
        }
    }
}

fn note_contact(p: &mut Projectile, normal: Vec3) {
    if p.first_contact.is_none() {
        p.first_contact = Some(p.pos - normal * p.radius);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::shape::{Shape, Transform};

    fn gravity() -> Vec3 {
        Vec3::new(0.0, -9.81, 0.0)
    }

    fn ground_world() -> PhysicsWorld {
        let mut world = PhysicsWorld::new(gravity());
        world.add_collider(Collider::new(Shape::HalfSpace, Transform::IDENTITY));
        world
    }

    #[test]
    fn test_spawn_and_despawn() {
        let mut world = PhysicsWorld::new(gravity());
        let id = world
            .spawn(&ProjectileTemplate::default(), Vec3::ONE)
            .expect("valid template");
        assert!(world.is_alive(id));
        assert_eq!(world.projectile_count(), 1);
        assert_eq!(world.projectile(id).map(|p| p.pos), Some(Vec3::ONE));

        assert!(world.despawn(id));
        assert!(!world.is_alive(id));
        assert!(!world.despawn(id));
        assert_eq!(world.projectile_count(), 0);
    }

    #[test]
    fn test_stale_handle_does_not_resolve_after_reuse() {
        let mut world = PhysicsWorld::new(gravity());
        let template = ProjectileTemplate::default();
        let first = world.spawn(&template, Vec3::ZERO).expect("spawn");
        world.despawn(first);
        let second = world.spawn(&template, Vec3::X).expect("spawn");
        assert_eq!(first.index, second.index);
        assert!(world.projectile(first).is_none());
        assert!(world.projectile(second).is_some());
    }

    #[test]
    fn test_invalid_template_spawns_nothing() {
        let mut world = PhysicsWorld::new(gravity());
        let template = ProjectileTemplate {
            radius: -1.0,
            ..Default::default()
        };
        assert!(world.spawn(&template, Vec3::ZERO).is_err());
        assert_eq!(world.projectile_count(), 0);
    }

    #[test]
    fn test_free_fall_matches_semi_implicit_euler() {
        let mut world = PhysicsWorld::new(gravity());
        let id = world
            .spawn(&ProjectileTemplate::default(), Vec3::ZERO)
            .expect("spawn");
        world.step(0.1);
        world.step(0.1);
        let p = world.projectile(id).expect("alive");
        // v1 = -0.981, x1 = -0.0981; v2 = -1.962, x2 = -0.2943
        assert!((p.vel.y + 1.962).abs() < 1e-4);
        assert!((p.pos.y + 0.2943).abs() < 1e-4);
    }

    #[test]
    fn test_projectile_rests_on_ground() {
        let mut world = ground_world();
        let template = ProjectileTemplate {
            lifetime: 0.0,
            ..Default::default()
        };
        let id = world
            .spawn(&template, Vec3::new(0.0, 3.0, 0.0))
            .expect("spawn");
        for _ in 0..300 {
            world.step(0.02);
        }
        let p = world.projectile(id).expect("alive");
        assert!(p.pos.y >= template.radius - 0.05, "sank to {}", p.pos.y);
        assert!(p.pos.y < template.radius + 0.1, "floating at {}", p.pos.y);
        let contact = p.first_contact.expect("touched ground");
        assert!(contact.y.abs() < 0.05);
    }

    #[test]
    fn test_fast_projectile_does_not_tunnel_through_wall() {
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        world.add_collider(Collider::new(
            Shape::Cuboid {
                half_extents: Vec3::new(0.1, 5.0, 5.0),
            },
            Transform::from_translation(Vec3::new(5.0, 0.0, 0.0)),
        ));
        let id = world
            .spawn(&ProjectileTemplate::default(), Vec3::ZERO)
            .expect("spawn");
        if let Some(p) = world.projectile_mut(id) {
            p.fire(Vec3::X, 200.0);
        }
        for _ in 0..10 {
            world.step(0.02);
        }
        let p = world.projectile(id).expect("alive");
        assert!(p.pos.x < 5.0, "tunnelled to x = {}", p.pos.x);
        assert!(p.vel.x <= 0.0);
    }

    #[test]
    fn test_lifetime_expiry_despawns() {
        let mut world = PhysicsWorld::new(gravity());
        let template = ProjectileTemplate {
            lifetime: 0.05,
            ..Default::default()
        };
        let id = world.spawn(&template, Vec3::ZERO).expect("spawn");
        world.step(0.02);
        world.step(0.02);
        assert!(world.is_alive(id));
        world.step(0.02);
        assert!(!world.is_alive(id));
    }

    #[test]
    fn test_iteration_in_index_order() {
        let mut world = PhysicsWorld::new(gravity());
        let template = ProjectileTemplate::default();
        let a = world.spawn(&template, Vec3::ZERO).expect("spawn");
        let b = world.spawn(&template, Vec3::ONE).expect("spawn");
        let ids: Vec<_> = world.projectiles().map(|p| p.id).collect();
        assert_eq!(ids, vec![a, b]);
    }
}
