//! Shadow world
//!
//! An isolated physics domain holding invisible, read-only copies of the
//! scene's static obstacles. Trajectory previews are simulated here so that
//! speculative stepping never perturbs the live world.

use glam::Vec3;

use super::collision::Collider;
use super::projectile::{Projectile, ProjectileId};
use super::shape::{Shape, Transform};
use super::world::PhysicsWorld;
use crate::error::ConfigError;
use crate::scene::SceneObject;
use crate::settings::ProjectileTemplate;

/// Static geometry mirrored from the live scene
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleClone {
    /// Name of the source object
    pub source: String,
    pub shape: Shape,
    pub transform: Transform,
    /// Always false: clones are never drawn
    pub visible: bool,
}

pub struct ShadowWorld {
    physics: PhysicsWorld,
    obstacles: Vec<ObstacleClone>,
    template: ProjectileTemplate,
}

impl ShadowWorld {
    /// Create the domain and mirror every object tagged `obstacle_tag`
    ///
    /// Source objects are only read. An empty source is fine: previews then
    /// show free flight only.
    pub fn initialize<'a>(
        source: impl IntoIterator<Item = &'a SceneObject>,
        obstacle_tag: &str,
        gravity: Vec3,
        template: ProjectileTemplate,
    ) -> Self {
        let mut physics = PhysicsWorld::new(gravity);
        let mut obstacles = Vec::new();

        for object in source.into_iter().filter(|o| o.is_tagged(obstacle_tag)) {
            let clone = ObstacleClone {
                source: object.name.clone(),
                shape: object.shape,
                transform: object.transform,
                visible: false,
            };
            physics.add_collider(Collider::new(clone.shape, clone.transform));
            obstacles.push(clone);
        }

        log::info!(
            "Shadow world initialized with {} obstacle clones (tag {:?})",
            obstacles.len(),
            obstacle_tag
        );

        Self {
            physics,
            obstacles,
            template,
        }
    }

    /// Spawn an invisible, non-expiring projectile at rest
    pub fn spawn(&mut self, position: Vec3) -> Result<ProjectileId, ConfigError> {
        let template = ProjectileTemplate {
            lifetime: 0.0,
            ..self.template
        };
        let id = self.physics.spawn(&template, position)?;
        if let Some(projectile) = self.physics.projectile_mut(id) {
            projectile.set_visible(false);
        }
        Ok(id)
    }

    /// Advance only the shadow domain
    pub fn step(&mut self, duration: f32) {
        self.physics.step(duration);
    }

    /// Destroy a shadow projectile immediately
    pub fn discard(&mut self, id: ProjectileId) {
        if !self.physics.despawn(id) {
            log::warn!("Discard of unknown shadow projectile {}", id);
        }
    }

    pub fn projectile(&self, id: ProjectileId) -> Option<&Projectile> {
        self.physics.projectile(id)
    }

    pub fn projectile_mut(&mut self, id: ProjectileId) -> Option<&mut Projectile> {
        self.physics.projectile_mut(id)
    }

    pub fn obstacles(&self) -> &[ObstacleClone] {
        &self.obstacles
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    /// Shadow projectiles currently alive (0 between samples)
    pub fn live_projectile_count(&self) -> usize {
        self.physics.projectile_count()
    }

    pub fn template(&self) -> &ProjectileTemplate {
        &self.template
    }
}
