//! Trajectory sampling in the shadow world
//!
//! Each sample spawns a throwaway projectile, fires it, steps the shadow world
//! a fixed number of times recording positions, and discards it again. Nothing
//! but the obstacle clones survives between calls.

use glam::Vec3;

use super::projectile::ProjectileId;
use super::shadow::ShadowWorld;
use crate::error::ConfigError;
use crate::settings::validate_preview;
use crate::split_velocity;

pub struct TrajectorySampler {
    shadow: ShadowWorld,
}

impl TrajectorySampler {
    pub fn new(shadow: ShadowWorld) -> Self {
        Self { shadow }
    }

    /// Predict `sample_count` positions, starting with `origin`
    ///
    /// Consecutive positions are `step_duration` seconds of shadow time apart.
    pub fn sample(
        &mut self,
        origin: Vec3,
        initial_velocity: Vec3,
        sample_count: usize,
        step_duration: f32,
    ) -> Result<Vec<Vec3>, ConfigError> {
        validate_preview(sample_count, step_duration)?;
        let id = self.launch(origin, initial_velocity)?;

        let mut points = Vec::with_capacity(sample_count);
        points.push(origin);

        let mut last = origin;
        for _ in 1..sample_count {
            self.shadow.step(step_duration);
            if let Some(projectile) = self.shadow.projectile(id) {
                last = projectile.pos;
            }
            points.push(last);
        }

        self.shadow.discard(id);
        Ok(points)
    }

    /// Where a launch first touches static geometry within the sampled window
    pub fn predict_impact(
        &mut self,
        origin: Vec3,
        initial_velocity: Vec3,
        sample_count: usize,
        step_duration: f32,
    ) -> Result<Option<Vec3>, ConfigError> {
        validate_preview(sample_count, step_duration)?;
        let id = self.launch(origin, initial_velocity)?;

        let mut impact = None;
        for _ in 1..sample_count {
            self.shadow.step(step_duration);
            impact = self.shadow.projectile(id).and_then(|p| p.first_contact);
            if impact.is_some() {
                break;
            }
        }

        self.shadow.discard(id);
        Ok(impact)
    }

    fn launch(&mut self, origin: Vec3, initial_velocity: Vec3) -> Result<ProjectileId, ConfigError> {
        let id = self.shadow.spawn(origin)?;
        let (direction, speed) = split_velocity(initial_velocity);
        if let Some(projectile) = self.shadow.projectile_mut(id) {
            projectile.fire(direction, speed);
        }
        Ok(id)
    }

    pub fn shadow(&self) -> &ShadowWorld {
        &self.shadow
    }
}
