//! Launcher settings
//!
//! Loaded from a JSON file by the native binary; every field has a default so
//! partial files are fine. `validate` is the single gate between user input
//! and the simulation: nothing downstream re-checks these values.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// The launchable body kind (stand-in for a prefab)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTemplate {
    /// Collision sphere radius
    pub radius: f32,
    /// Body mass; impulses change velocity by `impulse / mass`
    pub mass: f32,
    /// Seconds until a live projectile despawns (<= 0 means never)
    pub lifetime: f32,
    /// Bounciness on contact (0 = no bounce, 1 = perfectly elastic)
    pub restitution: f32,
    /// Tangential velocity removed per contact (0..1)
    pub friction: f32,
    /// Fraction of velocity lost per second
    pub linear_damping: f32,
}

impl Default for ProjectileTemplate {
    fn default() -> Self {
        Self {
            radius: PROJECTILE_RADIUS,
            mass: PROJECTILE_MASS,
            lifetime: PROJECTILE_LIFETIME,
            restitution: 0.3,
            friction: 0.2,
            linear_damping: 0.0,
        }
    }
}

impl ProjectileTemplate {
    /// Check that the template can produce a physics body
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ConfigError::InvalidTemplate("radius must be positive"));
        }
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(ConfigError::InvalidTemplate("mass must be positive"));
        }
        if !self.lifetime.is_finite() {
            return Err(ConfigError::InvalidTemplate("lifetime must be finite"));
        }
        if !(0.0..=1.0).contains(&self.restitution) || !(0.0..=1.0).contains(&self.friction) {
            return Err(ConfigError::InvalidTemplate(
                "restitution and friction must be within 0..=1",
            ));
        }
        if !(self.linear_damping.is_finite() && self.linear_damping >= 0.0) {
            return Err(ConfigError::InvalidTemplate("damping must be non-negative"));
        }
        Ok(())
    }
}

/// Power ramp and cooldown
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargeSettings {
    /// Seconds between launches
    pub fire_rate: f32,
    /// Power at the start of a charge
    pub min_power: f32,
    /// Power ceiling
    pub max_power: f32,
    /// Power gained per second while charging
    pub gain_rate: f32,
    /// Clock time before the first charge may start
    pub warm_up: f32,
}

impl Default for ChargeSettings {
    fn default() -> Self {
        Self {
            fire_rate: FIRE_RATE,
            min_power: MIN_LAUNCH_POWER,
            max_power: MAX_LAUNCH_POWER,
            gain_rate: LAUNCH_POWER_GAIN,
            warm_up: 0.0,
        }
    }
}

impl ChargeSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("fire_rate", self.fire_rate)?;
        non_negative("gain_rate", self.gain_rate)?;
        non_negative("warm_up", self.warm_up)?;
        // Out-of-range power is handled by clamping; only the ordering matters
        finite("min_power", self.min_power)?;
        finite("max_power", self.max_power)?;
        if self.min_power > self.max_power {
            return Err(ConfigError::PowerRange {
                min: self.min_power,
                max: self.max_power,
            });
        }
        Ok(())
    }
}

/// Trajectory preview resolution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    /// Number of positions per preview, including the origin
    pub sample_count: usize,
    /// Shadow-world time advanced between two positions
    pub sample_step: f32,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            sample_count: PREVIEW_SAMPLE_COUNT,
            sample_step: PREVIEW_STEP,
        }
    }
}

impl PreviewSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_preview(self.sample_count, self.sample_step)
    }
}

/// Physics domain parameters shared by the live and shadow worlds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    pub gravity: Vec3,
    /// Tag selecting which scene objects are mirrored into the shadow world
    pub obstacle_tag: String,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -GRAVITY, 0.0),
            obstacle_tag: OBSTACLE_TAG.to_string(),
        }
    }
}

/// Complete launcher configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LauncherSettings {
    pub charge: ChargeSettings,
    pub preview: PreviewSettings,
    pub world: WorldSettings,
    pub projectile: ProjectileTemplate,
}

impl LauncherSettings {
    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.charge.validate()?;
        self.preview.validate()?;
        if !self.world.gravity.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "gravity",
                value: f32::NAN,
            });
        }
        self.projectile.validate()
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded launcher settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Launcher settings saved");
        Ok(())
    }
}

/// Shared by `PreviewSettings` and the trajectory sampler's per-call check
pub(crate) fn validate_preview(sample_count: usize, sample_step: f32) -> Result<(), ConfigError> {
    if sample_count == 0 {
        return Err(ConfigError::ZeroSampleCount);
    }
    if sample_count > MAX_PREVIEW_SAMPLES {
        return Err(ConfigError::SampleCountTooLarge {
            count: sample_count,
            max: MAX_PREVIEW_SAMPLES,
        });
    }
    if !(sample_step.is_finite() && sample_step > 0.0) {
        return Err(ConfigError::NonPositiveStep(sample_step));
    }
    Ok(())
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}
