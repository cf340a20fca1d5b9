//! Shadow Shot - charge-and-release launcher with trajectory preview
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics domains, shadow world, charge loop)
//! - `scene`: Obstacle source the worlds are built from
//! - `settings`: Data-driven launcher configuration
//! - `error`: Configuration errors

pub mod error;
pub mod scene;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use scene::{Scene, SceneObject};
pub use settings::{LauncherSettings, ProjectileTemplate};

use glam::Vec3;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz physics clock)
    pub const FIXED_DT: f32 = 1.0 / 50.0;
    /// Maximum fixed steps per frame to prevent spiral of death
    pub const MAX_TICKS_PER_FRAME: u32 = 8;
    /// Maximum collision substeps per body per physics step
    pub const MAX_SUBSTEPS: u32 = 16;
    /// Sphere-tracing iterations for a single sweep
    pub const RAYMARCH_STEPS: usize = 32;

    /// Preview defaults
    pub const PREVIEW_SAMPLE_COUNT: usize = 20;
    /// Upper bound on positions per preview (re-sampled every tick)
    pub const MAX_PREVIEW_SAMPLES: usize = 1024;
    /// Each preview step covers three fixed ticks
    pub const PREVIEW_STEP: f32 = FIXED_DT * 3.0;

    /// Launch defaults
    pub const FIRE_RATE: f32 = 0.5;
    pub const MIN_LAUNCH_POWER: f32 = 10.0;
    pub const MAX_LAUNCH_POWER: f32 = 20.0;
    /// Power gained per second while the trigger is held
    pub const LAUNCH_POWER_GAIN: f32 = 2.0;

    /// Projectile defaults
    pub const PROJECTILE_RADIUS: f32 = 0.25;
    pub const PROJECTILE_MASS: f32 = 1.0;
    pub const PROJECTILE_LIFETIME: f32 = 15.0;

    /// Standard gravity (m/s², applied along -Y)
    pub const GRAVITY: f32 = 9.81;

    /// Tag marking scene objects mirrored into the shadow world
    pub const OBSTACLE_TAG: &str = "Obstacle";
}

/// Normalize a direction, falling back to zero for degenerate input
#[inline]
pub fn direction_of(v: Vec3) -> Vec3 {
    v.normalize_or_zero()
}

/// Split a vector into (unit direction, magnitude)
#[inline]
pub fn split_velocity(v: Vec3) -> (Vec3, f32) {
    let speed = v.length();
    if speed > f32::EPSILON {
        (v / speed, speed)
    } else {
        (Vec3::ZERO, 0.0)
    }
}
