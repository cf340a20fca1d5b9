//! Charge-and-release launcher
//!
//! `Idle -> Charging` on a start trigger the rate limiter accepts.
//! While charging, every tick ramps power, publishes the charge fraction and a
//! fresh trajectory preview. Release fires a real projectile into the live
//! world, clears both sinks, arms the cooldown and returns to `Idle`.
//! Cancel (or dropping the controller) returns to `Idle` without firing.

use glam::Vec3;

use super::projectile::ProjectileId;
use super::rate_limiter::RateLimiter;
use super::shadow::ShadowWorld;
use super::tick::{TickHandle, TickSubscription};
use super::trajectory::TrajectorySampler;
use super::world::PhysicsWorld;
use crate::direction_of;
use crate::error::ConfigError;
use crate::scene::SceneObject;
use crate::settings::{ChargeSettings, LauncherSettings, PreviewSettings, ProjectileTemplate};

/// Receives the charge fraction in `[0, 1]`
pub trait PowerBarSink {
    fn publish_power(&mut self, fraction: f32);
}

/// Receives trajectory previews (empty to clear)
pub trait TrajectorySink {
    fn publish_trajectory(&mut self, points: Vec<Vec3>);
}

impl<F: FnMut(f32)> PowerBarSink for F {
    fn publish_power(&mut self, fraction: f32) {
        self(fraction)
    }
}

impl<F: FnMut(Vec<Vec3>)> TrajectorySink for F {
    fn publish_trajectory(&mut self, points: Vec<Vec3>) {
        self(points)
    }
}

/// Launch origin and direction, supplied by the camera each tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aim {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Aim {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction_of(direction),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargePhase {
    Idle,
    Charging,
}

#[derive(Debug)]
struct Charge {
    started_at: f32,
    last_tick: f32,
    /// Ticks are delivered only while the charge lasts
    subscription: TickSubscription,
}

#[derive(Debug)]
enum Phase {
    Idle,
    Charging(Charge),
}

pub struct PowerChargeController<P: PowerBarSink, T: TrajectorySink> {
    charge: ChargeSettings,
    preview: PreviewSettings,
    template: ProjectileTemplate,
    power: f32,
    phase: Phase,
    limiter: RateLimiter,
    sampler: TrajectorySampler,
    ticks: TickHandle,
    power_bar: P,
    trajectory: T,
}

impl<P: PowerBarSink, T: TrajectorySink> PowerChargeController<P, T> {
    /// Build a controller; rejects invalid charge or preview settings
    pub fn new(
        settings: &LauncherSettings,
        sampler: TrajectorySampler,
        ticks: TickHandle,
        power_bar: P,
        trajectory: T,
    ) -> Result<Self, ConfigError> {
        settings.charge.validate()?;
        settings.preview.validate()?;

        Ok(Self {
            charge: settings.charge,
            preview: settings.preview,
            template: settings.projectile,
            power: settings.charge.min_power,
            phase: Phase::Idle,
            limiter: RateLimiter::starting_at(settings.charge.warm_up),
            sampler,
            ticks,
            power_bar,
            trajectory,
        })
    }

    /// Build the shadow world from `obstacles` and wire a controller to it
    pub fn from_scene<'a>(
        settings: &LauncherSettings,
        obstacles: impl IntoIterator<Item = &'a SceneObject>,
        ticks: TickHandle,
        power_bar: P,
        trajectory: T,
    ) -> Result<Self, ConfigError> {
        let shadow = ShadowWorld::initialize(
            obstacles,
            &settings.world.obstacle_tag,
            settings.world.gravity,
            settings.projectile,
        );
        Self::new(
            settings,
            TrajectorySampler::new(shadow),
            ticks,
            power_bar,
            trajectory,
        )
    }

    /// Start trigger; returns true if charging began
    pub fn start(&mut self, now: f32) -> bool {
        if matches!(self.phase, Phase::Charging(_)) {
            return false;
        }
        if !self.limiter.is_ready(now) {
            log::debug!(
                "Start rejected, cooling down for {:.2}s",
                self.limiter.remaining(now)
            );
            return false;
        }

        self.power = self.charge.min_power;
        self.phase = Phase::Charging(Charge {
            started_at: now,
            last_tick: now,
            subscription: self.ticks.subscribe(),
        });
        log::debug!("Charging started at {now:.2}");
        true
    }

    /// Run every tick delivered to the current charge's subscription
    ///
    /// Returns how many were handled. An idle controller holds no
    /// subscription and receives nothing.
    pub fn drain_ticks(&mut self, aim: Aim) -> Result<u32, ConfigError> {
        let mut handled = 0;
        while let Some(now) = self.next_delivered_tick() {
            self.tick(now, aim)?;
            handled += 1;
        }
        Ok(handled)
    }

    fn next_delivered_tick(&self) -> Option<f32> {
        match &self.phase {
            Phase::Charging(charge) => charge.subscription.next_tick(),
            Phase::Idle => None,
        }
    }

    /// Per-tick update while charging; no-op when idle
    pub fn tick(&mut self, now: f32, aim: Aim) -> Result<(), ConfigError> {
        let Phase::Charging(charge) = &mut self.phase else {
            return Ok(());
        };
        let elapsed = (now - charge.last_tick).max(0.0);
        charge.last_tick = charge.last_tick.max(now);
        self.accumulate(elapsed);

        let fraction = self.fraction();
        self.power_bar.publish_power(fraction);

        let velocity = direction_of(aim.direction) * self.power;
        match self.sampler.sample(
            aim.origin,
            velocity,
            self.preview.sample_count,
            self.preview.sample_step,
        ) {
            Ok(points) => {
                self.trajectory.publish_trajectory(points);
                Ok(())
            }
            Err(err) => {
                log::error!("Trajectory preview failed: {err}");
                Err(err)
            }
        }
    }

    /// Release trigger; fires into `live` when charging
    ///
    /// Returns the launched projectile, `None` when idle. A template that
    /// cannot spawn is reported after the controller has returned to idle.
    pub fn release(
        &mut self,
        now: f32,
        aim: Aim,
        live: &mut PhysicsWorld,
    ) -> Result<Option<ProjectileId>, ConfigError> {
        let last_tick = match &self.phase {
            Phase::Charging(charge) => charge.last_tick,
            Phase::Idle => return Ok(None),
        };
        self.accumulate((now - last_tick).max(0.0));
        let power = self.power;

        let launched = live.spawn(&self.template, aim.origin).map(|id| {
            if let Some(projectile) = live.projectile_mut(id) {
                projectile.fire(aim.direction, power);
            }
            id
        });

        self.trajectory.publish_trajectory(Vec::new());
        self.power_bar.publish_power(0.0);
        if self.limiter.is_ready(now) {
            self.limiter.arm(now, self.charge.fire_rate);
        }
        self.power = self.charge.min_power;
        self.phase = Phase::Idle;

        match launched {
            Ok(id) => {
                log::info!("Launched {} at power {:.2}", id, power);
                Ok(Some(id))
            }
            Err(err) => {
                log::error!("Launch failed: {err}");
                Err(err)
            }
        }
    }

    /// Abort a charge without firing (owner disabled or destroyed)
    pub fn cancel(&mut self) {
        if let Phase::Charging(_) = self.phase {
            self.phase = Phase::Idle;
            self.power = self.charge.min_power;
            self.trajectory.publish_trajectory(Vec::new());
            self.power_bar.publish_power(0.0);
            log::debug!("Charge cancelled");
        }
    }

    fn accumulate(&mut self, elapsed: f32) {
        self.power = (self.power + self.charge.gain_rate * elapsed)
            .clamp(self.charge.min_power, self.charge.max_power);
    }

    pub fn phase(&self) -> ChargePhase {
        match self.phase {
            Phase::Idle => ChargePhase::Idle,
            Phase::Charging(_) => ChargePhase::Charging,
        }
    }

    pub fn power(&self) -> f32 {
        self.power
    }

    /// Charge progress in `[0, 1]` (1 when min and max power coincide)
    pub fn fraction(&self) -> f32 {
        let range = self.charge.max_power - self.charge.min_power;
        if range <= f32::EPSILON {
            return 1.0;
        }
        ((self.power - self.charge.min_power) / range).clamp(0.0, 1.0)
    }

    pub fn charge_started_at(&self) -> Option<f32> {
        match &self.phase {
            Phase::Charging(charge) => Some(charge.started_at),
            Phase::Idle => None,
        }
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn sampler(&self) -> &TrajectorySampler {
        &self.sampler
    }

    pub fn power_bar(&self) -> &P {
        &self.power_bar
    }

    pub fn trajectory_sink(&self) -> &T {
        &self.trajectory
    }
}

impl<P: PowerBarSink, T: TrajectorySink> Drop for PowerChargeController<P, T> {
    fn drop(&mut self) {
        self.cancel();
    }
}
