//! Shadow Shot entry point
//!
//! Headless demo: builds a seeded scene, charges a shot for a scripted number
//! of fixed ticks, releases it into the live world and compares where the
//! preview said it would land with where it actually lands.
//!
//! Usage: `shadow-shot [settings.json] [seed]`

use anyhow::{Context, Result};
use glam::Vec3;

use shadow_shot::sim::{
    Aim, PowerChargeController, ShadowWorld, TickSource, TrajectorySampler, TrajectorySink,
};
use shadow_shot::{LauncherSettings, Scene};

/// Fixed ticks the trigger is held for
const HOLD_TICKS: u32 = 150;
/// Upper bound on live ticks simulated after release
const FLIGHT_TICKS: u32 = 1_000;
const DEFAULT_SEED: u64 = 42;

/// Keeps the most recent non-empty preview
#[derive(Debug, Default)]
struct PreviewLog {
    last: Vec<Vec3>,
    published: usize,
}

impl TrajectorySink for PreviewLog {
    fn publish_trajectory(&mut self, points: Vec<Vec3>) {
        self.published += 1;
        if !points.is_empty() {
            self.last = points;
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Shadow Shot starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => LauncherSettings::load(&path)
            .with_context(|| format!("failed to load settings from {path}"))?,
        None => LauncherSettings::default(),
    };
    let seed = match args.next() {
        Some(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("invalid seed {raw:?}"))?,
        None => DEFAULT_SEED,
    };

    let scene = Scene::demo(seed);
    let gravity = settings.world.gravity;
    let mut live = scene.live_world(gravity);

    let mut ticks = TickSource::default();
    let mut launcher = PowerChargeController::from_scene(
        &settings,
        scene.iter(),
        ticks.handle(),
        |fraction: f32| log::trace!("Power bar {:.0}%", fraction * 100.0),
        PreviewLog::default(),
    )
    .context("invalid launcher settings")?;

    // Separate sampler so the estimate uses the same obstacle set as the preview
    let mut estimator = TrajectorySampler::new(ShadowWorld::initialize(
        scene.iter(),
        &settings.world.obstacle_tag,
        gravity,
        settings.projectile,
    ));

    let aim = Aim::new(Vec3::new(0.0, 1.5, 0.0), Vec3::new(0.0, 0.35, 1.0));

    // Wait out the configured warm-up
    while !launcher.start(ticks.now()) {
        if ticks.now() > settings.charge.warm_up + settings.charge.fire_rate {
            anyhow::bail!("launcher refused to start charging");
        }
        ticks.tick();
        live.step(ticks.fixed_dt());
    }

    let mut held = 0;
    while held < HOLD_TICKS {
        ticks.advance(ticks.fixed_dt());
        while ticks.next_tick().is_some() {
            launcher.drain_ticks(aim).context("preview failed")?;
            live.step(ticks.fixed_dt());
            held += 1;
        }
    }

    let now = ticks.now();
    let power = launcher.power();
    let predicted = estimator
        .predict_impact(aim.origin, aim.direction * power, FLIGHT_TICKS as usize, ticks.fixed_dt())
        .context("impact prediction failed")?;

    let preview = &launcher.trajectory_sink().last;
    log::info!(
        "Charged to {:.2} ({:.0}%), {} previews, last preview ends at {:?}",
        power,
        launcher.fraction() * 100.0,
        launcher.trajectory_sink().published,
        preview.last()
    );

    let id = launcher
        .release(now, aim, &mut live)
        .context("launch failed")?
        .context("launcher was not charging")?;

    let mut actual = None;
    for _ in 0..FLIGHT_TICKS {
        live.step(ticks.fixed_dt());
        ticks.tick();
        match live.projectile(id) {
            Some(projectile) if projectile.first_contact.is_some() => {
                actual = projectile.first_contact;
                break;
            }
            Some(_) => {}
            None => break,
        }
    }

    match (predicted, actual) {
        (Some(predicted), Some(actual)) => log::info!(
            "Predicted impact {:?}, actual {:?} (off by {:.3})",
            predicted,
            actual,
            predicted.distance(actual)
        ),
        (predicted, actual) => log::info!("Predicted impact {:?}, actual {:?}", predicted, actual),
    }

    log::info!(
        "Cooldown until {:.2}, {} projectiles in the live world",
        launcher.rate_limiter().next_allowed_time(),
        live.projectile_count()
    );
    Ok(())
}
