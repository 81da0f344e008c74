//! Arcade Shooter headless driver
//!
//! Runs the simulation in a fixed-step loop with an autopilot pressing keys,
//! logging game events as they happen. Useful for soak runs and for
//! producing world snapshots for renderer work.
//!
//! Run with `--help` for options.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;

use arcade_shooter::sim::{GameEvent, GamePhase, World, tick};
use arcade_shooter::{Config, Controller, normalize_angle};

/// Frame period when pacing to real time
const FRAME: Duration = Duration::from_micros(16_667);

#[derive(Debug, clap::Parser)]
#[command(about = "Run the arena shooter simulation headless with an autopilot")]
struct Options {
    /// RNG seed for the world
    #[arg(long, default_value_t = 12345)]
    seed: u64,
    /// Frames to simulate before stopping
    #[arg(long, default_value_t = 3600)]
    frames: u64,
    /// JSON config file; defaults are used if it fails to load
    #[arg(long)]
    config: Option<PathBuf>,
    /// Pace frames to real time
    #[arg(long)]
    realtime: bool,
    /// Print the final world snapshot as JSON
    #[arg(long)]
    snapshot: bool,
}

/// Presses keys like a player would: turn toward the nearest enemy, tap fire
/// when roughly lined up.
#[derive(Debug, Default)]
struct Autopilot {
    held: Vec<&'static str>,
    fire_down: bool,
}

impl Autopilot {
    const AIM_TOLERANCE: f32 = 0.05;

    fn drive(&mut self, world: &World, controller: &mut Controller) {
        for key in self.held.drain(..) {
            controller.on_key_up(key);
        }
        if self.fire_down {
            controller.on_key_up("f");
            self.fire_down = false;
        }

        let Some(player) = world.player() else {
            return;
        };
        let center = player.center();
        let target = world
            .entities()
            .iter()
            .filter(|e| e.is_enemy())
            .min_by(|a, b| {
                a.center()
                    .distance(center)
                    .partial_cmp(&b.center().distance(center))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        let Some(target) = target else {
            return;
        };

        let to_target = target.center() - center;
        let error = normalize_angle(to_target.y.atan2(to_target.x) - player.direction);
        let key = if error > Self::AIM_TOLERANCE {
            Some("ArrowRight")
        } else if error < -Self::AIM_TOLERANCE {
            Some("ArrowLeft")
        } else {
            None
        };
        if let Some(key) = key {
            controller.on_key_down(key);
            self.held.push(key);
        } else {
            controller.on_key_down("f");
            self.fire_down = true;
        }
    }
}

fn log_event(frame: u64, event: &GameEvent) {
    match event {
        GameEvent::BulletFired { id } => log::debug!("[{frame}] PEW! bullet {id}"),
        GameEvent::ExplosionSpawned { id, position } => {
            log::debug!("[{frame}] BOOM! explosion {id} at {position}")
        }
        GameEvent::PlayerHit { enemy, damage } => {
            log::info!("[{frame}] player hit by enemy {enemy} for {damage}")
        }
        other => log::debug!("[{frame}] {other:?}"),
    }
}

fn main() {
    env_logger::init();
    let options = Options::parse();
    log::info!("Arcade Shooter (headless) starting: {options:?}");

    let config = match &options.config {
        Some(path) => Config::load_or_default(path),
        None => Config::default(),
    };
    let mut world = World::new(config, options.seed);
    let mut controller = Controller::with_default_bindings();
    let mut autopilot = Autopilot::default();

    let (mut kills, mut shots) = (0u32, 0u32);
    let started = Instant::now();
    let mut next_frame = Instant::now();

    for _ in 0..options.frames {
        autopilot.drive(&world, &mut controller);
        let events = tick(&mut world, &mut controller);
        for event in &events {
            match event {
                GameEvent::EnemyKilled { .. } => kills += 1,
                GameEvent::BulletFired { .. } => shots += 1,
                _ => {}
            }
            log_event(world.frame, event);
        }

        if world.phase == GamePhase::GameOver {
            break;
        }

        if options.realtime {
            next_frame += FRAME;
            if let Some(wait) = next_frame.checked_duration_since(Instant::now()) {
                std::thread::sleep(wait);
            }
        }
    }

    log::info!(
        "Stopped after {} frames in {:.2?}: {:?}, {} shots, {} kills, {} entities live",
        world.frame,
        started.elapsed(),
        world.phase,
        shots,
        kills,
        world.entities().len()
    );

    if options.snapshot {
        match serde_json::to_string_pretty(&world.snapshot()) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to serialize snapshot: {e}"),
        }
    }
}
