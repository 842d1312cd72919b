//! Brook Runtime
//!
//! Headless host: loads settings, runs a scripted control session against the
//! fluid at a nominal 60 Hz frame rate and logs telemetry.
//!
//! Usage: `brook [settings.json] [frames]`

use anyhow::{Context, Result};
use brook_core::glam::Vec3;
use brook_services::{ControlAction, FluidController, Settings, WindInput};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

const FRAME: Duration = Duration::from_micros(16_667);
const DEFAULT_FRAMES: u32 = 600;
const REPORT_EVERY: u32 = 60;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Brook v{}", brook_core::VERSION);

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(&path).with_context(|| format!("loading {path}"))?,
        None => Settings::default(),
    };
    let frames = match args.next() {
        Some(raw) => raw
            .parse::<u32>()
            .with_context(|| format!("frame count '{raw}' is not a number"))?,
        None => DEFAULT_FRAMES,
    };

    let mut controller =
        FluidController::from_settings(&settings).context("creating fluid simulation")?;
    let started = Instant::now();

    for frame in 0..frames {
        for action in script(frame) {
            controller.apply(action);
        }

        let report = controller.frame(FRAME);
        if let Some(step) = report.last_step {
            if step.sanitized > 0 {
                tracing::warn!(frame, sanitized = step.sanitized, "unstable step");
            }
        }

        if frame % REPORT_EVERY == REPORT_EVERY - 1 {
            log_stats(&controller, frame);
        }
    }

    let elapsed = started.elapsed();
    let ticks = controller.clock().tick_count();
    tracing::info!(
        frames,
        ticks,
        wall_ms = elapsed.as_secs_f64() * 1000.0,
        ms_per_tick = elapsed.as_secs_f64() * 1000.0 / ticks.max(1) as f64,
        "session finished"
    );
    Ok(())
}

/// Scripted stand-in for a user at the control panel.
fn script(frame: u32) -> Vec<ControlAction> {
    let spawn_point = Vec3::new(0.0, 3.0, 0.0);
    match frame {
        60 => vec![ControlAction::BeginSpawn(spawn_point)],
        120 => vec![ControlAction::EndSpawn],
        180 => vec![
            ControlAction::ToggleWind,
            ControlAction::SetWindInput(WindInput {
                right: true,
                ..Default::default()
            }),
        ],
        300 => vec![ControlAction::ToggleWind],
        360 => vec![ControlAction::SpawnBurst(spawn_point)],
        420 => vec![ControlAction::SetViscosity(0.5), ControlAction::SetStiffness(400.0)],
        480 => vec![ControlAction::Reset],
        _ => Vec::new(),
    }
}

fn log_stats(controller: &FluidController, frame: u32) {
    let stats = controller.stats();
    let sim = controller.simulation();
    tracing::info!(
        frame,
        active = stats.active_particles,
        max = stats.max_particles,
        gravity = ?sim.gravity(),
        cell_overflow = stats.last_step.cell_overflow,
        neighbors_truncated = stats.last_step.neighbors_truncated,
        "{}",
        stats
    );
    for (stage, time) in &stats.stage_timings {
        tracing::debug!(stage, micros = time.as_micros() as u64, "stage timing");
    }
}
