//! Frame-driven controller that owns a simulation and applies control actions.
//!
//! A host calls [`FluidController::apply`] for discrete commands and
//! [`FluidController::frame`] once per rendered frame. Physics ticks happen
//! inside `frame` at the fixed timestep, so reallocation from `apply` can
//! never land in the middle of a step.

use crate::controls;
use crate::input::{ControlAction, InputState};
use crate::settings::{ControlSettings, Settings};
use crate::stats::PerformanceStats;
use crate::wind::WindController;
use brook_core::{FixedTimestep, FluidSimulation, SimulationError, StepStats};
use std::time::Duration;

/// What happened during one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub ticks: u32,
    pub spawned: usize,
    /// Stats of the last tick run this frame, if any.
    pub last_step: Option<StepStats>,
}

pub struct FluidController {
    sim: FluidSimulation,
    clock: FixedTimestep,
    wind: WindController,
    controls: ControlSettings,
    input: InputState,
    stats: PerformanceStats,
    paused: bool,
}

impl FluidController {
    pub fn new(sim: FluidSimulation, controls: ControlSettings) -> Self {
        let clock = FixedTimestep::from_seconds(sim.config().timestep);
        Self {
            sim,
            clock,
            wind: WindController::new(controls.wind_strength),
            controls,
            input: InputState::default(),
            stats: PerformanceStats::new(),
            paused: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, SimulationError> {
        let sim = FluidSimulation::new(settings.simulation, settings.params)?;
        Ok(Self::new(sim, settings.controls.clone()))
    }

    pub fn simulation(&self) -> &FluidSimulation {
        &self.sim
    }

    pub fn simulation_mut(&mut self) -> &mut FluidSimulation {
        &mut self.sim
    }

    pub fn wind(&self) -> &WindController {
        &self.wind
    }

    pub fn stats(&self) -> &PerformanceStats {
        &self.stats
    }

    pub fn clock(&self) -> &FixedTimestep {
        &self.clock
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn apply(&mut self, action: ControlAction) {
        tracing::debug!(?action, "control action");
        match action {
            ControlAction::TogglePause => {
                self.paused = !self.paused;
                if !self.paused {
                    self.clock.discard_backlog();
                }
            }
            ControlAction::Reset => {
                self.sim.reset_to_initial();
                self.paused = false;
                self.clock.discard_backlog();
            }
            ControlAction::ToggleWind => {
                let enabled = !self.wind.is_enabled();
                self.wind.set_enabled(enabled, &mut self.sim);
            }
            ControlAction::SetWindInput(wind) => {
                self.input.wind = wind;
                self.wind.set_input(wind);
            }
            ControlAction::SpawnBurst(position) => {
                let spread = 2.0 * self.sim.params().particle_radius;
                self.sim
                    .spawn_scattered(position, self.controls.burst_count, spread);
            }
            ControlAction::BeginSpawn(position) => self.input.spawn_point = Some(position),
            ControlAction::EndSpawn => self.input.spawn_point = None,
            ControlAction::ClearAll => self.sim.clear_all(),
            ControlAction::SetMaxParticles(count) => {
                // The applied wind lives in the params, which survive reallocation.
                self.sim
                    .set_max_capacity(controls::clamp_max_particles(count));
            }
            ControlAction::SetViscosity(value) => {
                self.sim.set_viscosity(controls::VISCOSITY.clamp(value))
            }
            ControlAction::SetStiffness(value) => {
                self.sim.set_stiffness(controls::STIFFNESS.clamp(value))
            }
            ControlAction::SetDamping(value) => self.sim.set_damping(controls::DAMPING.clamp(value)),
            ControlAction::SetGravityY(value) => {
                let mut gravity = self.sim.gravity();
                gravity.y = controls::GRAVITY_Y.clamp(value);
                self.sim.set_gravity(gravity);
            }
        }
    }

    /// Advance one rendered frame of `delta` wall time.
    pub fn frame(&mut self, delta: Duration) -> FrameReport {
        let mut report = FrameReport::default();

        self.wind.apply(&mut self.sim);

        if !self.paused {
            report.ticks = self.clock.advance(delta);
            for _ in 0..report.ticks {
                report.last_step = Some(self.sim.tick());
            }
        }

        if let Some(point) = self.input.spawn_point {
            let spread = self.sim.params().particle_radius;
            report.spawned = self
                .sim
                .spawn_scattered(point, self.controls.particles_per_frame, spread);
        }

        self.stats.frame(delta, report.ticks, &self.sim);
        if let Some(step) = report.last_step {
            self.stats.last_step = step;
        }
        report
    }
}
