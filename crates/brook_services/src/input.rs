//! Input state and the actions a control surface can issue

use glam::Vec3;

/// Held wind-direction inputs (arrow keys on a keyboard host).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl WindInput {
    /// Unit-per-axis wind direction. Left wins over right, up over down.
    pub fn direction(&self) -> Vec3 {
        let x = if self.left {
            -1.0
        } else if self.right {
            1.0
        } else {
            0.0
        };
        let z = if self.up {
            1.0
        } else if self.down {
            -1.0
        } else {
            0.0
        };
        Vec3::new(x, 0.0, z)
    }
}

/// Continuous input sampled every frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    pub wind: WindInput,
    /// Where particles stream in while spawning is held.
    pub spawn_point: Option<Vec3>,
}

/// Discrete commands from a panel, keyboard or script.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlAction {
    TogglePause,
    Reset,
    ToggleWind,
    SetWindInput(WindInput),
    /// One-shot burst around a point.
    SpawnBurst(Vec3),
    /// Start streaming particles at a point every frame.
    BeginSpawn(Vec3),
    EndSpawn,
    ClearAll,
    SetMaxParticles(usize),
    SetViscosity(f32),
    SetStiffness(f32),
    SetDamping(f32),
    SetGravityY(f32),
}
