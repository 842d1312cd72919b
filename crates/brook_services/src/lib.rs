//! Brook Services Layer
//!
//! Host-side glue between a control surface (panel, keyboard, script) and the
//! solver: settings files, control actions, wind, spawning and telemetry.
//! Nothing here draws anything.

pub mod controller;
pub mod controls;
pub mod input;
pub mod settings;
pub mod stats;
pub mod wind;

pub use controller::{FluidController, FrameReport};
pub use controls::ParamRange;
pub use input::{ControlAction, InputState, WindInput};
pub use settings::{ControlSettings, Settings, SettingsError};
pub use stats::PerformanceStats;
pub use wind::WindController;
