//! Raster Racer - a single-vehicle track simulation for reinforcement learning
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, track raster, collisions, episodes)
//! - `settings`: Vehicle geometry and simulation configuration
//! - `error`: Configuration errors

pub mod error;
pub mod settings;
pub mod sim;

pub use error::ConfigurationError;
pub use settings::{Settings, SimulationConfig, VehicleGeometry};

/// World-space 2D vector (centimeters)
pub type Vector2 = glam::DVec2;

/// Simulation constants
pub mod consts {
    /// Heading of a freshly reset vehicle (degrees, straight up the raster)
    pub const UP_HEADING: f64 = 90.0;
    /// Full turn (degrees)
    pub const FULL_TURN: f64 = 360.0;
    /// Half turn (degrees)
    pub const HALF_TURN: f64 = 180.0;

    /// Default reward budget (steps before forced termination)
    pub const DEFAULT_REWARD_BUDGET: u32 = 200;
    /// Default fixed timestep (seconds)
    pub const DEFAULT_TIMESTEP: f64 = 0.1;

    /// Tire angles below this magnitude (degrees) drive straight
    pub const STRAIGHT_TIRE_EPSILON: f64 = 1e-6;
    /// Speeds below this magnitude (cm/s) leave the pose untouched
    pub const STANDSTILL_EPSILON: f64 = 1e-9;
}

/// Normalize a heading to [0, 360) degrees
#[inline]
pub fn normalize_heading(heading: f64) -> f64 {
    let h = heading.rem_euclid(consts::FULL_TURN);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if h >= consts::FULL_TURN { 0.0 } else { h }
}

/// Convert polar (r, degrees) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f64, degrees: f64) -> Vector2 {
    let theta = degrees.to_radians();
    Vector2::new(r * theta.cos(), r * theta.sin())
}

/// Unit vector pointing along a heading (degrees)
#[inline]
pub fn heading_direction(degrees: f64) -> Vector2 {
    polar_to_cartesian(1.0, degrees)
}
