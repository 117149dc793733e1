//! Vehicle geometry and simulation settings
//!
//! Persisted as JSON. Everything here is created once and never mutated
//! by the simulation.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Vector2;
use crate::consts::{DEFAULT_REWARD_BUDGET, DEFAULT_TIMESTEP};
use crate::error::ConfigurationError;

/// Physical description of the vehicle (centimeters, degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleGeometry {
    /// Widest point of the vehicle, tires included
    pub body_width: f64,
    /// Nose to tail length, tires included
    pub body_length: f64,
    /// Distance between front and rear axle along the longitudinal axis.
    /// Sets the turning radius on its own; it is not re-derived from
    /// `rear_right_wheel` when both are given.
    pub wheelbase: f64,
    /// Top speed (cm/s)
    pub max_speed: f64,
    /// Largest deviation of the front tire from straight ahead (degrees)
    pub max_tire_angle: f64,
    /// Rear right wheel relative to the vehicle center (x right, y forward).
    /// Only places the rear axle (the turning center and the distance from
    /// it to the vehicle center).
    pub rear_right_wheel: Vector2,
}

impl Default for VehicleGeometry {
    fn default() -> Self {
        Self::from_wheel_positions(
            20.0,
            40.0,
            300.0,
            30.0,
            Vector2::new(8.0, 12.0),
            Vector2::new(8.0, -12.0),
        )
    }
}

impl VehicleGeometry {
    /// Build geometry from tire positions relative to the vehicle center.
    /// The wheelbase is the longitudinal gap between the two.
    pub fn from_wheel_positions(
        body_width: f64,
        body_length: f64,
        max_speed: f64,
        max_tire_angle: f64,
        front_right_wheel: Vector2,
        rear_right_wheel: Vector2,
    ) -> Self {
        Self {
            body_width,
            body_length,
            wheelbase: front_right_wheel.y - rear_right_wheel.y,
            max_speed,
            max_tire_angle,
            rear_right_wheel,
        }
    }

    /// Rear left wheel (mirror of the rear right wheel across the longitudinal axis)
    #[inline]
    pub fn rear_left_wheel(&self) -> Vector2 {
        Vector2::new(-self.rear_right_wheel.x, self.rear_right_wheel.y)
    }

    /// Midpoint of the rear axle in the body frame
    #[inline]
    pub fn rear_axle_midpoint(&self) -> Vector2 {
        (self.rear_left_wheel() + self.rear_right_wheel) / 2.0
    }

    /// Check the geometry invariants
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        ensure_above("wheelbase", self.wheelbase, 0.0)?;
        ensure_above("max_speed", self.max_speed, 0.0)?;
        ensure_above("body_length", self.body_length, 0.0)?;
        ensure_above("body_width", self.body_width, 0.0)?;
        if !self.rear_right_wheel.is_finite() {
            return Err(ConfigurationError::NonFinite {
                field: "rear_right_wheel",
            });
        }
        if !(self.max_tire_angle > 0.0 && self.max_tire_angle < 90.0) {
            return Err(ConfigurationError::RangeViolation {
                field: "max_tire_angle",
                min: 0.0,
                max: 90.0,
                value: self.max_tire_angle,
            });
        }
        Ok(())
    }
}

/// Episode timing configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Fixed timestep (seconds)
    #[serde(default = "SimulationConfig::default_timestep")]
    pub timestep: f64,
    /// Steps allowed before forced termination
    #[serde(default = "SimulationConfig::default_reward_budget")]
    pub reward_budget: u32,
}

impl SimulationConfig {
    const fn default_timestep() -> f64 {
        DEFAULT_TIMESTEP
    }

    const fn default_reward_budget() -> u32 {
        DEFAULT_REWARD_BUDGET
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        ensure_above("timestep", self.timestep, 0.0)?;
        ensure_above("reward_budget", f64::from(self.reward_budget), 0.0)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            timestep: Self::default_timestep(),
            reward_budget: Self::default_reward_budget(),
        }
    }
}

/// Complete simulation settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub vehicle: VehicleGeometry,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl Settings {
    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize settings as pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigurationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigurationError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.vehicle.validate()?;
        self.simulation.validate()
    }
}

fn ensure_above(field: &'static str, value: f64, min: f64) -> Result<(), ConfigurationError> {
    // Written negated so NaN fails too
    if !(value > min) {
        return Err(ConfigurationError::MinViolation { field, min, value });
    }
    Ok(())
}
