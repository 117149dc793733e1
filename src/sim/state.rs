//! Vehicle state and per-step control types

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Vector2;
use crate::consts::{STRAIGHT_TIRE_EPSILON, UP_HEADING};
use crate::settings::VehicleGeometry;

/// Current phase of an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodePhase {
    /// Freshly reset, no steps taken
    Ready,
    /// At least one step taken, not finished
    Running,
    /// Left the track or ran out of reward
    Terminated,
    /// Reached the goal
    Done,
}

impl EpisodePhase {
    /// Whether the episode has ended
    pub fn is_finished(&self) -> bool {
        matches!(self, EpisodePhase::Terminated | EpisodePhase::Done)
    }
}

/// Turning direction, resolved once from the tire angle sign.
///
/// Positive tire angles turn right, negative turn left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnDirection {
    Left,
    Right,
    Straight,
}

impl TurnDirection {
    pub fn from_tire_angle(tire_angle: f64) -> Self {
        if tire_angle.abs() < STRAIGHT_TIRE_EPSILON {
            TurnDirection::Straight
        } else if tire_angle > 0.0 {
            TurnDirection::Right
        } else {
            TurnDirection::Left
        }
    }

    /// +1 for right turns, -1 for left turns, 0 when straight
    #[inline]
    pub fn sign(&self) -> f64 {
        match self {
            TurnDirection::Left => -1.0,
            TurnDirection::Right => 1.0,
            TurnDirection::Straight => 0.0,
        }
    }
}

/// Pose and actuator state of the vehicle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    /// Vehicle center (world cm, origin bottom-left)
    pub position: Vector2,
    /// Heading in degrees, [0, 360), 90 = up the raster
    pub heading: f64,
    /// Signed speed (cm/s)
    pub speed: f64,
    /// Front tire angle (degrees), positive steers right
    pub tire_angle: f64,
}

impl VehicleState {
    /// State at the start of an episode
    pub fn at_rest(position: Vector2) -> Self {
        Self {
            position,
            heading: UP_HEADING,
            speed: 0.0,
            tire_angle: 0.0,
        }
    }

    #[inline]
    pub fn turn_direction(&self) -> TurnDirection {
        TurnDirection::from_tire_angle(self.tire_angle)
    }
}

/// Normalized control input for one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Control {
    /// Fraction of max speed, [-1, 1]
    pub throttle: f64,
    /// Fraction of max tire angle, [-1, 1], positive steers right
    pub steer: f64,
}

impl Control {
    pub fn new(throttle: f64, steer: f64) -> Self {
        Self { throttle, steer }
    }

    /// Clamp both channels into [-1, 1]; non-finite values become 0
    pub fn clamped(&self) -> Self {
        let clamped = Self {
            throttle: clamp_unit(self.throttle),
            steer: clamp_unit(self.steer),
        };
        if clamped != *self {
            log::warn!(
                "Control ({}, {}) clamped to ({}, {})",
                self.throttle,
                self.steer,
                clamped.throttle,
                clamped.steer
            );
        }
        clamped
    }

    /// Uniform random control for exploration
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            throttle: rng.random_range(-1.0..=1.0),
            steer: rng.random_range(-1.0..=1.0),
        }
    }

    /// Speed (cm/s) and tire angle (degrees) this control commands
    pub fn actuate(&self, geometry: &VehicleGeometry) -> (f64, f64) {
        let control = self.clamped();
        (
            control.throttle * geometry.max_speed,
            control.steer * geometry.max_tire_angle,
        )
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}
