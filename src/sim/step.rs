//! Fixed timestep episode stepping
//!
//! One `Simulation` owns a vehicle, its reward budget and the episode phase.
//! The track is shared read-only, so many simulations can run side by side
//! on the same raster.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::collision::{self, CollisionResult, PixelScale};
use super::kinematics;
use super::observation::Observation;
use super::reward::RewardAccumulator;
use super::state::{Control, EpisodePhase, VehicleState};
use super::track::Track;
use crate::error::ConfigurationError;
use crate::settings::{Settings, SimulationConfig, VehicleGeometry};

/// What one step produced
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Vehicle state after the step
    pub state: VehicleState,
    /// Remaining reward budget
    pub reward: i64,
    /// Off track or out of reward
    pub terminated: bool,
    /// Reached the goal
    pub done: bool,
}

/// Harness-facing step result with a flattened observation
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub observation: Vec<f32>,
    pub reward: i64,
    pub terminated: bool,
    pub done: bool,
}

/// A single-vehicle episode on a shared track
#[derive(Debug, Clone)]
pub struct Simulation {
    track: Arc<Track>,
    geometry: VehicleGeometry,
    config: SimulationConfig,
    scale: PixelScale,
    initial: VehicleState,
    state: VehicleState,
    reward: RewardAccumulator,
    phase: EpisodePhase,
    steps: u64,
    last: StepOutcome,
}

impl Simulation {
    /// Create a simulation in the `Ready` phase
    pub fn new(track: Arc<Track>, settings: &Settings) -> Result<Self, ConfigurationError> {
        settings.validate()?;

        let scale = PixelScale::new(&track, &settings.vehicle);
        let initial = VehicleState::at_rest(scale.to_world(track.locate_start()));
        let reward = RewardAccumulator::new(settings.simulation.reward_budget);

        Ok(Self {
            track,
            geometry: settings.vehicle,
            config: settings.simulation,
            scale,
            initial,
            state: initial,
            reward,
            phase: EpisodePhase::Ready,
            steps: 0,
            last: StepOutcome {
                state: initial,
                reward: reward.value(),
                terminated: false,
                done: false,
            },
        })
    }

    /// Return to the calibrated start pose with a full reward budget
    pub fn reset(&mut self) -> Vec<f32> {
        self.state = self.initial;
        self.reward.reset();
        self.phase = EpisodePhase::Ready;
        self.steps = 0;
        self.last = StepOutcome {
            state: self.initial,
            reward: self.reward.value(),
            terminated: false,
            done: false,
        };
        log::debug!("Episode reset at {:?}", self.initial.position);
        self.observation().to_vec()
    }

    /// Advance the episode by one timestep.
    ///
    /// Out-of-range controls are clamped. Once the episode has finished the
    /// call does nothing and repeats the final outcome; `reset` starts a new
    /// episode.
    pub fn step(&mut self, control: Control) -> StepOutcome {
        if self.phase.is_finished() {
            log::warn!("step() called on a finished episode ({:?}); reset first", self.phase);
            return self.last;
        }

        let (speed, tire_angle) = control.actuate(&self.geometry);
        self.state.speed = speed;
        self.state.tire_angle = tire_angle;
        self.state = kinematics::advance(&self.state, &self.geometry, self.config.timestep);

        let collision = self.collision();
        self.reward.tick();
        self.steps += 1;

        let terminated = collision.off_track || self.reward.is_exhausted();
        let done = collision.at_goal;
        log::debug!(
            "step {}: pos {:?} heading {:.2} -> {:?}",
            self.steps,
            self.state.position,
            self.state.heading,
            collision
        );

        self.phase = if done {
            EpisodePhase::Done
        } else if terminated {
            EpisodePhase::Terminated
        } else {
            EpisodePhase::Running
        };
        if self.phase.is_finished() {
            log::info!(
                "Episode finished: {:?} after {} steps, reward {}",
                self.phase,
                self.steps,
                self.reward.value()
            );
        }

        self.last = StepOutcome {
            state: self.state,
            reward: self.reward.value(),
            terminated,
            done,
        };
        self.last
    }

    /// Step with raw throttle/steer and flatten the result for a harness
    pub fn transition(&mut self, throttle: f64, steer: f64) -> Transition {
        let outcome = self.step(Control::new(throttle, steer));
        Transition {
            observation: self.observation().to_vec(),
            reward: outcome.reward,
            terminated: outcome.terminated,
            done: outcome.done,
        }
    }

    /// Collision state at the current pose
    pub fn collision(&self) -> CollisionResult {
        collision::evaluate_pixel(self.scale.to_pixel(self.state.position), &self.track)
    }

    pub fn observation(&self) -> Observation<'_> {
        Observation {
            track: &self.track,
            state: self.state,
            geometry: &self.geometry,
        }
    }

    #[inline]
    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    #[inline]
    pub fn phase(&self) -> EpisodePhase {
        self.phase
    }

    #[inline]
    pub fn reward(&self) -> i64 {
        self.reward.value()
    }

    #[inline]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Start pose in world coordinates
    #[inline]
    pub fn initial_state(&self) -> &VehicleState {
        &self.initial
    }

    #[inline]
    pub fn track(&self) -> &Arc<Track> {
        &self.track
    }

    #[inline]
    pub fn geometry(&self) -> &VehicleGeometry {
        &self.geometry
    }

    #[inline]
    pub fn scale(&self) -> PixelScale {
        self.scale
    }
}
