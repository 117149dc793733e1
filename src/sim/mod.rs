//! Deterministic simulation module
//!
//! All episode logic lives here. This module must stay pure and deterministic:
//! - Fixed timestep only
//! - Track raster is read-only after construction
//! - No rendering or platform dependencies

pub mod collision;
pub mod kinematics;
pub mod observation;
pub mod reward;
pub mod state;
pub mod step;
pub mod track;

#[cfg(test)]
pub(crate) mod test_support;

pub use collision::{CollisionResult, PixelScale, evaluate};
pub use kinematics::advance;
pub use observation::Observation;
pub use reward::RewardAccumulator;
pub use state::{Control, EpisodePhase, TurnDirection, VehicleState};
pub use step::{Simulation, StepOutcome, Transition};
pub use track::{Footprint, Rgb, Tile, Track};
