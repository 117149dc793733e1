//! Flat observation vector for learning harnesses
//!
//! Layout: every raster byte (row-major, channels interleaved) followed by
//! five normalized scalars: position x, position y, speed / max speed,
//! heading / 360, tire angle / max tire angle.

use super::state::VehicleState;
use super::track::Track;
use crate::consts::FULL_TURN;
use crate::settings::VehicleGeometry;

/// Number of vehicle scalars appended after the raster
pub const VEHICLE_FEATURES: usize = 5;

/// Borrowed view of everything an observation is built from
#[derive(Debug, Clone, Copy)]
pub struct Observation<'a> {
    pub track: &'a Track,
    pub state: VehicleState,
    pub geometry: &'a VehicleGeometry,
}

impl Observation<'_> {
    /// Total length of the flattened vector
    pub fn feature_count(&self) -> usize {
        self.track.as_bytes().len() + VEHICLE_FEATURES
    }

    /// The normalized vehicle scalars
    pub fn vehicle_features(&self) -> [f32; VEHICLE_FEATURES] {
        [
            self.state.position.x as f32,
            self.state.position.y as f32,
            (self.state.speed / self.geometry.max_speed) as f32,
            (self.state.heading / FULL_TURN) as f32,
            (self.state.tire_angle / self.geometry.max_tire_angle) as f32,
        ]
    }

    /// Flatten into a single `f32` vector
    pub fn to_vec(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.feature_count());
        out.extend(self.track.as_bytes().iter().map(|&b| f32::from(b)));
        out.extend_from_slice(&self.vehicle_features());
        out
    }
}
