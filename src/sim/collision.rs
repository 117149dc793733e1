//! Track boundary and goal detection
//!
//! The vehicle is mapped to a raster pixel and its footprint is sampled
//! around that pixel. Boundary checks sample only the four footprint corners;
//! goal checks sample every pixel of the footprint so thin finish lines are
//! not skipped over. Samples falling outside the raster contribute nothing.

use glam::I64Vec2;

use super::track::{Tile, Track};
use crate::Vector2;
use crate::settings::VehicleGeometry;

/// Result of a collision check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionResult {
    /// A footprint corner lies on a bad tile
    pub off_track: bool,
    /// Some footprint pixel lies on an end tile
    pub at_goal: bool,
}

/// Conversion between world centimeters and raster pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelScale {
    pub pixels_per_cm: f64,
    raster_height: i64,
}

impl PixelScale {
    /// The start marker is drawn at vehicle size, so its pixel height over the
    /// body length gives the scale.
    pub fn new(track: &Track, geometry: &VehicleGeometry) -> Self {
        Self {
            pixels_per_cm: track.footprint().height as f64 / geometry.body_length,
            raster_height: track.height() as i64,
        }
    }

    /// World position to raster coordinates `(x, row)`
    pub fn to_pixel(&self, position: Vector2) -> I64Vec2 {
        let x = (position.x * self.pixels_per_cm).round() as i64;
        let y = (position.y * self.pixels_per_cm).round() as i64;
        I64Vec2::new(x, self.raster_height - y - 1)
    }

    /// Bottom-up pixel coordinates to world position
    pub fn to_world(&self, pixel: Vector2) -> Vector2 {
        pixel / self.pixels_per_cm
    }
}

/// Evaluate boundary and goal collisions for a world position
pub fn evaluate(position: Vector2, track: &Track, geometry: &VehicleGeometry) -> CollisionResult {
    let pixel = PixelScale::new(track, geometry).to_pixel(position);
    evaluate_pixel(pixel, track)
}

/// Evaluate boundary and goal collisions for a raster pixel
pub fn evaluate_pixel(pixel: I64Vec2, track: &Track) -> CollisionResult {
    CollisionResult {
        off_track: samples_tile(track, pixel, corner_offsets(track), Tile::Bad),
        at_goal: samples_tile(track, pixel, footprint_offsets(track), Tile::End),
    }
}

/// Whether any in-bounds sample around `pixel` classifies as `tile`
pub fn samples_tile(
    track: &Track,
    pixel: I64Vec2,
    mut offsets: impl Iterator<Item = I64Vec2>,
    tile: Tile,
) -> bool {
    offsets.any(|offset| {
        let p = pixel + offset;
        track.tile(p.x, p.y) == Some(tile)
    })
}

/// The four footprint corners relative to the vehicle pixel
pub fn corner_offsets(track: &Track) -> impl Iterator<Item = I64Vec2> {
    let (xs, ys) = half_extents(track);
    [
        I64Vec2::new(xs.0, ys.0),
        I64Vec2::new(xs.0, ys.1),
        I64Vec2::new(xs.1, ys.0),
        I64Vec2::new(xs.1, ys.1),
    ]
    .into_iter()
}

/// Every pixel of the footprint relative to the vehicle pixel
pub fn footprint_offsets(track: &Track) -> impl Iterator<Item = I64Vec2> {
    let (xs, ys) = half_extents(track);
    (xs.0..=xs.1).flat_map(move |x| (ys.0..=ys.1).map(move |y| I64Vec2::new(x, y)))
}

/// Footprint half spans, negative side rounded toward negative infinity
fn half_extents(track: &Track) -> ((i64, i64), (i64, i64)) {
    let footprint = track.footprint();
    (
        ((-footprint.width).div_euclid(2), footprint.width.div_euclid(2)),
        ((-footprint.height).div_euclid(2), footprint.height.div_euclid(2)),
    )
}
