//! Pixel raster track
//!
//! A track is an immutable grid of RGB pixels drawn in four canonical colors.
//! Start marker geometry (its bounding box) is derived once at construction
//! and doubles as the vehicle footprint: the marker is drawn at the size of
//! the vehicle, so its pixel span calibrates both collision sampling and the
//! pixel-to-world scale.
//!
//! Pixel coordinates come in two flavours:
//! - raster coordinates `(x, row)`, row 0 at the top
//! - bottom-up coordinates `(x, y)`, `y = height - 1 - row`

use bytemuck::{Pod, Zeroable};
use glam::I64Vec2;
use serde::{Deserialize, Serialize};

use crate::Vector2;
use crate::error::ConfigurationError;

/// One raster pixel
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BAD: Rgb = Rgb::new(0, 0, 0);
    pub const START: Rgb = Rgb::new(255, 0, 0);
    pub const END: Rgb = Rgb::new(0, 255, 0);
    pub const ROAD: Rgb = Rgb::new(255, 255, 255);
}

/// Semantic tile classification (exact color match)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    Bad,
    Start,
    End,
    Road,
    /// Any other color; passable
    Other,
}

impl Tile {
    pub fn classify(pixel: Rgb) -> Self {
        match pixel {
            Rgb::BAD => Tile::Bad,
            Rgb::START => Tile::Start,
            Rgb::END => Tile::End,
            Rgb::ROAD => Tile::Road,
            _ => Tile::Other,
        }
    }
}

/// Vehicle footprint in pixels (bounding box span of the start marker)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footprint {
    pub width: i64,
    pub height: i64,
}

/// Immutable track raster with cached start/goal data
#[derive(Debug, Clone)]
pub struct Track {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
    start: Vector2,
    footprint: Footprint,
    ends: Vec<Vector2>,
}

impl Track {
    /// Build a track from row-major pixels.
    ///
    /// Fails if the raster is empty, has no start or end tiles, or if the
    /// start marker is a single row (zero footprint height).
    pub fn new(width: usize, height: usize, pixels: Vec<Rgb>) -> Result<Self, ConfigurationError> {
        let expected = raster_bytes(width, height)?;
        if pixels.len() != expected / 3 {
            return Err(ConfigurationError::RasterSizeMismatch {
                expected,
                actual: pixels.len() * 3,
            });
        }

        let mut track = Self {
            width,
            height,
            pixels,
            start: Vector2::ZERO,
            footprint: Footprint { width: 0, height: 0 },
            ends: Vec::new(),
        };

        let (min, max) = bounding_box(track.tile_positions(Tile::Start))
            .ok_or(ConfigurationError::MissingStartTiles)?;
        track.footprint = Footprint {
            width: max.x - min.x,
            height: max.y - min.y,
        };
        if track.footprint.height == 0 {
            return Err(ConfigurationError::DegenerateStartMarker {
                width: track.footprint.width,
                height: track.footprint.height,
            });
        }
        track.start = (min + max).as_dvec2() / 2.0;

        track.ends = track
            .tile_positions(Tile::End)
            .map(|p| p.as_dvec2())
            .collect();
        if track.ends.is_empty() {
            return Err(ConfigurationError::MissingEndTiles);
        }

        log::info!(
            "Track {}x{}: start {:?}, footprint {}x{}, {} end tiles",
            width,
            height,
            track.start,
            track.footprint.width,
            track.footprint.height,
            track.ends.len()
        );
        Ok(track)
    }

    /// Build a track from interleaved row-major RGB bytes
    pub fn from_rgb_bytes(width: usize, height: usize, bytes: &[u8]) -> Result<Self, ConfigurationError> {
        let expected = raster_bytes(width, height)?;
        if bytes.len() != expected {
            return Err(ConfigurationError::RasterSizeMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        let pixels: Vec<Rgb> = bytemuck::cast_slice(bytes).to_vec();
        Self::new(width, height, pixels)
    }

    /// Build a track by evaluating `f(x, row)` for every pixel
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> Rgb,
    ) -> Result<Self, ConfigurationError> {
        let mut pixels = Vec::with_capacity(raster_bytes(width, height)? / 3);
        for row in 0..height {
            for x in 0..width {
                pixels.push(f(x, row));
            }
        }
        Self::new(width, height, pixels)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn footprint(&self) -> Footprint {
        self.footprint
    }

    /// Bounding-box midpoint of the start marker (bottom-up pixel coordinates)
    #[inline]
    pub fn locate_start(&self) -> Vector2 {
        self.start
    }

    /// Every end tile (bottom-up pixel coordinates)
    #[inline]
    pub fn locate_ends(&self) -> &[Vector2] {
        &self.ends
    }

    /// Pixel at raster coordinates, `None` when out of bounds
    #[inline]
    pub fn pixel(&self, x: i64, row: i64) -> Option<Rgb> {
        if x < 0 || row < 0 || x >= self.width as i64 || row >= self.height as i64 {
            return None;
        }
        Some(self.pixels[row as usize * self.width + x as usize])
    }

    /// Tile at raster coordinates, `None` when out of bounds
    #[inline]
    pub fn tile(&self, x: i64, row: i64) -> Option<Tile> {
        self.pixel(x, row).map(Tile::classify)
    }

    /// Row-major pixels
    #[inline]
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Row-major, channel-interleaved bytes
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Bottom-up coordinates of every pixel of the given tile kind
    fn tile_positions(&self, tile: Tile) -> impl Iterator<Item = I64Vec2> + '_ {
        let height = self.height as i64;
        self.pixels
            .iter()
            .enumerate()
            .filter(move |(_, p)| Tile::classify(**p) == tile)
            .map(move |(i, _)| {
                let x = (i % self.width) as i64;
                let row = (i / self.width) as i64;
                I64Vec2::new(x, height - 1 - row)
            })
    }
}

/// Byte length of a `width` x `height` RGB raster
fn raster_bytes(width: usize, height: usize) -> Result<usize, ConfigurationError> {
    if width == 0 || height == 0 {
        return Err(ConfigurationError::EmptyRaster);
    }
    width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(3))
        .ok_or(ConfigurationError::RasterTooLarge { width, height })
}

fn bounding_box(points: impl Iterator<Item = I64Vec2>) -> Option<(I64Vec2, I64Vec2)> {
    points.fold(None, |acc, p| match acc {
        None => Some((p, p)),
        Some((min, max)) => Some((min.min(p), max.max(p))),
    })
}
