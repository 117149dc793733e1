//! Track fixtures for unit tests

use super::track::{Rgb, Track};

/// Off-palette color used for `Tile::Other`
pub const BLUE: Rgb = Rgb::new(0, 0, 255);

/// Build a track from ASCII rows (top row first).
///
/// `#` bad, `S` start, `E` end, `.` road, `?` unclassified.
pub fn track_from_ascii(rows: &[&str]) -> Track {
    let height = rows.len();
    let width = rows.first().map_or(0, |r| r.len());
    let grid: Vec<Vec<u8>> = rows.iter().map(|r| r.bytes().collect()).collect();
    Track::from_fn(width, height, |x, row| match grid[row][x] {
        b'#' => Rgb::BAD,
        b'S' => Rgb::START,
        b'E' => Rgb::END,
        b'?' => BLUE,
        _ => Rgb::ROAD,
    })
    .expect("fixture track must be valid")
}
