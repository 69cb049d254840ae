//! World coordinates of the stitched capture images.
//!
//! One image pixel is one in-game pixel, and the viewport coordinate system
//! is aligned with the in-game one, so no transform is needed here.

use serde::{Deserialize, Serialize};

/// Side length of an in-game chunk, in pixels.
pub const CHUNK_SIZE: f64 = 512.0;

/// View shown on first load and on "reset view".
pub const HOME_BOUNDS: Rect = Rect {
    x: -150.0,
    y: -350.0,
    width: 1024.0,
    height: 512.0,
};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Components rounded to whole pixels, as persisted in the URL.
    pub fn rounded(&self) -> Self {
        Self::new(
            self.x.round(),
            self.y.round(),
            self.width.round(),
            self.height.round(),
        )
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ChunkCoord {
    pub x: i64,
    pub y: i64,
}

impl ChunkCoord {
    /// Chunk containing `p`; negative coordinates round toward -inf.
    pub fn containing(p: Point) -> Self {
        Self {
            x: (p.x / CHUNK_SIZE).floor() as i64,
            y: (p.y / CHUNK_SIZE).floor() as i64,
        }
    }
}

/// Hover label for a world position: pixel coordinates on the first line,
/// chunk coordinates on the second.
pub fn coordinate_label(p: Point) -> String {
    let chunk = ChunkCoord::containing(p);
    format!(
        "({}, {})\n({}, {})",
        p.x.floor() as i64,
        p.y.floor() as i64,
        chunk.x,
        chunk.y
    )
}
