//! Coordinate Space
//!
//! Wraparound arithmetic for the N×N torus plus the neighborhood helpers the
//! behaviors scan with.

use serde::{Deserialize, Serialize};

/// The four axis-aligned unit moves used by random walks.
pub const DIRECTIONS: [Offset; 4] = [
    Offset { dx: 0, dy: 1 },
    Offset { dx: 0, dy: -1 },
    Offset { dx: 1, dy: 0 },
    Offset { dx: -1, dy: 0 },
];

/// Canonical cell coordinate, always in `[0, size)` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

/// Relative displacement from an origin cell, before wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Offset {
    pub dx: i64,
    pub dy: i64,
}

impl Offset {
    pub const ZERO: Offset = Offset { dx: 0, dy: 0 };

    pub fn new(dx: i64, dy: i64) -> Self {
        Self { dx, dy }
    }

    /// Step toward this offset: the sign of each axis independently, scaled
    /// by `speed` but never past the target.
    pub fn step(self, speed: u32) -> Offset {
        let speed = i64::from(speed);
        Offset {
            dx: self.dx.signum() * self.dx.abs().min(speed),
            dy: self.dy.signum() * self.dy.abs().min(speed),
        }
    }
}

/// An N×N torus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Torus {
    size: usize,
}

impl Torus {
    /// Caller guarantees `size > 0`; `Grid::new` validates it.
    pub(crate) fn new(size: usize) -> Self {
        debug_assert!(size > 0);
        Self { size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Floor-mod both components onto `[0, size)`.
    pub fn wrap(&self, x: i64, y: i64) -> Position {
        let n = self.size as i64;
        Position {
            x: x.rem_euclid(n) as usize,
            y: y.rem_euclid(n) as usize,
        }
    }

    /// Wrap `origin + offset`.
    pub fn offset(&self, origin: Position, offset: Offset) -> Position {
        self.wrap(origin.x as i64 + offset.dx, origin.y as i64 + offset.dy)
    }

    /// Flat bucket index for a canonical position.
    pub(crate) fn index(&self, pos: Position) -> usize {
        pos.x * self.size + pos.y
    }
}

/// Chebyshev neighborhood of `radius` in scan order: dx outer, dy inner,
/// both ascending from `-radius`. Includes the origin.
pub fn chebyshev_offsets(radius: u32) -> impl Iterator<Item = Offset> {
    let r = i64::from(radius);
    (-r..=r).flat_map(move |dx| (-r..=r).map(move |dy| Offset { dx, dy }))
}
