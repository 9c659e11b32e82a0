//! Integer grid points and the transforms used to orient shapes.
//!
//! `x` grows to the right and `y` grows downwards, matching the order in which
//! rows of an ASCII shape are read.

use std::fmt;

/// A cell on the integer grid.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Coordinate {
    /// Column, growing to the right.
    pub x: i32,
    /// Row, growing downwards.
    pub y: i32,
}

impl Coordinate {
    /// Create a new coordinate.
    pub const fn new(x: i32, y: i32) -> Self {
        Coordinate { x, y }
    }

    /// Rotate a quarter turn clockwise inside a frame that is `frame_height`
    /// rows tall, mapping `(x, y)` to `(frame_height - 1 - y, x)`.
    ///
    /// When `frame_height` is the height of the bounding box the point belongs
    /// to, the rotated point stays inside the rotated bounding box with both
    /// minimums at zero.
    pub const fn rotate(self, frame_height: i32) -> Self {
        Coordinate {
            x: frame_height - 1 - self.y,
            y: self.x,
        }
    }

    /// Mirror across the vertical axis of a frame that is `frame_width`
    /// columns wide, mapping `(x, y)` to `(frame_width - 1 - x, y)`.
    pub const fn reflect(self, frame_width: i32) -> Self {
        Coordinate {
            x: frame_width - 1 - self.x,
            y: self.y,
        }
    }

    /// Shift by the given offsets.
    pub const fn translate(self, dx: i32, dy: i32) -> Self {
        Coordinate {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl From<(i32, i32)> for Coordinate {
    fn from((x, y): (i32, i32)) -> Self {
        Coordinate { x, y }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
