//! Coordinates and ship-run projection for the fixed 10x10 grid.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of rows and columns on every board.
pub const BOARD_SIZE: usize = 10;

/// The coordinates of a single cell in the board.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    /// Vertical position of the cell, counted from the top.
    pub row: usize,
    /// Horizontal position of the cell, counted from the left.
    pub col: usize,
}

impl Coordinate {
    /// Construct a [`Coordinate`] from the given `row` and `col`.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Whether this coordinate lies on the board.
    pub fn in_bounds(&self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }
}

impl From<(usize, usize)> for Coordinate {
    /// Construct a [`Coordinate`] from the given `(row, col)` pair.
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

impl From<[usize; 2]> for Coordinate {
    /// Construct a [`Coordinate`] from a `[row, col]` pair.
    fn from([row, col]: [usize; 2]) -> Self {
        Self::new(row, col)
    }
}

impl From<Coordinate> for (usize, usize) {
    /// Convert the [`Coordinate`] into a `(row, col)` pair.
    fn from(coord: Coordinate) -> Self {
        (coord.row, coord.col)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Axis a ship extends along from its origin. A vertical ship points down,
/// a horizontal ship points right.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Vertical,
    Horizontal,
}

impl Axis {
    /// Both axes, in a fixed order.
    pub const ALL: [Axis; 2] = [Axis::Vertical, Axis::Horizontal];

    /// Project a run of `length` cells starting at `origin` and stepping along
    /// this axis. Returns `None` if the run would leave the board or if
    /// `length` is zero, so an off-board placement can never index the grid.
    pub fn run(self, origin: Coordinate, length: usize) -> Option<Vec<Coordinate>> {
        if length == 0 || !origin.in_bounds() {
            return None;
        }
        let fits = match self {
            Axis::Vertical => origin.row + length <= BOARD_SIZE,
            Axis::Horizontal => origin.col + length <= BOARD_SIZE,
        };
        if !fits {
            return None;
        }
        Some(
            (0..length)
                .map(|step| match self {
                    Axis::Vertical => Coordinate::new(origin.row + step, origin.col),
                    Axis::Horizontal => Coordinate::new(origin.row, origin.col + step),
                })
                .collect(),
        )
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(match self {
            Axis::Vertical => "Vertical",
            Axis::Horizontal => "Horizontal",
        })
    }
}

/// Error returned when parsing an axis from anything other than the two
/// accepted spellings.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("axis must be \"Vertical\" or \"Horizontal\", got {0:?}")]
pub struct ParseAxisError(String);

impl FromStr for Axis {
    type Err = ParseAxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Vertical" => Ok(Axis::Vertical),
            "Horizontal" => Ok(Axis::Horizontal),
            other => Err(ParseAxisError(other.to_owned())),
        }
    }
}
