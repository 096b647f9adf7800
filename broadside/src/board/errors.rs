//! Errors used by the [`Board`][crate::board::Board].

use std::fmt::{self, Debug};

use thiserror::Error;

use crate::board::{Axis, Coordinate};

/// Reason why a ship could not be placed with a given run.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum CannotPlaceReason {
    /// The run would extend past the edge of the board.
    #[error("the ship would not fit on the board")]
    OutOfBounds,
    /// One or more of the cells in the run already holds a ship.
    #[error("the requested position was already occupied")]
    AlreadyOccupied,
}

/// Error caused when attempting to place a ship in an invalid position.
#[derive(Error, Clone, Eq, PartialEq)]
#[error("could not place length-{length} ship at {origin} along {axis}: {reason}")]
pub struct PlaceError {
    #[source]
    reason: CannotPlaceReason,
    origin: Coordinate,
    axis: Axis,
    length: usize,
}

impl Debug for PlaceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl PlaceError {
    /// Construct a placement error from a reason and the attempted run.
    pub(super) fn new(
        reason: CannotPlaceReason,
        origin: Coordinate,
        axis: Axis,
        length: usize,
    ) -> Self {
        Self {
            reason,
            origin,
            axis,
            length,
        }
    }

    /// Get the reason placement was aborted.
    pub fn reason(&self) -> CannotPlaceReason {
        self.reason
    }

    /// Get the origin where placement was attempted.
    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    /// Get the axis the run pointed along.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Get the length of the ship that was not placed.
    pub fn length(&self) -> usize {
        self.length
    }
}

/// Reason why a particular cell could not be attacked.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum CannotAttackReason {
    /// The cell selected was out of bounds on the board.
    #[error("the target coordinate is out of bounds")]
    OutOfBounds,
    /// An attack has already been resolved at that cell.
    #[error("the target cell was already attacked")]
    AlreadyAttacked,
}

/// Error returned when trying to attack a cell.
#[derive(Error, Clone, Eq, PartialEq)]
#[error("could not attack cell {coord}: {reason}")]
pub struct AttackError {
    #[source]
    reason: CannotAttackReason,
    coord: Coordinate,
}

impl Debug for AttackError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl AttackError {
    /// Construct an attack error with the given reason for the specified cell.
    pub(super) fn new(reason: CannotAttackReason, coord: Coordinate) -> Self {
        Self { reason, coord }
    }

    /// Get the reason the attack failed.
    pub fn reason(&self) -> CannotAttackReason {
        self.reason
    }

    /// Get the coordinate of the targeted cell.
    pub fn coord(&self) -> Coordinate {
        self.coord
    }
}
