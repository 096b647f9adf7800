//! Errors for game-level commands. Board-level reasons are remapped into the
//! per-command reason enums here so callers only ever deal with one error
//! type per command.

use std::fmt::{self, Debug};

use thiserror::Error;

use crate::{
    board::{Axis, Coordinate},
    game::Phase,
    player::Player,
};

/// Error from starting or stopping a game sub-state out of order.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum ActivationError {
    /// The sub-state was already running.
    #[error("this part of the game is already running")]
    AlreadyActive,
    /// The sub-state was not running.
    #[error("this part of the game is not running")]
    NotActive,
}

/// Error returned for a phase transition requested from the wrong phase.
#[derive(Error, Copy, Clone, Eq, PartialEq)]
#[error("cannot {action} during the {phase:?} phase")]
pub struct TransitionError {
    action: &'static str,
    phase: Phase,
}

impl Debug for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl TransitionError {
    pub(super) fn new(action: &'static str, phase: Phase) -> Self {
        Self { action, phase }
    }

    /// The transition that was requested.
    pub fn action(&self) -> &'static str {
        self.action
    }

    /// The phase the game was in when the request was rejected.
    pub fn phase(&self) -> Phase {
        self.phase
    }
}

/// Reason why a ship could not be placed for a player.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum CannotPlaceShipReason {
    /// Ship placement is not currently accepting commands.
    #[error("ship placement is not currently active")]
    NotActive,
    /// The player has already placed their whole fleet.
    #[error("the player already placed a full fleet")]
    FleetComplete,
    /// The run would extend past the edge of the board.
    #[error("the ship would not fit on the board")]
    OutOfBounds,
    /// The run overlaps a ship that was already placed.
    #[error("the requested position was already occupied")]
    AlreadyOccupied,
}

/// Error caused when a player's ship placement command is rejected.
#[derive(Error, Clone, Eq, PartialEq)]
#[error("could not place ship for {player} at {origin} along {axis}: {reason}")]
pub struct PlaceShipError {
    #[source]
    reason: CannotPlaceShipReason,
    player: Player,
    origin: Coordinate,
    axis: Axis,
}

impl Debug for PlaceShipError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl PlaceShipError {
    pub(super) fn new(
        reason: CannotPlaceShipReason,
        player: Player,
        origin: Coordinate,
        axis: Axis,
    ) -> Self {
        Self {
            reason,
            player,
            origin,
            axis,
        }
    }

    /// Get the reason the placement was rejected.
    pub fn reason(&self) -> CannotPlaceShipReason {
        self.reason
    }

    /// Get the player the placement was attempted for.
    pub fn player(&self) -> Player {
        self.player
    }

    /// Get the origin where placement was attempted.
    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    /// Get the axis the placement pointed along.
    pub fn axis(&self) -> Axis {
        self.axis
    }
}

/// Reason why an attack command was rejected.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum CannotAttackPlayerReason {
    /// The match is not currently accepting commands.
    #[error("the match is not currently active")]
    NotActive,
    /// The match already has a winner.
    #[error("the match is already over")]
    AlreadyOver,
    /// The acting player attacked out of turn.
    #[error("the player attacked out of turn")]
    OutOfTurn,
    /// The target coordinate is off the board.
    #[error("the target coordinate is out of bounds")]
    OutOfBounds,
    /// The target cell was already attacked.
    #[error("the target cell was already attacked")]
    AlreadyAttacked,
}

/// Error caused when a player's attack command is rejected.
#[derive(Error, Clone, Eq, PartialEq)]
#[error("could not resolve attack by {player} at {coord}: {reason}")]
pub struct AttackPlayerError {
    #[source]
    reason: CannotAttackPlayerReason,
    player: Player,
    coord: Coordinate,
}

impl Debug for AttackPlayerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl AttackPlayerError {
    pub(super) fn new(reason: CannotAttackPlayerReason, player: Player, coord: Coordinate) -> Self {
        Self {
            reason,
            player,
            coord,
        }
    }

    /// Get the reason the attack was rejected.
    pub fn reason(&self) -> CannotAttackPlayerReason {
        self.reason
    }

    /// Get the acting player.
    pub fn player(&self) -> Player {
        self.player
    }

    /// Get the coordinate of the attempted attack.
    pub fn coord(&self) -> Coordinate {
        self.coord
    }
}
