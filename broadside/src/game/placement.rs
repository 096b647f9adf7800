//! The ship-picking phase: both players place their fleets in a forced order.

use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    board::{self, Axis, Coordinate, ShipId},
    game::errors::{ActivationError, CannotPlaceShipReason, PlaceShipError},
    player::{Player, Players},
    publish::Channel,
};

/// Lengths of the fleet each player places, consumed strictly in this order.
/// A player never chooses a ship length; the next placement always uses the
/// next entry.
pub const SHIP_LENGTHS: [usize; 5] = [5, 4, 3, 3, 2];

/// Number of ships in a full fleet.
pub const FLEET_SIZE: u8 = SHIP_LENGTHS.len() as u8;

/// Owned copy of the placement phase state, emitted after every mutation.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlacementSnapshot {
    /// Whether placement commands are currently accepted.
    pub active: bool,
    /// Whether both players have placed their whole fleet.
    pub finished: bool,
    /// Ships placed per player, indexed by [`Player::index`].
    pub placed: [u8; 2],
}

impl PlacementSnapshot {
    /// Ships placed so far by the given player.
    pub fn placed(&self, player: Player) -> u8 {
        self.placed[player.index()]
    }
}

/// Orchestrates the ship-picking phase across both players.
///
/// Runs `Inactive -> Active -> Finished -> Inactive`, re-armed by
/// [`begin`][ShipPlacement::begin].
pub struct ShipPlacement {
    active: bool,
    finished: bool,
    placed: [u8; 2],
    channel: Channel<PlacementSnapshot>,
}

impl ShipPlacement {
    /// Construct an inactive placement phase with no ships placed.
    pub fn new() -> Self {
        Self {
            active: false,
            finished: false,
            placed: [0; 2],
            channel: Channel::new("Ship Placement State"),
        }
    }

    /// Whether placement commands are currently accepted.
    pub fn active(&self) -> bool {
        self.active
    }

    /// Whether both players have placed their whole fleet.
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Ships placed so far by the given player.
    pub fn placed(&self, player: Player) -> u8 {
        self.placed[player.index()]
    }

    /// Length of the next ship the given player must place, or `None` once
    /// their fleet is complete.
    pub fn next_length(&self, player: Player) -> Option<usize> {
        SHIP_LENGTHS.get(self.placed[player.index()] as usize).copied()
    }

    /// The channel this phase emits on.
    pub fn events(&mut self) -> &mut Channel<PlacementSnapshot> {
        &mut self.channel
    }

    /// Arm the placement phase: resets both players, zeroes the placement
    /// counters and starts accepting commands. Rejected if already active.
    pub fn begin(&mut self, players: &mut Players) -> Result<(), ActivationError> {
        if self.active {
            return Err(ActivationError::AlreadyActive);
        }
        players.reset_all();
        self.placed = [0; 2];
        self.active = true;
        self.finished = false;
        info!("ship placement started");
        self.emit();
        Ok(())
    }

    /// Check whether the given player's next forced-length ship could be
    /// placed at `origin` along `axis`, without placing it.
    pub fn check_placement(
        &self,
        players: &Players,
        player: Player,
        origin: Coordinate,
        axis: Axis,
    ) -> Result<(), PlaceShipError> {
        let length = self.placeable_length(player, origin, axis)?;
        players
            .get(player)
            .board()
            .check_placement(length, origin, axis)
            .map_err(|err| Self::remap(err, player, origin, axis))?;
        Ok(())
    }

    /// Place the next ship of the forced sequence for the given player. On
    /// success the player's counter advances, and the phase is marked
    /// finished once both fleets are complete. Rejected calls mutate nothing
    /// and emit nothing.
    pub fn place_ship(
        &mut self,
        players: &mut Players,
        player: Player,
        origin: Coordinate,
        axis: Axis,
    ) -> Result<ShipId, PlaceShipError> {
        let length = self.placeable_length(player, origin, axis)?;
        let id = players
            .get_mut(player)
            .add_ship(length, origin, axis)
            .map_err(|err| Self::remap(err, player, origin, axis))?;
        self.placed[player.index()] += 1;
        let total: u8 = self.placed.iter().sum();
        if total == 2 * FLEET_SIZE {
            self.finished = true;
            info!("both fleets fully placed");
        }
        self.emit();
        Ok(id)
    }

    /// Stop accepting placement commands. Rejected if not active.
    pub fn end(&mut self) -> Result<(), ActivationError> {
        if !self.active {
            return Err(ActivationError::NotActive);
        }
        self.active = false;
        info!("ship placement ended");
        self.emit();
        Ok(())
    }

    /// Clear all fields back to the inactive state, then emit. Used when the
    /// whole game resets.
    pub fn reset(&mut self) {
        self.active = false;
        self.finished = false;
        self.placed = [0; 2];
        self.emit();
    }

    /// Take an owned snapshot of the current state.
    pub fn snapshot(&self) -> PlacementSnapshot {
        PlacementSnapshot {
            active: self.active,
            finished: self.finished,
            placed: self.placed,
        }
    }

    /// Shared validation for placement commands and previews: the phase must
    /// be accepting commands and the player's fleet must be incomplete.
    /// Returns the forced length of the player's next ship.
    fn placeable_length(
        &self,
        player: Player,
        origin: Coordinate,
        axis: Axis,
    ) -> Result<usize, PlaceShipError> {
        if !self.active || self.finished {
            return Err(PlaceShipError::new(
                CannotPlaceShipReason::NotActive,
                player,
                origin,
                axis,
            ));
        }
        match self.next_length(player) {
            Some(length) => Ok(length),
            None => Err(PlaceShipError::new(
                CannotPlaceShipReason::FleetComplete,
                player,
                origin,
                axis,
            )),
        }
    }

    fn remap(err: board::PlaceError, player: Player, origin: Coordinate, axis: Axis) -> PlaceShipError {
        PlaceShipError::new(
            match err.reason() {
                board::CannotPlaceReason::OutOfBounds => CannotPlaceShipReason::OutOfBounds,
                board::CannotPlaceReason::AlreadyOccupied => CannotPlaceShipReason::AlreadyOccupied,
            },
            player,
            origin,
            axis,
        )
    }

    fn emit(&mut self) {
        let snapshot = self.snapshot();
        self.channel.emit(&snapshot);
    }
}

impl Default for ShipPlacement {
    fn default() -> Self {
        Self::new()
    }
}
