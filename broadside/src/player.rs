//! Per-player state: an owned board plus health accounting, with a state
//! snapshot emitted to listeners on every mutation.

use std::{
    fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    board::{AttackError, AttackOutcome, Axis, Board, BoardSnapshot, Coordinate, PlaceError, ShipId},
    publish::Channel,
};

/// Player ID. Either `P1` or `P2`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Player {
    P1,
    P2,
}

impl Player {
    /// Both players, in turn order.
    pub const ALL: [Player; 2] = [Player::P1, Player::P2];

    /// Get the opponent of this player.
    pub fn opponent(self) -> Self {
        match self {
            Player::P1 => Player::P2,
            Player::P2 => Player::P1,
        }
    }

    /// Index of this player in per-player arrays.
    pub fn index(self) -> usize {
        match self {
            Player::P1 => 0,
            Player::P2 => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(match self {
            Player::P1 => "player1",
            Player::P2 => "player2",
        })
    }
}

/// Error returned when parsing a player name from anything other than the two
/// accepted spellings.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("player name must be \"player1\" or \"player2\", got {0:?}")]
pub struct ParsePlayerError(String);

impl FromStr for Player {
    type Err = ParsePlayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "player1" => Ok(Player::P1),
            "player2" => Ok(Player::P2),
            other => Err(ParsePlayerError(other.to_owned())),
        }
    }
}

/// Owned copy of a player's state, emitted to listeners after every
/// successful mutation.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Which player this snapshot belongs to.
    pub player: Player,
    /// Ship cells placed and not yet hit.
    pub total_health: u32,
    /// Number of ships placed so far.
    pub ships_placed: u8,
    /// Both grids of the player's board.
    pub board: BoardSnapshot,
}

/// A single player's authoritative state. Owns the board exclusively; all
/// mutation goes through the methods here, and each successful mutation emits
/// a [`PlayerSnapshot`] on the instance channel.
pub struct PlayerState {
    player: Player,
    board: Board,
    total_health: u32,
    ships_placed: u8,
    channel: Channel<PlayerSnapshot>,
}

impl PlayerState {
    /// Construct the state for the given player with an empty board.
    pub fn new(player: Player) -> Self {
        Self {
            player,
            board: Board::new(),
            total_health: 0,
            ships_placed: 0,
            channel: Channel::new("Player State"),
        }
    }

    /// Which player this state belongs to.
    pub fn player(&self) -> Player {
        self.player
    }

    /// The player's board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Ship cells placed and not yet hit. Zero once every placed cell has
    /// been attacked.
    pub fn total_health(&self) -> u32 {
        self.total_health
    }

    /// Number of ships placed since the last reset.
    pub fn ships_placed(&self) -> u8 {
        self.ships_placed
    }

    /// The channel this instance emits on.
    pub fn events(&mut self) -> &mut Channel<PlayerSnapshot> {
        &mut self.channel
    }

    /// Place the next ship on the board. The ship is assigned the next
    /// sequential id and health grows by the ship's length. On failure
    /// nothing is mutated and nothing is emitted.
    pub fn add_ship(
        &mut self,
        length: usize,
        origin: Coordinate,
        axis: Axis,
    ) -> Result<ShipId, PlaceError> {
        // Ship numbering starts at 1, so the incremented counter is nonzero.
        let id = ShipId::new(self.ships_placed + 1).unwrap();
        let run = self.board.place_ship(length, origin, axis, id)?;
        self.ships_placed += 1;
        self.total_health += run.len() as u32;
        debug!(
            "{} placed ship {} ({} cells) at {} along {}",
            self.player,
            id,
            run.len(),
            origin,
            axis
        );
        self.emit();
        Ok(id)
    }

    /// Resolve an attack against this player's board. Health drops by one
    /// exactly when the attack is the first hit on a ship cell. On failure
    /// nothing is mutated and nothing is emitted.
    pub fn receive_attack(&mut self, coord: Coordinate) -> Result<AttackOutcome, AttackError> {
        let outcome = self.board.attack(coord)?;
        if outcome.is_hit() {
            self.total_health -= 1;
        }
        debug!("{} received attack at {}: {:?}", self.player, coord, outcome);
        self.emit();
        Ok(outcome)
    }

    /// Rebuild both grids and zero all counters, then emit.
    pub fn reset(&mut self) {
        self.board.reset();
        self.total_health = 0;
        self.ships_placed = 0;
        self.emit();
    }

    /// Take an owned snapshot of the current state.
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            player: self.player,
            total_health: self.total_health,
            ships_placed: self.ships_placed,
            board: self.board.snapshot(),
        }
    }

    fn emit(&mut self) {
        let snapshot = self.snapshot();
        self.channel.emit(&snapshot);
    }
}

/// The two players of a match, indexable by [`Player`].
pub struct Players {
    pair: [PlayerState; 2],
}

impl Players {
    /// Construct both players with empty boards.
    pub fn new() -> Self {
        Self {
            pair: [PlayerState::new(Player::P1), PlayerState::new(Player::P2)],
        }
    }

    /// Get the state of the given player.
    pub fn get(&self, player: Player) -> &PlayerState {
        &self.pair[player.index()]
    }

    /// Mutably get the state of the given player.
    pub fn get_mut(&mut self, player: Player) -> &mut PlayerState {
        &mut self.pair[player.index()]
    }

    /// Reset both players.
    pub fn reset_all(&mut self) {
        for player in self.pair.iter_mut() {
            player.reset();
        }
    }
}

impl Default for Players {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<Player> for Players {
    type Output = PlayerState;

    fn index(&self, player: Player) -> &Self::Output {
        self.get(player)
    }
}

impl IndexMut<Player> for Players {
    fn index_mut(&mut self, player: Player) -> &mut Self::Output {
        self.get_mut(player)
    }
}
