//! Event-driven match engine for the classic game Battleship.
//!
//! The engine tracks two players' 10x10 boards, validates and applies ship
//! placements, enforces turn order, resolves attacks, and detects a winner.
//! It is strictly synchronous: all state mutation happens inside the call
//! stack of the triggering command, and every accepted command fans out an
//! owned state snapshot to the listeners registered on the relevant
//! [`Channel`].
//!
//! [`GameState`] is the entry point. External layers drive the game through
//! its command API (`start_ship_placements`, `place_ship`, `attack_player`,
//! `reset`) and observe it through its five topics. Rejected commands leave
//! the game untouched, emit nothing, and are handed to the injected
//! [`FailureReporter`].

pub mod board;
pub mod game;
pub mod player;
pub mod publish;
pub mod report;
#[cfg(feature = "rng_gen")]
pub mod random;

pub use board::{
    AttackOutcome, Axis, Board, BoardSnapshot, CellView, Coordinate, ParseAxisError, ShipId,
    BOARD_SIZE,
};
pub use game::{
    AttackPlayerError, AttackReport, Battle, BattleSnapshot, CannotAttackPlayerReason,
    CannotPlaceShipReason, GameSnapshot, GameState, Phase, PlaceShipError, PlacementSnapshot,
    ShipPlacement, TransitionError, FLEET_SIZE, SHIP_LENGTHS,
};
pub use player::{ParsePlayerError, Player, PlayerSnapshot, PlayerState, Players};
pub use publish::{Channel, SubscribeConflict, SubscribeError};
pub use report::{FailureReporter, LogReporter};
