//! Top-level orchestration of a match.
//!
//! [`GameState`] composes the two [`PlayerState`]s with the
//! [`ShipPlacement`] and [`Battle`] sub-states into a single phase sequence,
//! routes player-facing commands to whichever sub-state is active, and
//! republishes every downstream state change on its own stable topics.

use std::error::Error;

use enumflags2::BitFlags;
use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    board::{Axis, Coordinate, ShipId},
    player::{Player, PlayerSnapshot, PlayerState, Players},
    publish::Channel,
    report::{FailureReporter, LogReporter},
};

pub use self::{
    battle::{AttackReport, Battle, BattleSnapshot},
    errors::{
        ActivationError, AttackPlayerError, CannotAttackPlayerReason, CannotPlaceShipReason,
        PlaceShipError, TransitionError,
    },
    placement::{PlacementSnapshot, ShipPlacement, FLEET_SIZE, SHIP_LENGTHS},
};

mod battle;
mod errors;
mod placement;

/// Phase of the overall game.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Everything cleared; waiting for ship placement to start.
    Reset,
    /// Both players are picking ship positions.
    Picking,
    /// The battle is running.
    Match,
    /// A winner has been decided. Terminal until an explicit reset.
    Final,
}

/// Phases completed since the last reset.
#[derive(BitFlags, Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum PhaseDone {
    ShipPlacement = 0b01,
    Match = 0b10,
}

/// Owned copy of the phase-level game state, emitted after every accepted
/// command.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Current phase.
    pub phase: Phase,
    /// Whether ship placement has been completed since the last reset.
    pub ship_placement_done: bool,
    /// Whether the match has been completed since the last reset.
    pub match_done: bool,
}

/// The five republish channels external layers subscribe to.
struct Topics {
    players: [Channel<PlayerSnapshot>; 2],
    placement: Channel<PlacementSnapshot>,
    battle: Channel<BattleSnapshot>,
    game: Channel<GameSnapshot>,
}

impl Topics {
    fn new() -> Self {
        Self {
            players: [
                Channel::new("Player 1 State"),
                Channel::new("Player 2 State"),
            ],
            placement: Channel::new("Ship Placement State"),
            battle: Channel::new("Match State"),
            game: Channel::new("Game State"),
        }
    }
}

/// The whole game: both players, both sub-states, and the phase sequence
/// `Reset -> Picking -> Match -> Final`.
///
/// Every rejected command leaves the game in its last valid state, emits
/// nothing, and is handed to the injected [`FailureReporter`] before being
/// returned to the caller.
pub struct GameState<R: FailureReporter = LogReporter> {
    phase: Phase,
    done: BitFlags<PhaseDone>,
    players: Players,
    placement: ShipPlacement,
    battle: Battle,
    reporter: R,
    topics: Topics,
}

impl GameState<LogReporter> {
    /// Construct a game in the `Reset` phase, reporting failures to the
    /// [`log`] facade.
    pub fn new() -> Self {
        Self::with_reporter(LogReporter)
    }
}

impl Default for GameState<LogReporter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: FailureReporter> GameState<R> {
    /// Construct a game in the `Reset` phase with the given failure reporter.
    pub fn with_reporter(reporter: R) -> Self {
        Self {
            phase: Phase::Reset,
            done: BitFlags::empty(),
            players: Players::new(),
            placement: ShipPlacement::new(),
            battle: Battle::new(),
            reporter,
            topics: Topics::new(),
        }
    }

    /// Current phase of the game.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether ship placement has been completed since the last reset.
    pub fn ship_placement_done(&self) -> bool {
        self.done.contains(PhaseDone::ShipPlacement)
    }

    /// Whether the match has been completed since the last reset.
    pub fn match_done(&self) -> bool {
        self.done.contains(PhaseDone::Match)
    }

    /// The state of the given player.
    pub fn player(&self, player: Player) -> &PlayerState {
        self.players.get(player)
    }

    /// The ship placement sub-state.
    pub fn placement(&self) -> &ShipPlacement {
        &self.placement
    }

    /// The battle sub-state.
    pub fn battle(&self) -> &Battle {
        &self.battle
    }

    /// The `"Player 1 State"` / `"Player 2 State"` topic for the given
    /// player.
    pub fn player_events(&mut self, player: Player) -> &mut Channel<PlayerSnapshot> {
        &mut self.topics.players[player.index()]
    }

    /// The `"Ship Placement State"` topic.
    pub fn placement_events(&mut self) -> &mut Channel<PlacementSnapshot> {
        &mut self.topics.placement
    }

    /// The `"Match State"` topic.
    pub fn battle_events(&mut self) -> &mut Channel<BattleSnapshot> {
        &mut self.topics.battle
    }

    /// The `"Game State"` topic.
    pub fn game_events(&mut self) -> &mut Channel<GameSnapshot> {
        &mut self.topics.game
    }

    /// Reset the whole game: both players, both sub-states, and the phase.
    /// Legal from any phase. Republishes every topic once the reset is
    /// complete.
    pub fn reset(&mut self) {
        self.players.reset_all();
        self.placement.reset();
        self.battle.reset();
        self.phase = Phase::Reset;
        self.done = BitFlags::empty();
        info!("game reset");
        self.publish_all();
    }

    /// Enter the `Picking` phase and arm the placement sub-state. Legal only
    /// from `Reset`.
    pub fn start_ship_placements(&mut self) -> Result<(), TransitionError> {
        if self.phase != Phase::Reset {
            return Err(self.reject(TransitionError::new("start ship placements", self.phase)));
        }
        match self.placement.begin(&mut self.players) {
            Ok(()) => {}
            // Placement is never active while the game sits in Reset.
            Err(_) => unreachable!(),
        }
        self.phase = Phase::Picking;
        self.publish_player(Player::P1);
        self.publish_player(Player::P2);
        self.publish_placement();
        self.publish_game();
        Ok(())
    }

    /// Check whether the given player's next ship could be placed at `origin`
    /// along `axis`, without placing it. Queries are not commands: a
    /// rejection here is not reported.
    pub fn check_placement(
        &self,
        player: Player,
        origin: Coordinate,
        axis: Axis,
    ) -> Result<(), PlaceShipError> {
        if self.phase != Phase::Picking {
            return Err(PlaceShipError::new(
                CannotPlaceShipReason::NotActive,
                player,
                origin,
                axis,
            ));
        }
        self.placement
            .check_placement(&self.players, player, origin, axis)
    }

    /// Place the next ship of the forced sequence for the given player. Legal
    /// only during `Picking`. When the placement completes both fleets, the
    /// game advances to `Match` and the battle begins before anything is
    /// republished.
    pub fn place_ship(
        &mut self,
        player: Player,
        origin: Coordinate,
        axis: Axis,
    ) -> Result<ShipId, PlaceShipError> {
        if self.phase != Phase::Picking {
            return Err(self.reject(PlaceShipError::new(
                CannotPlaceShipReason::NotActive,
                player,
                origin,
                axis,
            )));
        }
        let id = match self.placement.place_ship(&mut self.players, player, origin, axis) {
            Ok(id) => id,
            Err(err) => return Err(self.reject(err)),
        };
        let advanced = self.placement.finished();
        if advanced {
            match self.placement.end() {
                Ok(()) => {}
                // The placement sub-state is active whenever the game is in
                // the Picking phase.
                Err(_) => unreachable!(),
            }
            self.done |= PhaseDone::ShipPlacement;
            match self.battle.begin(&self.players) {
                Ok(()) => {}
                // The battle never runs before both fleets are placed.
                Err(_) => unreachable!(),
            }
            self.phase = Phase::Match;
            info!("entering the match phase");
        }
        self.publish_player(player);
        self.publish_placement();
        if advanced {
            self.publish_battle();
        }
        self.publish_game();
        Ok(id)
    }

    /// Resolve an attack by the given player against their opponent. Legal
    /// only during `Match`. When the attack decides the match, the game
    /// advances to `Final` before anything is republished.
    pub fn attack_player(
        &mut self,
        player: Player,
        coord: Coordinate,
    ) -> Result<AttackReport, AttackPlayerError> {
        if self.phase != Phase::Match {
            return Err(self.reject(AttackPlayerError::new(
                CannotAttackPlayerReason::NotActive,
                player,
                coord,
            )));
        }
        let report = match self.battle.attack(&mut self.players, player, coord) {
            Ok(report) => report,
            Err(err) => return Err(self.reject(err)),
        };
        if self.battle.finished() {
            match self.battle.end() {
                Ok(()) => {}
                // The battle is active whenever the game is in the Match
                // phase.
                Err(_) => unreachable!(),
            }
            self.done |= PhaseDone::Match;
            self.phase = Phase::Final;
            info!("entering the final phase");
        }
        self.publish_player(player.opponent());
        self.publish_battle();
        self.publish_game();
        Ok(report)
    }

    /// Take an owned snapshot of the phase-level state.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            ship_placement_done: self.ship_placement_done(),
            match_done: self.match_done(),
        }
    }

    fn reject<E: Error>(&mut self, err: E) -> E {
        self.reporter.report(&err);
        err
    }

    fn publish_player(&mut self, player: Player) {
        let snapshot = self.players.get(player).snapshot();
        self.topics.players[player.index()].emit(&snapshot);
    }

    fn publish_placement(&mut self) {
        let snapshot = self.placement.snapshot();
        self.topics.placement.emit(&snapshot);
    }

    fn publish_battle(&mut self) {
        let snapshot = self.battle.snapshot();
        self.topics.battle.emit(&snapshot);
    }

    fn publish_game(&mut self) {
        let snapshot = self.snapshot();
        self.topics.game.emit(&snapshot);
    }

    fn publish_all(&mut self) {
        self.publish_player(Player::P1);
        self.publish_player(Player::P2);
        self.publish_placement();
        self.publish_battle();
        self.publish_game();
    }
}
