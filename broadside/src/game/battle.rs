//! The attack phase: strict turn alternation and winner detection.

use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    board::{self, AttackOutcome, Coordinate, ShipId},
    game::errors::{ActivationError, AttackPlayerError, CannotAttackPlayerReason},
    player::{Player, Players},
    publish::Channel,
};

/// Outcome of a successfully-resolved attack command.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum AttackReport {
    /// Nothing was hit.
    Miss,
    /// The given ship was hit but not sunk.
    Hit(ShipId),
    /// The given ship was hit and sunk but the defender still has ship cells
    /// left.
    Sunk(ShipId),
    /// The given ship was hit and sunk, and the defender has no ship cells
    /// left.
    Victory(ShipId),
}

impl AttackReport {
    /// Get the id of the ship that was hit, if any.
    pub fn ship(&self) -> Option<ShipId> {
        match self {
            AttackReport::Miss => None,
            AttackReport::Hit(id) | AttackReport::Sunk(id) | AttackReport::Victory(id) => {
                Some(*id)
            }
        }
    }
}

/// Owned copy of the battle phase state, emitted after every mutation.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    /// Whether attack commands are currently accepted.
    pub active: bool,
    /// Whether a winner has been decided.
    pub finished: bool,
    /// Whose turn it is, if the match is undecided.
    pub turn: Option<Player>,
    /// Remaining health per player, indexed by [`Player::index`].
    pub health: [u32; 2],
    /// The winner, once one player's health reaches zero.
    pub winner: Option<Player>,
}

impl BattleSnapshot {
    /// Remaining health of the given player.
    pub fn health(&self, player: Player) -> u32 {
        self.health[player.index()]
    }
}

/// Orchestrates the attack phase across both players.
///
/// Runs `Inactive -> Active -> Finished`. Health is mirrored from the player
/// states after each delegated attack rather than recomputed from the boards.
pub struct Battle {
    active: bool,
    finished: bool,
    turn: Option<Player>,
    health: [u32; 2],
    winner: Option<Player>,
    channel: Channel<BattleSnapshot>,
}

impl Battle {
    /// Construct an inactive battle phase.
    pub fn new() -> Self {
        Self {
            active: false,
            finished: false,
            turn: None,
            health: [0; 2],
            winner: None,
            channel: Channel::new("Match State"),
        }
    }

    /// Whether attack commands are currently accepted.
    pub fn active(&self) -> bool {
        self.active
    }

    /// Whether a winner has been decided.
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Whose turn it is, if the match is undecided.
    pub fn turn(&self) -> Option<Player> {
        self.turn
    }

    /// Remaining health of the given player, as mirrored from their state.
    pub fn health(&self, player: Player) -> u32 {
        self.health[player.index()]
    }

    /// The winner, once decided.
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// The channel this phase emits on.
    pub fn events(&mut self) -> &mut Channel<BattleSnapshot> {
        &mut self.channel
    }

    /// Start the match: snapshots both players' current health and gives the
    /// first turn to player 1. Rejected if already active.
    pub fn begin(&mut self, players: &Players) -> Result<(), ActivationError> {
        if self.active {
            return Err(ActivationError::AlreadyActive);
        }
        for player in Player::ALL.iter().copied() {
            self.health[player.index()] = players.get(player).total_health();
        }
        self.active = true;
        self.finished = false;
        self.winner = None;
        self.turn = Some(Player::P1);
        info!("match started, {} to move", Player::P1);
        self.emit();
        Ok(())
    }

    /// Resolve an attack by `acting` against the opponent's board. The acting
    /// player must hold the turn; on any accepted attack (hit or miss) the
    /// turn passes to the defender, unless the attack decided the match.
    /// Rejected calls mutate nothing and emit nothing.
    pub fn attack(
        &mut self,
        players: &mut Players,
        acting: Player,
        coord: Coordinate,
    ) -> Result<AttackReport, AttackPlayerError> {
        if !self.active {
            return Err(AttackPlayerError::new(
                CannotAttackPlayerReason::NotActive,
                acting,
                coord,
            ));
        }
        if self.finished {
            return Err(AttackPlayerError::new(
                CannotAttackPlayerReason::AlreadyOver,
                acting,
                coord,
            ));
        }
        if self.turn != Some(acting) {
            return Err(AttackPlayerError::new(
                CannotAttackPlayerReason::OutOfTurn,
                acting,
                coord,
            ));
        }
        let target = acting.opponent();
        let outcome = players
            .get_mut(target)
            .receive_attack(coord)
            .map_err(|err| Self::remap(err, acting, coord))?;
        self.health[target.index()] = players.get(target).total_health();
        match Player::ALL.iter().copied().find(|p| self.health[p.index()] == 0) {
            Some(loser) => {
                self.finished = true;
                self.winner = Some(loser.opponent());
                self.turn = None;
                info!("{} wins the match", loser.opponent());
            }
            None => {
                self.turn = Some(target);
            }
        }
        let report = match outcome {
            AttackOutcome::Miss => AttackReport::Miss,
            AttackOutcome::Hit(id) => AttackReport::Hit(id),
            AttackOutcome::Sunk(id) if self.finished => AttackReport::Victory(id),
            AttackOutcome::Sunk(id) => AttackReport::Sunk(id),
        };
        self.emit();
        Ok(report)
    }

    /// Stop accepting attack commands. Rejected if not active.
    pub fn end(&mut self) -> Result<(), ActivationError> {
        if !self.active {
            return Err(ActivationError::NotActive);
        }
        self.active = false;
        info!("match ended");
        self.emit();
        Ok(())
    }

    /// Clear all fields back to the inactive state, then emit. Used when the
    /// whole game resets.
    pub fn reset(&mut self) {
        self.active = false;
        self.finished = false;
        self.turn = None;
        self.health = [0; 2];
        self.winner = None;
        self.emit();
    }

    /// Take an owned snapshot of the current state.
    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            active: self.active,
            finished: self.finished,
            turn: self.turn,
            health: self.health,
            winner: self.winner,
        }
    }

    fn remap(err: board::AttackError, acting: Player, coord: Coordinate) -> AttackPlayerError {
        AttackPlayerError::new(
            match err.reason() {
                board::CannotAttackReason::OutOfBounds => CannotAttackPlayerReason::OutOfBounds,
                board::CannotAttackReason::AlreadyAttacked => {
                    CannotAttackPlayerReason::AlreadyAttacked
                }
            },
            acting,
            coord,
        )
    }

    fn emit(&mut self) {
        let snapshot = self.snapshot();
        self.channel.emit(&snapshot);
    }
}

impl Default for Battle {
    fn default() -> Self {
        Self::new()
    }
}
