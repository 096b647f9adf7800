//! A single player's board: which cells hold ships, and which cells have
//! already been attacked.

use std::{fmt, num::NonZeroU8};

use serde::{Deserialize, Serialize};

use self::grid::Grid;
pub use self::{
    errors::{AttackError, CannotAttackReason, CannotPlaceReason, PlaceError},
    geometry::{Axis, Coordinate, ParseAxisError, BOARD_SIZE},
};

mod errors;
mod geometry;
mod grid;

/// Identifier of a placed ship, assigned sequentially starting at 1 in the
/// order ships were placed on the owning board.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ShipId(NonZeroU8);

impl ShipId {
    /// Construct a ship id. Returns `None` for 0, since ship numbering starts
    /// at 1.
    pub fn new(id: u8) -> Option<Self> {
        NonZeroU8::new(id).map(ShipId)
    }

    /// Get the numeric value of this id.
    pub fn get(self) -> u8 {
        self.0.get()
    }
}

impl fmt::Display for ShipId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Result of an attack on a single cell of a board.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum AttackOutcome {
    /// The attack did not hit anything.
    Miss,
    /// The attack hit the ship with the given ID, but did not sink it.
    Hit(ShipId),
    /// The attack hit the ship with the given ID and every cell of that ship
    /// has now been attacked.
    Sunk(ShipId),
}

impl AttackOutcome {
    /// Whether the attack hit a ship cell.
    pub fn is_hit(&self) -> bool {
        self.ship().is_some()
    }

    /// Get the id of the ship that was hit, if any.
    pub fn ship(&self) -> Option<ShipId> {
        match self {
            AttackOutcome::Miss => None,
            AttackOutcome::Hit(id) | AttackOutcome::Sunk(id) => Some(*id),
        }
    }
}

/// Read-only view of a single cell, for rendering and inspection.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CellView {
    /// The ship occupying this cell, if any.
    pub ship: Option<ShipId>,
    /// Whether the cell has been attacked.
    pub attacked: bool,
}

/// Owned copy of a board's two grids, emitted to subscribers. Mutating a
/// snapshot never affects the board it was taken from.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Ship occupancy per cell, indexed `[row][col]`.
    pub occupancy: [[Option<ShipId>; BOARD_SIZE]; BOARD_SIZE],
    /// Attacks received per cell, indexed `[row][col]`.
    pub attacked: [[bool; BOARD_SIZE]; BOARD_SIZE],
}

/// Represents a single player's board, including their ships and the attacks
/// received so far.
pub struct Board {
    grid: Grid,
}

impl Board {
    /// Construct an empty board: no ships, no attacks.
    pub fn new() -> Self {
        Self { grid: Grid::new() }
    }

    /// Check whether a ship of the given length could be placed along `axis`
    /// starting at `origin`. On success returns the coordinates the ship
    /// would occupy; the board is not modified either way.
    pub fn check_placement(
        &self,
        length: usize,
        origin: Coordinate,
        axis: Axis,
    ) -> Result<Vec<Coordinate>, PlaceError> {
        let run = axis
            .run(origin, length)
            .ok_or_else(|| PlaceError::new(CannotPlaceReason::OutOfBounds, origin, axis, length))?;
        for &coord in &run {
            if self.grid[coord].ship.is_some() {
                return Err(PlaceError::new(
                    CannotPlaceReason::AlreadyOccupied,
                    origin,
                    axis,
                    length,
                ));
            }
        }
        Ok(run)
    }

    /// Place a ship of the given length, marking every cell of the run with
    /// `id`. On failure the board is unchanged.
    pub fn place_ship(
        &mut self,
        length: usize,
        origin: Coordinate,
        axis: Axis,
        id: ShipId,
    ) -> Result<Vec<Coordinate>, PlaceError> {
        let run = self.check_placement(length, origin, axis)?;
        for &coord in &run {
            self.grid[coord].ship = Some(id);
        }
        Ok(run)
    }

    /// Check whether the given cell can legally be attacked. The board is not
    /// modified.
    pub fn check_attack(&self, coord: Coordinate) -> Result<(), AttackError> {
        match self.grid.get(coord) {
            None => Err(AttackError::new(CannotAttackReason::OutOfBounds, coord)),
            Some(cell) if cell.attacked => {
                Err(AttackError::new(CannotAttackReason::AlreadyAttacked, coord))
            }
            Some(_) => Ok(()),
        }
    }

    /// Resolve an attack at the given cell. On failure the board is
    /// unchanged; a cell can be attacked at most once.
    pub fn attack(&mut self, coord: Coordinate) -> Result<AttackOutcome, AttackError> {
        self.check_attack(coord)?;
        let ship = {
            let cell = &mut self.grid[coord];
            cell.attacked = true;
            cell.ship
        };
        Ok(match ship {
            None => AttackOutcome::Miss,
            Some(id) if self.ship_sunk(id) => AttackOutcome::Sunk(id),
            Some(id) => AttackOutcome::Hit(id),
        })
    }

    /// Whether every cell of the given ship has been attacked. Returns `false`
    /// for ids not present on the board.
    pub fn ship_sunk(&self, id: ShipId) -> bool {
        let mut found = false;
        for (_, cell) in self.grid.iter() {
            if cell.ship == Some(id) {
                if !cell.attacked {
                    return false;
                }
                found = true;
            }
        }
        found
    }

    /// Get a view of the cell at the given coordinate. Returns `None` if the
    /// coordinate is out of bounds.
    pub fn cell(&self, coord: Coordinate) -> Option<CellView> {
        self.grid.get(coord).map(|cell| CellView {
            ship: cell.ship,
            attacked: cell.attacked,
        })
    }

    /// Get an iterator over the rows of the board. The iterator's item is
    /// another iterator that walks the cells of a single row.
    pub fn iter_rows(&self) -> impl Iterator<Item = impl Iterator<Item = CellView> + '_> + '_ {
        (0..BOARD_SIZE).map(move |row| {
            (0..BOARD_SIZE).map(move |col| {
                let cell = &self.grid[Coordinate::new(row, col)];
                CellView {
                    ship: cell.ship,
                    attacked: cell.attacked,
                }
            })
        })
    }

    /// Rebuild both grids to their empty state.
    pub fn reset(&mut self) {
        self.grid = Grid::new();
    }

    /// Take an owned snapshot of both grids.
    pub fn snapshot(&self) -> BoardSnapshot {
        let mut occupancy = [[None; BOARD_SIZE]; BOARD_SIZE];
        let mut attacked = [[false; BOARD_SIZE]; BOARD_SIZE];
        for (coord, cell) in self.grid.iter() {
            occupancy[coord.row][coord.col] = cell.ship;
            attacked[coord.row][coord.col] = cell.attacked;
        }
        BoardSnapshot {
            occupancy,
            attacked,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
