// Copyright 2020 Zachary Stewart
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Cell storage backing a single player's board.

use std::ops::{Index, IndexMut};

use crate::board::{Coordinate, ShipId, BOARD_SIZE};

/// A single cell in the player's grid.
#[derive(Debug, Default, Copy, Clone)]
pub(super) struct GridCell {
    /// The ID of the ship that occupies this cell, if any.
    pub(super) ship: Option<ShipId>,

    /// Whether this cell has received an attack previously or not.
    pub(super) attacked: bool,
}

/// Fixed-size grid of cells, stored linearized row by row.
#[derive(Debug)]
pub(super) struct Grid {
    cells: Box<[GridCell]>,
}

impl Grid {
    pub(super) fn new() -> Self {
        let cells = (0..BOARD_SIZE * BOARD_SIZE)
            .map(|_| Default::default())
            .collect();
        Self { cells }
    }

    /// Convert a coordinate to a linear index. Returns `None` if the
    /// coordinate is out of range for the board.
    fn try_linearize(coord: Coordinate) -> Option<usize> {
        if coord.in_bounds() {
            Some(coord.row * BOARD_SIZE + coord.col)
        } else {
            None
        }
    }

    /// Get a reference to the cell at the given [`Coordinate`].
    pub(super) fn get(&self, coord: Coordinate) -> Option<&GridCell> {
        Self::try_linearize(coord).and_then(|i| self.cells.get(i))
    }

    /// Get a mutable reference to the cell at the given [`Coordinate`].
    pub(super) fn get_mut(&mut self, coord: Coordinate) -> Option<&mut GridCell> {
        Self::try_linearize(coord).and_then(move |i| self.cells.get_mut(i))
    }

    /// Iterate all cells paired with their coordinates, row by row.
    pub(super) fn iter(&self) -> impl Iterator<Item = (Coordinate, &GridCell)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, cell)| (Coordinate::new(i / BOARD_SIZE, i % BOARD_SIZE), cell))
    }
}

impl Index<Coordinate> for Grid {
    type Output = GridCell;

    fn index(&self, coord: Coordinate) -> &Self::Output {
        self.get(coord).expect("coordinate out of bounds")
    }
}

impl IndexMut<Coordinate> for Grid {
    fn index_mut(&mut self, coord: Coordinate) -> &mut Self::Output {
        self.get_mut(coord).expect("coordinate out of bounds")
    }
}
