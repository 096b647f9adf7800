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

//! Random fleet placement, available with the `rng_gen` feature. Placement
//! goes through the ordinary command API so the usual validation and event
//! fan-out apply.

use rand::{
    distributions::{Distribution, Standard},
    Rng,
};

use crate::{
    board::{Axis, Coordinate, BOARD_SIZE},
    game::{GameState, Phase, FLEET_SIZE},
    player::Player,
    report::FailureReporter,
};

impl Distribution<Axis> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Axis {
        if rng.gen() {
            Axis::Vertical
        } else {
            Axis::Horizontal
        }
    }
}

impl Distribution<Player> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Player {
        if rng.gen() {
            Player::P1
        } else {
            Player::P2
        }
    }
}

/// Sample a uniformly random coordinate on the board.
pub fn random_coordinate<R: Rng + ?Sized>(rng: &mut R) -> Coordinate {
    Coordinate::new(rng.gen_range(0, BOARD_SIZE), rng.gen_range(0, BOARD_SIZE))
}

/// Place the rest of the given player's fleet at random positions. Candidate
/// positions are previewed before committing, so the helper never generates
/// rejected commands.
pub fn randomize_fleet<F, R>(game: &mut GameState<F>, player: Player, rng: &mut R)
where
    F: FailureReporter,
    R: Rng + ?Sized,
{
    while game.phase() == Phase::Picking && game.placement().placed(player) < FLEET_SIZE {
        let origin = random_coordinate(rng);
        let axis = rng.gen();
        if game.check_placement(player, origin, axis).is_ok() {
            match game.place_ship(player, origin, axis) {
                Ok(_) => {}
                // A placement that passed the preview cannot fail.
                Err(_) => unreachable!(),
            }
        }
    }
}
