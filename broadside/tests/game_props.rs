use std::collections::HashSet;

use proptest::prelude::*;

use broadside::{
    AttackReport, Axis, CannotAttackPlayerReason, Coordinate, GameState, Phase, Player,
    SHIP_LENGTHS,
};

/// Place the whole fleet for a player: ship `i` at row `i`, column 0,
/// pointing right.
fn place_fleet(game: &mut GameState, player: Player) {
    for row in 0..SHIP_LENGTHS.len() {
        game.place_ship(player, Coordinate::new(row, 0), Axis::Horizontal)
            .unwrap();
    }
}

/// Every cell occupied by the fleet laid out by [`place_fleet`].
fn fleet_cells() -> HashSet<Coordinate> {
    let mut cells = HashSet::new();
    for (row, &len) in SHIP_LENGTHS.iter().enumerate() {
        for col in 0..len {
            cells.insert(Coordinate::new(row, col));
        }
    }
    cells
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Whatever origins a player tries, successful placements consume the
    /// fleet lengths strictly in order, and failures change nothing.
    #[test]
    fn forced_lengths_accrue_health(
        tries in prop::collection::vec((0usize..10, 0usize..10, prop::bool::ANY), 1..80),
    ) {
        let mut game = GameState::new();
        game.start_ship_placements().unwrap();

        let mut placed = 0usize;
        for (row, col, vertical) in tries {
            if placed == SHIP_LENGTHS.len() {
                break;
            }
            let axis = if vertical { Axis::Vertical } else { Axis::Horizontal };
            let before = game.player(Player::P1).total_health();
            match game.place_ship(Player::P1, Coordinate::new(row, col), axis) {
                Ok(_) => {
                    let after = game.player(Player::P1).total_health();
                    prop_assert_eq!(after - before, SHIP_LENGTHS[placed] as u32);
                    placed += 1;
                }
                Err(_) => {
                    prop_assert_eq!(game.player(Player::P1).total_health(), before);
                }
            }
            prop_assert_eq!(game.placement().placed(Player::P1) as usize, placed);
        }
    }

    /// For any attack sequence: rejected attacks change nothing, every
    /// accepted attack flips the turn, and health always equals placed ship
    /// cells minus distinct hits.
    #[test]
    fn attack_bookkeeping_holds_for_any_sequence(
        shots in prop::collection::vec((0usize..12, 0usize..12), 1..120),
    ) {
        let mut game = GameState::new();
        game.start_ship_placements().unwrap();
        place_fleet(&mut game, Player::P1);
        place_fleet(&mut game, Player::P2);

        let ship_cells = fleet_cells();
        let total_cells = ship_cells.len() as u32;
        let mut attacked: [HashSet<Coordinate>; 2] = [HashSet::new(), HashSet::new()];
        let mut health = [total_cells; 2];

        for (row, col) in shots {
            if game.phase() != Phase::Match {
                break;
            }
            let acting = game.battle().turn().unwrap();
            let target = acting.opponent();
            let coord = Coordinate::new(row, col);

            let result = game.attack_player(acting, coord);
            if !coord.in_bounds() {
                prop_assert_eq!(
                    result.unwrap_err().reason(),
                    CannotAttackPlayerReason::OutOfBounds
                );
                prop_assert_eq!(game.battle().turn(), Some(acting));
            } else if attacked[target.index()].contains(&coord) {
                prop_assert_eq!(
                    result.unwrap_err().reason(),
                    CannotAttackPlayerReason::AlreadyAttacked
                );
                prop_assert_eq!(game.battle().turn(), Some(acting));
            } else {
                let report = result.unwrap();
                attacked[target.index()].insert(coord);
                if ship_cells.contains(&coord) {
                    health[target.index()] -= 1;
                    prop_assert!(report.ship().is_some());
                } else {
                    prop_assert_eq!(report, AttackReport::Miss);
                }
                prop_assert_eq!(game.battle().health(target), health[target.index()]);
                prop_assert_eq!(game.player(target).total_health(), health[target.index()]);
                if health[target.index()] == 0 {
                    prop_assert_eq!(game.battle().winner(), Some(acting));
                    prop_assert_eq!(game.phase(), Phase::Final);
                } else {
                    prop_assert_eq!(game.battle().turn(), Some(target));
                }
            }

            let hits = attacked[target.index()].intersection(&ship_cells).count() as u32;
            prop_assert_eq!(health[target.index()], total_cells - hits);
        }
    }
}
