use std::{cell::RefCell, error::Error, rc::Rc};

use broadside::{
    Axis, CannotAttackPlayerReason, CannotPlaceShipReason, Coordinate, FailureReporter, GameState,
    Phase, Player, SHIP_LENGTHS,
};

fn coord(row: usize, col: usize) -> Coordinate {
    Coordinate::new(row, col)
}

/// Place the whole fleet for a player: ship `i` at row `i`, column 0,
/// pointing right.
fn place_fleet(game: &mut GameState, player: Player) {
    for row in 0..SHIP_LENGTHS.len() {
        game.place_ship(player, coord(row, 0), Axis::Horizontal).unwrap();
    }
}

/// Every cell occupied by the fleet laid out by [`place_fleet`].
fn fleet_cells() -> Vec<Coordinate> {
    let mut cells = Vec::new();
    for (row, &len) in SHIP_LENGTHS.iter().enumerate() {
        for col in 0..len {
            cells.push(coord(row, col));
        }
    }
    cells
}

#[test]
fn first_placement_is_the_length_five_ship() {
    // Scenario: starting placements and placing at the origin produces a
    // five-cell ship across the top row.
    let mut game = GameState::new();
    game.start_ship_placements().unwrap();
    game.place_ship(Player::P1, coord(0, 0), Axis::Horizontal).unwrap();

    let snapshot = game.player(Player::P1).snapshot();
    assert_eq!(snapshot.total_health, 5);
    for col in 0..5 {
        assert!(snapshot.board.occupancy[0][col].is_some());
    }
    assert!(snapshot.board.occupancy[0][5].is_none());
    assert_eq!(game.placement().placed(Player::P1), 1);
}

#[test]
fn overlapping_placement_is_rejected_without_progress() {
    let mut game = GameState::new();
    game.start_ship_placements().unwrap();
    game.place_ship(Player::P1, coord(0, 0), Axis::Horizontal).unwrap();

    let err = game
        .place_ship(Player::P1, coord(0, 2), Axis::Horizontal)
        .unwrap_err();
    assert_eq!(err.reason(), CannotPlaceShipReason::AlreadyOccupied);
    assert_eq!(game.placement().placed(Player::P1), 1);
    assert_eq!(game.player(Player::P1).total_health(), 5);
}

#[test]
fn fleet_lengths_are_consumed_in_forced_order() {
    let mut game = GameState::new();
    game.start_ship_placements().unwrap();

    let mut expected_health = 0;
    for (row, &len) in SHIP_LENGTHS.iter().enumerate() {
        game.place_ship(Player::P1, coord(row, 0), Axis::Horizontal).unwrap();
        expected_health += len as u32;
        assert_eq!(game.player(Player::P1).total_health(), expected_health);
    }

    // The sixth placement is rejected outright.
    let err = game
        .place_ship(Player::P1, coord(7, 0), Axis::Horizontal)
        .unwrap_err();
    assert_eq!(err.reason(), CannotPlaceShipReason::FleetComplete);
    assert_eq!(game.placement().placed(Player::P1), 5);
}

#[test]
fn completing_both_fleets_advances_to_the_match() {
    // Scenario: once ten ships are down the game moves itself into the match
    // phase and hands player 1 the first turn.
    let mut game = GameState::new();
    game.start_ship_placements().unwrap();
    place_fleet(&mut game, Player::P1);
    assert_eq!(game.phase(), Phase::Picking);

    place_fleet(&mut game, Player::P2);
    assert_eq!(game.phase(), Phase::Match);
    assert!(game.ship_placement_done());
    assert!(game.placement().finished());
    assert!(!game.placement().active());
    assert!(game.battle().active());
    assert_eq!(game.battle().turn(), Some(Player::P1));
    assert_eq!(game.battle().health(Player::P1), 17);
    assert_eq!(game.battle().health(Player::P2), 17);
}

#[test]
fn attacks_alternate_and_repeats_are_rejected() {
    // Scenario: a hit decrements the defender's health by one and passes the
    // turn; repeating the same attack changes nothing.
    let mut game = GameState::new();
    game.start_ship_placements().unwrap();
    place_fleet(&mut game, Player::P1);
    place_fleet(&mut game, Player::P2);

    game.attack_player(Player::P1, coord(0, 0)).unwrap();
    assert_eq!(game.player(Player::P2).total_health(), 16);
    assert_eq!(game.battle().health(Player::P2), 16);
    assert_eq!(game.battle().turn(), Some(Player::P2));

    // Player 1 no longer holds the turn.
    let err = game.attack_player(Player::P1, coord(0, 0)).unwrap_err();
    assert_eq!(err.reason(), CannotAttackPlayerReason::OutOfTurn);
    assert_eq!(game.player(Player::P2).total_health(), 16);
    assert_eq!(game.battle().turn(), Some(Player::P2));

    // After player 2 moves, the same cell is still rejected, now because it
    // was already attacked.
    game.attack_player(Player::P2, coord(9, 9)).unwrap();
    let err = game.attack_player(Player::P1, coord(0, 0)).unwrap_err();
    assert_eq!(err.reason(), CannotAttackPlayerReason::AlreadyAttacked);
    assert_eq!(game.player(Player::P2).total_health(), 16);
    assert_eq!(game.battle().turn(), Some(Player::P1));
}

#[test]
fn depleting_a_fleet_ends_the_game() {
    // Scenario: grinding player 2 down to zero health finishes the match,
    // names player 1 the winner and moves the game to its final phase.
    let mut game = GameState::new();
    game.start_ship_placements().unwrap();
    place_fleet(&mut game, Player::P1);
    place_fleet(&mut game, Player::P2);

    // Player 2 answers every shot with a throwaway attack at an empty cell.
    let targets = fleet_cells();
    let mut fillers = (0..10)
        .map(|col| coord(9, col))
        .chain((0..7).map(|col| coord(8, col)));
    for (i, &target) in targets.iter().enumerate() {
        game.attack_player(Player::P1, target).unwrap();
        if i < targets.len() - 1 {
            game.attack_player(Player::P2, fillers.next().unwrap()).unwrap();
        }
    }

    assert_eq!(game.player(Player::P2).total_health(), 0);
    assert!(game.battle().finished());
    assert_eq!(game.battle().winner(), Some(Player::P1));
    assert_eq!(game.battle().turn(), None);
    assert_eq!(game.phase(), Phase::Final);
    assert!(game.match_done());

    // The final phase accepts no further attacks.
    let err = game.attack_player(Player::P2, coord(9, 9)).unwrap_err();
    assert_eq!(err.reason(), CannotAttackPlayerReason::NotActive);
}

#[test]
fn commands_outside_their_phase_are_rejected() {
    let mut game = GameState::new();

    let err = game
        .place_ship(Player::P1, coord(0, 0), Axis::Horizontal)
        .unwrap_err();
    assert_eq!(err.reason(), CannotPlaceShipReason::NotActive);

    let err = game.attack_player(Player::P1, coord(0, 0)).unwrap_err();
    assert_eq!(err.reason(), CannotAttackPlayerReason::NotActive);

    game.start_ship_placements().unwrap();
    assert!(game.start_ship_placements().is_err());

    let err = game.attack_player(Player::P1, coord(0, 0)).unwrap_err();
    assert_eq!(err.reason(), CannotAttackPlayerReason::NotActive);
}

#[test]
fn reset_returns_to_the_reset_phase_from_anywhere() {
    let mut game = GameState::new();
    game.start_ship_placements().unwrap();
    place_fleet(&mut game, Player::P1);
    place_fleet(&mut game, Player::P2);
    game.attack_player(Player::P1, coord(0, 0)).unwrap();

    game.reset();
    assert_eq!(game.phase(), Phase::Reset);
    assert!(!game.ship_placement_done());
    assert!(!game.match_done());
    assert_eq!(game.player(Player::P1).total_health(), 0);
    assert_eq!(game.player(Player::P2).total_health(), 0);
    assert!(!game.battle().active());
    assert_eq!(game.battle().winner(), None);

    // The cycle can start over.
    game.start_ship_placements().unwrap();
    game.place_ship(Player::P2, coord(3, 3), Axis::Vertical).unwrap();
    assert_eq!(game.player(Player::P2).total_health(), 5);
}

#[test]
fn check_placement_previews_without_mutating() {
    let mut game = GameState::new();
    game.start_ship_placements().unwrap();

    game.check_placement(Player::P1, coord(0, 0), Axis::Horizontal).unwrap();
    assert_eq!(game.placement().placed(Player::P1), 0);
    assert_eq!(game.player(Player::P1).total_health(), 0);

    let err = game
        .check_placement(Player::P1, coord(0, 6), Axis::Horizontal)
        .unwrap_err();
    assert_eq!(err.reason(), CannotPlaceShipReason::OutOfBounds);
}

/// Reporter that collects failure messages for inspection.
#[derive(Clone, Default)]
struct CollectingReporter(Rc<RefCell<Vec<String>>>);

impl FailureReporter for CollectingReporter {
    fn report(&mut self, failure: &dyn Error) {
        self.0.borrow_mut().push(failure.to_string());
    }
}

#[test]
fn rejected_commands_reach_the_reporter() {
    let reporter = CollectingReporter::default();
    let failures = Rc::clone(&reporter.0);
    let mut game = GameState::with_reporter(reporter);

    game.start_ship_placements().unwrap();
    assert!(failures.borrow().is_empty());

    game.place_ship(Player::P1, coord(0, 7), Axis::Horizontal).unwrap_err();
    assert_eq!(failures.borrow().len(), 1);

    // Previews are queries, not commands, and are never reported.
    game.check_placement(Player::P1, coord(0, 7), Axis::Horizontal).unwrap_err();
    assert_eq!(failures.borrow().len(), 1);

    game.attack_player(Player::P1, coord(0, 0)).unwrap_err();
    assert_eq!(failures.borrow().len(), 2);
}

#[test]
fn topics_emit_once_per_accepted_command_and_never_on_rejection() {
    let mut game = GameState::new();
    let counts = Rc::new(RefCell::new([0usize; 4]));

    let c = Rc::clone(&counts);
    game.player_events(Player::P1)
        .subscribe("count", move |_| c.borrow_mut()[0] += 1)
        .unwrap();
    let c = Rc::clone(&counts);
    game.placement_events()
        .subscribe("count", move |_| c.borrow_mut()[1] += 1)
        .unwrap();
    let c = Rc::clone(&counts);
    game.battle_events()
        .subscribe("count", move |_| c.borrow_mut()[2] += 1)
        .unwrap();
    let c = Rc::clone(&counts);
    game.game_events()
        .subscribe("count", move |_| c.borrow_mut()[3] += 1)
        .unwrap();

    game.start_ship_placements().unwrap();
    assert_eq!(*counts.borrow(), [1, 1, 0, 1]);

    game.place_ship(Player::P1, coord(0, 0), Axis::Horizontal).unwrap();
    assert_eq!(*counts.borrow(), [2, 2, 0, 2]);

    // A rejected command emits nothing anywhere.
    game.place_ship(Player::P1, coord(0, 0), Axis::Horizontal).unwrap_err();
    assert_eq!(*counts.borrow(), [2, 2, 0, 2]);

    // A placement by the other player does not touch player 1's topic.
    game.place_ship(Player::P2, coord(0, 0), Axis::Horizontal).unwrap();
    assert_eq!(*counts.borrow(), [2, 3, 0, 3]);
}

#[test]
fn the_battle_topic_joins_in_on_the_automatic_transition() {
    let mut game = GameState::new();
    let battle_emissions = Rc::new(RefCell::new(0usize));
    let c = Rc::clone(&battle_emissions);
    game.battle_events()
        .subscribe("count", move |_| *c.borrow_mut() += 1)
        .unwrap();

    game.start_ship_placements().unwrap();
    place_fleet(&mut game, Player::P1);
    assert_eq!(*battle_emissions.borrow(), 0);

    place_fleet(&mut game, Player::P2);
    // The placement that finished the fleet also published the armed battle.
    assert_eq!(*battle_emissions.borrow(), 1);
    assert_eq!(game.phase(), Phase::Match);
}

#[test]
fn duplicate_listener_on_a_game_topic_is_rejected() {
    let mut game = GameState::new();
    game.game_events().subscribe("ui", |_| {}).unwrap();
    assert!(game.game_events().subscribe("ui", |_| {}).is_err());
    // Other topics are separate namespaces.
    game.placement_events().subscribe("ui", |_| {}).unwrap();
}
