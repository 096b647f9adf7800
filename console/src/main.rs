use std::{
    cell::Cell,
    fmt,
    io::{self, BufRead, Write},
    rc::Rc,
};

use clap::{App, Arg, ArgMatches};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;

use broadside::{
    random::randomize_fleet, AttackReport, Board, CannotAttackPlayerReason, CannotPlaceShipReason,
    Coordinate, GameSnapshot, GameState, Phase, Player, ShipId, FLEET_SIZE,
};

mod logging;

fn main() -> io::Result<()> {
    logging::init();
    let matches = App::new("Broadside")
        .version("1.0")
        .author("Zachary Stewart <zachary@zstewart.com>")
        .about("Command line battleship against a random opponent.")
        .arg(
            Arg::with_name("side")
                .short("s")
                .long("side")
                .value_name("SIDE")
                .help("pre-specify which player the human controls")
                .takes_value(true)
                .possible_values(&["player1", "player2", "random", "rand"])
                .case_insensitive(true),
        )
        .get_matches();

    let stdin = io::stdin();
    let mut input = InputReader::new(stdin.lock());
    let mut rng = rand::thread_rng();

    let human = choose_side(&matches, &mut input, &mut rng)?;
    let bot = human.opponent();
    println!("You are {}. {} moves first.", human, Player::P1);

    let mut game = GameState::new();
    install_banners(&mut game);

    match game.start_ship_placements() {
        Ok(()) => {}
        // A fresh game always sits in the Reset phase.
        Err(_) => unreachable!(),
    }

    choose_placements(&mut rng, &mut game, human, &mut input)?;
    // The opponent's fleet completes the picking phase, which tips the game
    // into the match automatically.
    randomize_fleet(&mut game, bot, &mut rng);

    run_battle(&mut rng, &mut game, human, &mut input)?;

    println!();
    println!("Final boards:");
    println!("Your board:");
    show_revealed_board(game.player(human).board());
    println!("Opponent board:");
    show_revealed_board(game.player(bot).board());
    match game.battle().winner() {
        Some(winner) if winner == human => println!("You win!"),
        Some(_) => println!("You lose."),
        None => {}
    }
    Ok(())
}

/// Choose which [`Player`] the human controls based on either args or cli
/// input.
fn choose_side<B: BufRead>(
    matches: &ArgMatches,
    input: &mut InputReader<B>,
    rng: &mut impl Rng,
) -> io::Result<Player> {
    Ok(if let Some(choice) = matches.value_of("side") {
        match choice.to_ascii_lowercase().as_str() {
            "player1" => Player::P1,
            "player2" => Player::P2,
            "random" | "rand" => rng.gen(),
            _ => unreachable!(),
        }
    } else {
        input.read_input_lower("Play as player1 or player2? (1/2)", |input| match input {
            "player1" | "p1" | "1" | "" => Some(Player::P1),
            "player2" | "p2" | "2" => Some(Player::P2),
            _ => {
                println!("Invalid selection.");
                None
            }
        })?
    })
}

/// Subscribe banner listeners to the game topics so phase changes and the
/// final result are announced as the state is republished.
fn install_banners(game: &mut GameState) {
    let last_phase = Rc::new(Cell::new(Phase::Reset));
    game.game_events()
        .subscribe("console phase banner", move |snap: &GameSnapshot| {
            if snap.phase != last_phase.get() {
                last_phase.set(snap.phase);
                println!();
                println!("--- {:?} phase ---", snap.phase);
            }
        })
        .unwrap();
    game.battle_events()
        .subscribe("console victory banner", |snap| {
            if let Some(winner) = snap.winner {
                println!("{} has sunk the whole enemy fleet!", winner);
            }
        })
        .unwrap();
}

/// Choose placements for the player's whole fleet using cli input.
fn choose_placements(
    rng: &mut impl Rng,
    game: &mut GameState,
    player: Player,
    input: &mut InputReader<impl BufRead>,
) -> io::Result<()> {
    enum Command {
        Place(Coordinate, broadside::Axis),
        RandomizeRest,
        Help,
    }
    println!();
    println!("Place your ships. Type help or ? for commands.");
    while game.placement().placed(player) < FLEET_SIZE {
        /// Matcher for the placement command.
        static PLACE: Lazy<Regex> = Lazy::new(|| {
            Regex::new(
                r"^(?x)(?:place|put)\s+
        (?P<row>[0-9]+)(?:\s*,\s*|\s+)(?P<col>[0-9]+)\s+
        (?P<axis>\w+)$",
            )
            .unwrap()
        });

        println!();
        let next = match game.placement().next_length(player) {
            Some(len) => len,
            None => break,
        };
        println!(
            "Ships placed: {} of {}. Next ship is {} cells long.",
            game.placement().placed(player),
            FLEET_SIZE,
            next
        );
        println!("Your current board setup:");
        show_setup_board(game.player(player).board());
        println!();

        let cmd = input.read_input_lower("> ", |input| match input {
            "?" | "help" | "h" => Some(Command::Help),
            "randomize" | "rand" | "random" => Some(Command::RandomizeRest),
            other => {
                if let Some(captures) = PLACE.captures(other) {
                    let row = match captures.name("row").unwrap().as_str().parse() {
                        Ok(row) if row < 10 => row,
                        _ => {
                            println!("row must be a number in range [0,9]");
                            return None;
                        }
                    };
                    let col = match captures.name("col").unwrap().as_str().parse() {
                        Ok(col) if col < 10 => col,
                        _ => {
                            println!("col must be a number in range [0,9]");
                            return None;
                        }
                    };
                    let axis = match captures.name("axis").unwrap().as_str() {
                        "vertical" | "vert" | "v" | "down" | "d" => broadside::Axis::Vertical,
                        "horizontal" | "horiz" | "h" | "right" | "r" => broadside::Axis::Horizontal,
                        other => {
                            println!(
                                "invalid axis {}, choose \"vertical\" or \"horizontal\"",
                                other
                            );
                            return None;
                        }
                    };
                    Some(Command::Place(Coordinate::new(row, col), axis))
                } else {
                    println!("Invalid ship-placement command {:?}. Use '?' for help", other);
                    None
                }
            }
        })?;

        match cmd {
            Command::Place(origin, axis) => match game.place_ship(player, origin, axis) {
                Ok(_) => {}
                Err(err) => match err.reason() {
                    CannotPlaceShipReason::OutOfBounds => {
                        println!("Invalid placement: the ship would run off the board.");
                    }
                    CannotPlaceShipReason::AlreadyOccupied => {
                        println!("Invalid placement: overlaps an existing ship.");
                    }
                    CannotPlaceShipReason::NotActive | CannotPlaceShipReason::FleetComplete => {
                        println!("{}", err);
                    }
                },
            },
            Command::RandomizeRest => randomize_fleet(game, player, rng),
            Command::Help => {
                println!(
                    "Available Commands:
    place <row>,<col> <axis>    place the next ship of your fleet with its
        origin at the given cell. A vertical ship points down from the origin,
        a horizontal ship points right. Fleet lengths are fixed: 5, 4, 3, 3, 2.
    randomize                   place the rest of your fleet at random.",
                );
            }
        }
    }
    Ok(())
}

/// Run the battle until a winner is decided. The human fires by typing
/// coordinates; the opponent fires at a random untried cell.
fn run_battle(
    rng: &mut impl Rng,
    game: &mut GameState,
    human: Player,
    input: &mut InputReader<impl BufRead>,
) -> io::Result<()> {
    /// Matcher for the attack command.
    static FIRE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^(?x)(?:fire|attack|shoot)?\s*(?P<row>[0-9]+)(?:\s*,\s*|\s+)(?P<col>[0-9]+)$")
            .unwrap()
    });
    let bot = human.opponent();
    while game.phase() == Phase::Match {
        let turn = match game.battle().turn() {
            Some(turn) => turn,
            None => break,
        };
        if turn == human {
            println!();
            println!("Your board:");
            show_revealed_board(game.player(human).board());
            println!("Opponent board:");
            show_obfuscated_board(game.player(bot).board());

            let coord = input.read_input_lower("fire at >", |input| {
                if let Some(captures) = FIRE.captures(input) {
                    let row: usize = match captures.name("row").unwrap().as_str().parse() {
                        Ok(row) => row,
                        Err(_) => return None,
                    };
                    let col: usize = match captures.name("col").unwrap().as_str().parse() {
                        Ok(col) => col,
                        Err(_) => return None,
                    };
                    Some(Coordinate::new(row, col))
                } else {
                    println!("Enter a target like \"3,7\".");
                    None
                }
            })?;
            match game.attack_player(human, coord) {
                Ok(report) => announce(report, "You"),
                Err(err) => match err.reason() {
                    CannotAttackPlayerReason::OutOfBounds => {
                        println!("That target is off the board, try again.");
                    }
                    CannotAttackPlayerReason::AlreadyAttacked => {
                        println!("You already fired there, try again.");
                    }
                    _ => println!("{}", err),
                },
            }
        } else {
            bot_attack(rng, game, bot);
        }
    }
    Ok(())
}

/// Fire the opponent's shot at a random cell that has not been tried yet.
fn bot_attack(rng: &mut impl Rng, game: &mut GameState, bot: Player) {
    let human = bot.opponent();
    let candidates: Vec<Coordinate> = game
        .player(human)
        .board()
        .iter_rows()
        .enumerate()
        .flat_map(|(row, cells)| {
            cells
                .enumerate()
                .filter(|(_, cell)| !cell.attacked)
                .map(move |(col, _)| Coordinate::new(row, col))
        })
        .collect();
    // The match is still running, so at least one cell is untried.
    let coord = candidates[rng.gen_range(0, candidates.len())];
    println!();
    println!("Opponent fires at {}.", coord);
    match game.attack_player(bot, coord) {
        Ok(report) => announce(report, "Opponent"),
        Err(_) => unreachable!(),
    }
}

/// Print the result of an accepted attack.
fn announce(report: AttackReport, who: &str) {
    match report {
        AttackReport::Miss => println!("{} missed.", who),
        AttackReport::Hit(_) => println!("{} hit a ship!", who),
        AttackReport::Sunk(id) => println!("{} sunk ship {}!", who, id),
        AttackReport::Victory(id) => println!("{} sunk ship {} - the last one!", who, id),
    }
}

/// Print out the setup view of a board: ships visible, no attack marks yet.
fn show_setup_board(board: &Board) {
    enum SetupCell {
        Empty,
        Ship(ShipId),
    }
    impl fmt::Display for SetupCell {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            match self {
                SetupCell::Empty => f.pad("~~"),
                SetupCell::Ship(id) => f.pad(&format!("#{}", id)),
            }
        }
    }
    show_board(board.iter_rows().map(|row| {
        row.map(|cell| match cell.ship {
            Some(id) => SetupCell::Ship(id),
            None => SetupCell::Empty,
        })
    }))
}

/// Print out the fully-revealed view of a board.
fn show_revealed_board(board: &Board) {
    enum RevealedCell {
        Empty,
        Shot,
        Intact(ShipId),
        Hit(ShipId),
        Sunk(ShipId),
    }
    impl fmt::Display for RevealedCell {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            match self {
                RevealedCell::Empty => f.pad("~~"),
                RevealedCell::Shot => f.pad("x"),
                RevealedCell::Intact(id) => f.pad(&format!("#{}", id)),
                RevealedCell::Hit(id) => f.pad(&format!("x{}", id)),
                RevealedCell::Sunk(id) => f.pad(&format!("X{}", id)),
            }
        }
    }
    let cells: Vec<Vec<RevealedCell>> = board
        .iter_rows()
        .map(|row| {
            row.map(|cell| match cell.ship {
                None if cell.attacked => RevealedCell::Shot,
                None => RevealedCell::Empty,
                Some(id) if board.ship_sunk(id) => RevealedCell::Sunk(id),
                Some(id) if cell.attacked => RevealedCell::Hit(id),
                Some(id) => RevealedCell::Intact(id),
            })
            .collect()
        })
        .collect();
    show_board(cells.into_iter().map(|row| row.into_iter()))
}

/// Print out the obfuscated view of a board: only attack results revealed.
fn show_obfuscated_board(board: &Board) {
    enum HiddenCell {
        NotShot,
        Miss,
        Hit(ShipId),
        Sunk(ShipId),
    }
    impl fmt::Display for HiddenCell {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            match self {
                HiddenCell::NotShot => f.pad("~~"),
                HiddenCell::Miss => f.pad("x"),
                HiddenCell::Hit(id) => f.pad(&format!("x{}", id)),
                HiddenCell::Sunk(id) => f.pad(&format!("X{}", id)),
            }
        }
    }
    let cells: Vec<Vec<HiddenCell>> = board
        .iter_rows()
        .map(|row| {
            row.map(|cell| match cell.ship {
                _ if !cell.attacked => HiddenCell::NotShot,
                None => HiddenCell::Miss,
                Some(id) if board.ship_sunk(id) => HiddenCell::Sunk(id),
                Some(id) => HiddenCell::Hit(id),
            })
            .collect()
        })
        .collect();
    show_board(cells.into_iter().map(|row| row.into_iter()))
}

/// Show the board by printing the grid. Takes an iterator over the rows of
/// iterators over the cells.
fn show_board(rows: impl Iterator<Item = impl Iterator<Item = impl fmt::Display>>) {
    print!("   ");
    for i in 0..10 {
        print!("{:^4}", i);
    }
    println!();
    for (i, row) in rows.enumerate() {
        print!("{:>2} ", i);
        for cell in row {
            print!("{:^4}", cell);
        }
        println!();
    }
}

/// Helper to read input from the player.
struct InputReader<B> {
    read: B,
    buf: String,
}

impl<B> InputReader<B> {
    fn new(read: B) -> Self {
        Self {
            read,
            buf: String::new(),
        }
    }
}

impl<B: BufRead> InputReader<B> {
    /// Repeatedly tries to read input until the input checker returns `Some`.
    /// Converts to ascii lower before running the checker.
    fn read_input_lower<F, T>(&mut self, prompt: &str, mut checker: F) -> io::Result<T>
    where
        F: FnMut(&str) -> Option<T>,
    {
        loop {
            self.read_input_inner(prompt)?;
            self.buf.make_ascii_lowercase();
            if let Some(val) = checker(self.buf.trim()) {
                return Ok(val);
            }
        }
    }

    /// Helper to print the prompt, clear the string buffer and read a line.
    fn read_input_inner(&mut self, prompt: &str) -> io::Result<()> {
        print!("{} ", prompt);
        io::stdout().flush()?;
        self.buf.clear();
        if self.read.read_line(&mut self.buf)? == 0 {
            println!();
            std::process::exit(0);
        }
        Ok(())
    }
}
