use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::process;
use std::thread;

use tracing::info;
use tracing_subscriber::EnvFilter;

use unobot::bots::{create_bot_from_spec, label_for_spec};
use unobot::{
    Bot, FileScoreStore, Game, GameBuilder, GameConfig, GameError, GameMode, PlayerId, Ranking,
    Seat, TurnPhase, UiCallbacks, describe_action, render_state,
};

/// Prints engine events to the terminal.
struct ConsoleUi {
    verbose: bool,
}

impl UiCallbacks for ConsoleUi {
    fn show_message(&mut self, text: &str) {
        println!("{text}");
    }

    fn show_color_selection(&mut self, _player: PlayerId) {
        if self.verbose {
            println!("Choose a color for your wild card.");
        }
    }

    fn show_turtle_target_selection(&mut self, _player: PlayerId, candidates: &[PlayerId]) {
        if self.verbose {
            println!("Choose who receives +3 (candidates: {candidates:?}).");
        }
    }

    fn show_game_result(&mut self, rankings: &[Ranking], human: Option<&Ranking>) {
        println!("\nFinal standings:");
        for ranking in rankings {
            println!(
                "  #{} {} - {} card(s) left, {:+}",
                ranking.rank, ranking.name, ranking.hand_size, ranking.delta
            );
        }
        if let Some(human) = human {
            println!("You finished #{} ({:+}).", human.rank, human.delta);
        }
    }

    fn show_score_update(&mut self, old_score: i64, new_score: i64, delta: i32) {
        println!("Score: {old_score} -> {new_score} ({delta:+})");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn parse_value<T: std::str::FromStr>(
    flag: &str,
    value: Option<String>,
) -> Result<T, Box<dyn Error>> {
    let value = value.ok_or_else(|| format!("{flag} requires a value"))?;
    value
        .parse::<T>()
        .map_err(|_| format!("invalid {flag} value: {value}").into())
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let mut config_path: Option<PathBuf> = None;
    let mut players: Option<usize> = None;
    let mut seed: Option<u64> = None;
    let mut mode: Option<GameMode> = None;
    let mut scores: Option<PathBuf> = None;
    let mut max_turns: Option<usize> = None;
    let mut fast = false;
    let mut visualize = false;
    let mut bot_spec = String::from("human");
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config_path = Some(parse_value("--config", args.next())?),
            "--players" => players = Some(parse_value("--players", args.next())?),
            "--seed" => seed = Some(parse_value("--seed", args.next())?),
            "--mode" => {
                let value: String = parse_value("--mode", args.next())?;
                mode = Some(match value.to_ascii_lowercase().as_str() {
                    "rating" => GameMode::Rating,
                    "evaluate" => GameMode::Evaluate,
                    other => return Err(format!("unknown mode: {other}").into()),
                });
            }
            "--scores" => scores = Some(parse_value("--scores", args.next())?),
            "--max-turns" => max_turns = Some(parse_value("--max-turns", args.next())?),
            "--fast" => fast = true,
            "--visualize" => visualize = true,
            "--help" => {
                print_usage();
                return Ok(());
            }
            other => bot_spec = other.to_string(),
        }
    }

    let mut config = match &config_path {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(players) = players {
        config.num_players = players;
    }
    if let Some(seed) = seed {
        config.seed = seed;
    }
    if let Some(mode) = mode {
        config.mode = mode;
    }
    config.validate()?;
    let seed = config.seed;

    let seat_name = match label_for_spec(&bot_spec).as_str() {
        "human" => bot_spec
            .split_once(':')
            .map(|(_, name)| name.trim().to_string())
            .unwrap_or_else(|| String::from("You")),
        label => label.to_string(),
    };
    let mut seats = Seat::default_table(config.num_players);
    seats[0] = Seat::human(seat_name);
    let mut bot = create_bot_from_spec(&bot_spec, 0, seed)?;

    let mut builder = GameBuilder::from_config(config)?.with_seats(seats);
    if let Some(path) = &scores {
        builder = builder.with_score_store(Box::new(FileScoreStore::open(path)?));
    }
    let mut game: Game = builder.build()?;
    let names = game.player_names();
    let mut ui = ConsoleUi { verbose: visualize };
    info!(players = game.num_players(), seed, "simulation started");

    loop {
        for event in game.drain_events() {
            event.deliver(&names, &mut ui);
        }
        if game.is_finished() {
            break;
        }
        if let Some(limit) = max_turns {
            if game.turns() >= limit {
                println!("Max turn limit {limit} reached. Stopping simulation.");
                break;
            }
        }
        if game.phase() == TurnPhase::AiTurnPending {
            if !fast {
                thread::sleep(game.ai_delay());
            }
            game.run_ai_turn()?;
            continue;
        }
        let current = game.current_player();
        let state = game.state_view(current)?;
        let legal_actions = game.legal_actions(current)?;
        if legal_actions.is_empty() {
            return Err(GameError::InvalidConfiguration(
                "no legal actions available for current player",
            )
            .into());
        }
        if visualize {
            println!("{}", render_state(&state));
        }
        let action = bot.select_action(&state, &legal_actions);
        if visualize {
            println!("Chosen action: {}", describe_action(&state, &action));
        }
        if let Err(err) = game.apply_action(current, action) {
            println!("Action rejected: {err}");
        }
    }

    match game.winner() {
        Some(winner) => println!(
            "Game finished after {} turns. Winner: {}.",
            game.turns(),
            names[winner]
        ),
        None => println!("Simulation stopped before completion."),
    }
    Ok(())
}

fn print_usage() {
    println!("Usage: simulate [OPTIONS] [BOT]");
    println!("  --config <path>       Load game settings from a JSON file");
    println!("  --players <usize>     Number of seats, 2-10 (default: 4)");
    println!("  --seed <u64>          Seed for shuffling and AI decisions");
    println!("  --mode <mode>         rating or evaluate (default: rating)");
    println!("  --scores <path>       Persist the seat 0 score in this file");
    println!("  --max-turns <usize>   Stop after the specified number of turns");
    println!("  --fast                Run AI turns without the think delay");
    println!("  --visualize           Show the game state and chosen actions each turn");
    println!("  --help                Show this help message");
    println!("Seat 0 is driven by BOT; the other seats use the built-in AI:");
    println!("  human[:name]          Interactive player (default)");
    println!("  random[:seed]         Random legal actions");
    println!("  heuristic             Rule-based bot");
}
