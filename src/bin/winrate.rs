use std::collections::BTreeMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser};
use plotters::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use unobot::bots::{create_bot_from_spec, label_for_spec};
use unobot::{AiConfig, Bot, GameBuilder, GameMode, RefillPolicy, Seat, TurnPhase};

/// Default base seed for deterministic runs.
const DEFAULT_SEED: u64 = 0xC0FFEE_u64 << 32 | 0x0B07_u64;

/// Label of seats played by the built-in AI.
const ENGINE_LABEL: &str = "engine";

#[derive(Parser, Debug)]
#[command(
    name = "winrate",
    about = "Run many games and plot per-seat win rates of bots against the built-in AI."
)]
struct Args {
    /// Number of games to simulate
    #[arg(short = 'g', long = "games", default_value_t = 200)]
    games: usize,

    /// Seats per game; seats not taken by a bot spec use the built-in AI
    #[arg(short = 'p', long = "players", default_value_t = 4)]
    players: usize,

    /// Base RNG seed (deck, seating and bot RNGs are derived deterministically)
    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Score table used for the mean delta column
    #[arg(long = "evaluate", action = ArgAction::SetTrue)]
    evaluate: bool,

    /// Keep the deck at a fixed size instead of adding fresh decks
    #[arg(long = "conserve", action = ArgAction::SetTrue)]
    conserve: bool,

    /// Output chart file (png)
    #[arg(short = 'o', long = "out", default_value = "winrates.png")]
    out: PathBuf,

    /// Show a textual summary only (no chart)
    #[arg(long = "no-chart", action = ArgAction::SetTrue)]
    no_chart: bool,

    /// Safety cap on turns per game; longer games are aborted
    #[arg(long = "max-turns", default_value_t = 5000)]
    max_turns: usize,

    /// Bot specs occupying seats next to the built-in AI, e.g. heuristic random
    bots: Vec<String>,
}

#[derive(Default)]
struct LabelStats {
    seats: usize,
    wins: usize,
    delta_total: i64,
}

impl LabelStats {
    fn win_rate(&self) -> f64 {
        if self.seats == 0 {
            0.0
        } else {
            self.wins as f64 / self.seats as f64
        }
    }

    fn mean_delta(&self) -> f64 {
        if self.seats == 0 {
            0.0
        } else {
            self.delta_total as f64 / self.seats as f64
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    if args.bots.is_empty() {
        return Err("please provide at least one bot spec (e.g., heuristic)".into());
    }
    if args.bots.len() > args.players {
        return Err(format!(
            "{} bot specs do not fit at a table of {} seats",
            args.bots.len(),
            args.players
        )
        .into());
    }
    // A human spec would block on stdin.
    if args.bots.iter().any(|spec| label_for_spec(spec) == "human") {
        return Err("human players are not supported in winrate runs".into());
    }

    let mode = if args.evaluate {
        GameMode::Evaluate
    } else {
        GameMode::Rating
    };
    let refill = if args.conserve {
        RefillPolicy::Conserve
    } else {
        RefillPolicy::Augment
    };
    let ai = AiConfig {
        turn_delay_ms: 0,
        ..AiConfig::default()
    };

    let mut stats: BTreeMap<String, LabelStats> = BTreeMap::new();
    let mut aborted_games = 0usize;

    for game_idx in 0..args.games {
        // Permute seating each game for fairness.
        let mut specs: Vec<Option<&String>> = args.bots.iter().map(Some).collect();
        specs.resize(args.players, None);
        let mut seat_rng = StdRng::seed_from_u64(mix_seed(args.seed, game_idx as u64, 0x5EA7));
        specs.shuffle(&mut seat_rng);

        let mut seats = Vec::with_capacity(args.players);
        let mut labels = Vec::with_capacity(args.players);
        let mut bots: Vec<Option<Box<dyn Bot>>> = Vec::with_capacity(args.players);
        for (seat, spec) in specs.iter().enumerate() {
            match spec {
                Some(spec) => {
                    let label = label_for_spec(spec);
                    let bot_seed = mix_seed(args.seed, game_idx as u64, seat as u64);
                    bots.push(Some(create_bot_from_spec(spec, seat, bot_seed)?));
                    seats.push(Seat::human(format!("{label}{seat}")));
                    labels.push(label);
                }
                None => {
                    bots.push(None);
                    seats.push(Seat::ai(format!("{ENGINE_LABEL}{seat}")));
                    labels.push(ENGINE_LABEL.to_string());
                }
            }
        }

        let mut game = GameBuilder::new(args.players)?
            .with_seed(mix_seed(args.seed, game_idx as u64, 0xDEC0))
            .with_mode(mode)
            .with_refill_policy(refill)
            .with_ai_config(ai)
            .with_seats(seats)
            .build()?;

        while !game.is_finished() && game.turns() < args.max_turns {
            if game.phase() == TurnPhase::AiTurnPending {
                game.run_ai_turn()?;
                continue;
            }
            let current = game.current_player();
            let Some(bot) = bots[current].as_mut() else {
                return Err(format!("seat {current} has no bot to act").into());
            };
            let state = game.state_view(current)?;
            let legal = game.legal_actions(current)?;
            let action = bot.select_action(&state, &legal);
            game.apply_action(current, action)?;
        }
        game.drain_events();

        let Some(result) = game.result() else {
            warn!(game = game_idx, turns = game.turns(), "game aborted at turn cap");
            aborted_games += 1;
            continue;
        };
        for ranking in &result.rankings {
            let entry = stats.entry(labels[ranking.player].clone()).or_default();
            entry.seats += 1;
            entry.delta_total += i64::from(ranking.delta);
            if ranking.player == result.winner {
                entry.wins += 1;
            }
        }
    }
    info!(games = args.games, aborted_games, "runs complete");

    let mut results: Vec<(String, f64, f64, usize, usize)> = stats
        .iter()
        .map(|(label, entry)| {
            (
                label.clone(),
                entry.win_rate(),
                entry.mean_delta(),
                entry.wins,
                entry.seats,
            )
        })
        .collect();
    results.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    println!("Win rates (per seat, {} table):", mode.name());
    for (label, rate, mean_delta, wins, seats) in &results {
        println!(
            "  {label:<12}  {wins}/{seats}  ({:.2}%)   mean delta: {mean_delta:>+6.2}",
            rate * 100.0
        );
    }
    if aborted_games > 0 {
        println!("\nNote: {aborted_games} game(s) hit the turn cap without a winner.");
    }

    if !args.no_chart {
        if !has_png_extension(&args.out) {
            return Err("only PNG output is supported; use --out with .png".into());
        }
        render_bar_chart(&args.out, &results)?;
        println!("\nChart written to {}", args.out.display());
    }
    Ok(())
}

fn has_png_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

fn mix_seed(base: u64, a: u64, b: u64) -> u64 {
    let mut z =
        base ^ (a.wrapping_mul(0x9E37_79B97F4A7C15)) ^ (b.wrapping_mul(0xBF58_476D1CE4E5B9));
    z ^= z >> 12;
    z ^= z << 25;
    z ^= z >> 27;
    z
}

fn render_bar_chart(
    out: &Path,
    data: &[(String, f64, f64, usize, usize)],
) -> Result<(), Box<dyn Error>> {
    let labels: Vec<String> = data.iter().map(|row| row.0.clone()).collect();
    let values: Vec<f64> = data.iter().map(|row| row.1 * 100.0).collect();
    let max_value = values.iter().copied().fold(0.0_f64, f64::max).max(10.0);

    let root = BitMapBackend::new(out, (1000, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| format!("{e}"))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Win rate per seat", ("sans-serif", 28).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0..labels.len(), 0.0f64..max_value)
        .map_err(|e| format!("{e}"))?;

    chart
        .configure_mesh()
        .y_desc("Win rate (%)")
        .x_desc("Seat driver")
        .x_labels(labels.len())
        .x_label_formatter(&|idx| labels.get(*idx).cloned().unwrap_or_default())
        .y_label_formatter(&|v| format!("{v:.0}"))
        .light_line_style(&WHITE.mix(0.0))
        .draw()
        .map_err(|e| format!("{e}"))?;

    chart
        .draw_series(values.iter().enumerate().map(|(i, value)| {
            Rectangle::new([(i, 0.0), (i + 1, *value)], BLUE.mix(0.7).filled())
        }))
        .map_err(|e| format!("{e}"))?;

    root.present().map_err(|e| format!("{e}"))?;
    Ok(())
}
