//! # Self-Play Driver
//!
//! Plays one game of Tic-Tac-Toe or Connect 4 with the engine on both sides,
//! printing the board and the root statistics after every move.
//!
//! ## Usage
//! Run with `cargo run --release -- --game connect4 --simulations 2000` for
//! a fixed number of simulations per worker, or `--time-ms` for a time budget.
//! Set `RUST_LOG=debug` to see per-search summaries.

use clap::{Parser, ValueEnum};
use colored::Colorize;
use mcts::games::connect4::Connect4;
use mcts::games::tictactoe::TicTacToe;
use mcts::{Game, Mcts, Outcome, SearchBudget, SearchConfig};
use std::error::Error;
use std::fmt::Display;
use std::time::Duration;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GameKind {
    Tictactoe,
    Connect4,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Engine-vs-engine self-play with root-parallel MCTS", long_about = None)]
struct Args {
    /// Game to play
    #[arg(long, value_enum, default_value_t = GameKind::Tictactoe)]
    game: GameKind,

    /// Board size for Tic-Tac-Toe
    #[arg(long, default_value_t = 3)]
    size: usize,

    /// Pieces in a row needed to win (defaults to 3 for Tic-Tac-Toe, 4 for Connect 4)
    #[arg(long)]
    line_size: Option<usize>,

    /// Board width for Connect 4
    #[arg(long, default_value_t = 7)]
    width: usize,

    /// Board height for Connect 4
    #[arg(long, default_value_t = 6)]
    height: usize,

    /// Number of parallel search trees (defaults to the number of CPUs)
    #[arg(long)]
    threads: Option<usize>,

    /// Maximum tree steps per simulation before the random rollout
    #[arg(long, default_value_t = 100)]
    max_depth: usize,

    /// Exploration rate of the UCT score
    #[arg(long, default_value_t = 1.0)]
    exploration: f64,

    /// Time budget per move in milliseconds
    #[arg(long)]
    time_ms: Option<u64>,

    /// Simulations per worker and move
    #[arg(long)]
    simulations: Option<u64>,

    /// Seed for reproducible rollouts
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let _logger = flexi_logger::Logger::try_with_env_or_str("info")?.start()?;
    let args = Args::parse();

    let config = SearchConfig::default()
        .with_workers(args.threads.unwrap_or_else(num_cpus::get))
        .with_max_depth(args.max_depth)
        .with_exploration_rate(args.exploration)
        .with_seed(args.seed);

    let mut budget = SearchBudget::default();
    if let Some(time_ms) = args.time_ms {
        budget = budget.with_time(Duration::from_millis(time_ms));
    }
    if let Some(simulations) = args.simulations {
        budget = budget.with_simulations(simulations);
    }

    match args.game {
        GameKind::Tictactoe => {
            let game = TicTacToe::new(args.size, args.line_size.unwrap_or(3));
            self_play(game, config, budget)
        }
        GameKind::Connect4 => {
            let game = Connect4::new(args.width, args.height, args.line_size.unwrap_or(4));
            self_play(game, config, budget)
        }
    }
}

/// Plays the engine against itself until the game reports an outcome.
fn self_play<G>(game: G, config: SearchConfig, budget: SearchBudget) -> Result<(), Box<dyn Error>>
where
    G: Game,
    G::State: Display,
{
    let mut state = game.new_game();
    let mut engine = Mcts::new(game, config)?;
    println!("{}", state);

    let mut move_number = 1;
    let outcome = loop {
        if let Some(outcome) = engine.game().winner(&state, None) {
            break outcome;
        }

        let player = engine.game().current_player(&state);
        let result = engine.search(&state, budget)?;
        println!("Move {} by {:?}: action {}", move_number, player, result.action);
        println!("{}", result.state);
        print_root_statistics(&engine, result.action);
        println!(
            "Simulations: {} ({} workers, {} nodes, {:.2?})\n",
            result.statistics.simulations,
            result.statistics.workers,
            result.statistics.total_nodes,
            result.statistics.elapsed
        );

        engine.advance_root([&result.state]);
        state = result.state;
        move_number += 1;
    };

    match outcome {
        Outcome::Draw => println!("{}", "Draw".yellow().bold()),
        Outcome::Win(player) => println!("{}", format!("{:?} wins", player).green().bold()),
    }
    Ok(())
}

/// Prints win rate and play count per action of the current root, highlighting `chosen`.
fn print_root_statistics<G: Game>(engine: &Mcts<G>, chosen: usize) {
    let (Some(rates), Some(plays)) = (engine.root_child_win_rates(), engine.root_child_plays()) else {
        return;
    };
    let rates: Vec<String> = rates
        .iter()
        .enumerate()
        .map(|(action, rate)| {
            let text = format!("{:.2}", rate);
            if action == chosen {
                text.green().bold().to_string()
            } else {
                text
            }
        })
        .collect();
    println!("Child win rates: [{}]", rates.join(", "));
    println!("Child plays:     {:?}", plays);
    println!("Root plays:      {}", engine.root_plays());
}
