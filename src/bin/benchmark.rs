use clap::Parser;
use mcts::games::connect4::Connect4;
use mcts::{Game, Mcts, SearchConfig, SearchStatistics};
use std::error::Error;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Board width for Connect 4 (default: 7)
    #[arg(long, default_value_t = 7)]
    width: usize,

    /// Board height for Connect 4 (default: 6)
    #[arg(long, default_value_t = 6)]
    height: usize,

    /// Search duration in seconds (default: 5)
    #[arg(long, default_value_t = 5)]
    duration: u64,

    /// Number of parallel search trees (default: number of CPUs)
    #[arg(long)]
    threads: Option<usize>,

    /// Maximum tree steps per simulation (default: 100)
    #[arg(long, default_value_t = 100)]
    max_depth: usize,

    /// Also run a single-threaded search for comparison.
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    compare_sequential: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let _logger = flexi_logger::Logger::try_with_env_or_str("warn")?.start()?;
    let args = Args::parse();
    let threads = args.threads.unwrap_or_else(num_cpus::get);

    println!("Root-Parallel MCTS - Benchmark Tool");
    println!("===================================");
    println!("Game: Connect 4 ({}x{})", args.width, args.height);
    println!("Duration: {} seconds", args.duration);
    println!("Threads: {}", threads);
    println!("Max Depth: {}", args.max_depth);
    println!("-----------------------------------");

    #[cfg(debug_assertions)]
    println!("WARNING: Running in debug mode. Performance will be significantly lower.\nUse --release for accurate benchmarks.\n");

    let game = Connect4::new(args.width, args.height, 4);
    let duration = Duration::from_secs(args.duration);

    if args.compare_sequential {
        println!("\nRunning sequential benchmark...");
        let stats = run_once(game, SearchConfig::default().with_workers(1).with_max_depth(args.max_depth), duration)?;
        print_stats("Sequential", &stats);
    }

    println!("\nRunning parallel benchmark...");
    let config = SearchConfig::default()
        .with_workers(threads)
        .with_max_depth(args.max_depth);
    let stats = run_once(game, config, duration)?;
    print_stats("Parallel", &stats);
    Ok(())
}

fn run_once(game: Connect4, config: SearchConfig, duration: Duration) -> Result<SearchStatistics, Box<dyn Error>> {
    let start = game.new_game();
    let mut engine = Mcts::new(game, config)?;
    let outcome = engine.search(&start, duration)?;
    Ok(outcome.statistics)
}

fn print_stats(name: &str, stats: &SearchStatistics) {
    let secs = stats.elapsed.as_secs_f64();
    let sps = stats.simulations as f64 / secs;

    println!("{} Results:", name);
    println!("  Workers: {}", stats.workers);
    println!("  Total Nodes: {}", stats.total_nodes);
    println!("  Time: {:.3}s", secs);
    println!("  SPS: {:.0} sims/sec", sps);
    println!("  Root Plays: {}", stats.root_plays);
}
