//! games-smoke: print every game's initial position and legal actions,
//! then optionally play a batch of games per engine.

use std::process::ExitCode;

use clap::Parser;
use games::harness::{self, GAME_NAMES};
use games::GameKind;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "games-smoke", version, about = "Smoke test for the board game engines")]
struct Cli {
    /// Games to run, by registry name.
    #[arg(long, value_delimiter = ',', default_values_t = GAME_NAMES.map(String::from))]
    games: Vec<String>,

    /// Games to play per engine after the smoke output.
    #[arg(long, default_value_t = 0)]
    playouts: u32,

    /// Seed for setups, chance events and move choices.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// MCTS iterations per Black move in playouts (0 = random Black).
    #[arg(long, default_value_t = 0)]
    mcts_iterations: u32,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

fn init_logger(verbose: bool) {
    let default = if verbose { "games=debug,info" } else { "games=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let reports = match harness::run(&cli.games) {
        Ok(reports) => reports,
        Err(err) => {
            tracing::error!("{err}");
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    for report in &reports {
        println!("{report}");
    }

    if cli.playouts > 0 {
        for name in &cli.games {
            // Names were validated by `run`.
            let Ok(kind) = name.parse::<GameKind>() else {
                continue;
            };
            let tally = harness::playouts(kind, cli.playouts, cli.seed, cli.mcts_iterations);
            println!("{tally}");
        }
    }

    ExitCode::SUCCESS
}
