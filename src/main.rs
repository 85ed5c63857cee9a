use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use rand::{rngs::StdRng, thread_rng, SeedableRng};
use slider_puzzle::{write_report, Board, Error, Heuristic, ReportOptions, Solver, SolverConfig};

#[derive(Parser, Debug)]
#[command(
    name = "slider-puzzle",
    version,
    about = "Find the shortest solution of an n-by-n sliding tile puzzle"
)]
struct Cli {
    /// Puzzle file: the dimension followed by the tiles row by row, 0 for the blank.
    /// Reads stdin when absent or "-".
    #[arg(value_name = "FILE", conflicts_with = "random")]
    input: Option<PathBuf>,
    /// Solve a random solvable board of this dimension instead
    #[arg(long, value_name = "N")]
    random: Option<usize>,
    /// Seed for --random
    #[arg(long, requires = "random")]
    seed: Option<u64>,
    /// Distance estimate guiding the search
    #[arg(long, value_enum, default_value_t = HeuristicArg::Manhattan)]
    heuristic: HeuristicArg,
    /// Never expand the same board twice
    #[arg(long)]
    closed_set: bool,
    /// Stop after this many lock-step iterations (each expands one node per side)
    #[arg(long, value_name = "N")]
    max_iterations: Option<usize>,
    /// Print the slide direction between boards
    #[arg(long)]
    moves: bool,
    /// Colour tiles by whether they are in place
    #[arg(long)]
    color: bool,
    /// Raise the log level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum HeuristicArg {
    Hamming,
    Manhattan,
    LinearConflict,
}

impl From<HeuristicArg> for Heuristic {
    fn from(arg: HeuristicArg) -> Self {
        match arg {
            HeuristicArg::Hamming => Heuristic::Hamming,
            HeuristicArg::Manhattan => Heuristic::Manhattan,
            HeuristicArg::LinearConflict => Heuristic::LinearConflict,
        }
    }
}

fn read_board(cli: &Cli) -> Result<Board, Error> {
    if let Some(size) = cli.random {
        let board = match cli.seed {
            Some(seed) => Board::random_solvable(size, &mut StdRng::seed_from_u64(seed))?,
            None => Board::random_solvable(size, &mut thread_rng())?,
        };
        log::info!("random board:\n{}", board);
        return Ok(board);
    }

    let text = match &cli.input {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)?,
        _ => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            text
        }
    };
    Ok(text.parse()?)
}

fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let initial = read_board(&cli)?;

    let mut config = SolverConfig::new()
        .with_heuristic(cli.heuristic.into())
        .with_closed_set(cli.closed_set);
    if let Some(limit) = cli.max_iterations {
        config = config.with_max_iterations(limit);
    }

    let solver = Solver::with_config(initial, config);
    log::debug!("search stats: {:?}", solver.stats());

    let options = ReportOptions {
        moves: cli.moves,
        color: cli.color,
    };
    write_report(&mut io::stdout().lock(), &solver, options)?;
    Ok(())
}
