//! Optimal solver for the n-by-n sliding tile puzzle.
//!
//! ```no_run
//! use slider_puzzle::{Board, Solver};
//!
//! let board = Board::new(&[[1, 2, 3], [4, 5, 6], [7, 0, 8]]).unwrap();
//! let solver = Solver::new(board);
//! assert_eq!(solver.moves(), Some(1));
//! ```

pub mod board;
pub mod error;
pub mod frontier;
pub mod heuristic;
pub mod moves;
pub mod node;
pub mod report;
pub mod solver;

pub use board::Board;
pub use error::{Error, InvalidArgument, ParseError};
pub use heuristic::Heuristic;
pub use moves::Move;
pub use report::{write_report, ReportOptions};
pub use solver::{Outcome, SearchStats, Solver, SolverConfig};
