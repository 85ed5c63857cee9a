use std::fmt;

use crate::board::Board;

/// Admissible distance estimate used to order the frontier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Heuristic {
    Hamming,
    #[default]
    Manhattan,
    LinearConflict,
}

impl Heuristic {
    pub fn estimate(self, board: &Board) -> usize {
        match self {
            Heuristic::Hamming => board.hamming(),
            Heuristic::Manhattan => board.manhattan(),
            Heuristic::LinearConflict => board.linear_conflict(),
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Heuristic::Hamming => "hamming",
            Heuristic::Manhattan => "manhattan",
            Heuristic::LinearConflict => "linear-conflict",
        };
        write!(f, "{}", s)
    }
}
