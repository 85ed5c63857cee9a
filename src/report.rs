use crossterm::style::Stylize;
use std::io::{self, Write};

use crate::board::Board;
use crate::solver::{Outcome, Solver};

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    /// Print the slide direction before every board after the first.
    pub moves: bool,
    /// Colour tiles green when they sit on their goal cell, red otherwise.
    pub color: bool,
}

/// Writes the solver result in the usual text form.
pub fn write_report<W: Write>(
    out: &mut W,
    solver: &Solver,
    options: ReportOptions,
) -> io::Result<()> {
    let path = match solver.outcome() {
        Outcome::Unsolvable => return writeln!(out, "No solution possible"),
        Outcome::Exhausted => {
            return writeln!(
                out,
                "No solution found within {} iterations",
                solver.stats().iterations
            )
        }
        Outcome::Solved(path) => path,
    };

    writeln!(out, "Minimum number of moves = {}", path.len() - 1)?;
    for (index, board) in path.iter().enumerate() {
        if options.moves && index > 0 {
            if let Some(movement) = path[index - 1].move_to(board) {
                writeln!(out, "{}", movement)?;
            }
        }
        if options.color {
            writeln!(out, "{}", colored(board))?;
        } else {
            writeln!(out, "{}", board)?;
        }
    }
    Ok(())
}

fn colored(board: &Board) -> String {
    let n = board.dimension();
    let mut text = format!("{}\n", n);
    for row in 0..n {
        let line = (0..n)
            .map(|col| {
                let tile = board.tile(row, col);
                let label = tile.to_string();
                if tile == 0 {
                    label.dark_grey().to_string()
                } else if tile as usize == row * n + col + 1 {
                    label.green().to_string()
                } else {
                    label.red().to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        text.push_str(&line);
        text.push('\n');
    }
    text
}
