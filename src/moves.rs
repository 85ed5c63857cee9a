use std::fmt;

/// Direction a tile slides into the blank.
///
/// `Move::Up` means the tile below the blank moves up, so the blank itself
/// travels one row down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Expansion order: blank up, blank down, blank left, blank right.
    pub const ALL: [Move; 4] = [Move::Down, Move::Up, Move::Right, Move::Left];

    /// Where the blank goes, as a `(row, col)` step.
    pub fn blank_step(self) -> (isize, isize) {
        let (dr, dc) = self.tile_step();
        (-dr, -dc)
    }

    /// Where the sliding tile goes, as a `(row, col)` step.
    pub fn tile_step(self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }

    /// The move that slides the same tile back.
    pub fn reversed(self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }

    pub(crate) fn from_blank_step(step: (isize, isize)) -> Option<Self> {
        Move::ALL.into_iter().find(|m| m.blank_step() == step)
    }

    pub fn label(self) -> &'static str {
        match self {
            Move::Up => "Up",
            Move::Down => "Down",
            Move::Left => "Left",
            Move::Right => "Right",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
