use rand::{seq::SliceRandom, Rng};
use std::{fmt, str::FromStr};

use crate::error::{InvalidArgument, ParseError};
use crate::moves::Move;

/// Blank neighbor scan order used by [`Board::twin`]: up, down, left, right.
const SCAN: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// One arrangement of an n-by-n puzzle. Tile `0` is the blank.
///
/// Boards are values: every transformation returns a new board and the tile
/// buffer is never handed out mutably.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    tiles: Box<[u32]>,
    blank: usize,
}

impl Board {
    /// Builds a board from rows of tiles, `rows[row][col]`.
    pub fn new<R: AsRef<[u32]>>(rows: &[R]) -> Result<Self, InvalidArgument> {
        let size = rows.len();
        if size == 0 {
            return Err(InvalidArgument::Empty);
        }

        let mut tiles = Vec::new();
        for (row, cells) in rows.iter().enumerate() {
            let cells = cells.as_ref();
            if cells.len() != size {
                return Err(InvalidArgument::NotSquare {
                    row,
                    len: cells.len(),
                    dimension: size,
                });
            }
            tiles.extend_from_slice(cells);
        }

        Self::from_tiles(size, tiles)
    }

    /// Builds a board from `size * size` tiles in row-major order.
    pub fn from_tiles(size: usize, tiles: Vec<u32>) -> Result<Self, InvalidArgument> {
        if size == 0 {
            return Err(InvalidArgument::Empty);
        }
        if size < 2 {
            return Err(InvalidArgument::TooSmall(size));
        }
        let cells = cell_count(size)?;
        if tiles.len() != cells as usize {
            return Err(InvalidArgument::NotSquare {
                row: tiles.len() / size,
                len: tiles.len() % size,
                dimension: size,
            });
        }

        let limit = cells;
        let mut seen = vec![false; tiles.len()];
        let mut blank = 0;
        for (index, &tile) in tiles.iter().enumerate() {
            if tile >= limit {
                return Err(InvalidArgument::TileOutOfRange { tile, limit });
            }
            if std::mem::replace(&mut seen[tile as usize], true) {
                return Err(InvalidArgument::DuplicateTile(tile));
            }
            if tile == 0 {
                blank = index;
            }
        }

        Ok(Self {
            size,
            tiles: tiles.into_boxed_slice(),
            blank,
        })
    }

    /// The solved board: `1..n*n` in order, blank last.
    pub fn goal(size: usize) -> Result<Self, InvalidArgument> {
        let cells = cell_count(size)?;
        Self::from_tiles(size, (1..cells).chain(std::iter::once(0)).collect())
    }

    /// A uniformly shuffled board, solvable or not.
    pub fn shuffled<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Self, InvalidArgument> {
        let mut tiles: Vec<u32> = (0..cell_count(size)?).collect();
        tiles.shuffle(rng);
        Self::from_tiles(size, tiles)
    }

    /// A uniformly shuffled board that is guaranteed to be solvable.
    pub fn random_solvable<R: Rng + ?Sized>(
        size: usize,
        rng: &mut R,
    ) -> Result<Self, InvalidArgument> {
        // twin() is an involution that flips parity, so this stays uniform
        let board = Self::shuffled(size, rng)?;
        if board.has_solvable_parity() {
            Ok(board)
        } else {
            Ok(board.twin())
        }
    }

    pub fn dimension(&self) -> usize {
        self.size
    }

    /// Tiles in row-major order.
    pub fn tiles(&self) -> &[u32] {
        &self.tiles
    }

    pub fn tile(&self, row: usize, col: usize) -> u32 {
        self.tiles[row * self.size + col]
    }

    /// Position of the blank as `(row, col)`.
    pub fn blank(&self) -> (usize, usize) {
        self.coords(self.blank)
    }

    /// Number of tiles out of place, blank excluded.
    pub fn hamming(&self) -> usize {
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(index, &tile)| tile != 0 && tile as usize != index + 1)
            .count()
    }

    /// Sum of the grid distances between every tile and its goal cell.
    pub fn manhattan(&self) -> usize {
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(_, &tile)| tile != 0)
            .map(|(index, &tile)| {
                let (row, col) = self.coords(index);
                let (goal_row, goal_col) = self.coords(tile as usize - 1);
                row.abs_diff(goal_row) + col.abs_diff(goal_col)
            })
            .sum()
    }

    /// Manhattan distance plus two moves for every tile that has to step out
    /// of its goal row or column to let the others in that line pass.
    pub fn linear_conflict(&self) -> usize {
        self.manhattan() + 2 * self.line_conflicts()
    }

    fn line_conflicts(&self) -> usize {
        let n = self.size;
        let mut conflicts = 0;
        let mut line = Vec::with_capacity(n);

        for row in 0..n {
            line.clear();
            line.extend(
                (0..n)
                    .map(|col| self.tile(row, col) as usize)
                    .filter(|&tile| tile != 0 && (tile - 1) / n == row)
                    .map(|tile| (tile - 1) % n),
            );
            conflicts += line.len() - longest_increasing(&line);
        }

        for col in 0..n {
            line.clear();
            line.extend(
                (0..n)
                    .map(|row| self.tile(row, col) as usize)
                    .filter(|&tile| tile != 0 && (tile - 1) % n == col)
                    .map(|tile| (tile - 1) / n),
            );
            conflicts += line.len() - longest_increasing(&line);
        }

        conflicts
    }

    pub fn is_goal(&self) -> bool {
        let last = self.tiles.len() - 1;
        self.tiles[..last]
            .iter()
            .enumerate()
            .all(|(index, &tile)| tile as usize == index + 1)
    }

    /// The board reached by sliding a tile into the blank, if that tile exists.
    pub fn slide(&self, movement: Move) -> Option<Board> {
        let (row, col) = self.coords(self.blank);
        let (dr, dc) = movement.blank_step();
        let target = self.offset(row, col, dr, dc)?;
        Some(self.swapped(self.blank, target, target))
    }

    /// Every board one slide away, in [`Move::ALL`] order.
    pub fn neighbors(&self) -> impl Iterator<Item = Board> + '_ {
        Move::ALL
            .into_iter()
            .filter_map(move |movement| self.slide(movement))
    }

    /// The slide turning `self` into `next`, if they are adjacent.
    pub fn move_to(&self, next: &Board) -> Option<Move> {
        if self.size != next.size {
            return None;
        }
        let (row, col) = self.coords(self.blank);
        let (next_row, next_col) = next.coords(next.blank);
        let movement = Move::from_blank_step((
            next_row as isize - row as isize,
            next_col as isize - col as isize,
        ))?;
        self.slide(movement)
            .filter(|slid| slid == next)
            .map(|_| movement)
    }

    /// The board with the first adjacent pair of non-blank tiles swapped.
    ///
    /// Positions are scanned in row-major order, and each position checks its
    /// neighbors up, down, left, right. The blank never moves, so applying
    /// `twin` twice gives back the original board.
    pub fn twin(&self) -> Board {
        for index in 0..self.tiles.len() {
            if self.tiles[index] == 0 {
                continue;
            }
            let (row, col) = self.coords(index);
            let partner = SCAN
                .into_iter()
                .filter_map(|(dr, dc)| self.offset(row, col, dr, dc))
                .find(|&other| self.tiles[other] != 0);
            if let Some(other) = partner {
                return self.swapped(index, other, self.blank);
            }
        }
        unreachable!("a board of dimension 2 or more always has two adjacent tiles")
    }

    /// Inversion parity test: whether the goal is reachable by sliding.
    pub fn has_solvable_parity(&self) -> bool {
        let (blank_row, _) = self.blank();
        let parity = self.inversion_parity();
        if self.size % 2 == 1 {
            parity == 0
        } else {
            // A vertical slide moves a tile past n - 1 others, flipping the
            // parity together with the blank row.
            (parity + blank_row) % 2 == 1
        }
    }

    /// Parity of the number of inversions among the tiles, blank left out.
    ///
    /// Equal to the permutation's parity, `(len - cycles) % 2`.
    fn inversion_parity(&self) -> usize {
        let order: Vec<usize> = self
            .tiles
            .iter()
            .filter(|&&tile| tile != 0)
            .map(|&tile| tile as usize - 1)
            .collect();

        let mut visited = vec![false; order.len()];
        let mut cycles = 0;
        for start in 0..order.len() {
            if visited[start] {
                continue;
            }
            cycles += 1;
            let mut at = start;
            while !visited[at] {
                visited[at] = true;
                at = order[at];
            }
        }
        (order.len() - cycles) % 2
    }

    fn coords(&self, index: usize) -> (usize, usize) {
        (index / self.size, index % self.size)
    }

    fn offset(&self, row: usize, col: usize, dr: isize, dc: isize) -> Option<usize> {
        let row = row.checked_add_signed(dr)?;
        let col = col.checked_add_signed(dc)?;
        (row < self.size && col < self.size).then(|| row * self.size + col)
    }

    fn swapped(&self, a: usize, b: usize, blank: usize) -> Board {
        let mut tiles = self.tiles.clone();
        tiles.swap(a, b);
        Board {
            size: self.size,
            tiles,
            blank,
        }
    }
}

/// Number of cells of a `size` by `size` board, if tiles can still be `u32`.
fn cell_count(size: usize) -> Result<u32, InvalidArgument> {
    size.checked_mul(size)
        .and_then(|cells| u32::try_from(cells).ok())
        .ok_or(InvalidArgument::TooLarge(size))
}

/// Length of the longest strictly increasing subsequence.
fn longest_increasing(values: &[usize]) -> usize {
    let mut tails: Vec<usize> = Vec::with_capacity(values.len());
    for &value in values {
        match tails.binary_search(&value) {
            Ok(_) => {}
            Err(pos) if pos == tails.len() => tails.push(value),
            Err(pos) => tails[pos] = value,
        }
    }
    tails.len()
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.size)?;
        for row in self.tiles.chunks(self.size) {
            let line = row
                .iter()
                .map(|tile| tile.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = ParseError;

    /// Reads the dimension followed by `n * n` whitespace separated tiles.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let size: usize = parse_token(tokens.next().ok_or(ParseError::MissingDimension)?)?;
        let expected = size
            .checked_mul(size)
            .ok_or_else(|| ParseError::BadToken(size.to_string()))?;

        let tiles = tokens
            .by_ref()
            .take(expected)
            .map(parse_token)
            .collect::<Result<Vec<u32>, _>>()?;
        if tiles.len() < expected {
            return Err(ParseError::Truncated {
                expected,
                found: tiles.len(),
            });
        }
        if let Some(extra) = tokens.next() {
            return Err(ParseError::Trailing(extra.to_owned()));
        }

        Ok(Board::from_tiles(size, tiles)?)
    }
}

fn parse_token<T: FromStr>(token: &str) -> Result<T, ParseError> {
    token
        .parse()
        .map_err(|_| ParseError::BadToken(token.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn board(rows: &[&[u32]]) -> Board {
        Board::new(rows).unwrap()
    }

    #[test]
    fn rejects_malformed_grids() {
        let empty: [[u32; 0]; 0] = [];
        assert_eq!(Board::new(&empty), Err(InvalidArgument::Empty));
        assert_eq!(
            Board::new(&[vec![1, 2, 3], vec![4, 5, 0]]),
            Err(InvalidArgument::NotSquare {
                row: 0,
                len: 3,
                dimension: 2
            })
        );
        assert_eq!(Board::new(&[[0]]), Err(InvalidArgument::TooSmall(1)));
        assert_eq!(
            Board::new(&[[1, 2], [3, 4]]),
            Err(InvalidArgument::TileOutOfRange { tile: 4, limit: 4 })
        );
        assert_eq!(
            Board::new(&[[1, 1], [3, 0]]),
            Err(InvalidArgument::DuplicateTile(1))
        );
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        assert_eq!(
            Board::from_tiles(usize::MAX / 2, vec![]),
            Err(InvalidArgument::TooLarge(usize::MAX / 2))
        );
        assert_eq!(
            Board::goal(1 << 33),
            Err(InvalidArgument::TooLarge(1 << 33))
        );
        // Fits in usize but not in a u32 tile.
        assert_eq!(
            Board::goal(70_000),
            Err(InvalidArgument::TooLarge(70_000))
        );
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            Board::shuffled(usize::MAX, &mut rng),
            Err(InvalidArgument::TooLarge(usize::MAX))
        );
        assert_eq!(
            Board::random_solvable(1 << 40, &mut rng),
            Err(InvalidArgument::TooLarge(1 << 40))
        );
    }

    #[test]
    fn parity_matches_inversion_count() {
        fn inversions(tiles: &[u32]) -> usize {
            let tiles: Vec<u32> = tiles.iter().copied().filter(|&t| t != 0).collect();
            (0..tiles.len())
                .flat_map(|i| (i + 1..tiles.len()).map(move |j| (i, j)))
                .filter(|&(i, j)| tiles[i] > tiles[j])
                .count()
        }

        let mut rng = StdRng::seed_from_u64(11);
        for size in 2..=5 {
            for _ in 0..50 {
                let b = Board::shuffled(size, &mut rng).unwrap();
                assert_eq!(b.inversion_parity(), inversions(b.tiles()) % 2);
            }
        }
    }

    #[test]
    fn heuristics_on_reference_board() {
        let b = board(&[&[8, 1, 3], &[4, 0, 2], &[7, 6, 5]]);
        assert_eq!(b.dimension(), 3);
        assert_eq!(b.hamming(), 5);
        assert_eq!(b.manhattan(), 10);
        assert_eq!(b.blank(), (1, 1));
        assert!(!b.is_goal());
    }

    #[test]
    fn goal_board() {
        let goal = Board::goal(3).unwrap();
        assert_eq!(goal, board(&[&[1, 2, 3], &[4, 5, 6], &[7, 8, 0]]));
        assert!(goal.is_goal());
        assert_eq!(goal.hamming(), 0);
        assert_eq!(goal.manhattan(), 0);
        assert_eq!(goal.linear_conflict(), 0);
        assert!(goal.has_solvable_parity());
    }

    #[test]
    fn linear_conflict_counts_reversed_pairs() {
        // 2 and 1 swapped in their goal row: one of them must leave it.
        let b = board(&[&[2, 1, 3], &[4, 5, 6], &[7, 8, 0]]);
        assert_eq!(b.manhattan(), 2);
        assert_eq!(b.linear_conflict(), 4);

        // 3 2 1 needs two tiles out of the row, not three.
        let b = board(&[&[3, 2, 1], &[4, 5, 6], &[7, 8, 0]]);
        assert_eq!(b.linear_conflict(), b.manhattan() + 4);
    }

    #[test]
    fn neighbor_counts_follow_blank_position() {
        let corner = board(&[&[0, 1, 2], &[3, 4, 5], &[6, 7, 8]]);
        let edge = board(&[&[1, 0, 2], &[3, 4, 5], &[6, 7, 8]]);
        let interior = board(&[&[1, 2, 3], &[4, 0, 5], &[6, 7, 8]]);
        assert_eq!(corner.neighbors().count(), 2);
        assert_eq!(edge.neighbors().count(), 3);
        assert_eq!(interior.neighbors().count(), 4);
    }

    #[test]
    fn neighbors_in_blank_up_down_left_right_order() {
        let b = board(&[&[1, 2, 3], &[4, 0, 5], &[6, 7, 8]]);
        let blanks: Vec<_> = b.neighbors().map(|n| n.blank()).collect();
        assert_eq!(blanks, vec![(0, 1), (2, 1), (1, 0), (1, 2)]);
        for neighbor in b.neighbors() {
            let movement = b.move_to(&neighbor).unwrap();
            assert_eq!(neighbor.move_to(&b), Some(movement.reversed()));
            let differing = b
                .tiles()
                .iter()
                .zip(neighbor.tiles())
                .filter(|(x, y)| x != y)
                .count();
            assert_eq!(differing, 2);
        }
    }

    #[test]
    fn neighbors_leave_original_untouched() {
        let b = board(&[&[1, 2], &[3, 0]]);
        let copy = b.clone();
        let _: Vec<_> = b.neighbors().collect();
        assert_eq!(b, copy);
    }

    #[test]
    fn move_to_rejects_unrelated_boards() {
        let a = board(&[&[1, 2], &[3, 0]]);
        let b = board(&[&[2, 1], &[3, 0]]);
        assert_eq!(a.move_to(&b), None);
        assert_eq!(a.move_to(&Board::goal(3).unwrap()), None);
    }

    #[test]
    fn twin_swaps_first_adjacent_tiles() {
        let b = board(&[&[1, 2], &[3, 0]]);
        assert_eq!(b.twin(), board(&[&[3, 2], &[1, 0]]));

        // Blank at the first position is skipped.
        let b = board(&[&[0, 1, 3], &[4, 2, 5], &[7, 8, 6]]);
        assert_eq!(b.twin(), board(&[&[0, 2, 3], &[4, 1, 5], &[7, 8, 6]]));
    }

    #[test]
    fn twin_properties_hold_for_random_boards() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for size in 2..=5 {
            for _ in 0..50 {
                let b = Board::shuffled(size, &mut rng).unwrap();
                let twin = b.twin();
                assert_ne!(twin, b);
                assert_eq!(twin, b.twin());
                assert_eq!(twin.twin(), b);
                assert_eq!(twin.blank(), b.blank());
                assert_ne!(twin.has_solvable_parity(), b.has_solvable_parity());
            }
        }
    }

    #[test]
    fn heuristics_are_ordered() {
        let mut rng = StdRng::seed_from_u64(7);
        for size in 2..=6 {
            for _ in 0..50 {
                let b = Board::shuffled(size, &mut rng).unwrap();
                assert!(b.manhattan() >= b.hamming());
                assert!(b.linear_conflict() >= b.manhattan());
            }
        }
    }

    #[test]
    fn random_solvable_has_solvable_parity() {
        let mut rng = StdRng::seed_from_u64(42);
        for size in 2..=5 {
            for _ in 0..20 {
                assert!(Board::random_solvable(size, &mut rng)
                    .unwrap()
                    .has_solvable_parity());
            }
        }
    }

    #[test]
    fn display_format() {
        let b = board(&[&[1, 2, 3], &[4, 5, 6], &[7, 0, 8]]);
        assert_eq!(b.to_string(), "3\n1 2 3\n4 5 6\n7 0 8\n");
    }

    #[test]
    fn parses_text_format() {
        let b: Board = "3\n 0  1  3\n 4  2  5\n 7  8  6\n".parse().unwrap();
        assert_eq!(b, board(&[&[0, 1, 3], &[4, 2, 5], &[7, 8, 6]]));
        assert_eq!(b.to_string().parse::<Board>().unwrap(), b);
    }

    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<Board>(), Err(ParseError::MissingDimension));
        assert_eq!(
            "2\n1 x\n3 0".parse::<Board>(),
            Err(ParseError::BadToken("x".to_owned()))
        );
        assert_eq!(
            "3\n1 2 3\n4 5".parse::<Board>(),
            Err(ParseError::Truncated {
                expected: 9,
                found: 5
            })
        );
        assert_eq!(
            "2\n1 2\n3 0\n9".parse::<Board>(),
            Err(ParseError::Trailing("9".to_owned()))
        );
        assert_eq!(
            "2\n1 2\n3 3".parse::<Board>(),
            Err(ParseError::Invalid(InvalidArgument::DuplicateTile(3)))
        );
    }
}
