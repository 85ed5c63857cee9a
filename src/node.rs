use std::cmp::Ordering;
use std::rc::Rc;

use crate::board::Board;
use crate::heuristic::Heuristic;

/// A board reached after `moves` slides, linked back to the node it came from.
///
/// Children share their parent through an `Rc`, so the explored paths form a
/// tree that is freed as soon as no frontier entry or descendant needs it.
#[derive(Debug)]
pub struct SearchNode {
    board: Board,
    moves: usize,
    estimate: usize,
    previous: Option<Rc<SearchNode>>,
}

impl SearchNode {
    pub fn root(board: Board, heuristic: Heuristic) -> Rc<Self> {
        let estimate = heuristic.estimate(&board);
        Rc::new(Self {
            board,
            moves: 0,
            estimate,
            previous: None,
        })
    }

    pub fn child(parent: &Rc<Self>, board: Board, heuristic: Heuristic) -> Rc<Self> {
        let estimate = heuristic.estimate(&board);
        Rc::new(Self {
            board,
            moves: parent.moves + 1,
            estimate,
            previous: Some(Rc::clone(parent)),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Slides taken from the root, `g`.
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// Cached heuristic value, `h`.
    pub fn estimate(&self) -> usize {
        self.estimate
    }

    /// Estimated total cost, `g + h`.
    pub fn priority(&self) -> usize {
        self.moves + self.estimate
    }

    pub fn previous(&self) -> Option<&SearchNode> {
        self.previous.as_deref()
    }

    pub fn cmp_priority(&self, other: &Self) -> Ordering {
        self.priority().cmp(&other.priority())
    }

    /// Boards from the root to this node, oldest first.
    pub fn path(&self) -> Vec<Board> {
        let mut path = Vec::with_capacity(self.moves + 1);
        let mut node = Some(self);
        while let Some(current) = node {
            path.push(current.board.clone());
            node = current.previous();
        }
        path.reverse();
        path
    }
}
