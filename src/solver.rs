//! Twin-board A*.
//!
//! A board and its twin differ by one swap of adjacent tiles, which flips the
//! permutation parity, so exactly one of them can reach the goal. Searching
//! both in lock-step therefore always terminates: either the board itself is
//! solved, or its twin is and the board is reported unsolvable.

use std::collections::HashSet;
use std::rc::Rc;

use log::{debug, info, trace};

use crate::board::Board;
use crate::frontier::Frontier;
use crate::heuristic::Heuristic;
use crate::moves::Move;
use crate::node::SearchNode;

const PROGRESS_EVERY: usize = 100_000;

/// Knobs for [`Solver::with_config`]. The default is plain Manhattan A* with
/// immediate-parent pruning and no limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverConfig {
    pub heuristic: Heuristic,
    /// Remember expanded boards and never expand one twice.
    pub closed_set: bool,
    /// Give up after this many lock-step iterations.
    pub max_iterations: Option<usize>,
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_closed_set(mut self, closed_set: bool) -> Self {
        self.closed_set = closed_set;
        self
    }

    pub fn with_max_iterations(mut self, limit: usize) -> Self {
        self.max_iterations = Some(limit);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Boards from the initial one to the goal, inclusive.
    Solved(Vec<Board>),
    Unsolvable,
    /// The iteration limit was hit before either search finished.
    Exhausted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SideStats {
    pub expanded: usize,
    pub generated: usize,
    pub max_frontier: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub iterations: usize,
    pub main: SideStats,
    pub twin: SideStats,
}

/// One of the two A* runs.
struct Search {
    frontier: Frontier,
    closed: Option<HashSet<Board>>,
    heuristic: Heuristic,
    stats: SideStats,
}

impl Search {
    fn new(root: Board, config: &SolverConfig) -> Self {
        let mut frontier = Frontier::new();
        frontier.push(SearchNode::root(root, config.heuristic));
        Self {
            frontier,
            closed: config.closed_set.then(HashSet::new),
            heuristic: config.heuristic,
            stats: SideStats {
                max_frontier: 1,
                ..SideStats::default()
            },
        }
    }

    /// Next node to look at, skipping boards that were already expanded.
    fn next(&mut self) -> Option<Rc<SearchNode>> {
        while let Some(node) = self.frontier.pop() {
            match &self.closed {
                Some(closed) if closed.contains(node.board()) => continue,
                _ => return Some(node),
            }
        }
        None
    }

    fn expand(&mut self, node: &Rc<SearchNode>) {
        if let Some(closed) = &mut self.closed {
            closed.insert(node.board().clone());
        }

        let parent = node.previous().map(SearchNode::board);
        for neighbor in node.board().neighbors() {
            // Sliding the same tile back
            if parent == Some(&neighbor) {
                continue;
            }
            if let Some(closed) = &self.closed {
                if closed.contains(&neighbor) {
                    continue;
                }
            }
            self.frontier
                .push(SearchNode::child(node, neighbor, self.heuristic));
            self.stats.generated += 1;
        }

        self.stats.expanded += 1;
        self.stats.max_frontier = self.stats.max_frontier.max(self.frontier.len());
    }
}

/// Advances both searches one node at a time until one of them reaches the
/// goal, a frontier runs dry, or `limit` iterations have passed.
fn search(main: &mut Search, twin: &mut Search, limit: Option<usize>) -> (Outcome, usize) {
    let mut iterations = 0;
    loop {
        let (Some(node), Some(twin_node)) = (main.next(), twin.next()) else {
            debug!("frontier exhausted after {} iterations", iterations);
            return (Outcome::Unsolvable, iterations);
        };

        if twin_node.board().is_goal() {
            debug!("twin solved in {} moves", twin_node.moves());
            return (Outcome::Unsolvable, iterations);
        }
        if node.board().is_goal() {
            return (Outcome::Solved(node.path()), iterations);
        }
        if limit.is_some_and(|limit| iterations >= limit) {
            return (Outcome::Exhausted, iterations);
        }

        trace!(
            "iteration {}: main g={} h={}, twin g={} h={}",
            iterations,
            node.moves(),
            node.estimate(),
            twin_node.moves(),
            twin_node.estimate()
        );

        main.expand(&node);
        twin.expand(&twin_node);
        iterations += 1;

        if iterations % PROGRESS_EVERY == 0 {
            debug!(
                "{} iterations, frontiers {} / {}, best f {} / {}",
                iterations,
                main.frontier.len(),
                twin.frontier.len(),
                node.priority(),
                twin_node.priority()
            );
        }
    }
}

/// Finds a shortest solution for a board, or proves there is none.
///
/// The whole search runs inside the constructor; the accessors only report
/// the result.
#[derive(Debug, Clone)]
pub struct Solver {
    outcome: Outcome,
    stats: SearchStats,
}

impl Solver {
    pub fn new(initial: Board) -> Self {
        Self::with_config(initial, SolverConfig::default())
    }

    pub fn with_config(initial: Board, config: SolverConfig) -> Self {
        let twin = initial.twin();
        debug!(
            "solving {}x{} board with {} (closed set: {}, limit: {:?})",
            initial.dimension(),
            initial.dimension(),
            config.heuristic,
            config.closed_set,
            config.max_iterations
        );

        let mut main = Search::new(initial, &config);
        let mut shadow = Search::new(twin, &config);
        let (outcome, iterations) = search(&mut main, &mut shadow, config.max_iterations);

        let stats = SearchStats {
            iterations,
            main: main.stats,
            twin: shadow.stats,
        };
        match &outcome {
            Outcome::Solved(path) => info!(
                "solved in {} moves after {} iterations",
                path.len() - 1,
                iterations
            ),
            Outcome::Unsolvable => info!("unsolvable, decided after {} iterations", iterations),
            Outcome::Exhausted => info!("gave up after {} iterations", iterations),
        }

        Self { outcome, stats }
    }

    pub fn is_solvable(&self) -> bool {
        matches!(self.outcome, Outcome::Solved(_))
    }

    /// True when the iteration limit stopped the search before a decision.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.outcome, Outcome::Exhausted)
    }

    /// Minimum number of moves, `None` if no solution was found.
    pub fn moves(&self) -> Option<usize> {
        self.solution().map(|path| path.len() - 1)
    }

    /// Minimum number of moves, or `-1` if no solution was found.
    pub fn moves_or_negative(&self) -> isize {
        self.moves().map_or(-1, |moves| moves as isize)
    }

    /// Boards of a shortest solution, initial first and goal last.
    pub fn solution(&self) -> Option<&[Board]> {
        match &self.outcome {
            Outcome::Solved(path) => Some(path),
            _ => None,
        }
    }

    /// The slide between every pair of consecutive solution boards.
    pub fn solution_moves(&self) -> Option<Vec<Move>> {
        self.solution().map(|path| {
            path.windows(2)
                .filter_map(|pair| pair[0].move_to(&pair[1]))
                .collect()
        })
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }
}
