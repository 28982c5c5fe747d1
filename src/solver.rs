//! Optimal solver: iterative-deepening A* over the permutation graph.
//!
//! The search mutates one scratch copy of the tiles in place and swaps every
//! move back before returning, so the caller's board is never touched.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use log::{debug, error, info};

use crate::board::{heuristic_score, manhattan_distance, neighbors, Board};
use crate::error::SolveError;

/// Outcome of a solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Solution {
    /// Positions to slide into the hole, in order. Empty when already solved.
    Moves(Vec<usize>),
    /// The layout fails the parity test; no sequence of moves solves it.
    Unsolvable,
}

impl Solution {
    pub fn moves(&self) -> Option<&[usize]> {
        match self {
            Solution::Moves(moves) => Some(moves),
            Solution::Unsolvable => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Depth-first passes, one per bound.
    pub iterations: usize,
    pub nodes: u64,
    /// Bound of the last pass.
    pub bound: usize,
    pub elapsed: Duration,
}

/// Canonical encoding of a permutation for the on-path set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum StateKey {
    /// Fixed-width fields concatenated into one integer.
    Packed(u128),
    Wide(Box<[u16]>),
}

impl StateKey {
    fn encode(tiles: &[usize]) -> Self {
        let bits = bits_per_cell(tiles.len());
        if bits * tiles.len() <= u128::BITS as usize {
            StateKey::Packed(
                tiles
                    .iter()
                    .fold(0u128, |acc, &value| (acc << bits) | value as u128),
            )
        } else {
            StateKey::Wide(tiles.iter().map(|&value| value as u16).collect())
        }
    }
}

fn bits_per_cell(cells: usize) -> usize {
    (usize::BITS - cells.saturating_sub(1).leading_zeros()).max(1) as usize
}

/// Result of one bounded depth-first pass.
enum Probe {
    Found(Vec<usize>),
    /// Smallest `f` that exceeded the bound, if any branch was cut.
    NextBound(Option<usize>),
}

/// Reusable solver. Holds the on-path set and the current move path between
/// recursive calls; both are cleared for every solve.
#[derive(Debug, Default)]
pub struct Solver {
    visited: HashSet<StateKey>,
    path: Vec<usize>,
    stats: SearchStats,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statistics of the most recent `solve`.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Shortest sequence of moves from `board` to the solved layout.
    ///
    /// There is no iteration cap; callers gate large grids before calling.
    pub fn solve(&mut self, board: &Board) -> Result<Solution, SolveError> {
        let started = Instant::now();
        self.stats = SearchStats::default();
        self.visited.clear();
        self.path.clear();

        if board.is_solved() {
            debug!("board already solved");
            return Ok(Solution::Moves(Vec::new()));
        }
        if !board.is_solvable() {
            info!("{0}x{0} board fails the parity test", board.side());
            return Ok(Solution::Unsolvable);
        }

        let side = board.side();
        let mut tiles = board.tiles().to_vec();
        let root_h = heuristic_score(&tiles, side);
        let mut bound = root_h;
        self.visited.insert(StateKey::encode(&tiles));

        let outcome = loop {
            self.stats.iterations += 1;
            debug!(
                "iteration {} with bound {} ({} nodes so far)",
                self.stats.iterations, bound, self.stats.nodes
            );

            let probe = self.search(
                &mut tiles,
                side,
                board.blank_position(),
                None,
                0,
                root_h,
                bound,
            );
            match probe {
                Probe::Found(path) => break Ok(Solution::Moves(path)),
                Probe::NextBound(Some(next)) => bound = next,
                Probe::NextBound(None) => {
                    error!(
                        "search exhausted at bound {} on a solvable board {:?}",
                        bound,
                        board.tiles()
                    );
                    break Err(SolveError::SearchExhausted { bound });
                }
            }
        };

        self.visited.clear();
        debug_assert_eq!(tiles.as_slice(), board.tiles());

        self.stats.bound = bound;
        self.stats.elapsed = started.elapsed();
        if let Ok(Solution::Moves(moves)) = &outcome {
            info!(
                "solved {0}x{0} board in {1} moves ({2} nodes, {3} iterations, {4:?})",
                side,
                moves.len(),
                self.stats.nodes,
                self.stats.iterations,
                self.stats.elapsed
            );
        }
        outcome
    }

    #[allow(clippy::too_many_arguments)]
    fn search(
        &mut self,
        tiles: &mut [usize],
        side: usize,
        blank: usize,
        prev_blank: Option<usize>,
        g: usize,
        h: usize,
        bound: usize,
    ) -> Probe {
        self.stats.nodes += 1;

        let f = g + h;
        if f > bound {
            return Probe::NextBound(Some(f));
        }
        if h == 0 {
            return Probe::Found(self.path.clone());
        }

        // Children with their heuristic after the move, skipping the undo.
        let mut children = [(0usize, 0usize); 4];
        let mut count = 0;
        for pos in neighbors(side, blank).iter() {
            if Some(pos) == prev_blank {
                continue;
            }
            let value = tiles[pos];
            let child_h =
                h + manhattan_distance(side, blank, value) - manhattan_distance(side, pos, value);
            children[count] = (child_h, pos);
            count += 1;
        }
        children[..count].sort_by_key(|&(child_h, _)| child_h);

        let mut next_bound: Option<usize> = None;
        for &(child_h, pos) in &children[..count] {
            tiles.swap(pos, blank);

            let key = StateKey::encode(tiles);
            if !self.visited.insert(key.clone()) {
                tiles.swap(pos, blank);
                continue;
            }

            self.path.push(pos);
            let probe = self.search(tiles, side, pos, Some(blank), g + 1, child_h, bound);
            self.path.pop();
            self.visited.remove(&key);
            tiles.swap(pos, blank);

            match probe {
                Probe::Found(path) => return Probe::Found(path),
                Probe::NextBound(Some(t)) => {
                    next_bound = Some(next_bound.map_or(t, |m| m.min(t)));
                }
                Probe::NextBound(None) => {}
            }
        }

        Probe::NextBound(next_bound)
    }
}

/// Solve with a fresh `Solver`.
pub fn solve(board: &Board) -> Result<Solution, SolveError> {
    Solver::new().solve(board)
}

impl Board {
    pub fn solve(&self) -> Result<Solution, SolveError> {
        solve(self)
    }
}
