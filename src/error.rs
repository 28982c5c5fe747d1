use thiserror::Error;

use crate::game::Phase;

/// Errors returned by `Board` construction and mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("grid side must be at least 2, got {0}")]
    InvalidSide(usize),
    #[error("expected {expected} tiles, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    /// Tile value out of range or repeated.
    #[error("tiles are not a permutation: value {value} at position {pos}")]
    NotAPermutation { pos: usize, value: usize },
    #[error("position {pos} is not adjacent to the blank at {blank}")]
    IllegalMove { pos: usize, blank: usize },
}

/// Internal solver faults. An unsolvable board is not an error, see `Solution`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The bound escalation ran out of candidates on a board the parity
    /// check accepted. Indicates a move generation or heuristic defect.
    #[error("search exhausted at bound {bound} on a board reported solvable")]
    SearchExhausted { bound: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("operation not allowed in phase {actual:?}")]
    WrongPhase { actual: Phase },
    #[error("solver is limited to {max_side}x{max_side} grids, this one is {side}x{side}")]
    SolverUnavailable { side: usize, max_side: usize },
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Solve(#[from] SolveError),
}
