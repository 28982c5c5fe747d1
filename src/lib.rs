//! Sliding-tile puzzle engine: board permutation, shuffling, parity-based
//! solvability, an optimal IDA* solver and a greedy hint advisor.

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod hint;
mod logging;
pub mod shuffle;
pub mod solvability;
pub mod solver;

pub use board::{heuristic_score, manhattan_distance, neighbors, Board, Direction, Neighbors};
pub use config::{Availability, SolverPolicy, MAX_SOLVER_SIDE};
pub use error::{BoardError, SessionError, SolveError};
pub use game::{format_time, AutoSolve, GameStats, MoveOutcome, Phase, PlaybackStep, Session};
pub use hint::next_best_move;
pub use logging::init_logging;
pub use shuffle::shuffle;
pub use solvability::{count_inversions, is_solvable};
pub use solver::{solve, SearchStats, Solution, Solver};
