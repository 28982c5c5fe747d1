//! Gameplay session: the phase machine a front-end drives.
//!
//! `Idle -> Configured -> Active -> (Solving) -> Won`, with `Won -> Configured`
//! on retry. Auto-solve playback applies one queued move per step so a
//! front-end can pause or cancel between moves.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::Board;
use crate::config::{Availability, SolverPolicy};
use crate::error::SessionError;
use crate::hint::next_best_move;
use crate::shuffle::shuffle;
use crate::solver::{Solution, Solver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Configured,
    Active,
    Solving,
    Won,
}

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameStats {
    pub elapsed: Duration,
    pub moves: usize,
    pub side: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    Won(GameStats),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoSolve {
    AlreadySolved,
    /// Board restored, session back to `Active`.
    Unsolvable,
    /// Session is `Solving` with this many moves queued.
    Started { moves: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStep {
    Moved { pos: usize, remaining: usize },
    Won(GameStats),
    /// Playback could not finish; board and move count restored to the
    /// pre-solve snapshot.
    RolledBack,
}

#[derive(Debug, Clone)]
struct Snapshot {
    board: Board,
    move_count: usize,
}

#[derive(Debug)]
pub struct Session {
    phase: Phase,
    board: Option<Board>,
    move_count: usize,
    started: Option<Instant>,
    policy: SolverPolicy,
    solver: Solver,
    playback: VecDeque<usize>,
    snapshot: Option<Snapshot>,
    last_stats: Option<GameStats>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SolverPolicy::default())
    }
}

impl Session {
    pub fn new(policy: SolverPolicy) -> Self {
        Self {
            phase: Phase::Idle,
            board: None,
            move_count: 0,
            started: None,
            policy,
            solver: Solver::new(),
            playback: VecDeque::new(),
            snapshot: None,
            last_stats: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn move_count(&self) -> usize {
        self.move_count
    }

    pub fn policy(&self) -> SolverPolicy {
        self.policy
    }

    /// Stats of the most recently won game.
    pub fn last_stats(&self) -> Option<GameStats> {
        self.last_stats
    }

    /// Moves still queued for playback.
    pub fn pending_moves(&self) -> usize {
        self.playback.len()
    }

    /// Time since `start`, zero before.
    pub fn elapsed(&self) -> Duration {
        self.started.map(|t| t.elapsed()).unwrap_or_default()
    }

    /// Solver availability for the configured grid.
    pub fn availability(&self) -> Option<Availability> {
        self.board
            .as_ref()
            .map(|board| self.policy.availability(board.side()))
    }

    /// Set up a solved board of `side`.
    pub fn configure(&mut self, side: usize) -> Result<(), SessionError> {
        self.expect_phase(&[Phase::Idle, Phase::Configured, Phase::Won])?;
        self.board = Some(Board::new(side)?);
        self.move_count = 0;
        self.started = None;
        self.phase = Phase::Configured;
        debug!("configured {0}x{0} board", side);
        Ok(())
    }

    /// Shuffle and begin play.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), SessionError> {
        self.expect_phase(&[Phase::Configured])?;
        let board = self.board_mut()?;
        shuffle(board, rng);
        self.begin_play();
        Ok(())
    }

    /// Begin play from a caller-supplied layout instead of a shuffle.
    pub fn start_from(&mut self, board: Board) -> Result<(), SessionError> {
        self.expect_phase(&[Phase::Configured])?;
        self.board = Some(board);
        self.begin_play();
        Ok(())
    }

    fn begin_play(&mut self) {
        self.move_count = 0;
        self.started = Some(Instant::now());
        self.last_stats = None;
        self.phase = Phase::Active;
    }

    /// Slide the tile at `pos`. Rejected while auto-solve is playing back.
    pub fn make_move(&mut self, pos: usize) -> Result<MoveOutcome, SessionError> {
        self.expect_phase(&[Phase::Active])?;
        let board = self.board_mut()?;
        board.apply_move(pos)?;
        let solved = board.is_solved();
        self.move_count += 1;

        if solved {
            Ok(MoveOutcome::Won(self.finish()))
        } else {
            Ok(MoveOutcome::Moved)
        }
    }

    /// A random misplaced tile to point at. Works on every grid size; `None`
    /// when every tile is home.
    pub fn hint<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Option<usize>, SessionError> {
        self.expect_phase(&[Phase::Active])?;
        let board = self.board_ref()?;
        Ok(board.wrong_tiles().choose(rng).copied())
    }

    /// Greedy single-move advice, offered only on grids the policy allows.
    pub fn next_move(&self) -> Result<Option<usize>, SessionError> {
        self.expect_phase(&[Phase::Active])?;
        let board = self.board_ref()?;
        self.check_solver_available(board)?;
        Ok(next_best_move(board))
    }

    /// Run the solver and queue its moves for playback.
    pub fn begin_auto_solve(&mut self) -> Result<AutoSolve, SessionError> {
        self.expect_phase(&[Phase::Active])?;
        let board = self.board.as_ref().ok_or(SessionError::WrongPhase {
            actual: self.phase,
        })?;
        self.check_solver_available(board)?;

        if board.is_solved() {
            return Ok(AutoSolve::AlreadySolved);
        }

        let snapshot = Snapshot {
            board: board.clone(),
            move_count: self.move_count,
        };

        match self.solver.solve(board)? {
            Solution::Unsolvable => {
                warn!("auto-solve found no solution, board left as it was");
                self.board = Some(snapshot.board);
                self.move_count = snapshot.move_count;
                Ok(AutoSolve::Unsolvable)
            }
            Solution::Moves(moves) if moves.is_empty() => Ok(AutoSolve::AlreadySolved),
            Solution::Moves(moves) => {
                let count = moves.len();
                info!("auto-solve queued {} moves", count);
                self.playback = moves.into();
                self.snapshot = Some(snapshot);
                self.phase = Phase::Solving;
                Ok(AutoSolve::Started { moves: count })
            }
        }
    }

    /// Apply the next queued move.
    pub fn step_playback(&mut self) -> Result<PlaybackStep, SessionError> {
        self.expect_phase(&[Phase::Solving])?;

        let Some(pos) = self.playback.pop_front() else {
            warn!("playback ran out of moves before the board was solved");
            self.rollback();
            return Ok(PlaybackStep::RolledBack);
        };

        let board = self.board_mut()?;
        if let Err(err) = board.apply_move(pos) {
            warn!("aborting playback: {}", err);
            self.rollback();
            return Ok(PlaybackStep::RolledBack);
        }
        let solved = board.is_solved();
        self.move_count += 1;

        if solved {
            self.playback.clear();
            self.snapshot = None;
            Ok(PlaybackStep::Won(self.finish()))
        } else {
            Ok(PlaybackStep::Moved {
                pos,
                remaining: self.playback.len(),
            })
        }
    }

    /// Stop playback between moves, keeping the board as it is now.
    pub fn cancel_playback(&mut self) -> Result<(), SessionError> {
        self.expect_phase(&[Phase::Solving])?;
        debug!("playback cancelled with {} moves left", self.playback.len());
        self.playback.clear();
        self.snapshot = None;
        self.phase = Phase::Active;
        Ok(())
    }

    /// Back to a solved board of the same size, ready to start again.
    pub fn retry(&mut self) -> Result<(), SessionError> {
        self.expect_phase(&[Phase::Won])?;
        self.board_mut()?.reset();
        self.move_count = 0;
        self.started = None;
        self.phase = Phase::Configured;
        Ok(())
    }

    fn rollback(&mut self) {
        self.playback.clear();
        if let Some(snapshot) = self.snapshot.take() {
            self.board = Some(snapshot.board);
            self.move_count = snapshot.move_count;
        }
        self.phase = Phase::Active;
    }

    fn finish(&mut self) -> GameStats {
        let stats = GameStats {
            elapsed: self.elapsed(),
            moves: self.move_count,
            side: self.board.as_ref().map_or(0, Board::side),
        };
        info!(
            "solved {0}x{0} in {1} moves, {2}",
            stats.side,
            stats.moves,
            format_time(stats.elapsed.as_secs())
        );
        self.phase = Phase::Won;
        self.last_stats = Some(stats);
        stats
    }

    fn check_solver_available(&self, board: &Board) -> Result<(), SessionError> {
        match self.policy.availability(board.side()) {
            Availability::Available => Ok(()),
            Availability::Unsupported { side, max_side } => {
                Err(SessionError::SolverUnavailable { side, max_side })
            }
        }
    }

    fn expect_phase(&self, allowed: &[Phase]) -> Result<(), SessionError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(SessionError::WrongPhase { actual: self.phase })
        }
    }

    fn board_ref(&self) -> Result<&Board, SessionError> {
        self.board
            .as_ref()
            .ok_or(SessionError::WrongPhase { actual: self.phase })
    }

    fn board_mut(&mut self) -> Result<&mut Board, SessionError> {
        let phase = self.phase;
        self.board
            .as_mut()
            .ok_or(SessionError::WrongPhase { actual: phase })
    }
}

/// `mm:ss`.
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoardError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn active_session(side: usize, moves: &[usize]) -> Session {
        let mut board = Board::new(side).unwrap();
        for &pos in moves {
            board.apply_move(pos).unwrap();
        }
        let mut session = Session::default();
        session.configure(side).unwrap();
        session.start_from(board).unwrap();
        session
    }

    #[test]
    fn lifecycle_to_won_and_retry() {
        let mut session = Session::default();
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.board().is_none());

        session.configure(3).unwrap();
        assert_eq!(session.phase(), Phase::Configured);

        let mut rng = StdRng::seed_from_u64(3);
        session.start(&mut rng).unwrap();
        assert_eq!(session.phase(), Phase::Active);
        assert!(!session.board().unwrap().is_solved());

        let mut session = active_session(3, &[5, 4]);
        assert_eq!(session.make_move(5), Ok(MoveOutcome::Moved));
        match session.make_move(8) {
            Ok(MoveOutcome::Won(stats)) => {
                assert_eq!(stats.moves, 2);
                assert_eq!(stats.side, 3);
            }
            other => panic!("expected win, got {other:?}"),
        }
        assert_eq!(session.phase(), Phase::Won);
        assert_eq!(session.last_stats().map(|s| s.moves), Some(2));

        session.retry().unwrap();
        assert_eq!(session.phase(), Phase::Configured);
        assert_eq!(session.move_count(), 0);
        assert!(session.board().unwrap().is_solved());
    }

    #[test]
    fn wrong_phase_is_rejected() {
        let mut session = Session::default();
        assert_eq!(
            session.make_move(0),
            Err(SessionError::WrongPhase {
                actual: Phase::Idle
            })
        );
        let mut rng = StdRng::seed_from_u64(0);
        assert!(session.start(&mut rng).is_err());
        assert!(session.retry().is_err());
    }

    #[test]
    fn illegal_move_keeps_count() {
        let mut session = active_session(3, &[5]);
        assert_eq!(
            session.make_move(0),
            Err(SessionError::Board(BoardError::IllegalMove { pos: 0, blank: 5 }))
        );
        assert_eq!(session.move_count(), 0);
    }

    #[test]
    fn auto_solve_plays_back_to_win() {
        let mut session = active_session(3, &[5, 4, 3]);
        session.make_move(4).unwrap();

        assert_eq!(
            session.begin_auto_solve(),
            Ok(AutoSolve::Started { moves: 2 })
        );
        assert_eq!(session.phase(), Phase::Solving);
        assert!(session.make_move(5).is_err());

        assert_eq!(
            session.step_playback(),
            Ok(PlaybackStep::Moved {
                pos: 5,
                remaining: 1
            })
        );
        match session.step_playback() {
            Ok(PlaybackStep::Won(stats)) => assert_eq!(stats.moves, 3),
            other => panic!("expected win, got {other:?}"),
        }
        assert_eq!(session.phase(), Phase::Won);
    }

    #[test]
    fn unsolvable_board_is_restored() {
        let board = Board::from_tiles(3, vec![0, 2, 1, 3, 4, 5, 6, 7, 8]).unwrap();
        let mut session = Session::default();
        session.configure(3).unwrap();
        session.start_from(board.clone()).unwrap();

        assert_eq!(session.begin_auto_solve(), Ok(AutoSolve::Unsolvable));
        assert_eq!(session.phase(), Phase::Active);
        assert_eq!(session.board(), Some(&board));
    }

    #[test]
    fn illegal_queued_move_rolls_back() {
        let mut session = active_session(3, &[5, 4, 1]);
        session.make_move(0).unwrap();
        session.make_move(1).unwrap();
        let before = session.board().unwrap().clone();

        assert!(matches!(
            session.begin_auto_solve(),
            Ok(AutoSolve::Started { .. })
        ));
        session.step_playback().unwrap();
        // Simulate a stale queue.
        session.playback.push_front(0);

        assert_eq!(session.step_playback(), Ok(PlaybackStep::RolledBack));
        assert_eq!(session.phase(), Phase::Active);
        assert_eq!(session.board(), Some(&before));
        assert_eq!(session.move_count(), 2);
    }

    #[test]
    fn exhausted_queue_rolls_back() {
        let mut session = active_session(3, &[5, 4]);
        session.begin_auto_solve().unwrap();
        session.playback.clear();

        assert_eq!(session.step_playback(), Ok(PlaybackStep::RolledBack));
        assert_eq!(session.board().unwrap().tiles()[5], 4);
    }

    #[test]
    fn cancel_keeps_intermediate_board() {
        let mut session = active_session(3, &[5, 4, 3]);
        session.begin_auto_solve().unwrap();
        session.step_playback().unwrap();
        session.cancel_playback().unwrap();

        assert_eq!(session.phase(), Phase::Active);
        assert_eq!(session.move_count(), 1);
        assert_eq!(session.board().unwrap().blank_position(), 4);
        assert_eq!(session.pending_moves(), 0);
    }

    #[test]
    fn large_grids_are_gated() {
        let mut session = Session::new(SolverPolicy::new(3));
        session.configure(4).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        session.start(&mut rng).unwrap();

        let expected = SessionError::SolverUnavailable {
            side: 4,
            max_side: 3,
        };
        assert_eq!(session.next_move(), Err(expected.clone()));
        assert_eq!(session.begin_auto_solve(), Err(expected));
        assert_eq!(session.phase(), Phase::Active);
        assert!(!session.availability().unwrap().is_available());
    }

    #[test]
    fn next_move_on_supported_grid() {
        let session = active_session(3, &[5]);
        assert_eq!(session.next_move(), Ok(Some(8)));
    }

    #[test]
    fn hint_points_at_misplaced_tile_on_any_size() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut session = Session::new(SolverPolicy::new(3));
        session.configure(5).unwrap();
        session.start(&mut rng).unwrap();

        let board = session.board().unwrap().clone();
        for _ in 0..20 {
            let pos = session.hint(&mut rng).unwrap().unwrap();
            assert!(board.wrong_tiles().contains(&pos));
        }
        assert!(session.next_move().is_err());
    }

    #[test]
    fn hint_with_one_misplaced_tile() {
        let mut rng = StdRng::seed_from_u64(8);
        let session = active_session(3, &[5]);
        // Only tile 5, now at position 8, is away from home.
        assert_eq!(session.hint(&mut rng), Ok(Some(8)));
    }

    #[test]
    fn hint_needs_active_phase() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut session = Session::default();
        session.configure(3).unwrap();
        assert_eq!(
            session.hint(&mut rng),
            Err(SessionError::WrongPhase {
                actual: Phase::Configured
            })
        );
    }

    #[test]
    fn time_is_formatted_as_minutes_and_seconds() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(75), "01:15");
        assert_eq!(format_time(3600), "60:00");
    }
}
