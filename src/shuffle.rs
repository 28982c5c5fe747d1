//! Scrambling by random legal moves, so every result is solvable.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::Board;
use crate::config::{shuffle_moves, MAX_SHUFFLE_ATTEMPTS};

/// Reset `board` and walk the hole randomly until it leaves the solved state.
///
/// Each walk is `max(100, cells * 10)` moves long. A walk that ends on the
/// solved board is redone, at most `MAX_SHUFFLE_ATTEMPTS` times in total.
pub fn shuffle<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) {
    let steps = shuffle_moves(board.cell_count());

    for attempt in 1..=MAX_SHUFFLE_ATTEMPTS {
        board.reset();
        random_walk(board, steps, rng);

        if !board.is_solved() {
            debug!(
                "shuffled {0}x{0} board in {1} walk(s) of {2} moves",
                board.side(),
                attempt,
                steps
            );
            return;
        }
    }
    debug!("shuffle gave up after {} walks", MAX_SHUFFLE_ATTEMPTS);
}

/// Apply `steps` uniformly chosen legal moves from the current layout.
pub fn random_walk<R: Rng + ?Sized>(board: &mut Board, steps: usize, rng: &mut R) {
    for _ in 0..steps {
        let moves = board.valid_moves(board.blank_position());
        if let Some(&pos) = moves.as_slice().choose(rng) {
            board.swap_with_blank(pos);
        }
    }
}

impl Board {
    pub fn shuffle(&mut self) {
        shuffle(self, &mut rand::thread_rng());
    }
}
