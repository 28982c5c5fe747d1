//! Cheap one-move advice for hints. Looks at a single tile per candidate and
//! can disagree with the optimal solver.

use crate::board::Board;

/// Suggest a position to slide into the hole.
///
/// Picks the candidate whose tile ends up closest to home among those that
/// move their tile strictly closer, the earliest candidate winning ties.
/// Falls back to the first legal move when nothing improves. `None` only when
/// the hole has no neighbours.
pub fn next_best_move(board: &Board) -> Option<usize> {
    let blank = board.blank_position();
    let moves = board.valid_moves(blank);
    if moves.is_empty() {
        return None;
    }

    let mut best: Option<(usize, usize)> = None;
    for pos in moves.iter() {
        let value = board.tiles()[pos];
        let before = board.manhattan_distance(pos, value);
        let after = board.manhattan_distance(blank, value);

        if after < before && best.map_or(true, |(_, best_after)| after < best_after) {
            best = Some((pos, after));
        }
    }

    best.map(|(pos, _)| pos).or_else(|| moves.as_slice().first().copied())
}

impl Board {
    pub fn next_best_move(&self) -> Option<usize> {
        next_best_move(self)
    }
}
