//! Parity test deciding whether a layout can reach the solved board.

use crate::board::Board;

/// Pairs of non-blank tiles that appear out of order.
pub fn count_inversions(tiles: &[usize]) -> usize {
    let blank = tiles.len().saturating_sub(1);
    tiles
        .iter()
        .enumerate()
        .filter(|&(_, &val)| val != blank)
        .map(|(i, &val)| {
            tiles[i + 1..]
                .iter()
                .filter(|&&next| next != blank && next < val)
                .count()
        })
        .sum()
}

/// Whether any sequence of legal moves turns `tiles` into the identity.
///
/// Odd sides: solvable iff the inversion count is even. Even sides: with the
/// blank's row counted from the bottom starting at 1, solvable iff exactly one
/// of "row is even" and "inversions are even" holds.
///
/// `tiles` must hold exactly `side * side` values.
pub fn is_solvable(tiles: &[usize], side: usize) -> bool {
    debug_assert_eq!(tiles.len(), side * side);
    let inversions_even = count_inversions(tiles) % 2 == 0;

    if side % 2 == 1 {
        return inversions_even;
    }

    let blank = tiles.len() - 1;
    let blank_pos = tiles.iter().position(|&value| value == blank).unwrap_or(blank);
    let row_from_bottom = side - blank_pos / side;
    (row_from_bottom % 2 == 0) != inversions_even
}

impl Board {
    pub fn is_solvable(&self) -> bool {
        is_solvable(self.tiles(), self.side())
    }
}
