//! The tile permutation and its legal-move algebra.
//!
//! Position `i` holds tile `tiles[i]`. The largest value, `side * side - 1`,
//! is the blank. A board is solved when every position holds its own index.

use std::fmt;

use crate::config::MIN_SIDE;
use crate::error::BoardError;

/// Direction a tile slides into the hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Row and column offset from the blank to the tile that slides this way.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Direction::Up => (1, 0),
            Direction::Left => (0, 1),
            Direction::Down => (-1, 0),
            Direction::Right => (0, -1),
        }
    }

    /// Position of the tile that would slide this way into a hole at `blank`.
    pub fn source(&self, blank: usize, side: usize) -> Option<usize> {
        let (dr, dc) = self.as_offset();
        let row = (blank / side) as isize + dr;
        let col = (blank % side) as isize + dc;
        let side = side as isize;

        if row >= 0 && row < side && col >= 0 && col < side {
            Some((row * side + col) as usize)
        } else {
            None
        }
    }

    /// Direction the tile at `pos` slides to fill a hole at `blank`.
    pub fn toward_blank(blank: usize, pos: usize, side: usize) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|direction| direction.source(blank, side) == Some(pos))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Direction::Up => "Up",
            Direction::Left => "Left",
            Direction::Down => "Down",
            Direction::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// Up to four positions orthogonally adjacent to a cell, in up, down, left,
/// right order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbors {
    cells: [usize; 4],
    len: usize,
}

impl Neighbors {
    pub fn as_slice(&self) -> &[usize] {
        &self.cells[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, pos: usize) -> bool {
        self.as_slice().contains(&pos)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.as_slice().iter().copied()
    }

    fn push(&mut self, pos: usize) {
        self.cells[self.len] = pos;
        self.len += 1;
    }
}

/// Positions orthogonally adjacent to `pos` on a `side` x `side` grid.
pub fn neighbors(side: usize, pos: usize) -> Neighbors {
    let mut out = Neighbors {
        cells: [0; 4],
        len: 0,
    };
    let row = pos / side;
    let col = pos % side;

    if row > 0 {
        out.push(pos - side);
    }
    if row + 1 < side {
        out.push(pos + side);
    }
    if col > 0 {
        out.push(pos - 1);
    }
    if col + 1 < side {
        out.push(pos + 1);
    }
    out
}

/// `|rowA - rowB| + |colA - colB|` on a grid of the given side.
pub fn manhattan_distance(side: usize, a: usize, b: usize) -> usize {
    (a / side).abs_diff(b / side) + (a % side).abs_diff(b % side)
}

/// Sum of Manhattan distances of every non-blank tile from its home.
///
/// Admissible and consistent: one move shifts one tile by one step.
pub fn heuristic_score(tiles: &[usize], side: usize) -> usize {
    let blank = tiles.len() - 1;
    tiles
        .iter()
        .enumerate()
        .filter(|&(_, &value)| value != blank)
        .map(|(pos, &value)| manhattan_distance(side, pos, value))
        .sum()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    side: usize,
    tiles: Vec<usize>,
    blank: usize,
}

impl Board {
    /// Solved board of the given side.
    pub fn new(side: usize) -> Result<Self, BoardError> {
        if side < MIN_SIDE {
            return Err(BoardError::InvalidSide(side));
        }
        let cells = side * side;
        Ok(Self {
            side,
            tiles: (0..cells).collect(),
            blank: cells - 1,
        })
    }

    /// Board from an arbitrary permutation. Unsolvable layouts are accepted.
    pub fn from_tiles(side: usize, tiles: Vec<usize>) -> Result<Self, BoardError> {
        if side < MIN_SIDE {
            return Err(BoardError::InvalidSide(side));
        }
        let cells = side * side;
        if tiles.len() != cells {
            return Err(BoardError::WrongLength {
                expected: cells,
                actual: tiles.len(),
            });
        }

        let mut seen = vec![false; cells];
        let mut blank = 0;
        for (pos, &value) in tiles.iter().enumerate() {
            if value >= cells || seen[value] {
                return Err(BoardError::NotAPermutation { pos, value });
            }
            seen[value] = true;
            if value == cells - 1 {
                blank = pos;
            }
        }

        Ok(Self { side, tiles, blank })
    }

    /// Back to the identity permutation.
    pub fn reset(&mut self) {
        for (pos, tile) in self.tiles.iter_mut().enumerate() {
            *tile = pos;
        }
        self.blank = self.tiles.len() - 1;
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn cell_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn tiles(&self) -> &[usize] {
        &self.tiles
    }

    /// Tile value reserved for the hole.
    pub fn blank_value(&self) -> usize {
        self.tiles.len() - 1
    }

    pub fn blank_position(&self) -> usize {
        self.blank
    }

    /// Positions adjacent to `blank_pos`, each a candidate move.
    pub fn valid_moves(&self, blank_pos: usize) -> Neighbors {
        neighbors(self.side, blank_pos)
    }

    pub fn can_move(&self, pos: usize) -> bool {
        pos < self.tiles.len() && self.valid_moves(self.blank).contains(pos)
    }

    /// Slide the tile at `pos` into the hole.
    pub fn apply_move(&mut self, pos: usize) -> Result<(), BoardError> {
        if !self.can_move(pos) {
            return Err(BoardError::IllegalMove {
                pos,
                blank: self.blank,
            });
        }
        self.swap_with_blank(pos);
        Ok(())
    }

    /// Swap without the adjacency check; `pos` must neighbour the blank.
    pub(crate) fn swap_with_blank(&mut self, pos: usize) {
        debug_assert!(self.can_move(pos));
        self.tiles.swap(pos, self.blank);
        self.blank = pos;
    }

    pub fn is_solved(&self) -> bool {
        self.tiles.iter().enumerate().all(|(pos, &value)| pos == value)
    }

    pub fn manhattan_distance(&self, a: usize, b: usize) -> usize {
        manhattan_distance(self.side, a, b)
    }

    pub fn heuristic(&self) -> usize {
        heuristic_score(&self.tiles, self.side)
    }

    /// Positions holding a non-blank tile that is not at home.
    pub fn wrong_tiles(&self) -> Vec<usize> {
        let blank = self.blank_value();
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(pos, &value)| value != blank && value != pos)
            .map(|(pos, _)| pos)
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.blank_value().to_string().len();
        for row in self.tiles.chunks(self.side) {
            for &value in row {
                if value == self.blank_value() {
                    write!(f, "{:>width$} ", "", width = width)?;
                } else {
                    write!(f, "{:>width$} ", value + 1, width = width)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_board_is_identity() {
        let board = Board::new(3).unwrap();
        assert_eq!(board.tiles(), &[0, 1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(board.blank_position(), 8);
        assert_eq!(board.blank_value(), 8);
        assert!(board.is_solved());
        assert_eq!(board.heuristic(), 0);
    }

    #[test]
    fn side_below_two_is_rejected() {
        assert_eq!(Board::new(1), Err(BoardError::InvalidSide(1)));
        assert_eq!(Board::new(0), Err(BoardError::InvalidSide(0)));
    }

    #[test]
    fn from_tiles_validates_permutation() {
        assert_eq!(
            Board::from_tiles(2, vec![0, 1, 2]),
            Err(BoardError::WrongLength {
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(
            Board::from_tiles(2, vec![0, 1, 1, 3]),
            Err(BoardError::NotAPermutation { pos: 2, value: 1 })
        );
        assert_eq!(
            Board::from_tiles(2, vec![0, 1, 2, 4]),
            Err(BoardError::NotAPermutation { pos: 3, value: 4 })
        );
        let board = Board::from_tiles(2, vec![1, 3, 0, 2]).unwrap();
        assert_eq!(board.blank_position(), 1);
    }

    #[test]
    fn neighbors_follow_grid_edges() {
        assert_eq!(neighbors(3, 0).as_slice(), &[3, 1]);
        assert_eq!(neighbors(3, 4).as_slice(), &[1, 7, 3, 5]);
        assert_eq!(neighbors(3, 8).as_slice(), &[5, 7]);
        assert_eq!(neighbors(4, 7).as_slice(), &[3, 11, 6]);
    }

    #[test]
    fn can_move_only_orthogonal_neighbors() {
        let board = Board::new(3).unwrap();
        assert!(board.can_move(5));
        assert!(board.can_move(7));
        assert!(!board.can_move(4));
        assert!(!board.can_move(8));
        assert!(!board.can_move(9));

        // 2 and 3 are adjacent indices but on different rows.
        let board = Board::from_tiles(3, vec![0, 1, 8, 3, 4, 5, 6, 7, 2]).unwrap();
        assert!(!board.can_move(3));
    }

    #[test]
    fn illegal_move_leaves_tiles_untouched() {
        let mut board = Board::new(3).unwrap();
        let before = board.clone();
        assert_eq!(
            board.apply_move(0),
            Err(BoardError::IllegalMove { pos: 0, blank: 8 })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn apply_move_swaps_with_blank() {
        let mut board = Board::new(2).unwrap();
        for pos in [2, 0, 1] {
            board.apply_move(pos).unwrap();
        }
        assert_eq!(board.tiles(), &[1, 3, 0, 2]);
        assert_eq!(board.blank_position(), 1);

        // Moving on into the corner puts the blank home again.
        board.apply_move(3).unwrap();
        assert_eq!(board.tiles(), &[1, 2, 0, 3]);
        assert_eq!(board.blank_position(), 3);
        assert!(!board.is_solved());
    }

    #[test]
    fn directions_pick_the_sliding_tile() {
        assert_eq!(Direction::Up.source(8, 3), None);
        assert_eq!(Direction::Right.source(8, 3), Some(7));
        assert_eq!(Direction::Down.source(8, 3), Some(5));
        assert_eq!(Direction::Left.source(4, 3), Some(5));
        assert_eq!(Direction::Up.source(4, 3), Some(7));
        assert_eq!(Direction::toward_blank(4, 1, 3), Some(Direction::Down));
        assert_eq!(Direction::toward_blank(4, 5, 3), Some(Direction::Left));
        assert_eq!(Direction::toward_blank(4, 0, 3), None);
    }

    #[test]
    fn heuristic_ignores_blank() {
        let board = Board::from_tiles(3, vec![8, 1, 2, 3, 4, 5, 6, 7, 0]).unwrap();
        // Tile 0 sits four steps from home; the blank is not counted.
        assert_eq!(board.heuristic(), 4);
        assert_eq!(board.manhattan_distance(0, 8), 4);
        assert_eq!(board.wrong_tiles(), vec![8]);
    }

    #[test]
    fn display_shows_one_based_labels() {
        let board = Board::from_tiles(2, vec![1, 3, 0, 2]).unwrap();
        assert_eq!(board.to_string(), "2   \n1 3 \n");
    }
}
