/// Smallest grid the engine accepts.
pub const MIN_SIDE: usize = 2;

/// Lower bound on the number of random moves in a shuffle.
pub const MIN_SHUFFLE_MOVES: usize = 100;
/// Random moves per cell; a shuffle performs `max(MIN_SHUFFLE_MOVES, cells * this)`.
pub const SHUFFLE_MOVES_PER_CELL: usize = 10;
/// How many times a shuffle is redone when the walk lands on the solved board.
pub const MAX_SHUFFLE_ATTEMPTS: usize = 10;

/// Largest grid side for which auto-solve and hints are offered.
///
/// IDA* with a Manhattan heuristic finishes interactively on 3x3 boards; a
/// shuffled 4x4 can take minutes. The solver itself never gives up, so this
/// gate is what keeps callers responsive.
pub const MAX_SOLVER_SIDE: usize = 3;

pub const AUTO_SOLVE_LABEL: &str = "Auto-Solve";
pub const NEXT_MOVE_LABEL: &str = "Next Move";
pub const AUTO_SOLVE_UNSUPPORTED_LABEL: &str = "Auto-Solve unavailable for this size";
pub const NEXT_MOVE_UNSUPPORTED_LABEL: &str = "Hints unavailable for this size";

/// Number of random moves performed by one shuffle walk on a board with `cells` cells.
pub const fn shuffle_moves(cells: usize) -> usize {
    let scaled = cells * SHUFFLE_MOVES_PER_CELL;
    if scaled > MIN_SHUFFLE_MOVES {
        scaled
    } else {
        MIN_SHUFFLE_MOVES
    }
}

/// Policy deciding which grid sizes get solver-backed features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverPolicy {
    pub max_side: usize,
}

impl Default for SolverPolicy {
    fn default() -> Self {
        Self {
            max_side: MAX_SOLVER_SIDE,
        }
    }
}

/// Whether solver-backed features are offered for a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unsupported { side: usize, max_side: usize },
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }

    pub fn auto_solve_label(&self) -> &'static str {
        match self {
            Availability::Available => AUTO_SOLVE_LABEL,
            Availability::Unsupported { .. } => AUTO_SOLVE_UNSUPPORTED_LABEL,
        }
    }

    pub fn next_move_label(&self) -> &'static str {
        match self {
            Availability::Available => NEXT_MOVE_LABEL,
            Availability::Unsupported { .. } => NEXT_MOVE_UNSUPPORTED_LABEL,
        }
    }
}

impl SolverPolicy {
    pub fn new(max_side: usize) -> Self {
        Self { max_side }
    }

    pub fn availability(&self, side: usize) -> Availability {
        if side <= self.max_side {
            Availability::Available
        } else {
            Availability::Unsupported {
                side,
                max_side: self.max_side,
            }
        }
    }
}
