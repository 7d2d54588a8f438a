use std::fmt;

use arrayvec::ArrayVec;

use super::{BOARD_SIZE, CELL_COUNT};

/// Moves generated for one side, in row-major order unless reordered by a caller.
pub type MoveList = ArrayVec<Move, CELL_COUNT>;

/// A stone placement at `(x, y)`, both in `0..8`.
///
/// Stored as the row-major cell index `y * 8 + x`, which is also the bit index
/// used by [`BitBoard`](crate::BitBoard).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    index: u8,
}

impl Move {
    /// Creates a move from board coordinates.
    ///
    /// # Panics
    ///
    /// Panics if `x` or `y` is outside `0..8`.
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        assert!(x < BOARD_SIZE && y < BOARD_SIZE, "move out of board");
        #[expect(clippy::cast_possible_truncation)]
        let index = (y * BOARD_SIZE + x) as u8;
        Self { index }
    }

    /// Creates a move from board coordinates, or `None` if they are off the board.
    #[must_use]
    pub const fn try_new(x: usize, y: usize) -> Option<Self> {
        if x < BOARD_SIZE && y < BOARD_SIZE {
            Some(Self::new(x, y))
        } else {
            None
        }
    }

    /// Creates a move from a row-major cell index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 64`.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self::new(index % BOARD_SIZE, index / BOARD_SIZE)
    }

    #[must_use]
    pub const fn x(self) -> usize {
        self.index as usize % BOARD_SIZE
    }

    #[must_use]
    pub const fn y(self) -> usize {
        self.index as usize / BOARD_SIZE
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    #[must_use]
    pub const fn bit(self) -> u64 {
        1 << self.index
    }

    #[must_use]
    pub const fn is_corner(self) -> bool {
        let (x, y) = (self.x(), self.y());
        (x == 0 || x == BOARD_SIZE - 1) && (y == 0 || y == BOARD_SIZE - 1)
    }

    /// Returns `true` for any cell on the outer ring, corners included.
    #[must_use]
    pub const fn is_edge(self) -> bool {
        let (x, y) = (self.x(), self.y());
        x == 0 || x == BOARD_SIZE - 1 || y == 0 || y == BOARD_SIZE - 1
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x(), self.y())
    }
}

/// Iterates the set bits of `mask` as moves, lowest index first (row-major).
pub(crate) fn moves_from_mask(mut mask: u64) -> MoveList {
    let mut moves = MoveList::new();
    while mask != 0 {
        let index = mask.trailing_zeros() as usize;
        moves.push(Move::from_index(index));
        mask &= mask - 1;
    }
    moves
}
