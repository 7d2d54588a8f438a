pub use self::{bit_board::*, color::*, moves::*};

pub(crate) mod bit_board;
pub(crate) mod color;
pub(crate) mod moves;

/// Number of cells along one side of the board.
pub const BOARD_SIZE: usize = 8;
/// Total number of cells on the board.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;
