use crate::{
    IllegalMoveError,
    core::{BitBoard, Color, Move, MoveList, moves_from_mask},
};

/// An Othello position.
///
/// Owns its [`BitBoard`] exclusively; copies are independent, which lets the
/// search explore hypothetical futures without touching the real game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GameState {
    board: BitBoard,
}

impl GameState {
    /// Creates the standard start position.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            board: BitBoard::INITIAL,
        }
    }

    #[must_use]
    pub const fn from_board(board: BitBoard) -> Self {
        Self { board }
    }

    #[must_use]
    pub const fn board(&self) -> &BitBoard {
        &self.board
    }

    /// Returns the stone on `(x, y)`, or `None` if the cell is empty.
    #[must_use]
    pub const fn cell(&self, x: usize, y: usize) -> Option<Color> {
        self.board.get(x, y)
    }

    /// Returns every legal move for `color` in row-major order (y outer, x inner).
    #[must_use]
    pub fn legal_moves(&self, color: Color) -> MoveList {
        moves_from_mask(self.board.legal_mask(color))
    }

    #[must_use]
    pub fn legal_move_count(&self, color: Color) -> u32 {
        self.board.legal_mask(color).count_ones()
    }

    #[must_use]
    pub fn has_legal_move(&self, color: Color) -> bool {
        self.board.legal_mask(color) != 0
    }

    #[must_use]
    pub fn can_place(&self, mv: Move, color: Color) -> bool {
        self.board.flips(mv, color) != 0
    }

    /// Places a `color` stone on `mv` and flips every sandwiched opponent run.
    ///
    /// Fails without mutating the position if the cell is occupied or the
    /// move would flip nothing.
    pub fn try_place(&mut self, mv: Move, color: Color) -> Result<(), IllegalMoveError> {
        let flips = self.board.flips(mv, color);
        if flips == 0 {
            return Err(IllegalMoveError { mv, color });
        }
        self.board.apply_flips(mv, flips, color);
        Ok(())
    }

    /// Same as [`try_place`](Self::try_place), reporting success as a boolean.
    pub fn place(&mut self, mv: Move, color: Color) -> bool {
        self.try_place(mv, color).is_ok()
    }

    /// Places on raw coordinates. Off-board coordinates fail like any other
    /// illegal move, leaving the position unchanged.
    pub fn place_at(&mut self, x: usize, y: usize, color: Color) -> bool {
        Move::try_new(x, y).is_some_and(|mv| self.place(mv, color))
    }

    /// Returns `true` when neither color has a legal move.
    ///
    /// This is not the same as a full board: a game can end with empty cells
    /// left when both sides are forced to pass.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !self.has_legal_move(Color::Black) && !self.has_legal_move(Color::White)
    }

    /// Returns `(black_count, white_count)`.
    #[must_use]
    pub const fn score(&self) -> (u32, u32) {
        (
            self.board.count(Color::Black),
            self.board.count(Color::White),
        )
    }

    #[must_use]
    pub const fn empty_count(&self) -> u32 {
        self.board.empty_count()
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _, seq::IndexedRandom as _};
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::core::{BOARD_SIZE, CELL_COUNT};

    const RAYS: [(isize, isize); 8] = [
        (-1, -1),
        (0, -1),
        (1, -1),
        (-1, 0),
        (1, 0),
        (-1, 1),
        (0, 1),
        (1, 1),
    ];

    fn cell_at(board: &BitBoard, x: isize, y: isize) -> Option<Option<Color>> {
        let range = 0..BOARD_SIZE as isize;
        (range.contains(&x) && range.contains(&y)).then(|| board.get(x as usize, y as usize))
    }

    /// Cell-by-cell flip computation used as a reference for the bit-parallel one.
    fn naive_flips(board: &BitBoard, mv: Move, color: Color) -> Vec<(usize, usize)> {
        if board.get(mv.x(), mv.y()).is_some() {
            return vec![];
        }
        let mut flips = vec![];
        for (dx, dy) in RAYS {
            let mut run = vec![];
            let mut x = mv.x() as isize + dx;
            let mut y = mv.y() as isize + dy;
            loop {
                match cell_at(board, x, y) {
                    Some(Some(c)) if c == color.opponent() => run.push((x, y)),
                    Some(Some(_)) => {
                        flips.extend(run.iter().map(|&(x, y)| (x as usize, y as usize)));
                        break;
                    }
                    _ => break,
                }
                x += dx;
                y += dy;
            }
        }
        flips
    }

    fn naive_legal_moves(board: &BitBoard, color: Color) -> Vec<Move> {
        (0..CELL_COUNT)
            .map(Move::from_index)
            .filter(|&mv| !naive_flips(board, mv, color).is_empty())
            .collect()
    }

    fn random_positions(seed: u64, games: usize) -> Vec<GameState> {
        let mut rng = Pcg64Mcg::seed_from_u64(seed);
        let mut positions = vec![];
        for _ in 0..games {
            let mut state = GameState::new();
            let mut color = Color::Black;
            while !state.is_terminal() {
                positions.push(state);
                let moves = state.legal_moves(color);
                if let Some(&mv) = moves.choose(&mut rng) {
                    assert!(state.place(mv, color));
                }
                color = color.opponent();
                // occasionally continue from an arbitrary side to diversify positions
                if rng.random_bool(0.05) {
                    color = color.opponent();
                }
            }
            positions.push(state);
        }
        positions
    }

    #[test]
    fn test_initial_legal_moves() {
        let state = GameState::new();
        let moves = state.legal_moves(Color::Black);
        assert_eq!(
            moves.as_slice(),
            &[
                Move::new(3, 2),
                Move::new(2, 3),
                Move::new(5, 4),
                Move::new(4, 5),
            ]
        );
        let moves = state.legal_moves(Color::White);
        assert_eq!(
            moves.as_slice(),
            &[
                Move::new(4, 2),
                Move::new(5, 3),
                Move::new(2, 4),
                Move::new(3, 5),
            ]
        );
    }

    #[test]
    fn test_legal_moves_match_naive_scan() {
        for state in random_positions(0x5eed, 20) {
            for color in Color::ALL {
                let expected = naive_legal_moves(state.board(), color);
                assert_eq!(
                    state.legal_moves(color).as_slice(),
                    expected.as_slice(),
                    "legal moves mismatch for {color} on\n{}",
                    state.board()
                );
            }
        }
    }

    #[test]
    fn test_place_flips_match_naive_scan() {
        for state in random_positions(42, 10) {
            for color in Color::ALL {
                for mv in state.legal_moves(color) {
                    let mut expected = *state.board();
                    expected.set(mv.x(), mv.y(), Some(color));
                    for (x, y) in naive_flips(state.board(), mv, color) {
                        expected.set(x, y, Some(color));
                    }

                    let mut next = state;
                    next.try_place(mv, color).unwrap();
                    assert_eq!(next.board(), &expected, "{color} plays {mv}");
                }
            }
        }
    }

    #[test]
    fn test_place_flips_only_up_to_boundary() {
        let mut state = GameState::from_board(BitBoard::from_ascii(
            r"
            ........
            ........
            ........
            .XOOX.O.
            ........
            ........
            ........
            ........
            ",
        ));
        // (5, 3) only touches a white stone with nothing behind it.
        state.try_place(Move::new(5, 3), Color::Black).unwrap_err();
        state.try_place(Move::new(4, 3), Color::Black).unwrap_err();

        // White captures (4, 3) but nothing past its own stone at (3, 3).
        state.try_place(Move::new(5, 3), Color::White).unwrap();
        assert_eq!(
            state.board(),
            &BitBoard::from_ascii(
                r"
                ........
                ........
                ........
                .XOOOOO.
                ........
                ........
                ........
                ........
                ",
            )
        );

        let mut state = GameState::from_board(BitBoard::from_ascii(
            r"
            ........
            ........
            ........
            .XOO.OOX
            ........
            ........
            ........
            ........
            ",
        ));
        state.try_place(Move::new(4, 3), Color::Black).unwrap();
        assert_eq!(
            state.board(),
            &BitBoard::from_ascii(
                r"
                ........
                ........
                ........
                .XXXXXXX
                ........
                ........
                ........
                ........
                ",
            )
        );
    }

    #[test]
    fn test_illegal_placement_does_not_mutate() {
        let mut state = GameState::new();
        let before = state;

        // occupied
        let err = state.try_place(Move::new(3, 3), Color::Black).unwrap_err();
        assert_eq!(err.mv, Move::new(3, 3));
        assert_eq!(err.color, Color::Black);
        // empty but flips nothing
        assert!(!state.place(Move::new(0, 0), Color::Black));
        assert!(!state.can_place(Move::new(0, 0), Color::Black));
        assert_eq!(state, before);
    }

    #[test]
    fn test_place_at_rejects_off_board() {
        let mut state = GameState::new();
        let before = state;
        assert!(!state.place_at(8, 3, Color::Black));
        assert!(!state.place_at(3, 8, Color::White));
        assert!(!state.place_at(usize::MAX, usize::MAX, Color::Black));
        assert_eq!(state, before);

        assert!(state.place_at(3, 2, Color::Black));
        assert_eq!(state.cell(3, 3), Some(Color::Black));
    }

    #[test]
    fn test_terminal_requires_both_sides_blocked() {
        let full = GameState::from_board(BitBoard::from_masks(u64::MAX, 0));
        assert!(full.is_terminal());
        assert_eq!(full.empty_count(), 0);

        // Empty cells remain but nobody can capture anything.
        let wipeout = GameState::from_board(BitBoard::from_ascii(
            r"
            XXX.....
            XXX.....
            ........
            ........
            ........
            ........
            ........
            ........
            ",
        ));
        assert!(wipeout.is_terminal());
        assert_eq!(wipeout.empty_count(), 58);

        // Only white can move: not terminal.
        let one_sided = GameState::from_board(BitBoard::from_ascii(
            r"
            OX......
            ........
            ........
            ........
            ........
            ........
            ........
            ........
            ",
        ));
        assert!(!one_sided.has_legal_move(Color::Black));
        assert!(one_sided.has_legal_move(Color::White));
        assert!(!one_sided.is_terminal());
    }

    #[test]
    fn test_score_and_empty_count() {
        let mut state = GameState::new();
        assert_eq!(state.score(), (2, 2));
        state.try_place(Move::new(3, 2), Color::Black).unwrap();
        assert_eq!(state.score(), (4, 1));
        assert_eq!(state.empty_count(), 59);
        assert_eq!(state.cell(3, 3), Some(Color::Black));
    }

    #[test]
    fn test_copy_is_independent() {
        let original = GameState::new();
        let mut copy = original;
        copy.try_place(Move::new(3, 2), Color::Black).unwrap();
        assert_eq!(original, GameState::new());
        assert_ne!(original, copy);
    }
}
