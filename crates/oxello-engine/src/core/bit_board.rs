use std::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};

use super::{BOARD_SIZE, CELL_COUNT, Color, Move};

// Cells whose x coordinate is not 0 / not 7. Applied after horizontal and
// diagonal shifts so that stones do not wrap around to the adjacent row.
const NOT_FIRST_COLUMN: u64 = !0x0101_0101_0101_0101;
const NOT_LAST_COLUMN: u64 = !0x8080_8080_8080_8080;

/// One of the 8 ray directions, expressed as a bit shift plus a wrap mask.
#[derive(Debug, Clone, Copy)]
struct Direction {
    shift: i8,
    mask: u64,
}

impl Direction {
    #[inline]
    fn step(self, bits: u64) -> u64 {
        let amount = self.shift.unsigned_abs();
        if self.shift > 0 {
            (bits << amount) & self.mask
        } else {
            (bits >> amount) & self.mask
        }
    }
}

const DIRECTIONS: [Direction; 8] = [
    // (dx, dy) = (-1, -1)
    Direction {
        shift: -9,
        mask: NOT_LAST_COLUMN,
    },
    // (0, -1)
    Direction {
        shift: -8,
        mask: u64::MAX,
    },
    // (1, -1)
    Direction {
        shift: -7,
        mask: NOT_FIRST_COLUMN,
    },
    // (-1, 0)
    Direction {
        shift: -1,
        mask: NOT_LAST_COLUMN,
    },
    // (1, 0)
    Direction {
        shift: 1,
        mask: NOT_FIRST_COLUMN,
    },
    // (-1, 1)
    Direction {
        shift: 7,
        mask: NOT_LAST_COLUMN,
    },
    // (0, 1)
    Direction {
        shift: 8,
        mask: u64::MAX,
    },
    // (1, 1)
    Direction {
        shift: 9,
        mask: NOT_FIRST_COLUMN,
    },
];

/// 8x8 two-color occupancy stored as a pair of 64-bit masks.
///
/// Bit `y * 8 + x` represents cell `(x, y)`. A cell is never set in both masks.
///
/// ```text
///       x=0 ........ x=7
/// y=0   bit 0 ...... bit 7
/// ...
/// y=7   bit 56 ..... bit 63
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitBoard {
    black: u64,
    white: u64,
}

impl Default for BitBoard {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl Serialize for BitBoard {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "<black>,<white>" as two 16-digit hex masks
        serializer.serialize_str(&format!("{:016x},{:016x}", self.black, self.white))
    }
}

impl<'de> Deserialize<'de> for BitBoard {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        let Some((black, white)) = s.split_once(',') else {
            return Err(serde::de::Error::custom(format!(
                "expected two comma-separated hex masks, got {s:?}"
            )));
        };
        let parse = |name: &str, hex: &str| {
            u64::from_str_radix(hex, 16).map_err(|e| {
                serde::de::Error::custom(format!("invalid hex for {name} mask: {hex} ({e})"))
            })
        };
        let black = parse("black", black)?;
        let white = parse("white", white)?;
        if black & white != 0 {
            return Err(serde::de::Error::custom(format!(
                "black and white masks overlap: {:016x}",
                black & white
            )));
        }

        Ok(BitBoard { black, white })
    }
}

impl BitBoard {
    /// Board with no stones.
    pub const EMPTY: Self = Self { black: 0, white: 0 };

    /// Standard start position: white on (3, 3) and (4, 4), black on (4, 3) and (3, 4).
    pub const INITIAL: Self = Self {
        black: Move::new(4, 3).bit() | Move::new(3, 4).bit(),
        white: Move::new(3, 3).bit() | Move::new(4, 4).bit(),
    };

    /// Creates a board from raw occupancy masks.
    ///
    /// # Panics
    ///
    /// Panics if the masks overlap.
    #[must_use]
    pub const fn from_masks(black: u64, white: u64) -> Self {
        assert!(black & white == 0, "black and white masks overlap");
        Self { black, white }
    }

    /// Returns the occupancy mask of `color`.
    #[inline]
    #[must_use]
    pub const fn stones(&self, color: Color) -> u64 {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }

    #[inline]
    #[must_use]
    pub const fn occupied(&self) -> u64 {
        self.black | self.white
    }

    #[inline]
    #[must_use]
    pub const fn empties(&self) -> u64 {
        !self.occupied()
    }

    #[inline]
    #[must_use]
    pub const fn count(&self, color: Color) -> u32 {
        self.stones(color).count_ones()
    }

    #[inline]
    #[must_use]
    pub const fn empty_count(&self) -> u32 {
        self.empties().count_ones()
    }

    /// Returns the stone on `(x, y)`, or `None` if the cell is empty.
    #[inline]
    #[must_use]
    pub const fn get(&self, x: usize, y: usize) -> Option<Color> {
        let bit = Move::new(x, y).bit();
        if self.black & bit != 0 {
            Some(Color::Black)
        } else if self.white & bit != 0 {
            Some(Color::White)
        } else {
            None
        }
    }

    /// Sets `(x, y)` to `cell`, clearing the bit in the other mask.
    #[inline]
    pub const fn set(&mut self, x: usize, y: usize, cell: Option<Color>) {
        let bit = Move::new(x, y).bit();
        match cell {
            Some(Color::Black) => {
                self.black |= bit;
                self.white &= !bit;
            }
            Some(Color::White) => {
                self.white |= bit;
                self.black &= !bit;
            }
            None => {
                self.black &= !bit;
                self.white &= !bit;
            }
        }
    }

    /// Computes the mask of cells where `color` may legally place a stone.
    ///
    /// A cell is legal when it is empty and at least one ray from it crosses a
    /// contiguous run of opponent stones terminated by an own stone.
    #[must_use]
    pub fn legal_mask(&self, color: Color) -> u64 {
        let own = self.stones(color);
        let opp = self.stones(color.opponent());
        let empties = self.empties();

        let mut legal = 0;
        for dir in DIRECTIONS {
            // An opponent run has at most 6 stones between two board cells.
            let mut run = dir.step(own) & opp;
            for _ in 0..5 {
                run |= dir.step(run) & opp;
            }
            legal |= dir.step(run) & empties;
        }
        legal
    }

    /// Computes the opponent stones flipped by `color` playing `mv`.
    ///
    /// Returns 0 if the cell is occupied or no run is sandwiched.
    #[must_use]
    pub fn flips(&self, mv: Move, color: Color) -> u64 {
        let origin = mv.bit();
        if self.occupied() & origin != 0 {
            return 0;
        }
        let own = self.stones(color);
        let opp = self.stones(color.opponent());

        let mut flips = 0;
        for dir in DIRECTIONS {
            let mut run = 0;
            let mut cursor = dir.step(origin);
            while cursor & opp != 0 {
                run |= cursor;
                cursor = dir.step(cursor);
            }
            if cursor & own != 0 {
                flips |= run;
            }
        }
        flips
    }

    /// Returns every cell 8-adjacent to at least one cell in `mask`.
    #[must_use]
    pub fn adjacent_cells(mask: u64) -> u64 {
        DIRECTIONS
            .into_iter()
            .fold(0, |acc, dir| acc | dir.step(mask))
    }

    /// Places a `color` stone on `mv` and turns every stone in `flips` to `color`.
    pub(crate) fn apply_flips(&mut self, mv: Move, flips: u64, color: Color) {
        let changed = flips | mv.bit();
        match color {
            Color::Black => {
                self.black |= changed;
                self.white &= !changed;
            }
            Color::White => {
                self.white |= changed;
                self.black &= !changed;
            }
        }
    }

    /// Creates a `BitBoard` from ASCII art representation for testing.
    ///
    /// `X` is a black stone, `O` a white stone and `.` an empty cell.
    /// Other characters are ignored; rows are given top (y=0) to bottom.
    ///
    /// # Panics
    ///
    /// Panics if the art does not describe exactly 8 rows of 8 cells.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let mut board = Self::EMPTY;
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert_eq!(
            lines.len(),
            BOARD_SIZE,
            "Board must have exactly {BOARD_SIZE} rows, got {}",
            lines.len()
        );

        for (y, line) in lines.iter().enumerate() {
            let cells: Vec<char> = line
                .chars()
                .filter(|c| matches!(c, 'X' | 'O' | '.'))
                .collect();
            assert_eq!(
                cells.len(),
                BOARD_SIZE,
                "Each row must have exactly {BOARD_SIZE} cells, got {} at row {y}",
                cells.len(),
            );
            for (x, ch) in cells.into_iter().enumerate() {
                let cell = match ch {
                    'X' => Some(Color::Black),
                    'O' => Some(Color::White),
                    _ => None,
                };
                board.set(x, y, cell);
            }
        }
        board
    }
}

impl fmt::Display for BitBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for index in 0..CELL_COUNT {
            let mv = Move::from_index(index);
            let ch = self.get(mv.x(), mv.y()).map_or('.', Color::to_char);
            f.write_char(ch)?;
            if mv.x() == BOARD_SIZE - 1 {
                f.write_char('\n')?;
            }
        }
        Ok(())
    }
}
