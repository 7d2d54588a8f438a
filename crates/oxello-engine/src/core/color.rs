use serde::{Deserialize, Serialize};

/// Stone color, also used to name the side to move.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    #[display("black")]
    Black,
    #[display("white")]
    White,
}

impl Color {
    pub const ALL: [Self; 2] = [Self::Black, Self::White];

    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }

    /// Character used by the text board format.
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Self::Black => 'X',
            Self::White => 'O',
        }
    }
}
