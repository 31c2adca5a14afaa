use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::chain::Chain;
use crate::PlayerId;

/// Board dimensions: rows A..I, columns 1..12.
pub const ROWS: u8 = 9;
pub const COLS: u8 = 12;

#[derive(Error, Debug)]
pub enum TileParseError {
    #[error("string is the wrong length")]
    WrongLength,
    #[error("string starts with an invalid letter")]
    InvalidLetter,
    #[error("string ends with an invalid number")]
    InvalidNumber,
}

/// A grid coordinate. Ordering is row-major, which is also the turn-order
/// ranking rule for the starting tile draw.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

/// Where a tile currently lives. Every tile carries exactly one location.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum TileLocation {
    Bag,
    Board,
    /// Permanently removed from play (playing it would join two safe chains).
    Dead,
    Player(PlayerId),
}

/// One of the 108 physical tiles. A board tile without a `hotel` tag is a
/// loose tile, eligible to be absorbed by a chain later.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub pos: Position,
    pub location: TileLocation,
    pub hotel: Option<Chain>,
}

impl Tile {
    pub fn new(row: u8, col: u8) -> Self {
        Self {
            pos: Position { row, col },
            location: TileLocation::Bag,
            hotel: None,
        }
    }

    pub fn is_on_board(&self) -> bool {
        self.location == TileLocation::Board
    }

    pub fn is_loose(&self) -> bool {
        self.is_on_board() && self.hotel.is_none()
    }
}

impl TryFrom<&str> for Position {
    type Error = TileParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value.len() < 2 || value.len() > 3 {
            return Err(TileParseError::WrongLength);
        }

        let letter = value.chars().next().unwrap();
        let row = match letter {
            'A'..='Z' => letter as u8 - b'A',
            _ => return Err(TileParseError::InvalidLetter),
        };
        if row >= ROWS {
            return Err(TileParseError::InvalidLetter);
        }

        let Ok(number) = u8::from_str(&value[1..]) else {
            return Err(TileParseError::InvalidNumber);
        };
        if number == 0 || number > COLS {
            return Err(TileParseError::InvalidNumber);
        }

        Ok(Position { row, col: number - 1 })
    }
}

impl Debug for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_string().as_str())
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}{}", (b'A' + self.row) as char, self.col + 1))
    }
}

#[macro_export]
macro_rules! tile {
    ($tile:literal) => {
        $tile.try_into().expect("a valid tile string")
    };
}
