//! Board square coordinates and their labels.
//!
//! A square is addressed by a `(rank, file)` index pair, each in `0..8`.
//! Rank index 0 is Black's back rank (label rank `8`) and rank index 7 is
//! White's back rank (label rank `1`). File index 0 is the `a` file.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors raised when converting between coordinates and labels.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoordinateError {
    #[error("invalid coordinate: rank {rank}, file {file}")]
    InvalidCoordinate { rank: u8, file: u8 },

    #[error("invalid square label: '{0}'")]
    InvalidLabel(String),
}

const FILES: &[u8; 8] = b"abcdefgh";

/// Converts a `(rank, file)` index pair into its two-character label.
pub fn to_label(rank: u8, file: u8) -> Result<String, CoordinateError> {
    Square::new(rank, file).map(Square::to_label)
}

/// Parses a two-character label into its `(rank, file)` index pair.
pub fn from_label(label: &str) -> Result<(u8, u8), CoordinateError> {
    Square::from_label(label).map(|sq| (sq.rank(), sq.file()))
}

/// A square on the board, indexed 0-63.
///
/// Squares are stored row by row starting at a8:
/// - a8 = 0, b8 = 1, ..., h8 = 7
/// - a7 = 8, ..., h1 = 63
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Every square, from a8 to h1.
    pub const ALL: [Square; 64] = {
        let mut all = [Square(0); 64];
        let mut i = 0;
        while i < 64 {
            all[i] = Square(i as u8);
            i += 1;
        }
        all
    };

    /// Creates a square from a rank index and a file index.
    #[inline]
    pub fn new(rank: u8, file: u8) -> Result<Self, CoordinateError> {
        if rank < 8 && file < 8 {
            Ok(Square(rank * 8 + file))
        } else {
            Err(CoordinateError::InvalidCoordinate { rank, file })
        }
    }

    /// Creates a square from its cell index (0-63).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 64 {
            Some(Square(index))
        } else {
            None
        }
    }

    /// Parses a label such as `"e4"`.
    pub fn from_label(label: &str) -> Result<Self, CoordinateError> {
        let invalid = || CoordinateError::InvalidLabel(label.to_string());
        let bytes = label.as_bytes();
        if bytes.len() != 2 {
            return Err(invalid());
        }
        let file = FILES
            .iter()
            .position(|&c| c == bytes[0])
            .ok_or_else(invalid)? as u8;
        let rank = match bytes[1] {
            digit @ b'1'..=b'8' => 8 - (digit - b'0'),
            _ => return Err(invalid()),
        };
        Ok(Square(rank * 8 + file))
    }

    /// Returns the cell index (0-63).
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the rank index (0 = rank 8, 7 = rank 1).
    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 / 8
    }

    /// Returns the file index (0 = file a).
    #[inline]
    pub const fn file(self) -> u8 {
        self.0 % 8
    }

    /// Returns the square reached by adding a `(rank, file)` delta, or
    /// `None` when it falls off the board.
    #[inline]
    pub const fn offset(self, d_rank: i8, d_file: i8) -> Option<Self> {
        let rank = self.rank() as i8 + d_rank;
        let file = self.file() as i8 + d_file;
        if rank < 0 || rank > 7 || file < 0 || file > 7 {
            None
        } else {
            Some(Square((rank * 8 + file) as u8))
        }
    }

    /// Returns true for light squares, matching a1 being dark.
    #[inline]
    pub const fn is_light(self) -> bool {
        (self.rank() + self.file()) % 2 == 0
    }

    /// Returns the label of this square (e.g. `"e4"`).
    pub fn to_label(self) -> String {
        let mut label = String::with_capacity(2);
        label.push(FILES[self.file() as usize] as char);
        label.push((b'8' - self.rank()) as char);
        label
    }
}

impl FromStr for Square {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_label(s)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self.to_label())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_label())
    }
}
