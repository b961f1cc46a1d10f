//! Move representation.

use crate::{CoordinateError, Square};
use std::fmt;

/// A move given as a plain origin/destination pair.
///
/// Moves carry no flags: whether a move is a capture, a double push or an
/// en passant capture follows from the board it is played on.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    /// Creates a new move.
    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        Move { from, to }
    }

    /// Creates a move from two square labels (e.g. `"e2"`, `"e4"`).
    pub fn from_labels(origin: &str, destination: &str) -> Result<Self, CoordinateError> {
        Ok(Move::new(
            Square::from_label(origin)?,
            Square::from_label(destination)?,
        ))
    }

    /// Returns the rank distance covered by this move.
    #[inline]
    pub const fn rank_distance(self) -> u8 {
        self.from.rank().abs_diff(self.to.rank())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}{})", self.from, self.to)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_from_labels() {
        let m = Move::from_labels("e2", "e4").unwrap();
        assert_eq!(m.from.to_label(), "e2");
        assert_eq!(m.to.to_label(), "e4");
        assert_eq!(m.rank_distance(), 2);
    }

    #[test]
    fn move_from_bad_labels() {
        assert_eq!(
            Move::from_labels("e2", "e9"),
            Err(CoordinateError::InvalidLabel("e9".to_string()))
        );
        assert!(Move::from_labels("z2", "e4").is_err());
    }

    #[test]
    fn move_debug_display() {
        let m = Move::from_labels("g1", "f3").unwrap();
        assert_eq!(format!("{:?}", m), "Move(g1f3)");
        assert_eq!(format!("{}", m), "g1 f3");
    }
}
