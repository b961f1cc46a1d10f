//! Board layouts from FEN (Forsyth-Edwards Notation) text.
//!
//! Only the piece-placement and active-color fields carry meaning here.
//! Castling rights, the en passant target and the move clocks may follow
//! but are ignored.

use thiserror::Error;

use crate::{Color, PieceKind, Square};

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: empty input")]
    Empty,

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),
}

/// A board layout: which piece stands where, and who moves first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Occupied squares in reading order (a8 first, h1 last).
    pub placements: Vec<(Square, PieceKind, Color)>,
    /// Side to move; White when the active-color field is absent.
    pub side_to_move: Color,
}

/// Parser for the FEN fields this crate understands.
#[derive(Debug, Clone, Copy, Default)]
pub struct FenParser;

impl FenParser {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN string into a [`Layout`].
    pub fn parse(fen: &str) -> Result<Layout, FenError> {
        let mut parts = fen.split_whitespace();
        let placement = parts.next().ok_or(FenError::Empty)?;
        let placements = Self::parse_piece_placement(placement)?;

        let side_to_move = match parts.next() {
            None | Some("w") => Color::White,
            Some("b") => Color::Black,
            Some(other) => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        Ok(Layout {
            placements,
            side_to_move,
        })
    }

    fn parse_piece_placement(
        placement: &str,
    ) -> Result<Vec<(Square, PieceKind, Color)>, FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut placements = Vec::new();
        // FEN lists rank 8 first, which is rank index 0.
        for (rank, text) in (0u8..).zip(ranks) {
            let mut file = 0u32;
            for c in text.chars() {
                if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    file += skip;
                } else if let Some((kind, color)) = PieceKind::from_fen_char(c) {
                    if file < 8 {
                        let square = Square::from_index(rank * 8 + file as u8)
                            .ok_or_else(|| FenError::InvalidPiecePlacement(text.to_string()))?;
                        placements.push((square, kind, color));
                    }
                    file += 1;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        8 - rank
                    )));
                }
            }
            if file != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    8 - rank,
                    file
                )));
            }
        }

        Ok(placements)
    }
}
