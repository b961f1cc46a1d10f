//! Per-side index of pieces.

use chess_core::{Color, PieceKind, Square};

use crate::piece::PieceId;
use crate::{Board, BoardError};

/// One side of the game.
///
/// A player does not own its pieces; it keeps the ids of the board's pieces
/// of its color so they can be iterated without scanning the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    color: Color,
    pieces: Vec<PieceId>,
}

impl Player {
    /// Collects every piece of `color` currently on the board.
    pub fn from_board(color: Color, board: &Board) -> Self {
        Player {
            color,
            pieces: board
                .occupants()
                .filter(|piece| piece.color == color)
                .map(|piece| piece.id)
                .collect(),
        }
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// The ids of this player's pieces.
    #[inline]
    pub fn pieces(&self) -> &[PieceId] {
        &self.pieces
    }

    pub fn contains(&self, id: PieceId) -> bool {
        self.pieces.contains(&id)
    }

    /// Drops a piece from the list, returning the position it held.
    pub fn remove(&mut self, id: PieceId) -> Option<usize> {
        let index = self.pieces.iter().position(|&p| p == id)?;
        self.pieces.remove(index);
        Some(index)
    }

    /// Puts a piece back at a position returned by [`Player::remove`].
    pub fn insert(&mut self, index: usize, id: PieceId) {
        let index = index.min(self.pieces.len());
        self.pieces.insert(index, id);
    }

    pub fn push(&mut self, id: PieceId) {
        self.pieces.push(id);
    }

    /// Returns this player's king, if it has one.
    pub fn king(&self, board: &Board) -> Option<PieceId> {
        self.pieces.iter().copied().find(|&id| {
            board
                .piece(id)
                .is_ok_and(|piece| piece.kind() == Some(PieceKind::King))
        })
    }

    /// Every cached destination across this player's pieces.
    pub fn available_moves(&self, board: &Board) -> Vec<Square> {
        self.pieces
            .iter()
            .filter_map(|&id| board.piece(id).ok())
            .flat_map(|piece| piece.targets())
            .collect()
    }

    /// Returns true if any piece has a cached destination.
    pub fn has_moves(&self, board: &Board) -> bool {
        self.pieces
            .iter()
            .filter_map(|&id| board.piece(id).ok())
            .any(|piece| piece.has_targets())
    }

    /// Refreshes the cached destinations of every piece.
    pub fn recompute(&self, board: &mut Board) -> Result<(), BoardError> {
        for &id in &self.pieces {
            board.recompute(id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::FenParser;

    fn startpos() -> Board {
        Board::from_layout(&FenParser::parse(FenParser::STARTPOS).unwrap())
    }

    #[test]
    fn from_board_splits_by_color() {
        let board = startpos();
        let white = Player::from_board(Color::White, &board);
        let black = Player::from_board(Color::Black, &board);
        assert_eq!(white.pieces().len(), 16);
        assert_eq!(black.pieces().len(), 16);
        assert!(white
            .pieces()
            .iter()
            .all(|&id| board.piece(id).unwrap().color == Color::White));
    }

    #[test]
    fn remove_and_insert_keep_order() {
        let board = startpos();
        let mut white = Player::from_board(Color::White, &board);
        let before = white.clone();
        let id = white.pieces()[3];

        let index = white.remove(id).unwrap();
        assert_eq!(index, 3);
        assert!(!white.contains(id));
        assert_eq!(white.remove(id), None);

        white.insert(index, id);
        assert_eq!(white, before);
    }

    #[test]
    fn king_lookup() {
        let board = startpos();
        let black = Player::from_board(Color::Black, &board);
        let king = black.king(&board).unwrap();
        assert_eq!(board.piece(king).unwrap().square.to_label(), "e8");
    }

    #[test]
    fn startpos_has_twenty_destinations() {
        let mut board = startpos();
        let white = Player::from_board(Color::White, &board);
        white.recompute(&mut board).unwrap();
        assert_eq!(white.available_moves(&board).len(), 20);
        assert!(white.has_moves(&board));
    }
}
