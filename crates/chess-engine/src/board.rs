//! Mailbox board representation.
//!
//! The board owns every piece instance in a slab addressed by [`PieceId`];
//! the 8×8 grid stores the id of the piece standing on each cell. A piece
//! that leaves the grid (captured, or an expired en passant marker) keeps
//! its slab entry so that a simulated capture can be put back.

use chess_core::{Color, Layout, PieceKind, Square};
use thiserror::Error;

use crate::piece::{Piece, PieceId, Role};

/// Board-level failures.
///
/// These never come from user input: they signal that the grid and the
/// pieces' recorded squares disagree, which is a bug in the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("coordinate out of bounds: rank {rank}, file {file}")]
    OutOfBounds { rank: u8, file: u8 },

    #[error("no piece with id {0}")]
    UnknownPiece(PieceId),

    #[error("piece {id} records {recorded} but that cell does not hold it")]
    Desynchronized { id: PieceId, recorded: Square },
}

/// An 8×8 grid of optional occupants plus the pieces that fill it.
#[derive(Debug, Clone)]
pub struct Board {
    grid: [Option<PieceId>; 64],
    pieces: Vec<Piece>,
}

impl Default for Board {
    fn default() -> Self {
        Board {
            grid: [None; 64],
            pieces: Vec::new(),
        }
    }
}

impl Board {
    /// Creates an empty board.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a board holding every piece of a layout.
    pub fn from_layout(layout: &Layout) -> Self {
        let mut board = Board::empty();
        for &(square, kind, color) in &layout.placements {
            board.place(Role::Regular(kind), color, square);
        }
        board
    }

    /// Puts a new piece on `square` and returns its id.
    ///
    /// Any piece already on that cell is overwritten; callers are expected
    /// to place onto empty cells.
    pub fn place(&mut self, role: Role, color: Color, square: Square) -> PieceId {
        let id = PieceId(self.pieces.len());
        self.pieces.push(Piece::new(id, role, color, square));
        self.grid[square.index()] = Some(id);
        id
    }

    /// Looks up the occupant of a `(rank, file)` cell.
    pub fn occupant_at(&self, rank: u8, file: u8) -> Result<Option<&Piece>, BoardError> {
        let square = Square::new(rank, file).map_err(|_| BoardError::OutOfBounds { rank, file })?;
        Ok(self.occupant(square))
    }

    /// Looks up the occupant of a square.
    #[inline]
    pub fn occupant(&self, square: Square) -> Option<&Piece> {
        self.grid[square.index()].map(|id| &self.pieces[id.0])
    }

    /// Returns true if the piece is currently standing on the grid.
    pub fn contains(&self, id: PieceId) -> bool {
        self.pieces
            .get(id.0)
            .is_some_and(|piece| self.grid[piece.square.index()] == Some(id))
    }

    /// Moves a piece to `dest`, updating both the grid and its recorded
    /// square. Returns the id of the occupant that was overwritten.
    ///
    /// This is the only way a piece changes squares.
    pub fn relocate(&mut self, id: PieceId, dest: Square) -> Result<Option<PieceId>, BoardError> {
        let origin = self.piece(id)?.square;
        if self.grid[origin.index()] != Some(id) {
            return Err(BoardError::Desynchronized {
                id,
                recorded: origin,
            });
        }
        self.grid[origin.index()] = None;
        let displaced = self.grid[dest.index()].replace(id);
        self.pieces[id.0].square = dest;
        Ok(displaced.filter(|&other| other != id))
    }

    /// Takes a piece off the grid, leaving its slab entry in place.
    pub fn lift(&mut self, id: PieceId) -> Result<(), BoardError> {
        let square = self.piece(id)?.square;
        if self.grid[square.index()] == Some(id) {
            self.grid[square.index()] = None;
        }
        Ok(())
    }

    /// Puts a lifted piece back on its recorded square.
    pub fn restore(&mut self, id: PieceId) -> Result<(), BoardError> {
        let square = self.piece(id)?.square;
        self.grid[square.index()] = Some(id);
        Ok(())
    }

    /// Returns a piece by id.
    pub fn piece(&self, id: PieceId) -> Result<&Piece, BoardError> {
        self.pieces.get(id.0).ok_or(BoardError::UnknownPiece(id))
    }

    /// Returns a mutable piece by id.
    pub fn piece_mut(&mut self, id: PieceId) -> Result<&mut Piece, BoardError> {
        self.pieces.get_mut(id.0).ok_or(BoardError::UnknownPiece(id))
    }

    /// Iterates over the pieces standing on the grid, a8 first.
    pub fn occupants(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.grid.iter().flatten().map(|id| &self.pieces[id.0])
    }

    /// Recomputes the reachable squares of one piece from the current grid.
    pub fn recompute(&mut self, id: PieceId) -> Result<(), BoardError> {
        let reach = self.piece(id)?.reach(self);
        self.piece_mut(id)?.set_reach(reach);
        Ok(())
    }

    /// Returns the square of the king of `color`, if it is on the board.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.occupants()
            .find(|piece| piece.color == color && piece.kind() == Some(PieceKind::King))
            .map(|piece| piece.square)
    }

    /// Writes the FEN piece-placement field for the current grid.
    ///
    /// En passant markers are not pieces and are written as empty squares.
    pub fn placement(&self) -> String {
        let mut fen = String::new();
        for rank in 0..8u8 {
            let mut empty_count = 0;
            for file in 0..8u8 {
                let square = Square::ALL[(rank * 8 + file) as usize];
                match self.occupant(square).and_then(|p| p.kind().map(|k| (k, p.color))) {
                    Some((kind, color)) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push(kind.to_fen_char(color));
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank < 7 {
                fen.push('/');
            }
        }
        fen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::FenParser;

    fn sq(label: &str) -> Square {
        Square::from_label(label).unwrap()
    }

    #[test]
    fn startpos_placement_roundtrip() {
        let board = Board::from_layout(&FenParser::parse(FenParser::STARTPOS).unwrap());
        assert_eq!(
            board.placement(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"
        );
        assert_eq!(board.occupants().count(), 32);
    }

    #[test]
    fn occupant_at_checks_bounds() {
        let board = Board::empty();
        assert_eq!(board.occupant_at(7, 7).unwrap().map(|p| p.id), None);
        assert_eq!(
            board.occupant_at(8, 0).unwrap_err(),
            BoardError::OutOfBounds { rank: 8, file: 0 }
        );
    }

    #[test]
    fn place_and_lookup() {
        let mut board = Board::empty();
        let id = board.place(Role::Regular(PieceKind::Knight), Color::Black, sq("g8"));
        let piece = board.occupant_at(0, 6).unwrap().unwrap();
        assert_eq!(piece.id, id);
        assert_eq!(piece.kind(), Some(PieceKind::Knight));
        assert_eq!(piece.color, Color::Black);
    }

    #[test]
    fn relocate_moves_grid_and_record() {
        let mut board = Board::empty();
        let rook = board.place(Role::Regular(PieceKind::Rook), Color::White, sq("a1"));
        let pawn = board.place(Role::Regular(PieceKind::Pawn), Color::Black, sq("a7"));

        assert_eq!(board.relocate(rook, sq("a4")).unwrap(), None);
        assert!(board.occupant(sq("a1")).is_none());
        assert_eq!(board.piece(rook).unwrap().square, sq("a4"));

        assert_eq!(board.relocate(rook, sq("a7")).unwrap(), Some(pawn));
        assert_eq!(board.occupant(sq("a7")).map(|p| p.id), Some(rook));
        assert!(!board.contains(pawn));
    }

    #[test]
    fn relocate_detects_desync() {
        let mut board = Board::empty();
        let rook = board.place(Role::Regular(PieceKind::Rook), Color::White, sq("a1"));
        board.lift(rook).unwrap();
        assert_eq!(
            board.relocate(rook, sq("a2")),
            Err(BoardError::Desynchronized {
                id: rook,
                recorded: sq("a1")
            })
        );
    }

    #[test]
    fn lift_and_restore() {
        let mut board = Board::empty();
        let queen = board.place(Role::Regular(PieceKind::Queen), Color::White, sq("d1"));
        board.lift(queen).unwrap();
        assert!(board.occupant(sq("d1")).is_none());
        board.restore(queen).unwrap();
        assert_eq!(board.occupant(sq("d1")).map(|p| p.id), Some(queen));
    }

    #[test]
    fn unknown_piece() {
        let mut board = Board::empty();
        assert_eq!(
            board.lift(PieceId(3)),
            Err(BoardError::UnknownPiece(PieceId(3)))
        );
    }

    #[test]
    fn king_square() {
        let board = Board::from_layout(&FenParser::parse("4k3/8/8/8/8/8/8/4K3").unwrap());
        assert_eq!(board.king_square(Color::White), Some(sq("e1")));
        assert_eq!(board.king_square(Color::Black), Some(sq("e8")));
        assert_eq!(Board::empty().king_square(Color::White), None);
    }
}
